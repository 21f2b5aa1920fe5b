//! Process-wide file logging.
//!
//! # Responsibility
//! - Start a rolling file logger once per process.
//! - Capture panics as log events.
//!
//! # Invariants
//! - Repeating `init_logging` with an equal config is a no-op.
//! - A second, different config is rejected; the first one stays active.
//! - Initialization never panics.
//!
//! Events are single-line `key=value` records starting with `event=` and
//! `module=`. Page text and API keys are never logged.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "leafnote";
const DEFAULT_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 3;
const PANIC_PAYLOAD_LIMIT: usize = 200;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    config: LoggingConfig,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` for debug builds, `info` otherwise.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

impl FromStr for LogLevel {
    type Err = LoggingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(LoggingError::InvalidLevel(other.to_string())),
        }
    }
}

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Absolute directory for `leafnote*.log` files.
    pub log_dir: PathBuf,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl LoggingConfig {
    /// Build-default level and rotation for `log_dir`.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: LogLevel::for_build(),
            log_dir: log_dir.into(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    fn validate(&self) -> Result<(), LoggingError> {
        if self.log_dir.as_os_str().is_empty() || !self.log_dir.is_absolute() {
            return Err(LoggingError::InvalidDirectory(self.log_dir.clone()));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    InvalidDirectory(PathBuf),
    CreateDirectory { path: PathBuf, source: std::io::Error },
    Backend(String),
    /// Logging is already running with another config.
    Conflict { active: LoggingConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(value) => {
                write!(f, "unknown log level `{value}` (trace|debug|info|warn|error)")
            }
            Self::InvalidDirectory(path) => {
                write!(f, "log directory must be absolute: `{}`", path.display())
            }
            Self::CreateDirectory { path, source } => {
                write!(f, "cannot create log directory `{}`: {source}", path.display())
            }
            Self::Backend(message) => write!(f, "logger backend failed: {message}"),
            Self::Conflict { active } => write!(
                f,
                "logging already active at `{}` with level {}",
                active.log_dir.display(),
                active.level.as_str()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Starts file logging.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    config.validate()?;
    let active = ACTIVE.get_or_try_init(|| start(config))?;
    if &active.config != config {
        return Err(LoggingError::Conflict {
            active: active.config.clone(),
        });
    }
    Ok(())
}

/// Config of the running logger, if any.
pub fn active_logging() -> Option<&'static LoggingConfig> {
    ACTIVE.get().map(|active| &active.config)
}

fn start(config: &LoggingConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: config.log_dir.clone(),
        source,
    })?;

    let handle = Logger::try_with_str(config.level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(file_spec(&config.log_dir))
        .rotate(
            Criterion::Size(config.max_file_bytes),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.max_files),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=app_start module=core status=ok version={} os={} level={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        config.level.as_str(),
        config.log_dir.display()
    );

    Ok(ActiveLogger {
        config: config.clone(),
        _handle: handle,
    })
}

fn file_spec(dir: &Path) -> FileSpec {
    FileSpec::default()
        .directory(dir)
        .basename(LOG_FILE_BASENAME)
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic module=core status=error location={location} payload={}",
            single_line(&panic_payload(info), PANIC_PAYLOAD_LIMIT)
        );
        previous(info);
    }));
}

fn panic_payload(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info.payload();
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string payload>".to_string())
}

/// Flattens `value` to one line of at most `limit` chars (plus `...`).
fn single_line(value: &str, limit: usize) -> String {
    let flat: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut cut: String = flat.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::{active_logging, init_logging, single_line, LogLevel, LoggingConfig, LoggingError};
    use std::path::PathBuf;

    #[test]
    fn level_parsing_is_case_insensitive() {
        assert_eq!(" WARNING ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(LoggingError::InvalidLevel(_))
        ));
    }

    #[test]
    fn relative_directory_is_rejected() {
        let err = init_logging(&LoggingConfig::new("logs")).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidDirectory(_)));
    }

    #[test]
    fn single_line_flattens_and_truncates() {
        assert_eq!(single_line("a\nb\rc", 10), "a b c");
        assert_eq!(single_line("abcdef", 3), "abc...");
    }

    #[test]
    fn second_init_must_match_the_first() {
        let dir = tempfile::tempdir().unwrap().into_path();
        let config = LoggingConfig::new(dir).with_level(LogLevel::Info);
        init_logging(&config).unwrap();
        init_logging(&config).unwrap();

        let other_level = config.clone().with_level(LogLevel::Trace);
        assert!(matches!(
            init_logging(&other_level),
            Err(LoggingError::Conflict { .. })
        ));

        let other_dir = LoggingConfig {
            log_dir: PathBuf::from("/tmp/leafnote-other-logs"),
            ..config.clone()
        };
        assert!(init_logging(&other_dir).is_err());
        assert_eq!(active_logging(), Some(&config));
    }
}
