//! CLI probe for `leafnote_core`.
//!
//! Without arguments it prints the core version. Given a markdown file it
//! prints the block split the editor would show for it.

use leafnote_core::BlockDocument;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("leafnote_core ping={}", leafnote_core::ping());
    println!("leafnote_core version={}", leafnote_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let document = BlockDocument::deserialize(&content);
    println!("blocks={}", document.len());
    for (index, block) in document.blocks().iter().enumerate() {
        println!("--- [{index}] {}", block.id());
        println!("{}", block.content());
    }
    if document.serialize() != content {
        println!("note: content is not in canonical block form");
    }
    ExitCode::SUCCESS
}
