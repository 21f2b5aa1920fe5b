//! AI text transforms.
//!
//! # Responsibility
//! - Define the text-transform capability (prompt in, text out).
//! - Hold the registry of configured providers and the active selection.
//! - Shape requests and parse responses for the supported chat APIs; the
//!   network round trip itself goes through an injected transport.
//!
//! # Invariants
//! - No request is sent for blank input.
//! - Provider failures are returned to the caller, never retried.

pub mod actions;
pub mod providers;
pub mod registry;
pub mod service;
pub mod transform;

pub use actions::TransformAction;
pub use providers::{ChatProvider, HttpRequest, HttpResponse, HttpTransport};
pub use registry::{TransformRegistry, TransformRegistryError};
pub use service::TransformService;
pub use transform::{TextTransform, TransformError, TransformResult};
