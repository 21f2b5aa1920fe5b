//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into page, folder and link use-cases.
//! - Keep UI glue decoupled from store key layout.

pub mod folder_service;
pub mod link_service;
pub mod page_service;
