//! # Degreed Domain
//!
//! Data model for the Degreed extraction workspace.
//!
//! This crate contains:
//! - Endpoint, query window and query parameter types
//! - Page, record and flat-row types
//! - OAuth2 credential and token types
//! - Configuration structures and defaults
//! - The shared error type and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
