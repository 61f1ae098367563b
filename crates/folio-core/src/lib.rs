//! # folio-core
//!
//! Core types, traits, and abstractions for the folio document repository.
//!
//! This crate provides the data model (manifest records and documents), the
//! shared error type, and the persistence traits the store implements.

pub mod defaults;
pub mod error;
pub mod file_safety;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use file_safety::validate_file_name;
pub use models::*;
pub use traits::*;
