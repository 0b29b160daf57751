//! tablefind-core
//!
//! Shared domain types, the error enum, collaborator traits and the pure
//! text preparation used by both the index builder and the query path.
pub mod config;
pub mod dataset;
pub mod error;
pub mod flatten;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
