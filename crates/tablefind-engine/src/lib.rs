//! tablefind-engine
//!
//! Orchestration on top of the collaborators: the per-request query
//! executor and the offline index builder.
pub mod builder;
pub mod executor;
pub mod params;
pub mod rows;

pub use builder::{build_index, prepare_document, BuildOptions, BuildStats};
pub use executor::QueryExecutor;
pub use params::Page;
