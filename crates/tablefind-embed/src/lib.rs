//! tablefind-embed
//!
//! Word-vector similarity (`wordvec`) and the query expansion built on it
//! (`expand`).
pub mod expand;
pub mod wordvec;

pub use expand::{expand, Expansion, ExpansionConfig, ExpansionOptions};
pub use wordvec::WordVectors;
