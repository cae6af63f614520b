//! # Mimizuku Core
//!
//! RDF term model shared by the constraint engine crates:
//! terms (`Node`), triples and triple patterns, solution bindings and
//! the RDF / RDFS / SPIN vocabularies.

pub mod model;
pub mod vocabulary;

pub use model::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid term '{input}': {reason}")]
    InvalidTerm { input: String, reason: String },
}
