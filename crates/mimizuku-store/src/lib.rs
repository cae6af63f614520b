//! # Mimizuku Store
//!
//! Provenance付きRDF Triple Store
//! 制約評価が参照する背景グラフ (read-only view) を提供

pub mod loader;
pub mod provenance;
pub mod store;

pub use loader::*;
pub use provenance::*;
pub use store::*;

pub use mimizuku_core::{Node, Triple};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid triple: {0}")]
    InvalidTriple(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
