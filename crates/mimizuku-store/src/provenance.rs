//! Provenance information attached to stored triples

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance information for stored triples
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Provenance {
    /// Asserted directly by an application or test
    Asserted {
        /// Source identifier (e.g., "cli", "ontology-loader")
        source: String,
    },
    /// Data loaded from external sources
    Imported {
        /// Import source (URI, file path, etc.)
        source_uri: String,
        /// Import timestamp
        imported_at: DateTime<Utc>,
    },
}

impl Provenance {
    pub fn asserted<S: Into<String>>(source: S) -> Self {
        Provenance::Asserted { source: source.into() }
    }
}

/// Graph identifier for organizing triples
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GraphId {
    /// Default graph
    #[default]
    Default,
    /// Named graph
    Named(String),
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphId::Default => write!(f, "default"),
            GraphId::Named(name) => write!(f, "named:{}", name),
        }
    }
}
