//! JSON graph loading
//!
//! A graph file is a JSON array of triples, each term in text form:
//!
//! ```json
//! [
//!   {"subject": "<http://example.org/alice>",
//!    "predicate": "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>",
//!    "object": "<http://example.org/Person>"}
//! ]
//! ```

use crate::provenance::{GraphId, Provenance};
use crate::store::RdfStore;
use crate::StoreError;
use chrono::Utc;
use mimizuku_core::Triple;
use std::path::Path;
use tracing::debug;

/// Parse a JSON graph document into triples
pub fn parse_json_triples(json: &str) -> Result<Vec<Triple>, StoreError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON graph document into `store`, returning the number of new triples
pub fn load_json_str(
    store: &mut RdfStore,
    json: &str,
    graph_id: GraphId,
    provenance: Provenance,
) -> Result<usize, StoreError> {
    let triples = parse_json_triples(json)?;
    store.insert_batch(triples, graph_id, provenance)
}

/// Load a JSON graph file into the named graph `<file path>`
pub fn load_json_file<P: AsRef<Path>>(store: &mut RdfStore, path: P) -> Result<usize, StoreError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let source_uri = path.display().to_string();
    let added = load_json_str(
        store,
        &json,
        GraphId::Named(source_uri.clone()),
        Provenance::Imported {
            source_uri,
            imported_at: Utc::now(),
        },
    )?;

    debug!("Loaded {} triples from {}", added, path.display());
    Ok(added)
}

/// Serialize every triple of the store as a JSON graph document
pub fn to_json_string(store: &RdfStore) -> Result<String, StoreError> {
    let triples: Vec<&Triple> = store.iter().map(|stored| &stored.triple).collect();
    Ok(serde_json::to_string_pretty(&triples)?)
}
