//! RDF Store implementation with provenance

use crate::provenance::{GraphId, Provenance};
use crate::StoreError;
use chrono::{DateTime, Utc};
use mimizuku_core::{Node, Triple};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Stored triple with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTriple {
    /// Graph identifier
    pub graph_id: GraphId,
    /// The RDF triple
    pub triple: Triple,
    /// When this triple was asserted
    pub asserted_at: DateTime<Utc>,
    /// Provenance information
    pub provenance: Provenance,
}

/// RDF Store with provenance tracking
///
/// Triples keep their insertion order; every lookup returns matches in that
/// order, so callers that walk the graph see a reproducible sequence.
/// A triple is stored at most once per graph.
#[derive(Debug, Default)]
pub struct RdfStore {
    /// All stored triples in insertion order
    triples: Vec<StoredTriple>,
    /// Membership per graph
    members: HashSet<(GraphId, Triple)>,
    /// Subject index for fast lookup
    subject_index: HashMap<Node, Vec<usize>>,
    /// Predicate index for fast lookup
    predicate_index: HashMap<Node, Vec<usize>>,
    /// Object index for fast lookup
    object_index: HashMap<Node, Vec<usize>>,
}

impl RdfStore {
    /// Create a new empty RDF store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple with provenance
    ///
    /// Returns `Ok(false)` when the graph already holds the triple.
    pub fn insert(
        &mut self,
        triple: Triple,
        graph_id: GraphId,
        provenance: Provenance,
    ) -> Result<bool, StoreError> {
        Self::validate(&triple)?;

        if !self.members.insert((graph_id.clone(), triple.clone())) {
            return Ok(false);
        }

        let index = self.triples.len();
        self.index(&triple, index);
        self.triples.push(StoredTriple {
            graph_id,
            triple,
            asserted_at: Utc::now(),
            provenance,
        });

        Ok(true)
    }

    /// Insert into the default graph
    pub fn add(
        &mut self,
        subject: Node,
        predicate: Node,
        object: Node,
    ) -> Result<bool, StoreError> {
        self.insert(
            Triple::new(subject, predicate, object),
            GraphId::Default,
            Provenance::asserted("api"),
        )
    }

    /// Insert multiple triples with the same provenance, returning how many were new
    ///
    /// Every triple is validated first; on error the store is unchanged.
    pub fn insert_batch(
        &mut self,
        triples: Vec<Triple>,
        graph_id: GraphId,
        provenance: Provenance,
    ) -> Result<usize, StoreError> {
        triples.iter().try_for_each(Self::validate)?;

        let mut added = 0;
        for triple in triples {
            if self.insert(triple, graph_id.clone(), provenance.clone())? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Data triples are ground, with a resource subject and an IRI predicate
    fn validate(triple: &Triple) -> Result<(), StoreError> {
        if !triple.is_ground() {
            return Err(StoreError::InvalidTriple(format!(
                "variables are not allowed in data: {}",
                triple
            )));
        }
        if triple.subject.is_literal() {
            return Err(StoreError::InvalidTriple(format!("literal subject: {}", triple)));
        }
        if !triple.predicate.is_iri() {
            return Err(StoreError::InvalidTriple(format!(
                "predicate must be an IRI: {}",
                triple
            )));
        }
        Ok(())
    }

    /// Find triples matching a pattern, in insertion order
    pub fn find_triples(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
    ) -> Vec<&StoredTriple> {
        // Use the most selective index
        let candidates: Vec<&[usize]> = [
            subject.map(|s| Self::lookup(&self.subject_index, s)),
            predicate.map(|p| Self::lookup(&self.predicate_index, p)),
            object.map(|o| Self::lookup(&self.object_index, o)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let matches = |stored: &&StoredTriple| {
            subject.map_or(true, |s| &stored.triple.subject == s)
                && predicate.map_or(true, |p| &stored.triple.predicate == p)
                && object.map_or(true, |o| &stored.triple.object == o)
        };

        match candidates.into_iter().min_by_key(|indices| indices.len()) {
            Some(indices) => indices
                .iter()
                .filter_map(|idx| self.triples.get(*idx))
                .filter(matches)
                .collect(),
            None => self.triples.iter().collect(),
        }
    }

    /// Distinct objects of `subject predicate ?o` across all graphs, first occurrence first
    pub fn objects(&self, subject: &Node, predicate: &Node) -> Vec<Node> {
        let mut seen = HashSet::new();
        self.find_triples(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|stored| &stored.triple.object)
            .filter(|node| seen.insert(*node))
            .cloned()
            .collect()
    }

    /// Distinct subjects of `?s predicate object` across all graphs, first occurrence first
    pub fn subjects(&self, predicate: &Node, object: &Node) -> Vec<Node> {
        let mut seen = HashSet::new();
        self.find_triples(None, Some(predicate), Some(object))
            .into_iter()
            .map(|stored| &stored.triple.subject)
            .filter(|node| seen.insert(*node))
            .cloned()
            .collect()
    }

    /// True when any graph holds the triple
    pub fn contains(&self, triple: &Triple) -> bool {
        !self
            .find_triples(Some(&triple.subject), Some(&triple.predicate), Some(&triple.object))
            .is_empty()
    }

    /// Get all graph IDs, in order of first use
    pub fn graph_ids(&self) -> Vec<&GraphId> {
        let mut seen = HashSet::new();
        self.triples
            .iter()
            .map(|stored| &stored.graph_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Clear a specific graph, returning the number of removed triples
    pub fn clear_graph(&mut self, graph_id: &GraphId) -> usize {
        let before = self.triples.len();
        self.triples.retain(|stored| &stored.graph_id != graph_id);
        self.members.retain(|(id, _)| id != graph_id);
        self.rebuild_indices();
        before - self.triples.len()
    }

    /// Clear all graphs
    pub fn clear_all(&mut self) {
        self.triples.clear();
        self.members.clear();
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();
    }

    /// Iterate over every stored triple in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &StoredTriple> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Get statistics
    pub fn statistics(&self) -> StoreStatistics {
        StoreStatistics {
            total_triples: self.triples.len(),
            graph_count: self.graph_ids().len(),
        }
    }

    fn lookup<'a>(index: &'a HashMap<Node, Vec<usize>>, key: &Node) -> &'a [usize] {
        index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn index(&mut self, triple: &Triple, idx: usize) {
        self.subject_index.entry(triple.subject.clone()).or_default().push(idx);
        self.predicate_index.entry(triple.predicate.clone()).or_default().push(idx);
        self.object_index.entry(triple.object.clone()).or_default().push(idx);
    }

    /// Rebuild all indices (expensive operation)
    fn rebuild_indices(&mut self) {
        self.subject_index.clear();
        self.predicate_index.clear();
        self.object_index.clear();

        let triples: Vec<Triple> = self
            .triples
            .iter()
            .map(|stored| stored.triple.clone())
            .collect();
        for (idx, triple) in triples.iter().enumerate() {
            self.index(triple, idx);
        }
    }
}

/// Store statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_triples: usize,
    pub graph_count: usize,
}
