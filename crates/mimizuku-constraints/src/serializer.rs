//! 違反のトリプル化

use crate::config::SerializerConfig;
use mimizuku_core::vocabulary::{rdf, rdfs, sp, spin};
use mimizuku_core::{Node, Triple};
use mimizuku_rules::{ConstraintViolation, SimplePropertyPath};

/// Writes violations as `spin:ConstraintViolation` descriptions
///
/// Each violation gets its own fresh blank node; triples of one violation are
/// contiguous and appear in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationSerializer {
    config: SerializerConfig,
}

impl ViolationSerializer {
    pub fn new(config: SerializerConfig) -> Self {
        Self { config }
    }

    pub fn serialize(&self, violations: &[ConstraintViolation]) -> Vec<Triple> {
        let mut triples = Vec::new();
        for violation in violations {
            self.serialize_into(violation, &mut triples);
        }
        triples
    }

    /// Append the description of one violation to `out`
    pub fn serialize_into(&self, violation: &ConstraintViolation, out: &mut Vec<Triple>) {
        let v = Node::fresh_blank();
        let triple = |predicate: Node, object: Node| Triple::new(v.clone(), predicate, object);

        out.push(triple(rdf::type_(), spin::constraint_violation()));

        if let Some(message) = violation.message.as_deref().filter(|m| !m.is_empty()) {
            out.push(triple(rdfs::label(), Node::literal(message)));
        }
        if let Some(root) = &violation.root {
            out.push(triple(spin::violation_root(), root.clone()));
        }
        out.push(triple(spin::violation_level(), violation.level.to_node()));

        for path in &violation.paths {
            match path {
                SimplePropertyPath::Object(predicate) => {
                    out.push(triple(spin::violation_path(), predicate.clone()))
                }
                SimplePropertyPath::Subject(predicate) => {
                    // 逆パス: _:b a sp:ReversePath ; sp:path p
                    let reverse = Node::fresh_blank();
                    out.push(triple(spin::violation_path(), reverse.clone()));
                    out.push(Triple::new(reverse.clone(), rdf::type_(), sp::reverse_path()));
                    out.push(Triple::new(reverse, sp::path(), predicate.clone()));
                }
            }
        }

        if self.config.include_source {
            if let Some(source) = &violation.source {
                out.push(triple(spin::violation_source(), source.clone()));
            }
        }
        if let Some(value) = &violation.value {
            out.push(triple(spin::violation_value(), value.clone()));
        }
    }
}
