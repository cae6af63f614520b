//! Constraint violation records

use mimizuku_core::vocabulary::spin;
use mimizuku_core::Node;
use serde::{Deserialize, Serialize};

/// Violation severity levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationLevel {
    Info,
    Warning,
    #[default]
    Error,
    Fatal,
}

impl ViolationLevel {
    /// `spin:Info`, `spin:Warning`, `spin:Error` or `spin:Fatal`
    pub fn to_node(self) -> Node {
        Node::iri(match self {
            ViolationLevel::Info => spin::INFO,
            ViolationLevel::Warning => spin::WARNING,
            ViolationLevel::Error => spin::ERROR,
            ViolationLevel::Fatal => spin::FATAL,
        })
    }

    pub fn from_node(node: &Node) -> Option<Self> {
        match node.as_iri()? {
            spin::INFO => Some(ViolationLevel::Info),
            spin::WARNING => Some(ViolationLevel::Warning),
            spin::ERROR => Some(ViolationLevel::Error),
            spin::FATAL => Some(ViolationLevel::Fatal),
            _ => None,
        }
    }
}

/// Single-step path from the violation root to the offending value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimplePropertyPath {
    /// root predicate ?value
    Object(Node),
    /// ?value predicate root
    Subject(Node),
}

/// A constraint violation produced by evaluating one rule against one instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Resource the violation is about
    pub root: Option<Node>,
    /// Paths from the root to the offending values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<SimplePropertyPath>,
    /// Offending value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Node>,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Rule resource (query or template call) that reported the violation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Node>,
    pub level: ViolationLevel,
}

impl ConstraintViolation {
    pub fn new(root: Option<Node>, source: Option<Node>, message: Option<String>) -> Self {
        Self {
            root,
            source,
            message,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: SimplePropertyPath) -> Self {
        self.paths.push(path);
        self
    }

    pub fn with_value(mut self, value: Node) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_level(mut self, level: ViolationLevel) -> Self {
        self.level = level;
        self
    }
}
