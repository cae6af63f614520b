//! Vocabulary IRIs used by the constraint engine

use crate::model::Node;

/// RDF 語彙
pub mod rdf {
    use super::Node;

    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    pub fn type_() -> Node { Node::iri(TYPE) }
}

/// RDFS 語彙
pub mod rdfs {
    use super::Node;

    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    pub fn subclass_of() -> Node { Node::iri(SUBCLASS_OF) }
    pub fn label() -> Node { Node::iri(LABEL) }
    pub fn comment() -> Node { Node::iri(COMMENT) }
}

/// XML Schema datatypes
pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}

/// SPIN modeling vocabulary
pub mod spin {
    use super::Node;

    pub const NS: &str = "http://spinrdf.org/spin#";
    pub const PREFIX: &str = "spin";

    pub const CONSTRAINT: &str = "http://spinrdf.org/spin#constraint";
    pub const CONSTRUCT_VIOLATIONS: &str = "http://spinrdf.org/spin#constructViolations";
    pub const CONSTRAINT_VIOLATION: &str = "http://spinrdf.org/spin#ConstraintViolation";
    pub const VIOLATION_ROOT: &str = "http://spinrdf.org/spin#violationRoot";
    pub const VIOLATION_PATH: &str = "http://spinrdf.org/spin#violationPath";
    pub const VIOLATION_VALUE: &str = "http://spinrdf.org/spin#violationValue";
    pub const VIOLATION_LEVEL: &str = "http://spinrdf.org/spin#violationLevel";
    pub const VIOLATION_SOURCE: &str = "http://spinrdf.org/spin#violationSource";
    pub const THIS_VAR_NAME: &str = "this";

    pub const INFO: &str = "http://spinrdf.org/spin#Info";
    pub const WARNING: &str = "http://spinrdf.org/spin#Warning";
    pub const ERROR: &str = "http://spinrdf.org/spin#Error";
    pub const FATAL: &str = "http://spinrdf.org/spin#Fatal";

    pub fn constraint() -> Node { Node::iri(CONSTRAINT) }
    pub fn constraint_violation() -> Node { Node::iri(CONSTRAINT_VIOLATION) }
    pub fn violation_root() -> Node { Node::iri(VIOLATION_ROOT) }
    pub fn violation_path() -> Node { Node::iri(VIOLATION_PATH) }
    pub fn violation_value() -> Node { Node::iri(VIOLATION_VALUE) }
    pub fn violation_level() -> Node { Node::iri(VIOLATION_LEVEL) }
    pub fn violation_source() -> Node { Node::iri(VIOLATION_SOURCE) }

    /// `spin:constructViolations` as a qname, used in error messages
    pub fn construct_violations_qname() -> String {
        format!("{}:constructViolations", PREFIX)
    }
}

/// SPIN SPARQL syntax vocabulary
pub mod sp {
    use super::Node;

    pub const NS: &str = "http://spinrdf.org/sp#";
    pub const REVERSE_PATH: &str = "http://spinrdf.org/sp#ReversePath";
    pub const PATH: &str = "http://spinrdf.org/sp#path";

    pub fn reverse_path() -> Node { Node::iri(REVERSE_PATH) }
    pub fn path() -> Node { Node::iri(PATH) }
}
