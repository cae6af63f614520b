//! Constraint rule model

use mimizuku_core::{Node, Triple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A constraint attached to a class through `spin:constraint`
#[derive(Debug, Clone, PartialEq)]
pub enum RuleRef {
    /// Parametrized query, pre-bound with `?this`
    Query(QueryCall),
    /// Call of a registered template with its arguments
    Template(TemplateCall),
    /// Constraint value that names neither a query nor a template call
    Unresolved(Node),
}

impl RuleRef {
    /// Resource that declares the rule
    pub fn source(&self) -> &Node {
        match self {
            RuleRef::Query(call) => &call.source,
            RuleRef::Template(call) => &call.source,
            RuleRef::Unresolved(node) => node,
        }
    }
}

impl fmt::Display for RuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRef::Query(call) => write!(f, "query {}", call.source),
            RuleRef::Template(call) => {
                write!(f, "template call {} of {}", call.source, call.template)
            }
            RuleRef::Unresolved(node) => write!(f, "unresolved {}", node),
        }
    }
}

/// Query rule reference
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCall {
    pub source: Node,
    pub query: Arc<ConstraintQuery>,
}

/// Template call: the template resource plus argument values keyed by parameter predicate
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCall {
    pub source: Node,
    pub template: Node,
    pub arguments: BTreeMap<Node, Node>,
}

impl TemplateCall {
    pub fn new(source: Node, template: Node) -> Self {
        Self {
            source,
            template,
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, predicate: Node, value: Node) -> Self {
        self.arguments.insert(predicate, value);
        self
    }
}

/// Constraint query body
///
/// `?this` stands for the instance under test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintQuery {
    /// Used as the violation message of ASK queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub form: QueryForm,
    #[serde(rename = "where", default)]
    pub pattern: GroupPattern,
}

impl ConstraintQuery {
    pub fn ask(pattern: GroupPattern) -> Self {
        Self {
            comment: None,
            form: QueryForm::Ask,
            pattern,
        }
    }

    pub fn construct(template: Vec<Triple>, pattern: GroupPattern) -> Self {
        Self {
            comment: None,
            form: QueryForm::Construct(template),
            pattern,
        }
    }

    pub fn with_comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Query form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "template", rename_all = "snake_case")]
pub enum QueryForm {
    /// Any solution is a violation rooted at `?this`
    Ask,
    /// Triples instantiated per solution; each `spin:ConstraintViolation` resource is a violation
    Construct(Vec<Triple>),
}

/// Basic graph pattern plus filters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPattern {
    #[serde(default)]
    pub triples: Vec<Triple>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl GroupPattern {
    pub fn new(triples: Vec<Triple>) -> Self {
        Self {
            triples,
            filters: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Filter expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    Exists { pattern: GroupPattern },
    NotExists { pattern: GroupPattern },
    /// False when either operand is an unbound variable
    Compare { left: Node, op: CompareOp, right: Node },
    Bound { var: String },
    Not { filter: Box<Filter> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

/// Reusable constraint with declared parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Node,
    /// Message pattern; `{?name}` is replaced by the value bound to `?name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_template: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: ConstraintQuery,
}

/// Template parameter; binds the variable named after the predicate's local name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub predicate: Node,
    #[serde(default)]
    pub optional: bool,
}

impl Parameter {
    pub fn required(predicate: Node) -> Self {
        Self { predicate, optional: false }
    }

    pub fn optional(predicate: Node) -> Self {
        Self { predicate, optional: true }
    }

    pub fn var_name(&self) -> Option<&str> {
        self.predicate.local_name()
    }
}
