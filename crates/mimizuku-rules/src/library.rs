//! Rule library and `spin:constraint` lookup

use crate::rule::{ConstraintQuery, QueryCall, RuleRef, Template, TemplateCall};
use crate::RuleError;
use mimizuku_core::vocabulary::{rdf, spin};
use mimizuku_core::Node;
use mimizuku_store::RdfStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Query registered under the resource that `spin:constraint` points at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub id: Node,
    #[serde(flatten)]
    pub query: ConstraintQuery,
}

/// Serialized form of a rule library
///
/// ```json
/// {
///   "queries": [{"id": "<http://example.org/AdultCheck>", "comment": "Must be adult",
///                "form": {"type": "ask"},
///                "where": {"triples": [...], "filters": [...]}}],
///   "templates": [{"id": "<http://example.org/MinAge>", "parameters": [...], "body": {...}}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryDocument {
    #[serde(default)]
    pub queries: Vec<QueryDefinition>,
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// Registered constraint queries and templates
#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    queries: HashMap<Node, Arc<ConstraintQuery>>,
    templates: HashMap<Node, Arc<Template>>,
}

impl RuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query under `id`
    pub fn add_query(&mut self, id: Node, query: ConstraintQuery) -> Result<(), RuleError> {
        if !id.is_resource() {
            return Err(RuleError::InvalidRule {
                rule: id,
                message: "query id must be an IRI or blank node".to_string(),
            });
        }
        if self.queries.contains_key(&id) || self.templates.contains_key(&id) {
            return Err(RuleError::InvalidRule {
                rule: id,
                message: "duplicate rule id".to_string(),
            });
        }
        self.queries.insert(id, Arc::new(query));
        Ok(())
    }

    /// Register a template
    pub fn add_template(&mut self, template: Template) -> Result<(), RuleError> {
        if !template.id.is_resource() {
            return Err(RuleError::InvalidRule {
                rule: template.id,
                message: "template id must be an IRI or blank node".to_string(),
            });
        }
        if self.queries.contains_key(&template.id) || self.templates.contains_key(&template.id) {
            return Err(RuleError::InvalidRule {
                rule: template.id,
                message: "duplicate rule id".to_string(),
            });
        }
        if let Some(param) = template.parameters.iter().find(|p| p.var_name().is_none()) {
            let message = format!("parameter {} has no local name to bind", param.predicate);
            return Err(RuleError::InvalidRule {
                rule: template.id.clone(),
                message,
            });
        }
        if let Some(param) = template
            .parameters
            .iter()
            .find(|p| p.var_name() == Some(spin::THIS_VAR_NAME))
        {
            let message = format!("parameter {} would bind ?this", param.predicate);
            return Err(RuleError::InvalidRule {
                rule: template.id.clone(),
                message,
            });
        }
        self.templates.insert(template.id.clone(), Arc::new(template));
        Ok(())
    }

    pub fn from_document(document: LibraryDocument) -> Result<Self, RuleError> {
        let mut library = Self::new();
        for definition in document.queries {
            library.add_query(definition.id, definition.query)?;
        }
        for template in document.templates {
            library.add_template(template)?;
        }
        Ok(library)
    }

    pub fn from_json_str(json: &str) -> Result<Self, RuleError> {
        let document: LibraryDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let library = Self::from_json_str(&json)?;
        debug!(
            "Loaded rule library from {}: {} queries, {} templates",
            path.display(),
            library.queries.len(),
            library.templates.len()
        );
        Ok(library)
    }

    pub fn query(&self, id: &Node) -> Option<&Arc<ConstraintQuery>> {
        self.queries.get(id)
    }

    pub fn template(&self, id: &Node) -> Option<&Arc<Template>> {
        self.templates.get(id)
    }

    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Rules declared directly on `cls` via `cls spin:constraint ?rule`, in store order
    pub fn declared_constraints(&self, store: &RdfStore, cls: &Node) -> Vec<RuleRef> {
        store
            .objects(cls, &spin::constraint())
            .into_iter()
            .map(|node| self.resolve(store, node))
            .collect()
    }

    /// Resolve a `spin:constraint` value
    ///
    /// A registered query wins; otherwise the first `rdf:type` of the node that
    /// is a registered template makes it a template call whose arguments are
    /// read from the node's own triples. Anything else is `Unresolved`.
    pub fn resolve(&self, store: &RdfStore, node: Node) -> RuleRef {
        if let Some(query) = self.queries.get(&node) {
            return RuleRef::Query(QueryCall {
                source: node,
                query: Arc::clone(query),
            });
        }

        if node.is_resource() {
            let template = store
                .objects(&node, &rdf::type_())
                .into_iter()
                .find_map(|ty| self.templates.get(&ty));

            if let Some(template) = template {
                let arguments: BTreeMap<Node, Node> = template
                    .parameters
                    .iter()
                    .filter_map(|param| {
                        store
                            .objects(&node, &param.predicate)
                            .into_iter()
                            .next()
                            .map(|value| (param.predicate.clone(), value))
                    })
                    .collect();

                return RuleRef::Template(TemplateCall {
                    source: node,
                    template: template.id.clone(),
                    arguments,
                });
            }
        }

        RuleRef::Unresolved(node)
    }
}
