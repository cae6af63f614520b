//! 制約収集

use mimizuku_core::Node;
use mimizuku_rdfs::ClassHierarchy;
use mimizuku_rules::{RuleLibrary, RuleRef};
use mimizuku_store::RdfStore;
use tracing::debug;

/// Gathers the rules that apply to instances of a class
#[derive(Debug, Clone, Copy)]
pub struct ConstraintCollector<'a> {
    store: &'a RdfStore,
    library: &'a RuleLibrary,
}

impl<'a> ConstraintCollector<'a> {
    pub fn new(store: &'a RdfStore, library: &'a RuleLibrary) -> Self {
        Self { store, library }
    }

    /// Rules declared on `cls`, followed by the rules of each superclass in
    /// breadth-first order
    ///
    /// Rules reachable through several paths are repeated, once per occurrence.
    pub fn collect(&self, cls: &Node) -> Vec<RuleRef> {
        let mut rules = self.library.declared_constraints(self.store, cls);
        debug!("{} declares {} constraints", cls, rules.len());

        for superclass in ClassHierarchy::new(self.store).superclasses(cls) {
            let inherited = self.library.declared_constraints(self.store, &superclass);
            debug!("{} inherits {} constraints from {}", cls, inherited.len(), superclass);
            rules.extend(inherited);
        }

        rules
    }
}
