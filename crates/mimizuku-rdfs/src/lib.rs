//! RDFS クラス階層の走査
//!
//! このクレートは制約収集に必要な RDFS の一部を実装します:
//! - rdfs:subClassOf の推移的な上位クラス列挙 (循環を許容)
//! - rdf:type によるインスタンスの型取得

use mimizuku_core::vocabulary::{rdf, rdfs};
use mimizuku_core::Node;
use mimizuku_store::RdfStore;
use std::collections::{HashSet, VecDeque};
use tracing::trace;

/// Read-only view of the `rdfs:subClassOf` hierarchy stored in a graph
#[derive(Debug, Clone, Copy)]
pub struct ClassHierarchy<'a> {
    store: &'a RdfStore,
}

impl<'a> ClassHierarchy<'a> {
    pub fn new(store: &'a RdfStore) -> Self {
        Self { store }
    }

    /// Direct superclasses of `cls`, in store order
    ///
    /// Literal objects and `cls` itself are skipped.
    pub fn direct_superclasses(&self, cls: &Node) -> Vec<Node> {
        self.store
            .objects(cls, &rdfs::subclass_of())
            .into_iter()
            .filter(|parent| parent.is_resource() && parent != cls)
            .collect()
    }

    /// All transitive superclasses of `cls`, excluding `cls` itself
    ///
    /// Breadth-first: direct superclasses in store order, then their
    /// superclasses, and so on. Each class appears once; cycles terminate
    /// through the visited set.
    pub fn superclasses(&self, cls: &Node) -> Vec<Node> {
        let mut visited: HashSet<Node> = HashSet::new();
        visited.insert(cls.clone());

        let mut queue: VecDeque<Node> = VecDeque::from([cls.clone()]);
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            for parent in self.direct_superclasses(&current) {
                if visited.insert(parent.clone()) {
                    trace!("{} is a superclass of {}", parent, cls);
                    result.push(parent.clone());
                    queue.push_back(parent);
                }
            }
        }

        result
    }

    /// `sub` equals `sup` or has it among its transitive superclasses
    pub fn is_subclass_of(&self, sub: &Node, sup: &Node) -> bool {
        sub == sup || self.superclasses(sub).contains(sup)
    }

    /// Asserted `rdf:type` values of `instance`, in store order
    pub fn types_of(&self, instance: &Node) -> Vec<Node> {
        self.store.objects(instance, &rdf::type_())
    }

    /// `instance` has an asserted type that is `cls` or one of its subclasses
    pub fn is_instance_of(&self, instance: &Node, cls: &Node) -> bool {
        self.types_of(instance).iter().any(|ty| self.is_subclass_of(ty, cls))
    }
}
