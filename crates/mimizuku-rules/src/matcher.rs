//! Graph pattern matching over the background store

use crate::rule::{CompareOp, Filter, GroupPattern};
use mimizuku_core::{Binding, Node, Triple};
use mimizuku_store::RdfStore;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Evaluates group patterns against a store, yielding solutions in store order
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher<'a> {
    store: &'a RdfStore,
}

impl<'a> PatternMatcher<'a> {
    pub fn new(store: &'a RdfStore) -> Self {
        Self { store }
    }

    /// All extensions of `initial` that match every triple and pass every filter
    pub fn solutions(&self, pattern: &GroupPattern, initial: &Binding) -> Vec<Binding> {
        let mut solutions = vec![initial.clone()];

        for triple in &pattern.triples {
            solutions = solutions
                .iter()
                .flat_map(|binding| self.match_triple(triple, binding))
                .collect();
            if solutions.is_empty() {
                return solutions;
            }
        }

        solutions.retain(|binding| pattern.filters.iter().all(|filter| self.test(filter, binding)));
        solutions
    }

    pub fn has_solution(&self, pattern: &GroupPattern, initial: &Binding) -> bool {
        !self.solutions(pattern, initial).is_empty()
    }

    fn match_triple(&self, pattern: &Triple, binding: &Binding) -> Vec<Binding> {
        let bound = pattern.substitute(binding);
        let constant = |node: &Node| if node.is_variable() { None } else { Some(node.clone()) };
        let (s, p, o) = (
            constant(&bound.subject),
            constant(&bound.predicate),
            constant(&bound.object),
        );

        // 同じトリプルが複数のグラフにある場合は一度だけ数える
        let mut seen: HashSet<&Triple> = HashSet::new();

        self.store
            .find_triples(s.as_ref(), p.as_ref(), o.as_ref())
            .into_iter()
            .map(|stored| &stored.triple)
            .filter(|triple| seen.insert(*triple))
            .filter_map(|triple| {
                let mut next = binding.clone();
                for (pattern_node, value) in bound.nodes().into_iter().zip(triple.nodes()) {
                    if let Node::Variable(name) = pattern_node {
                        if !next.try_insert(name, value) {
                            return None;
                        }
                    }
                }
                Some(next)
            })
            .collect()
    }

    /// Filter evaluation; comparisons with unbound operands are false
    pub fn test(&self, filter: &Filter, binding: &Binding) -> bool {
        match filter {
            Filter::Exists { pattern } => self.has_solution(pattern, binding),
            Filter::NotExists { pattern } => !self.has_solution(pattern, binding),
            Filter::Bound { var } => binding.contains(var),
            Filter::Not { filter } => !self.test(filter, binding),
            Filter::Compare { left, op, right } => {
                let left = binding.resolve(left);
                let right = binding.resolve(right);
                if left.is_variable() || right.is_variable() {
                    return false;
                }
                compare(&left, *op, &right)
            }
        }
    }
}

fn compare(left: &Node, op: CompareOp, right: &Node) -> bool {
    let ordering = match (left.numeric_value(), right.numeric_value()) {
        (Some(l), Some(r)) => l.partial_cmp(&r),
        _ => match op {
            CompareOp::Eq => return left == right,
            CompareOp::Ne => return left != right,
            _ if left.is_literal() && right.is_literal() => {
                Some(left.lexical_form().cmp(right.lexical_form()))
            }
            _ => None,
        },
    };

    match ordering {
        Some(ordering) => match op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        },
        None => false,
    }
}
