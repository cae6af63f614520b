//! spin:constructViolations プロパティ関数
//!
//! `(?instance ?class) spin:constructViolations (?s ?p ?o)` は、インスタンスが
//! クラス (とその上位クラス) の制約に違反する内容をトリプルとして返します。

use crate::engine::ConstraintEngine;
use crate::projector::{project, OutputSlots, ResultRows};
use crate::ConstraintError;
use mimizuku_core::vocabulary::spin;
use mimizuku_core::{Binding, Node};
use mimizuku_rules::EvaluationContext;
use tracing::info;

/// One side of a property function call: a single node or a list
#[derive(Debug, Clone, PartialEq)]
pub enum PropFuncArg {
    Node(Node),
    List(Vec<Node>),
}

impl PropFuncArg {
    pub fn list<I: IntoIterator<Item = Node>>(nodes: I) -> Self {
        PropFuncArg::List(nodes.into_iter().collect())
    }

    /// Replace bound variables with their values
    pub fn substitute(&self, binding: &Binding) -> PropFuncArg {
        match self {
            PropFuncArg::Node(node) => PropFuncArg::Node(binding.resolve(node)),
            PropFuncArg::List(nodes) => {
                PropFuncArg::List(nodes.iter().map(|node| binding.resolve(node)).collect())
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        match self {
            PropFuncArg::Node(node) => std::slice::from_ref(node),
            PropFuncArg::List(nodes) => nodes,
        }
    }
}

/// The `spin:constructViolations` property function
#[derive(Debug, Clone, Default)]
pub struct ConstructViolations {
    engine: ConstraintEngine,
}

impl ConstructViolations {
    pub fn new(engine: ConstraintEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ConstraintEngine {
        &self.engine
    }

    /// Evaluate the function under `binding`
    ///
    /// `subject` must hold the instance and the class, `object` three distinct
    /// unbound variables. All input errors and rule failures are reported before
    /// any row is produced.
    pub fn exec(
        &self,
        ctx: &EvaluationContext<'_>,
        binding: &Binding,
        subject: &PropFuncArg,
        object: &PropFuncArg,
    ) -> Result<ResultRows, ConstraintError> {
        let subject = subject.substitute(binding);
        let object = object.substitute(binding);
        let name = spin::construct_violations_qname();

        let slots = object.nodes();
        if slots.len() != 3 {
            return Err(ConstraintError::InputArity(format!(
                "{} must have three nodes on the right side",
                name
            )));
        }
        let vars: Vec<&str> = slots.iter().filter_map(Node::as_variable).collect();
        if vars.len() != 3 {
            return Err(ConstraintError::InputType(format!(
                "{} must have three unbound variables on the right side",
                name
            )));
        }

        let args = subject.nodes();
        if args.len() != 2 {
            return Err(ConstraintError::InputArity(format!(
                "{} must have two nodes on the left side",
                name
            )));
        }
        let (instance, cls) = (&args[0], &args[1]);
        if !instance.is_resource() {
            return Err(ConstraintError::InputType(format!(
                "{} must have a resource as its first argument on the left side",
                name
            )));
        }
        if !cls.is_resource() {
            return Err(ConstraintError::InputType(format!(
                "{} must have a resource as its second argument on the left side",
                name
            )));
        }
        if vars[0] == vars[1] || vars[0] == vars[2] || vars[1] == vars[2] {
            return Err(ConstraintError::InputType(format!(
                "{} must have three distinct variables on the right side",
                name
            )));
        }

        let triples = self.engine.construct_violations(ctx, instance, cls)?;
        info!("{} {} {}: {} triples", instance, name, cls, triples.len());

        Ok(project(
            triples,
            OutputSlots::new(vars[0], vars[1], vars[2]),
            binding.clone(),
        ))
    }
}
