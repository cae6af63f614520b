//! Constraint pipeline: collect, execute, serialize

use crate::collector::ConstraintCollector;
use crate::config::SerializerConfig;
use crate::executor::RuleExecutor;
use crate::serializer::ViolationSerializer;
use mimizuku_core::{Node, Triple};
use mimizuku_rules::{
    ConstraintViolation, EvaluationContext, NullProgressMonitor, PatternEvaluator, ProgressMonitor,
    QueryEvaluator, RuleError, RuleRef, TemplateEvaluator,
};
use std::sync::Arc;
use tracing::debug;

/// Runs the class constraints of an instance
///
/// Evaluators and the progress monitor are replaceable; by default both rule
/// kinds go to [`PatternEvaluator`] and progress is discarded.
#[derive(Clone)]
pub struct ConstraintEngine {
    query_evaluator: Arc<dyn QueryEvaluator>,
    template_evaluator: Arc<dyn TemplateEvaluator>,
    monitor: Arc<dyn ProgressMonitor>,
    serializer: ViolationSerializer,
}

impl Default for ConstraintEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintEngine {
    pub fn new() -> Self {
        Self {
            query_evaluator: Arc::new(PatternEvaluator),
            template_evaluator: Arc::new(PatternEvaluator),
            monitor: Arc::new(NullProgressMonitor),
            serializer: ViolationSerializer::default(),
        }
    }

    pub fn with_query_evaluator(mut self, evaluator: Arc<dyn QueryEvaluator>) -> Self {
        self.query_evaluator = evaluator;
        self
    }

    pub fn with_template_evaluator(mut self, evaluator: Arc<dyn TemplateEvaluator>) -> Self {
        self.template_evaluator = evaluator;
        self
    }

    pub fn with_monitor(mut self, monitor: Arc<dyn ProgressMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn with_serializer_config(mut self, config: SerializerConfig) -> Self {
        self.serializer = ViolationSerializer::new(config);
        self
    }

    pub fn collect_constraints(&self, ctx: &EvaluationContext<'_>, cls: &Node) -> Vec<RuleRef> {
        ConstraintCollector::new(ctx.store, ctx.library).collect(cls)
    }

    /// All violations of `instance` against the constraints of `cls` and its superclasses
    pub fn violations(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        cls: &Node,
    ) -> Result<Vec<ConstraintViolation>, RuleError> {
        let rules = self.collect_constraints(ctx, cls);
        debug!("Collected {} constraints for {}", rules.len(), cls);

        self.monitor.begin_task(
            &format!("Checking {} against constraints of {}", instance, cls),
            Some(rules.len()),
        );
        let executor = RuleExecutor::new(
            self.query_evaluator.as_ref(),
            self.template_evaluator.as_ref(),
            self.monitor.as_ref(),
        );
        let result = executor.accumulate(ctx, &rules, instance);
        self.monitor.done();

        result
    }

    /// Violations of `instance` written as triples
    pub fn construct_violations(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        cls: &Node,
    ) -> Result<Vec<Triple>, RuleError> {
        let violations = self.violations(ctx, instance, cls)?;
        Ok(self.serializer.serialize(&violations))
    }
}

impl std::fmt::Debug for ConstraintEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintEngine")
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}
