//! ルール実行と違反の蓄積

use mimizuku_core::Node;
use mimizuku_rules::{
    ConstraintViolation, EvaluationContext, ProgressMonitor, QueryEvaluator, RuleError, RuleRef,
    TemplateEvaluator,
};
use tracing::debug;

/// Dispatches rule references to the query and template evaluators
///
/// Every rule is evaluated for a single instance (`match_all_instances = false`).
#[derive(Clone, Copy)]
pub struct RuleExecutor<'e> {
    query_evaluator: &'e dyn QueryEvaluator,
    template_evaluator: &'e dyn TemplateEvaluator,
    monitor: &'e dyn ProgressMonitor,
}

impl<'e> RuleExecutor<'e> {
    pub fn new(
        query_evaluator: &'e dyn QueryEvaluator,
        template_evaluator: &'e dyn TemplateEvaluator,
        monitor: &'e dyn ProgressMonitor,
    ) -> Self {
        Self {
            query_evaluator,
            template_evaluator,
            monitor,
        }
    }

    /// Violations of one rule for `instance`; unresolved rules yield none
    pub fn execute(
        &self,
        ctx: &EvaluationContext<'_>,
        rule: &RuleRef,
        instance: &Node,
    ) -> Result<Vec<ConstraintViolation>, RuleError> {
        match rule {
            RuleRef::Template(call) => self
                .template_evaluator
                .evaluate_template(ctx, instance, call, false, self.monitor),
            RuleRef::Query(call) => self
                .query_evaluator
                .evaluate_query(ctx, instance, call, false, None, self.monitor),
            RuleRef::Unresolved(node) => {
                debug!("Skipping constraint {}: neither a query nor a template call", node);
                Ok(Vec::new())
            }
        }
    }

    /// Violations of all `rules` in order, concatenated
    ///
    /// The first evaluator error aborts the whole run.
    pub fn accumulate(
        &self,
        ctx: &EvaluationContext<'_>,
        rules: &[RuleRef],
        instance: &Node,
    ) -> Result<Vec<ConstraintViolation>, RuleError> {
        let mut violations = Vec::new();
        for rule in rules {
            violations.extend(self.execute(ctx, rule, instance)?);
        }
        Ok(violations)
    }
}

impl std::fmt::Debug for RuleExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleExecutor").finish_non_exhaustive()
    }
}
