//! Query-rule and template-rule evaluation

use crate::library::RuleLibrary;
use crate::matcher::PatternMatcher;
use crate::progress::ProgressMonitor;
use crate::rule::{ConstraintQuery, QueryCall, QueryForm, TemplateCall};
use crate::violation::{ConstraintViolation, SimplePropertyPath, ViolationLevel};
use crate::RuleError;
use mimizuku_core::vocabulary::{rdf, rdfs, sp, spin};
use mimizuku_core::{Binding, Node, Triple};
use mimizuku_store::RdfStore;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Graph and rule definitions visible to an evaluator
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub store: &'a RdfStore,
    pub library: &'a RuleLibrary,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(store: &'a RdfStore, library: &'a RuleLibrary) -> Self {
        Self { store, library }
    }
}

/// Evaluates query rules
pub trait QueryEvaluator: Send + Sync {
    /// Violations reported by `call` for `instance`
    ///
    /// With `match_all_instances` the query runs with `?this` unbound and
    /// reports every instance it matches. `extra` holds additional pre-bound
    /// variables.
    fn evaluate_query(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        call: &QueryCall,
        match_all_instances: bool,
        extra: Option<&Binding>,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<ConstraintViolation>, RuleError>;
}

/// Evaluates template calls
pub trait TemplateEvaluator: Send + Sync {
    fn evaluate_template(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        call: &TemplateCall,
        match_all_instances: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<ConstraintViolation>, RuleError>;
}

/// Default evaluator: runs rule bodies as graph patterns over the store
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternEvaluator;

impl QueryEvaluator for PatternEvaluator {
    fn evaluate_query(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        call: &QueryCall,
        match_all_instances: bool,
        extra: Option<&Binding>,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<ConstraintViolation>, RuleError> {
        check_canceled(monitor)?;
        monitor.sub_task(&format!("Checking {} against {}", instance, call.source));

        let mut initial = extra.cloned().unwrap_or_default();
        let comment = call.query.comment.clone();
        let violations = self.run(
            ctx.store,
            &call.query,
            instance,
            match_all_instances,
            &mut initial,
            &call.source,
            |_| comment.clone(),
        );

        monitor.worked(1);
        Ok(violations)
    }
}

impl TemplateEvaluator for PatternEvaluator {
    fn evaluate_template(
        &self,
        ctx: &EvaluationContext<'_>,
        instance: &Node,
        call: &TemplateCall,
        match_all_instances: bool,
        monitor: &dyn ProgressMonitor,
    ) -> Result<Vec<ConstraintViolation>, RuleError> {
        check_canceled(monitor)?;
        monitor.sub_task(&format!("Checking {} against {}", instance, call.source));

        let template = ctx
            .library
            .template(&call.template)
            .ok_or_else(|| RuleError::UnknownTemplate(call.template.clone()))?;

        let mut initial = Binding::new();
        for param in &template.parameters {
            let var = param.var_name().ok_or_else(|| RuleError::InvalidRule {
                rule: template.id.clone(),
                message: format!("parameter {} has no local name to bind", param.predicate),
            })?;
            match call.arguments.get(&param.predicate) {
                Some(value) => {
                    initial.insert(var, value.clone());
                }
                None if param.optional => {}
                None => {
                    return Err(RuleError::MissingArgument {
                        call: call.source.clone(),
                        template: template.id.clone(),
                        parameter: param.predicate.clone(),
                    })
                }
            }
        }

        let label_template = template.label_template.clone();
        let violations = self.run(
            ctx.store,
            &template.body,
            instance,
            match_all_instances,
            &mut initial,
            &call.source,
            |binding| label_template.as_deref().map(|label| render_label(label, binding)),
        );

        monitor.worked(1);
        Ok(violations)
    }
}

impl PatternEvaluator {
    #[allow(clippy::too_many_arguments)]
    fn run<F>(
        &self,
        store: &RdfStore,
        query: &ConstraintQuery,
        instance: &Node,
        match_all_instances: bool,
        initial: &mut Binding,
        source: &Node,
        message: F,
    ) -> Vec<ConstraintViolation>
    where
        F: Fn(&Binding) -> Option<String>,
    {
        if !match_all_instances {
            initial.insert(spin::THIS_VAR_NAME, instance.clone());
        }

        let solutions = PatternMatcher::new(store).solutions(&query.pattern, initial);
        debug!("{} produced {} solutions for {}", source, solutions.len(), instance);

        match &query.form {
            QueryForm::Ask => {
                ask_violations(&solutions, instance, match_all_instances, source, &message)
            }
            QueryForm::Construct(template) => {
                // 解ごとに構築し、その解で描画したラベルを使う
                let mut reported: HashSet<Node> = HashSet::new();
                let mut violations = Vec::new();
                for solution in &solutions {
                    let constructed = construct(template, solution);
                    violations.extend(extract_violations(
                        &constructed,
                        source,
                        message(solution),
                        &mut reported,
                    ));
                }
                violations
            }
        }
    }
}

fn check_canceled(monitor: &dyn ProgressMonitor) -> Result<(), RuleError> {
    if monitor.is_canceled() {
        Err(RuleError::Canceled)
    } else {
        Ok(())
    }
}

fn ask_violations<F>(
    solutions: &[Binding],
    instance: &Node,
    match_all_instances: bool,
    source: &Node,
    message: &F,
) -> Vec<ConstraintViolation>
where
    F: Fn(&Binding) -> Option<String>,
{
    if !match_all_instances {
        return match solutions.first() {
            Some(solution) => vec![ConstraintViolation::new(
                Some(instance.clone()),
                Some(source.clone()),
                message(solution),
            )],
            None => Vec::new(),
        };
    }

    // ?this を束縛した解ごとに 1 件 (同じインスタンスは 1 回)
    let mut seen: HashSet<&Node> = HashSet::new();
    solutions
        .iter()
        .filter_map(|solution| {
            let root = solution.get(spin::THIS_VAR_NAME)?;
            seen.insert(root).then(|| {
                let message = message(solution);
                ConstraintViolation::new(Some(root.clone()), Some(source.clone()), message)
            })
        })
        .collect()
}

/// Instantiate a construct template for one solution
///
/// Blank nodes in the template are renamed; triples left with unbound
/// variables are dropped.
fn construct(template: &[Triple], solution: &Binding) -> Vec<Triple> {
    let mut constructed = Vec::new();
    let mut seen: HashSet<Triple> = HashSet::new();
    let mut blanks: HashMap<String, Node> = HashMap::new();
    let mut fresh = |node: Node| match node {
        Node::Blank(label) => blanks.entry(label).or_insert_with(Node::fresh_blank).clone(),
        other => other,
    };

    for pattern in template {
        let bound = pattern.substitute(solution);
        let triple = Triple::new(
            fresh(bound.subject),
            fresh(bound.predicate),
            fresh(bound.object),
        );
        if triple.is_ground() && seen.insert(triple.clone()) {
            constructed.push(triple);
        }
    }

    constructed
}

fn objects_of<'t>(triples: &'t [Triple], subject: &Node, predicate: &str) -> Vec<&'t Node> {
    triples
        .iter()
        .filter(|t| &t.subject == subject && t.predicate.as_iri() == Some(predicate))
        .map(|t| &t.object)
        .collect()
}

fn first_object(triples: &[Triple], subject: &Node, predicate: &str) -> Option<Node> {
    objects_of(triples, subject, predicate).into_iter().next().cloned()
}

/// Read `spin:ConstraintViolation` resources out of constructed triples
///
/// Resources already in `reported` are skipped, so a violation with a fixed
/// IRI is reported once across solutions.
fn extract_violations(
    constructed: &[Triple],
    source: &Node,
    fallback_message: Option<String>,
    reported: &mut HashSet<Node>,
) -> Vec<ConstraintViolation> {
    constructed
        .iter()
        .filter(|t| {
            t.predicate.as_iri() == Some(rdf::TYPE)
                && t.object.as_iri() == Some(spin::CONSTRAINT_VIOLATION)
        })
        .filter(|t| reported.insert(t.subject.clone()))
        .map(|t| {
            let cv = &t.subject;

            let paths = objects_of(constructed, cv, spin::VIOLATION_PATH)
                .into_iter()
                .filter_map(|path| {
                    if path.is_iri() {
                        return Some(SimplePropertyPath::Object(path.clone()));
                    }
                    let is_reverse = objects_of(constructed, path, rdf::TYPE)
                        .into_iter()
                        .any(|ty| ty.as_iri() == Some(sp::REVERSE_PATH));
                    if is_reverse {
                        first_object(constructed, path, sp::PATH).map(SimplePropertyPath::Subject)
                    } else {
                        None
                    }
                })
                .collect();

            let message = first_object(constructed, cv, rdfs::LABEL)
                .map(|label| label.lexical_form().to_string())
                .or_else(|| fallback_message.clone());

            ConstraintViolation {
                root: first_object(constructed, cv, spin::VIOLATION_ROOT),
                paths,
                value: first_object(constructed, cv, spin::VIOLATION_VALUE),
                message,
                source: Some(source.clone()),
                level: first_object(constructed, cv, spin::VIOLATION_LEVEL)
                    .and_then(|level| ViolationLevel::from_node(&level))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

/// Replace `{?name}` and `{$name}` with the lexical form of the bound value
pub fn render_label(label: &str, binding: &Binding) -> String {
    let mut out = String::with_capacity(label.len());
    let mut rest = label;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        let replaced = after.find('}').and_then(|end| {
            let name = after[1..end].strip_prefix('?').or_else(|| after[1..end].strip_prefix('$'))?;
            binding.get(name).map(|value| (value.lexical_form().to_string(), end))
        });

        match replaced {
            Some((value, end)) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = &after[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
