//! # Mimizuku Rules
//!
//! Constraint rules attached to classes via spin:constraint
//! Query rules and template calls, evaluated against the background graph

pub mod evaluator;
pub mod library;
pub mod matcher;
pub mod progress;
pub mod rule;
pub mod violation;

pub use evaluator::*;
pub use library::*;
pub use matcher::*;
pub use progress::*;
pub use rule::*;
pub use violation::*;

use mimizuku_core::Node;
use thiserror::Error;

/// Rule loading and evaluation errors
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(Node),

    #[error("Template call {call} of {template} is missing required argument {parameter}")]
    MissingArgument { call: Node, template: Node, parameter: Node },

    #[error("Invalid rule {rule}: {message}")]
    InvalidRule { rule: Node, message: String },

    #[error("Evaluation canceled")]
    Canceled,

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimizuku_core::vocabulary::{rdf, rdfs, sp, spin};
    use mimizuku_core::{Binding, Triple};
    use mimizuku_store::RdfStore;
    use std::sync::Arc;

    fn ex(local: &str) -> Node {
        Node::iri(format!("http://example.org/{}", local))
    }

    fn var(name: &str) -> Node {
        Node::variable(name)
    }

    fn this() -> Node {
        var(spin::THIS_VAR_NAME)
    }

    fn people() -> RdfStore {
        let mut store = RdfStore::new();
        store.add(ex("alice"), rdf::type_(), ex("Person")).unwrap();
        store.add(ex("alice"), ex("age"), Node::integer(17)).unwrap();
        store.add(ex("bob"), rdf::type_(), ex("Person")).unwrap();
        store.add(ex("bob"), ex("age"), Node::integer(42)).unwrap();
        store
    }

    fn minor_check() -> ConstraintQuery {
        ConstraintQuery::ask(
            GroupPattern::new(vec![Triple::new(this(), ex("age"), var("age"))])
                .with_filter(Filter::Compare {
                    left: var("age"),
                    op: CompareOp::Lt,
                    right: Node::integer(18),
                }),
        )
        .with_comment("Must be adult")
    }

    fn query_call(source: Node, query: ConstraintQuery) -> QueryCall {
        QueryCall {
            source,
            query: Arc::new(query),
        }
    }

    #[test]
    fn test_ask_reports_instance_as_root() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let call = query_call(ex("AdultCheck"), minor_check());

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("alice"), &call, false, None, &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].root, Some(ex("alice")));
        assert_eq!(violations[0].source, Some(ex("AdultCheck")));
        assert_eq!(violations[0].message.as_deref(), Some("Must be adult"));
        assert_eq!(violations[0].level, ViolationLevel::Error);

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("bob"), &call, false, None, &NullProgressMonitor)
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_ask_match_all_instances() {
        let mut store = people();
        store.add(ex("carol"), ex("age"), Node::integer(3)).unwrap();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let call = query_call(ex("AdultCheck"), minor_check());

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("bob"), &call, true, None, &NullProgressMonitor)
            .unwrap();
        let roots: Vec<_> = violations.iter().filter_map(|v| v.root.clone()).collect();
        assert_eq!(roots, vec![ex("alice"), ex("carol")]);
    }

    #[test]
    fn test_extra_binding_is_visible() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let query = ConstraintQuery::ask(
            GroupPattern::new(vec![Triple::new(this(), ex("age"), var("age"))])
                .with_filter(Filter::Compare {
                    left: var("age"),
                    op: CompareOp::Lt,
                    right: var("limit"),
                }),
        );
        let call = query_call(ex("LimitCheck"), query);
        let extra = Binding::new().with("limit", Node::integer(50));

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("bob"), &call, false, Some(&extra), &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, None);
    }

    #[test]
    fn test_construct_extracts_violation_resources() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let cv = Node::blank("cv");
        let reverse = Node::blank("rp");
        let query = ConstraintQuery::construct(
            vec![
                Triple::new(cv.clone(), rdf::type_(), spin::constraint_violation()),
                Triple::new(cv.clone(), spin::violation_root(), this()),
                Triple::new(cv.clone(), spin::violation_path(), ex("age")),
                Triple::new(cv.clone(), spin::violation_path(), reverse.clone()),
                Triple::new(reverse.clone(), rdf::type_(), sp::reverse_path()),
                Triple::new(reverse, sp::path(), ex("parentOf")),
                Triple::new(cv.clone(), spin::violation_value(), var("age")),
                Triple::new(cv.clone(), spin::violation_level(), Node::iri(spin::WARNING)),
                Triple::new(cv, rdfs::label(), Node::literal("Too young")),
            ],
            minor_check().pattern,
        );
        let call = query_call(ex("AgeRule"), query);

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("alice"), &call, false, None, &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
        let violation = &violations[0];
        assert_eq!(violation.root, Some(ex("alice")));
        assert_eq!(
            violation.paths,
            vec![SimplePropertyPath::Object(ex("age")), SimplePropertyPath::Subject(ex("parentOf"))]
        );
        assert_eq!(violation.value, Some(Node::integer(17)));
        assert_eq!(violation.level, ViolationLevel::Warning);
        assert_eq!(violation.message.as_deref(), Some("Too young"));
        assert_eq!(violation.source, Some(ex("AgeRule")));
    }

    #[test]
    fn test_construct_drops_unbound_triples() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let cv = Node::blank("cv");
        let query = ConstraintQuery::construct(
            vec![
                Triple::new(cv.clone(), rdf::type_(), spin::constraint_violation()),
                Triple::new(cv.clone(), spin::violation_root(), this()),
                Triple::new(cv, spin::violation_value(), var("never_bound")),
            ],
            GroupPattern::new(vec![Triple::new(this(), rdf::type_(), ex("Person"))]),
        );
        let call = query_call(ex("Rule"), query);

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("alice"), &call, false, None, &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].value, None);
        assert_eq!(violations[0].level, ViolationLevel::Error);
    }

    fn min_age_library() -> RuleLibrary {
        let mut library = RuleLibrary::new();
        library
            .add_template(Template {
                id: ex("MinAge"),
                label_template: Some("Age must be at least {?min}".to_string()),
                parameters: vec![Parameter::required(ex("min")), Parameter::optional(ex("note"))],
                body: ConstraintQuery::ask(
                    GroupPattern::new(vec![Triple::new(this(), ex("age"), var("age"))])
                        .with_filter(Filter::Compare {
                            left: var("age"),
                            op: CompareOp::Lt,
                            right: var("min"),
                        }),
                ),
            })
            .unwrap();
        library
    }

    #[test]
    fn test_template_call_binds_arguments_and_renders_label() {
        let store = people();
        let library = min_age_library();
        let ctx = EvaluationContext::new(&store, &library);
        let call = TemplateCall::new(ex("call1"), ex("MinAge"))
            .with_argument(ex("min"), Node::integer(21));

        let violations = PatternEvaluator
            .evaluate_template(&ctx, &ex("alice"), &call, false, &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].source, Some(ex("call1")));
        assert_eq!(violations[0].message.as_deref(), Some("Age must be at least 21"));

        let violations = PatternEvaluator
            .evaluate_template(&ctx, &ex("bob"), &call, false, &NullProgressMonitor)
            .unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_construct_template_renders_label_per_solution() {
        let mut store = RdfStore::new();
        store.add(ex("alice"), ex("tag"), Node::literal("a")).unwrap();
        store.add(ex("alice"), ex("tag"), Node::literal("b")).unwrap();
        let cv = Node::blank("cv");

        let mut library = RuleLibrary::new();
        library
            .add_template(Template {
                id: ex("BadTag"),
                label_template: Some("bad tag {?t}".to_string()),
                parameters: vec![],
                body: ConstraintQuery::construct(
                    vec![
                        Triple::new(cv.clone(), rdf::type_(), spin::constraint_violation()),
                        Triple::new(cv, spin::violation_value(), var("t")),
                    ],
                    GroupPattern::new(vec![Triple::new(this(), ex("tag"), var("t"))]),
                ),
            })
            .unwrap();
        let ctx = EvaluationContext::new(&store, &library);
        let call = TemplateCall::new(ex("call1"), ex("BadTag"));

        let violations = PatternEvaluator
            .evaluate_template(&ctx, &ex("alice"), &call, false, &NullProgressMonitor)
            .unwrap();
        let found: Vec<(Option<Node>, Option<&str>)> = violations
            .iter()
            .map(|v| (v.value.clone(), v.message.as_deref()))
            .collect();
        assert_eq!(
            found,
            vec![
                (Some(Node::literal("a")), Some("bad tag a")),
                (Some(Node::literal("b")), Some("bad tag b")),
            ]
        );
    }

    #[test]
    fn test_construct_with_fixed_violation_resource_reports_once() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let query = ConstraintQuery::construct(
            vec![Triple::new(ex("Problem"), rdf::type_(), spin::constraint_violation())],
            GroupPattern::new(vec![Triple::new(var("who"), rdf::type_(), ex("Person"))]),
        );
        let call = query_call(ex("Rule"), query);

        let violations = PatternEvaluator
            .evaluate_query(&ctx, &ex("alice"), &call, false, None, &NullProgressMonitor)
            .unwrap();
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_template_call_missing_required_argument() {
        let store = people();
        let library = min_age_library();
        let ctx = EvaluationContext::new(&store, &library);
        let call = TemplateCall::new(ex("call1"), ex("MinAge"));

        let err = PatternEvaluator
            .evaluate_template(&ctx, &ex("alice"), &call, false, &NullProgressMonitor)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::MissingArgument { parameter, .. } if parameter == ex("min")
        ));
    }

    #[test]
    fn test_unknown_template() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let call = TemplateCall::new(ex("call1"), ex("Nope"));

        let err = PatternEvaluator
            .evaluate_template(&ctx, &ex("alice"), &call, false, &NullProgressMonitor)
            .unwrap_err();
        assert!(matches!(err, RuleError::UnknownTemplate(t) if t == ex("Nope")));
    }

    #[test]
    fn test_canceled_monitor_stops_evaluation() {
        let store = people();
        let library = RuleLibrary::new();
        let ctx = EvaluationContext::new(&store, &library);
        let call = query_call(ex("AdultCheck"), minor_check());
        let monitor = TracingProgressMonitor::new();
        monitor.cancel();

        let err = PatternEvaluator
            .evaluate_query(&ctx, &ex("alice"), &call, false, None, &monitor)
            .unwrap_err();
        assert!(matches!(err, RuleError::Canceled));
    }

    #[test]
    fn test_render_label() {
        let binding = Binding::new()
            .with("min", Node::integer(18))
            .with("name", Node::literal("Alice"));
        assert_eq!(render_label("{?name} is under {$min}", &binding), "Alice is under 18");
        assert_eq!(render_label("{?missing} stays", &binding), "{?missing} stays");
        assert_eq!(render_label("no braces", &binding), "no braces");
        assert_eq!(render_label("open { only", &binding), "open { only");
    }

    #[test]
    fn test_error_display() {
        let err = RuleError::UnknownTemplate(ex("T"));
        assert_eq!(err.to_string(), "Unknown template: <http://example.org/T>");
    }
}
