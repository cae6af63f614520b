use mimizuku_constraints::{ConstraintCollector, SerializerConfig, ViolationSerializer};
use mimizuku_core::vocabulary::{rdfs, spin};
use mimizuku_core::Node;
use mimizuku_rdfs::ClassHierarchy;
use mimizuku_rules::{
    ConstraintQuery, ConstraintViolation, GroupPattern, RuleLibrary, SimplePropertyPath,
    ViolationLevel,
};
use mimizuku_store::RdfStore;
use proptest::prelude::*;

fn class(i: usize) -> Node {
    Node::iri(format!("http://example.org/Class{}", i))
}

fn rule(class: usize, j: usize) -> Node {
    Node::iri(format!("http://example.org/Rule{}_{}", class, j))
}

const CLASSES: usize = 8;

fn build(edges: &[(usize, usize)], rule_counts: &[usize]) -> (RdfStore, RuleLibrary) {
    let mut store = RdfStore::new();
    let mut library = RuleLibrary::new();
    for (sub, sup) in edges {
        store.add(class(*sub), rdfs::subclass_of(), class(*sup)).unwrap();
    }
    for (i, count) in rule_counts.iter().enumerate() {
        for j in 0..*count {
            store.add(class(i), spin::constraint(), rule(i, j)).unwrap();
            library
                .add_query(rule(i, j), ConstraintQuery::ask(GroupPattern::default()))
                .unwrap();
        }
    }
    (store, library)
}

fn arb_node() -> impl Strategy<Value = Node> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(|s| Node::iri(format!("http://example.org/{}", s))),
        "[a-z]{1,6}".prop_map(Node::literal),
        (0i64..1000).prop_map(Node::integer),
    ]
}

fn property_iri(local: &str) -> Node {
    Node::iri(format!("http://example.org/{}", local))
}

fn arb_path() -> impl Strategy<Value = SimplePropertyPath> {
    prop_oneof![
        "[a-z]{1,6}".prop_map(|s| SimplePropertyPath::Object(property_iri(&s))),
        "[a-z]{1,6}".prop_map(|s| SimplePropertyPath::Subject(property_iri(&s))),
    ]
}

fn arb_violation() -> impl Strategy<Value = ConstraintViolation> {
    (
        prop::option::of(arb_node()),
        prop::collection::vec(arb_path(), 0..4),
        prop::option::of(arb_node()),
        prop::option::of("[a-z ]{0,12}"),
        prop::option::of(arb_node()),
        prop_oneof![
            Just(ViolationLevel::Info),
            Just(ViolationLevel::Warning),
            Just(ViolationLevel::Error),
            Just(ViolationLevel::Fatal),
        ],
    )
        .prop_map(|(root, paths, value, message, source, level)| ConstraintViolation {
            root,
            paths,
            value,
            message,
            source,
            level,
        })
}

fn expected_triples(violation: &ConstraintViolation, include_source: bool) -> usize {
    let label = violation.message.as_deref().map_or(0, |m| usize::from(!m.is_empty()));
    let paths: usize = violation
        .paths
        .iter()
        .map(|path| match path {
            SimplePropertyPath::Object(_) => 1,
            SimplePropertyPath::Subject(_) => 3,
        })
        .sum();
    let source = usize::from(include_source && violation.source.is_some());

    let root = usize::from(violation.root.is_some());
    let value = usize::from(violation.value.is_some());
    2 + label + root + paths + source + value
}

proptest! {
    #[test]
    fn collected_rule_count_is_own_plus_inherited(
        edges in prop::collection::vec((0usize..CLASSES, 0usize..CLASSES), 0..20),
        rule_counts in prop::collection::vec(0usize..3, CLASSES),
        start in 0usize..CLASSES,
    ) {
        let (store, library) = build(&edges, &rule_counts);
        let rules = ConstraintCollector::new(&store, &library).collect(&class(start));

        let superclasses = ClassHierarchy::new(&store).superclasses(&class(start));
        let inherited: usize = superclasses
            .iter()
            .map(|sup| (0..CLASSES).find(|i| class(*i) == *sup).map_or(0, |i| rule_counts[i]))
            .sum();
        prop_assert_eq!(rules.len(), rule_counts[start] + inherited);

        // 自クラスのルールが先頭
        for (j, rule_ref) in rules.iter().take(rule_counts[start]).enumerate() {
            prop_assert_eq!(rule_ref.source(), &rule(start, j));
        }
    }

    #[test]
    fn serialized_triple_count_matches_populated_fields(
        violations in prop::collection::vec(arb_violation(), 0..5),
        include_source in any::<bool>(),
    ) {
        let serializer = ViolationSerializer::new(SerializerConfig { include_source });
        let triples = serializer.serialize(&violations);
        let expected: usize = violations.iter().map(|v| expected_triples(v, include_source)).sum();
        prop_assert_eq!(triples.len(), expected);
    }
}
