use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mimizuku_constraints::ConstraintCollector;
use mimizuku_core::vocabulary::{rdfs, spin};
use mimizuku_core::Node;
use mimizuku_rules::{ConstraintQuery, GroupPattern, RuleLibrary};
use mimizuku_store::RdfStore;

fn class(i: usize) -> Node {
    Node::iri(format!("http://example.org/Class{}", i))
}

/// Chain of `depth` classes, each declaring `rules_per_class` query rules
fn create_ontology(depth: usize, rules_per_class: usize) -> (RdfStore, RuleLibrary) {
    let mut store = RdfStore::new();
    let mut library = RuleLibrary::new();

    for i in 0..depth {
        if i > 0 {
            store.add(class(i), rdfs::subclass_of(), class(i - 1)).unwrap();
        }
        for j in 0..rules_per_class {
            let rule = Node::iri(format!("http://example.org/Rule{}_{}", i, j));
            store.add(class(i), spin::constraint(), rule.clone()).unwrap();
            library
                .add_query(rule, ConstraintQuery::ask(GroupPattern::default()))
                .unwrap();
        }
    }

    (store, library)
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("constraint_collection");

    for depth in [10, 50, 100].iter() {
        let (store, library) = create_ontology(*depth, 3);
        let leaf = class(depth - 1);
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, _| {
            let collector = ConstraintCollector::new(&store, &library);
            b.iter(|| collector.collect(black_box(&leaf)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_collect);
criterion_main!(benches);
