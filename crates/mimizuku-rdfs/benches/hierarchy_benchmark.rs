use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mimizuku_core::vocabulary::rdfs;
use mimizuku_core::Node;
use mimizuku_rdfs::ClassHierarchy;
use mimizuku_store::RdfStore;

fn create_test_ontology(depth: usize, fan_out: usize) -> RdfStore {
    let mut store = RdfStore::new();

    // Class_i subclassOf Class_{i-1}, plus fan_out side parents per level
    for i in 1..depth {
        let class_i = Node::iri(format!("http://example.org/Class{}", i));
        let parent = Node::iri(format!("http://example.org/Class{}", i - 1));
        store.add(class_i.clone(), rdfs::subclass_of(), parent).unwrap();
        for j in 0..fan_out {
            let mixin = Node::iri(format!("http://example.org/Mixin{}_{}", i, j));
            store.add(class_i.clone(), rdfs::subclass_of(), mixin).unwrap();
        }
    }

    store
}

fn bench_superclasses(c: &mut Criterion) {
    let store = create_test_ontology(100, 3);
    let hierarchy = ClassHierarchy::new(&store);
    let leaf = Node::iri("http://example.org/Class99");

    c.bench_function("superclasses_depth_100", |b| {
        b.iter(|| hierarchy.superclasses(black_box(&leaf)))
    });
}

criterion_group!(benches, bench_superclasses);
criterion_main!(benches);
