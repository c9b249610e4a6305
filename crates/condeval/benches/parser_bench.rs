//! Parser benchmarks.
//!
//! Run with: `cargo bench --package condeval`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::rc::Rc;

use condeval::{parse, AstRoot, EvaluationContext, ExtensionFunction, ExtensionRegistry, NullTraceWriter, Value};

fn extensions() -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    registry
        .register("variables", 1, Some(1), || -> Rc<dyn ExtensionFunction> {
            Rc::new(|_: &[Value], _: &EvaluationContext, _: usize| Ok(Value::Null))
        })
        .unwrap();
    registry
}

fn parse_source(source: &str, registry: &ExtensionRegistry) -> AstRoot {
    parse(source, &NullTraceWriter, registry).expect("benchmark source is valid")
}

fn bench_parser_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_simple");
    let registry = extensions();

    let source = "eq(variables('environment'), 'production')";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_eq", |b| {
        b.iter(|| parse_source(black_box(source), &registry))
    });

    group.finish();
}

fn bench_parser_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_nested");
    let registry = extensions();

    let source = "and(\
        eq(variables('environment'), 'production'), \
        ge(variables('build'), 1.2.3), \
        not(contains(variables('tags'), 'skip-deploy')), \
        or(eq(1, 1), startsWith(variables('branch'), 'release/'))\
    )";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("nested_boolean_tree", |b| {
        b.iter(|| parse_source(black_box(source), &registry))
    });

    group.finish();
}

fn bench_parser_indexers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_indexers");
    let registry = extensions();

    let source = "variables('release')['stage']['name']";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("indexer_chain", |b| {
        b.iter(|| parse_source(black_box(source), &registry))
    });

    group.bench_function("dot_chain", |b| {
        b.iter(|| parse_source(black_box("variables('release').stage.name"), &registry))
    });

    group.finish();
}

fn bench_parser_and_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_and_evaluate");
    let registry = extensions();
    let source = "and(eq(1, 1), or(false, ge(2.0, 1.5)))";
    let ast = parse_source(source, &registry);
    let context = EvaluationContext::new(&NullTraceWriter, Rc::new(condeval::StateNode::Null));
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("parse_then_evaluate", |b| {
        b.iter(|| {
            let ast = parse_source(black_box(source), &registry);
            ast.evaluate_boolean(&context).unwrap()
        })
    });

    group.bench_function("evaluate_only", |b| b.iter(|| ast.evaluate_boolean(&context).unwrap()));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_simple,
    bench_parser_nested,
    bench_parser_indexers,
    bench_parser_and_evaluate
);
criterion_main!(benches);
