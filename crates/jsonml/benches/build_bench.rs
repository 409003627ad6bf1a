use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use jsonml::{Builder, BuilderConfig, HostProfile, Value};
use serde_json::json;

const SMALL_ROWS: usize = 64;
const LARGE_ROWS: usize = 10_000;

fn make_table(rows: usize) -> Value {
    let mut table = vec![json!("table"), json!({"class": "grid", "cellpadding": 2})];
    for i in 0..rows {
        table.push(json!([
            "tr",
            {"data-row": i},
            ["td", {"class": "name"}, format!("row {i}")],
            ["td", {"style": "text-align: right"}, "\n  42  \n"]
        ]));
    }
    Value::from(serde_json::Value::Array(table))
}

fn make_fragment(roots: usize) -> Value {
    let mut fragment = vec![json!("")];
    for i in 0..roots {
        fragment.push(json!(["p", {"id": format!("p{i}"), "object": {"n": i}}, " text "]));
    }
    Value::from(serde_json::Value::Array(fragment))
}

fn bench_build_small(c: &mut Criterion) {
    let input = make_table(SMALL_ROWS);
    let builder = Builder::default();
    c.bench_function("bench_build_table_small", |b| {
        b.iter(|| black_box(builder.build(black_box(&input))));
    });
}

fn bench_build_large(c: &mut Criterion) {
    let input = make_table(LARGE_ROWS);
    let builder = Builder::default();
    c.bench_function("bench_build_table_large", |b| {
        b.iter(|| black_box(builder.build(black_box(&input))));
    });
}

fn bench_build_fragment_inspect(c: &mut Criterion) {
    let input = make_fragment(SMALL_ROWS);
    let builder = Builder::new(BuilderConfig {
        host: HostProfile::Legacy,
        ..BuilderConfig::default()
    });
    c.bench_function("bench_build_fragment_inspect", |b| {
        b.iter_batched(
            || input.clone(),
            |input| black_box(builder.build(&input)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build_small,
    bench_build_large,
    bench_build_fragment_inspect
);
criterion_main!(benches);
