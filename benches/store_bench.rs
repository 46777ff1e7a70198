//! Benchmarks for EpochKV store operations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use epochkv::{Engine, Record};
use tempfile::TempDir;

fn store_benchmarks(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path()).unwrap();

    // Pre-populate so reads and rewrites work against a realistic store
    for i in 0..1000i64 {
        engine
            .create(Record::new(format!("key{}", i), i, format!("value{}", i)))
            .unwrap();
    }

    c.bench_function("get_hit", |b| {
        b.iter(|| black_box(engine.get("key500", 500)))
    });

    c.bench_function("get_miss", |b| {
        b.iter(|| black_box(engine.get("absent", 0)))
    });

    // Each mutation rewrites the whole backing file, so these measure
    // the full-rewrite persistence cost at 1000 records
    c.bench_function("update_existing", |b| {
        b.iter(|| engine.update(Record::new("key500", 500, "replaced")).unwrap())
    });

    c.bench_function("create_delete_cycle", |b| {
        let mut i = 1_000_000i64;
        b.iter(|| {
            i += 1;
            engine.create(Record::new("bench", i, "v")).unwrap();
            engine.delete("bench", i).unwrap();
        })
    });
}

criterion_group!(benches, store_benchmarks);
criterion_main!(benches);
