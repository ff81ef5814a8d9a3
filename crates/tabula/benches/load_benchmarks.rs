//! Directory load and query benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use tabula::{StoreLocation, Tabula, TabulaConfig};
use tempfile::TempDir;

fn write_tables(dir: &TempDir, tables: usize, rows: usize) {
    let data = dir.path().join("csv");
    fs::create_dir_all(&data).unwrap();

    for t in 0..tables {
        let mut content = String::from("zip,amount,label\n");
        for row in 0..rows {
            content.push_str(&format!("{:05},{}.25,item_{}\n", row, row, row % 13));
        }
        fs::write(data.join(format!("table_{}.csv", t)), content).unwrap();
    }
}

fn config(dir: &TempDir) -> TabulaConfig {
    TabulaConfig::default()
        .with_data_dir(dir.path().join("csv"))
        .with_store(StoreLocation::InMemory)
        .with_schema_path(dir.path().join("table_info.txt"))
}

fn bench_load_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_directory");
    group.sample_size(20);

    for rows in [1_000, 10_000].iter() {
        let dir = TempDir::new().unwrap();
        write_tables(&dir, 4, *rows);

        group.bench_with_input(BenchmarkId::new("rows_per_table", rows), &dir, |b, dir| {
            b.iter(|| black_box(Tabula::open(config(dir)).unwrap()))
        });
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    write_tables(&dir, 1, 10_000);
    let tabula = Tabula::open(config(&dir)).unwrap();

    c.bench_function("query_full_scan", |b| {
        b.iter(|| black_box(tabula.execute_query("SELECT * FROM table_0 WHERE amount > 5000")))
    });

    c.bench_function("describe_query", |b| {
        b.iter(|| black_box(tabula.describe_query("SELECT amount FROM table_0")))
    });
}

criterion_group!(benches, bench_load_directory, bench_query);
criterion_main!(benches);
