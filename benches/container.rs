//! Benchmarks for container directory parsing and data table decoding.
//!
//! The input is a synthetic container holding an item table with a few
//! hundred records, sized like the item table of a real data file.

extern crate dysonscope;

#[path = "../tests/common/mod.rs"]
mod common;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use dysonscope::container::ContainerFile;
use dysonscope::proto::{ItemProto, ProtoSet};
use std::hint::black_box;

use common::{ContainerBuilder, CLASS_BEHAVIOUR};

fn build_image() -> Vec<u8> {
    let records: Vec<Vec<u8>> = (0..200)
        .map(|index| common::item_record(1000 + index, &format!("item-{index}"), 0))
        .collect();
    let table = common::table_payload("ItemProtoSet", "物品", "0.9.27", &records);

    let mut builder = ContainerBuilder::new(22);
    let behaviour = builder.add_type(CLASS_BEHAVIOUR);
    builder.add_asset(100, behaviour, table);
    builder.build()
}

/// Benchmark parsing the directory of a container image.
///
/// Parsing walks the header, type table and asset table, recovers table
/// names and eagerly decodes textures. This is the fixed cost of opening
/// any data file.
fn bench_directory_parse(c: &mut Criterion) {
    let image = build_image();
    let image_size = image.len();

    let mut group = c.benchmark_group("directory");
    group.throughput(Throughput::Bytes(image_size as u64));
    group.bench_function("parse", |b| {
        b.iter_batched(
            || image.clone(),
            |image| {
                let container = ContainerFile::from_memory(black_box(image)).unwrap();
                black_box(container)
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

/// Benchmark decoding the item table into typed records.
///
/// Table decoding dominates extraction time on real data files, where the
/// item table alone holds hundreds of records.
fn bench_item_table_decode(c: &mut Criterion) {
    let image = build_image();
    let image_size = image.len();
    let container = ContainerFile::from_memory(image).unwrap();

    let mut group = c.benchmark_group("item_table");
    group.throughput(Throughput::Bytes(image_size as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            let items = ProtoSet::<ItemProto>::load(black_box(&container)).unwrap();
            black_box(items)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_directory_parse, bench_item_table_decode,);
criterion_main!(benches);
