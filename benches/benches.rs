// Copyright 2023 Daniel Harrison. All Rights Reserved.

use std::hint::black_box;

use codspeed_criterion_compat::{criterion_group, criterion_main, Criterion, Throughput};
use tpcc::load;
use tpcc::mem::MemEngine;
use tpcc::worker::Worker;
use tpcc::TpccConfig;

fn profiles(c: &mut Criterion) {
    let cfg = TpccConfig {
        warehouses: 1,
        check_invariants: false,
        pin_cpus: false,
    };
    let engine = MemEngine::new();
    load::load_all(&engine, &cfg);
    let mut worker = Worker::new(&engine, cfg, 1, 23_984_543);

    let mut g = c.benchmark_group("tpcc");
    g.throughput(Throughput::Elements(1));
    g.bench_function("new_order", |b| b.iter(|| black_box(worker.new_order())));
    g.bench_function("payment", |b| b.iter(|| black_box(worker.payment())));
    g.bench_function("order_status", |b| {
        b.iter(|| black_box(worker.order_status()))
    });
    g.bench_function("stock_level", |b| {
        b.iter(|| black_box(worker.stock_level()))
    });
}

// The grouping here is an artifact of criterion's interaction with the
// plug-able rust benchmark harness. We use criterion's groups instead.
criterion_group!(benches, profiles);
criterion_main!(benches);
