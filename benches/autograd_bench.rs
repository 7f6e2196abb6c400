//! Performance benchmarks for forward and reverse accumulation.
//!
//! Forward mode pays a dense Jacobian product per block; reverse mode pays
//! it once per edge during the backward pass.

use blockgrad::{add, backward, multiply, sin, tanh, Context, Variable};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array1;

/// Chain of `depth` elementwise layers mixing sin, tanh and products
fn chain(ctx: &Context, x: &Variable, depth: usize) -> Variable {
    let mut current = x.clone();
    for _ in 0..depth {
        let s = sin(ctx, &current).unwrap();
        let t = tanh(ctx, &current).unwrap();
        let p = multiply(ctx, &s, &t).unwrap();
        current = add(ctx, &p, &current).unwrap();
    }
    current
}

fn bench_forward_mode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ForwardMode");

    for size in [4, 16, 64].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("chain", size), size, |b, &size| {
            let ctx = Context::forward();
            b.iter(|| {
                let x = ctx.leaf(Array1::linspace(-1.0, 1.0, size));
                black_box(chain(&ctx, &x, 8))
            });
        });
    }
    group.finish();
}

fn bench_reverse_mode(c: &mut Criterion) {
    let mut group = c.benchmark_group("ReverseMode");

    for size in [4, 16, 64].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("chain_backward", size), size, |b, &size| {
            let ctx = Context::reverse();
            b.iter(|| {
                let x = ctx.leaf(Array1::linspace(-1.0, 1.0, size));
                let y = chain(&ctx, &x, 8);
                black_box(backward(&y, None).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_forward_mode, bench_reverse_mode);
criterion_main!(benches);
