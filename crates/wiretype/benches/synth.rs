// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor synthesis and transfer benchmarks.
//!
//! - cold build of a nested struct (fresh synthesizer per iteration)
//! - cached lookup (the fast path every transfer takes)
//! - pack/unpack throughput for an array of padded structs

#![allow(clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use wiretype::{Layout, LocalTransport, Reflect, Synthesizer};

#[derive(Clone, Copy, Default, Reflect, Layout)]
#[repr(C)]
pub struct Joint {
    pub position: f64,
    pub velocity: f32,
    pub id: u8,
}

#[derive(Clone, Copy, Default, Reflect, Layout)]
#[repr(C)]
pub struct ArmState {
    pub stamp: u64,
    pub joints: [Joint; 6],
    pub pose: [[f32; 4]; 4],
    pub flags: u16,
}

fn bench_cold_build(c: &mut Criterion) {
    c.bench_function("synth_cold_build", |b| {
        b.iter(|| {
            let synth = Synthesizer::new(LocalTransport::new());
            black_box(synth.datatype::<ArmState>().expect("build"))
        });
    });
}

fn bench_cached_lookup(c: &mut Criterion) {
    let synth = Synthesizer::new(LocalTransport::new());
    synth.datatype::<ArmState>().expect("warm up");
    c.bench_function("synth_cached_lookup", |b| {
        b.iter(|| black_box(synth.datatype::<ArmState>().expect("cached")));
    });
}

fn bench_transfer(c: &mut Criterion) {
    let synth = Synthesizer::new(LocalTransport::new());
    let src = vec![ArmState::default(); 256];
    let mut dst = src.clone();
    let wire_len = synth.send(&src).expect("send").len();

    let mut group = c.benchmark_group("transfer");
    group.throughput(Throughput::Bytes(wire_len as u64));
    group.bench_function("arm_state_x256", |b| {
        b.iter(|| synth.transfer(black_box(&src), &mut dst).expect("transfer"));
    });
    group.finish();
}

criterion_group!(benches, bench_cold_build, bench_cached_lookup, bench_transfer);
criterion_main!(benches);
