// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic structs get `Layout` bounds on their parameters.

use wiretype::{Layout, Reflect};

#[derive(Clone, Copy, Reflect, Layout)]
#[repr(C)]
pub struct Stamped<T, const N: usize> {
    pub stamp: u64,
    pub values: [T; N],
}

fn main() {
    type Four = Stamped<i16, 4>;
    assert_eq!(Four::FIELD_COUNT, 2);
    assert_eq!(Four::field_shape(1).map(|s| s.extents().to_vec()), Some(vec![4]));
    let synth = wiretype::Synthesizer::new(wiretype::LocalTransport::new());
    synth.datatype::<Stamped<f32, 3>>().expect("generic");
}
