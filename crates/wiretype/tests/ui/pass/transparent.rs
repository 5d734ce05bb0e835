// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `repr(transparent)` and `repr(C, align(N))` are both stable layouts.

use wiretype::{Layout, Reflect};

#[derive(Clone, Copy, Reflect, Layout)]
#[repr(transparent)]
pub struct Meters(pub f64);

#[derive(Clone, Copy, Reflect, Layout)]
#[repr(C, align(32))]
pub struct Aligned {
    pub distance: Meters,
    pub id: u32,
}

fn main() {
    let synth = wiretype::Synthesizer::new(wiretype::LocalTransport::new());
    let dt = synth.datatype::<Aligned>().expect("aligned");
    assert_eq!(dt.extent().size, 32);
}
