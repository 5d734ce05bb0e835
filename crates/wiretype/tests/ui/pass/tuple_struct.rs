// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tuple structs reflect by position.

use wiretype::{Layout, Reflect};

#[derive(Clone, Copy, Reflect, Layout)]
#[repr(C)]
pub struct Point(pub f64, pub f64, pub f64);

fn main() {
    assert_eq!(Point::FIELD_COUNT, 3);
    assert_eq!(Point::field_offset(2), Some(16));
    let p = Point(1.0, 2.0, 3.0);
    assert_eq!(*wiretype::get::<1, _>(&p), 2.0);
}
