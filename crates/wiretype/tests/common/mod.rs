// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference types shared by the integration tests.

#![allow(dead_code)]

use wiretype::{Layout, Reflect};

/// Two-field struct that matches no predefined pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Layout)]
#[repr(C)]
pub struct Sample {
    pub count: i32,
    pub weight: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Layout)]
#[repr(C)]
pub struct Wrapped {
    pub value: f64,
}

/// Reference composite: 3-element int array, double, char, 2-element
/// struct array, int, nested single-field struct, 2x3 float array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Layout)]
#[repr(C)]
pub struct Reference {
    pub ints: [i32; 3],
    pub real: f64,
    pub letter: i8,
    pub samples: [Sample; 2],
    pub total: i32,
    pub wrapped: Wrapped,
    pub grid: [[f32; 3]; 2],
}

/// Data ends at byte 9; `size_of` is 16.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect, Layout)]
#[repr(C)]
pub struct Padded {
    pub value: f64,
    pub tag: u8,
}

pub fn random_reference() -> Reference {
    Reference {
        ints: [fastrand::i32(..), fastrand::i32(..), fastrand::i32(..)],
        real: fastrand::f64() * 1.0e6 - 5.0e5,
        letter: fastrand::i8(..),
        samples: [
            Sample {
                count: fastrand::i32(..),
                weight: fastrand::f32(),
            },
            Sample {
                count: fastrand::i32(..),
                weight: fastrand::f32(),
            },
        ],
        total: fastrand::i32(..),
        wrapped: Wrapped {
            value: fastrand::f64(),
        },
        grid: [
            [fastrand::f32(), fastrand::f32(), fastrand::f32()],
            [fastrand::f32(), fastrand::f32(), fastrand::f32()],
        ],
    }
}
