// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire type tags and the scalar types that have no direct Rust primitive.
//!
//! `Primitive` is the closed set of indivisible wire types. `LeafTag` adds
//! the predefined interop pairs and complex numbers on top of it. Boolean is
//! deliberately absent from both.

pub mod leaf;
pub mod primitive;
pub mod scalar;

pub use leaf::{LeafTag, LEAF_TAG_COUNT};
pub use primitive::Primitive;
pub use scalar::{Byte, Complex, LongDouble};

/// Round `offset` up to the next multiple of `alignment`.
#[allow(clippy::manual_div_ceil)] // div_ceil is not const on our MSRV
pub(crate) const fn align_to(offset: usize, alignment: usize) -> usize {
    (offset + alignment - 1) / alignment * alignment
}
