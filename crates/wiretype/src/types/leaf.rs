// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Predefined leaf tags: primitives, interop pairs and complex numbers.
//!
//! A pair or complex tag describes the C struct `{ first; second; }` with
//! natural alignment, so a Rust value only maps onto one when its real
//! offsets and size agree with [`LeafTag::members`] and [`LeafTag::extent`].

use super::{align_to, Primitive};
use std::fmt;

/// Atomic wire type identifier known to every transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafTag {
    Primitive(Primitive),
    /// `{ f32, i32 }`
    FloatInt,
    /// `{ f64, i32 }`
    DoubleInt,
    /// `{ LongDouble, i32 }`
    LongDoubleInt,
    /// `{ i64, i32 }`
    LongInt,
    /// `{ i16, i32 }`
    ShortInt,
    /// `{ i32, i32 }`
    TwoInt,
    /// `{ f32 re, f32 im }`
    ComplexFloat,
    /// `{ f64 re, f64 im }`
    ComplexDouble,
    /// `{ LongDouble re, LongDouble im }`
    ComplexLongDouble,
}

/// Number of distinct leaf tags.
pub const LEAF_TAG_COUNT: usize = Primitive::ALL.len() + 9;

impl LeafTag {
    /// Every leaf tag, primitives first. `ALL[tag.index()] == tag`.
    pub const ALL: [LeafTag; LEAF_TAG_COUNT] = [
        LeafTag::Primitive(Primitive::Int8),
        LeafTag::Primitive(Primitive::UInt8),
        LeafTag::Primitive(Primitive::Int16),
        LeafTag::Primitive(Primitive::UInt16),
        LeafTag::Primitive(Primitive::Int32),
        LeafTag::Primitive(Primitive::UInt32),
        LeafTag::Primitive(Primitive::Int64),
        LeafTag::Primitive(Primitive::UInt64),
        LeafTag::Primitive(Primitive::Float32),
        LeafTag::Primitive(Primitive::Float64),
        LeafTag::Primitive(Primitive::LongDouble),
        LeafTag::Primitive(Primitive::WChar),
        LeafTag::Primitive(Primitive::Byte),
        LeafTag::FloatInt,
        LeafTag::DoubleInt,
        LeafTag::LongDoubleInt,
        LeafTag::LongInt,
        LeafTag::ShortInt,
        LeafTag::TwoInt,
        LeafTag::ComplexFloat,
        LeafTag::ComplexDouble,
        LeafTag::ComplexLongDouble,
    ];

    /// Dense index into [`LeafTag::ALL`].
    pub const fn index(self) -> usize {
        match self {
            LeafTag::Primitive(p) => p as usize - 1,
            LeafTag::FloatInt => 13,
            LeafTag::DoubleInt => 14,
            LeafTag::LongDoubleInt => 15,
            LeafTag::LongInt => 16,
            LeafTag::ShortInt => 17,
            LeafTag::TwoInt => 18,
            LeafTag::ComplexFloat => 19,
            LeafTag::ComplexDouble => 20,
            LeafTag::ComplexLongDouble => 21,
        }
    }

    /// First member and, for pair and complex tags, the second one.
    const fn layout(self) -> (Primitive, Option<Primitive>) {
        match self {
            LeafTag::Primitive(p) => (p, None),
            LeafTag::FloatInt => (Primitive::Float32, Some(Primitive::Int32)),
            LeafTag::DoubleInt => (Primitive::Float64, Some(Primitive::Int32)),
            LeafTag::LongDoubleInt => (Primitive::LongDouble, Some(Primitive::Int32)),
            LeafTag::LongInt => (Primitive::Int64, Some(Primitive::Int32)),
            LeafTag::ShortInt => (Primitive::Int16, Some(Primitive::Int32)),
            LeafTag::TwoInt => (Primitive::Int32, Some(Primitive::Int32)),
            LeafTag::ComplexFloat => (Primitive::Float32, Some(Primitive::Float32)),
            LeafTag::ComplexDouble => (Primitive::Float64, Some(Primitive::Float64)),
            LeafTag::ComplexLongDouble => (Primitive::LongDouble, Some(Primitive::LongDouble)),
        }
    }

    /// The two members of a pair or complex tag, `None` for a primitive.
    pub const fn pair(self) -> Option<(Primitive, Primitive)> {
        match self.layout() {
            (a, Some(b)) => Some((a, b)),
            (_, None) => None,
        }
    }

    /// Type map: `(offset, primitive)` for every member, in memory order.
    pub fn members(self) -> impl Iterator<Item = (usize, Primitive)> {
        let (first, second) = self.layout();
        std::iter::once((0, first))
            .chain(second.map(|b| (align_to(first.size(), b.alignment()), b)))
    }

    /// Alignment of the described C type.
    pub const fn alignment(self) -> usize {
        match self.layout() {
            (a, Some(b)) if b.alignment() > a.alignment() => b.alignment(),
            (a, _) => a.alignment(),
        }
    }

    /// Extent in bytes, trailing padding included.
    pub const fn extent(self) -> usize {
        match self.layout() {
            (a, None) => a.size(),
            (a, Some(b)) => {
                let second = align_to(a.size(), b.alignment());
                align_to(second + b.size(), self.alignment())
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LeafTag::Primitive(p) => p.name(),
            LeafTag::FloatInt => "FLOAT_INT",
            LeafTag::DoubleInt => "DOUBLE_INT",
            LeafTag::LongDoubleInt => "LONG_DOUBLE_INT",
            LeafTag::LongInt => "LONG_INT",
            LeafTag::ShortInt => "SHORT_INT",
            LeafTag::TwoInt => "2INT",
            LeafTag::ComplexFloat => "C_FLOAT_COMPLEX",
            LeafTag::ComplexDouble => "C_DOUBLE_COMPLEX",
            LeafTag::ComplexLongDouble => "C_LONG_DOUBLE_COMPLEX",
        }
    }
}

impl From<Primitive> for LeafTag {
    fn from(p: Primitive) -> Self {
        LeafTag::Primitive(p)
    }
}

impl fmt::Display for LeafTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
