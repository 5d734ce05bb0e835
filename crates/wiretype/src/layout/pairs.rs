// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Predefined interop pairs.
//!
//! A two-field type whose members are scalar primitives matching one of
//! the pair or complex leaf tags is sent as that tag, in this order:
//!
//! | members | tag |
//! |---------|-----|
//! | `(f32, i32)` | `FLOAT_INT` |
//! | `(f64, i32)` | `DOUBLE_INT` |
//! | `(LongDouble, i32)` | `LONG_DOUBLE_INT` |
//! | `(i64, i32)` | `LONG_INT` |
//! | `(i16, i32)` | `SHORT_INT` |
//! | `(i32, i32)` | `2INT` |
//! | `(f32, f32)` | `C_FLOAT_COMPLEX` |
//! | `(f64, f64)` | `C_DOUBLE_COMPLEX` |
//! | `(LongDouble, LongDouble)` | `C_LONG_DOUBLE_COMPLEX` |
//!
//! The member types alone are not enough: the real offsets and size of
//! the type must equal those of the predefined tag.

use crate::reflect::{ElementKind, FieldShape, Reflect};
use crate::types::{LeafTag, Primitive};

/// Pair tags in matching order.
pub const PAIR_TAGS: [LeafTag; 9] = [
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

/// First pair tag whose members are `(first, second)`.
pub fn lookup(first: Primitive, second: Primitive) -> Option<LeafTag> {
    PAIR_TAGS
        .into_iter()
        .find(|tag| tag.pair() == Some((first, second)))
}

fn scalar_primitive(shape: FieldShape) -> Option<Primitive> {
    match shape.element() {
        ElementKind::Primitive(p) if shape.is_scalar() => Some(p),
        _ => None,
    }
}

/// Predefined tag for `T`, if `T` is laid out exactly like one.
pub fn match_pair<T: Reflect>() -> Option<LeafTag> {
    if T::FIELD_COUNT != 2 {
        return None;
    }
    let first = scalar_primitive(T::field_shape(0)?)?;
    let second = scalar_primitive(T::field_shape(1)?)?;
    let tag = lookup(first, second)?;

    let offsets = [T::field_offset(0)?, T::field_offset(1)?];
    let same_layout = tag.members().map(|(offset, _)| offset).eq(offsets)
        && core::mem::size_of::<T>() == tag.extent();
    if !same_layout {
        log::debug!(
            "[synth] {} has {} members but not its layout, building it",
            T::TYPE_NAME,
            tag
        );
        return None;
    }
    Some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LongDouble;

    #[test]
    fn table_order_and_members() {
        assert_eq!(lookup(Primitive::Float32, Primitive::Int32), Some(LeafTag::FloatInt));
        assert_eq!(lookup(Primitive::Int32, Primitive::Int32), Some(LeafTag::TwoInt));
        assert_eq!(
            lookup(Primitive::Float64, Primitive::Float64),
            Some(LeafTag::ComplexDouble)
        );
        assert_eq!(lookup(Primitive::Int32, Primitive::Float32), None);
        assert_eq!(lookup(Primitive::UInt64, Primitive::Int32), None);
    }

    #[test]
    fn tuples_match_when_laid_out_like_c() {
        let c_order = <(f32, i32)>::field_offset(0) == Some(0);
        let expected = c_order.then_some(LeafTag::FloatInt);
        assert_eq!(match_pair::<(f32, i32)>(), expected);
        assert_eq!(match_pair::<(i32, i32)>(), Some(LeafTag::TwoInt));
        assert_eq!(
            match_pair::<(LongDouble, LongDouble)>(),
            Some(LeafTag::ComplexLongDouble)
        );
    }

    #[test]
    fn non_pairs_fall_through() {
        assert_eq!(match_pair::<(u8, u8)>(), None);
        assert_eq!(match_pair::<([f32; 1], i32)>(), None);
        assert_eq!(match_pair::<(i32, f32)>(), None);
    }
}
