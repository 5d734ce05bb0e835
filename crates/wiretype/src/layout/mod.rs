// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Types with a wire layout.
//!
//! [`Layout`] is the allow-list of field types. It is implemented here for
//! the supported primitives, [`Complex`], [`LongDouble`], [`Byte`], pairs
//! and arrays up to rank 2, and by `#[derive(Layout)]` for reflected
//! structs. A type without an impl (`bool`, references, `Vec`, ...) cannot
//! appear in a reflected struct: the error surfaces at compile time.

pub mod pairs;

use crate::error::Result;
use crate::reflect::{ElementKind, FieldDescriptor, FieldShape, FieldVisitor, FieldVisitorMut, Reflect};
use crate::synth::Synthesizer;
use crate::transport::Transport;
use crate::types::{Byte, Complex, LeafTag, LongDouble, Primitive};
use core::mem::{offset_of, size_of};

/// A type the synthesizer can describe to a transport.
///
/// # Safety
///
/// `describe` must yield a descriptor that covers only initialized,
/// non-padding bytes of `Self`, each with a primitive whose every bit
/// pattern is a valid value for that byte range (wide characters are
/// validated on receive). `SHAPE` must match the real type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` has no wire layout",
    label = "unsupported field type",
    note = "supported: integers, `f32`, `f64`, `char`, `LongDouble`, `Byte`, `Complex<_>`, 2-tuples, arrays of rank 1 or 2 and `#[derive(Layout)]` structs",
    note = "`bool` has no wire type; use `u8`"
)]
pub unsafe trait Layout: Copy + Send + Sync + 'static {
    /// Innermost element: `Self` for scalars and structs, the element type
    /// for arrays.
    type Element: Layout;

    const SHAPE: FieldShape;

    /// Descriptor of `Self`, built through `synth` so nested types are
    /// cached once.
    fn describe<Tr: Transport>(synth: &Synthesizer<Tr>) -> Result<Tr::Handle>;

    #[doc(hidden)]
    fn accept<V: FieldVisitor + ?Sized>(&self, field: &FieldDescriptor, visitor: &mut V) {
        visitor.scalar(field, self);
    }

    #[doc(hidden)]
    fn accept_mut<V: FieldVisitorMut + ?Sized>(&mut self, field: &FieldDescriptor, visitor: &mut V) {
        visitor.scalar(field, self);
    }

    #[doc(hidden)]
    fn accept_array<V: FieldVisitor + ?Sized, const N: usize>(
        array: &[Self; N],
        field: &FieldDescriptor,
        visitor: &mut V,
    ) {
        visitor.array(field, array);
    }

    #[doc(hidden)]
    fn accept_array_mut<V: FieldVisitorMut + ?Sized, const N: usize>(
        array: &mut [Self; N],
        field: &FieldDescriptor,
        visitor: &mut V,
    ) {
        visitor.array(field, array);
    }
}

macro_rules! primitive_layout {
    ($($ty:ty => $prim:expr),* $(,)?) => {$(
        unsafe impl Layout for $ty {
            type Element = Self;
            const SHAPE: FieldShape = FieldShape::scalar(ElementKind::Primitive($prim));

            fn describe<Tr: Transport>(synth: &Synthesizer<Tr>) -> Result<Tr::Handle> {
                Ok(synth.leaf(LeafTag::Primitive($prim)))
            }
        }
    )*};
}

#[cfg(target_pointer_width = "64")]
const POINTER_SIZED: (Primitive, Primitive) = (Primitive::Int64, Primitive::UInt64);
#[cfg(target_pointer_width = "32")]
const POINTER_SIZED: (Primitive, Primitive) = (Primitive::Int32, Primitive::UInt32);
#[cfg(target_pointer_width = "16")]
const POINTER_SIZED: (Primitive, Primitive) = (Primitive::Int16, Primitive::UInt16);

primitive_layout! {
    i8 => Primitive::Int8,
    u8 => Primitive::UInt8,
    i16 => Primitive::Int16,
    u16 => Primitive::UInt16,
    i32 => Primitive::Int32,
    u32 => Primitive::UInt32,
    i64 => Primitive::Int64,
    u64 => Primitive::UInt64,
    isize => POINTER_SIZED.0,
    usize => POINTER_SIZED.1,
    f32 => Primitive::Float32,
    f64 => Primitive::Float64,
    char => Primitive::WChar,
    LongDouble => Primitive::LongDouble,
    Byte => Primitive::Byte,
}

macro_rules! complex_layout {
    ($($ty:ty => $prim:expr, $tag:expr);* $(;)?) => {$(
        unsafe impl Layout for Complex<$ty> {
            type Element = Self;
            const SHAPE: FieldShape = FieldShape::scalar(ElementKind::Complex($prim));

            fn describe<Tr: Transport>(synth: &Synthesizer<Tr>) -> Result<Tr::Handle> {
                Ok(synth.leaf($tag))
            }
        }
    )*};
}

complex_layout! {
    f32 => Primitive::Float32, LeafTag::ComplexFloat;
    f64 => Primitive::Float64, LeafTag::ComplexDouble;
    LongDouble => Primitive::LongDouble, LeafTag::ComplexLongDouble;
}

unsafe impl<T: Layout, const N: usize> Layout for [T; N] {
    type Element = T::Element;
    const SHAPE: FieldShape = T::SHAPE.wrap(N);

    fn describe<Tr: Transport>(synth: &Synthesizer<Tr>) -> Result<Tr::Handle> {
        synth.strided::<Self>()
    }

    fn accept<V: FieldVisitor + ?Sized>(&self, field: &FieldDescriptor, visitor: &mut V) {
        T::accept_array(self, field, visitor);
    }

    fn accept_mut<V: FieldVisitorMut + ?Sized>(&mut self, field: &FieldDescriptor, visitor: &mut V) {
        T::accept_array_mut(self, field, visitor);
    }

    fn accept_array<V: FieldVisitor + ?Sized, const R: usize>(
        array: &[Self; R],
        field: &FieldDescriptor,
        visitor: &mut V,
    ) {
        visitor.matrix(field, array);
    }

    fn accept_array_mut<V: FieldVisitorMut + ?Sized, const R: usize>(
        array: &mut [Self; R],
        field: &FieldDescriptor,
        visitor: &mut V,
    ) {
        visitor.matrix(field, array);
    }
}

// Tuples have no guaranteed field order; `pairs::match_pair` checks the
// real offsets before using a predefined pair tag.
unsafe impl<A: Layout, B: Layout> Reflect for (A, B) {
    const TYPE_NAME: &'static str = "tuple";
    const FIELD_COUNT: usize = 2;
    const FIELD_SHAPES: &'static [FieldShape] = &[A::SHAPE, B::SHAPE];

    fn field_offset(index: usize) -> Option<usize> {
        match index {
            0 => Some(offset_of!(Self, 0)),
            1 => Some(offset_of!(Self, 1)),
            _ => None,
        }
    }

    fn field_size(index: usize) -> Option<usize> {
        match index {
            0 => Some(size_of::<A>()),
            1 => Some(size_of::<B>()),
            _ => None,
        }
    }

    fn describe_field<Tr: Transport>(
        index: usize,
        synth: &Synthesizer<Tr>,
    ) -> Option<Result<Tr::Handle>> {
        match index {
            0 => Some(synth.datatype::<A::Element>()),
            1 => Some(synth.datatype::<B::Element>()),
            _ => None,
        }
    }

    fn visit<V: FieldVisitor + ?Sized>(&self, visitor: &mut V) {
        let first = FieldDescriptor::new(0, A::SHAPE, offset_of!(Self, 0), size_of::<A>());
        self.0.accept(&first, visitor);
        let second = FieldDescriptor::new(1, B::SHAPE, offset_of!(Self, 1), size_of::<B>());
        self.1.accept(&second, visitor);
    }

    fn visit_mut<V: FieldVisitorMut + ?Sized>(&mut self, visitor: &mut V) {
        let first = FieldDescriptor::new(0, A::SHAPE, offset_of!(Self, 0), size_of::<A>());
        self.0.accept_mut(&first, visitor);
        let second = FieldDescriptor::new(1, B::SHAPE, offset_of!(Self, 1), size_of::<B>());
        self.1.accept_mut(&second, visitor);
    }
}

unsafe impl<A: Layout, B: Layout> Layout for (A, B) {
    type Element = Self;
    const SHAPE: FieldShape = FieldShape::scalar(ElementKind::Pair);

    fn describe<Tr: Transport>(synth: &Synthesizer<Tr>) -> Result<Tr::Handle> {
        synth.composite::<Self>()
    }
}
