// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed positional field access.

use crate::layout::Layout;

/// Field `I` of a reflected struct.
///
/// Implemented by `#[derive(Reflect)]` once per field, so an index past the
/// last field does not compile.
pub trait FieldAt<const I: usize> {
    type Type: Layout;

    fn get(&self) -> &Self::Type;

    fn get_mut(&mut self) -> &mut Self::Type;
}

/// Live reference to field `I` of `value`.
///
/// ```
/// use wiretype::Reflect;
///
/// #[derive(Clone, Copy, Reflect)]
/// #[repr(C)]
/// pub struct Sample {
///     pub id: u32,
///     pub value: f64,
/// }
///
/// let mut s = Sample { id: 7, value: 1.5 };
/// assert_eq!(*wiretype::get::<0, _>(&s), 7);
/// *wiretype::get_mut::<1, _>(&mut s) = 2.5;
/// assert_eq!(s.value, 2.5);
/// ```
pub fn get<const I: usize, T: FieldAt<I>>(value: &T) -> &T::Type {
    value.get()
}

/// Mutable reference to field `I` of `value`.
pub fn get_mut<const I: usize, T: FieldAt<I>>(value: &mut T) -> &mut T::Type {
    value.get_mut()
}
