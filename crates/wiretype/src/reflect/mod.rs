// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural reflection for plain structs.
//!
//! `#[derive(Reflect)]` emits, once per type, the field table this module
//! exposes: field count, per-field shape, true byte offset and size, typed
//! positional accessors and ordered visitation. Everything is derived from
//! the declaration and the compiler's own layout (`offset_of!`), so the
//! offsets include padding exactly as the compiler inserted it.

pub mod access;
pub mod shape;
pub mod visit;

pub use access::{get, get_mut, FieldAt};
pub use shape::{ElementKind, FieldShape};
pub use visit::{FieldVisitor, FieldVisitorMut};

use crate::error::Result;
use crate::synth::Synthesizer;
use crate::transport::Transport;

/// Position, shape and placement of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub index: usize,
    pub shape: FieldShape,
    /// Byte offset from the start of the struct.
    pub offset: usize,
    /// `size_of` the field type.
    pub size: usize,
}

impl FieldDescriptor {
    pub const fn new(index: usize, shape: FieldShape, offset: usize, size: usize) -> Self {
        Self {
            index,
            shape,
            offset,
            size,
        }
    }

    /// First byte past the field.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Field table of a plain struct.
///
/// Use `#[derive(Reflect)]`; the derive only accepts `#[repr(C)]` (or
/// `#[repr(transparent)]`) structs whose fields are all `pub`, at most
/// [`MAX_FIELDS`](crate::MAX_FIELDS) of them, each with a [`Layout`](crate::Layout).
///
/// # Safety
///
/// `field_offset` and `field_size` must report the real placement of every
/// field, and `FIELD_SHAPES` their real types. Descriptors synthesized from
/// this table are used to read and write raw memory.
pub unsafe trait Reflect: Sized + 'static {
    /// Declared type name.
    const TYPE_NAME: &'static str;

    /// Number of fields.
    const FIELD_COUNT: usize;

    /// Shape of every field, in declaration order.
    const FIELD_SHAPES: &'static [FieldShape];

    fn field_offset(index: usize) -> Option<usize>;

    fn field_size(index: usize) -> Option<usize>;

    /// Descriptor of the innermost element of field `index`.
    fn describe_field<Tr: Transport>(
        index: usize,
        synth: &Synthesizer<Tr>,
    ) -> Option<Result<Tr::Handle>>;

    /// Call `visitor` once per field, in ascending index order.
    fn visit<V: FieldVisitor + ?Sized>(&self, visitor: &mut V);

    /// Call `visitor` once per field with mutable access.
    fn visit_mut<V: FieldVisitorMut + ?Sized>(&mut self, visitor: &mut V);

    fn field_shape(index: usize) -> Option<FieldShape> {
        Self::FIELD_SHAPES.get(index).copied()
    }

    fn field(index: usize) -> Option<FieldDescriptor> {
        Some(FieldDescriptor::new(
            index,
            Self::field_shape(index)?,
            Self::field_offset(index)?,
            Self::field_size(index)?,
        ))
    }

    fn fields() -> Vec<FieldDescriptor> {
        (0..Self::FIELD_COUNT).filter_map(Self::field).collect()
    }
}
