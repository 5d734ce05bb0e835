// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field visitors.
//!
//! A visitor offers one operation per field shape. `Reflect::visit` calls
//! exactly one of them per field, in ascending index order, and never stops
//! early. Which operation is called follows the field's type, not its
//! spelling: a field declared through a type alias of `[f32; 3]` still goes
//! to [`FieldVisitor::array`].

use super::FieldDescriptor;
use crate::layout::Layout;

/// Read-only visitor.
pub trait FieldVisitor {
    /// Rank-0 field (primitive, complex, pair or nested struct).
    fn scalar<F: Layout>(&mut self, field: &FieldDescriptor, value: &F);

    /// Rank-1 field `[F; N]`.
    fn array<F: Layout, const N: usize>(&mut self, field: &FieldDescriptor, value: &[F; N]);

    /// Rank-2 field `[[F; C]; R]`.
    fn matrix<F: Layout, const R: usize, const C: usize>(
        &mut self,
        field: &FieldDescriptor,
        value: &[[F; C]; R],
    );
}

/// Visitor allowed to modify fields in place.
pub trait FieldVisitorMut {
    fn scalar<F: Layout>(&mut self, field: &FieldDescriptor, value: &mut F);

    fn array<F: Layout, const N: usize>(&mut self, field: &FieldDescriptor, value: &mut [F; N]);

    fn matrix<F: Layout, const R: usize, const C: usize>(
        &mut self,
        field: &FieldDescriptor,
        value: &mut [[F; C]; R],
    );
}
