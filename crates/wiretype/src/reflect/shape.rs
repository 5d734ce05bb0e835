// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field shape: element kind, array rank and extents.

use crate::config::MAX_RANK;
use crate::types::Primitive;
use std::fmt;

/// What a field (or each element of an array field) is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Primitive(Primitive),
    /// [`Complex`](crate::Complex) with components of the given float.
    Complex(Primitive),
    /// Two-element tuple.
    Pair,
    /// Reflected struct, by declared name.
    Struct(&'static str),
}

/// Shape of a field: `rank` 0 is a scalar, 1 `[E; K]`, 2 `[[E; C]; R]`.
///
/// Built in `const` context from the field type, so an unsupported rank
/// or a zero extent is a compile error, never a runtime one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldShape {
    element: ElementKind,
    rank: u8,
    extents: [usize; MAX_RANK],
}

impl FieldShape {
    pub const fn scalar(element: ElementKind) -> Self {
        Self {
            element,
            rank: 0,
            extents: [0; MAX_RANK],
        }
    }

    /// Shape of `[Self; extent]`: `extent` becomes the outermost dimension.
    pub const fn wrap(self, extent: usize) -> Self {
        assert!(
            (self.rank as usize) < MAX_RANK,
            "array fields of rank above 2 are not supported"
        );
        assert!(extent > 0, "zero-length array fields are not supported");

        let mut extents = [0; MAX_RANK];
        extents[0] = extent;
        let mut i = 0;
        while i < self.rank as usize {
            extents[i + 1] = self.extents[i];
            i += 1;
        }
        Self {
            element: self.element,
            rank: self.rank + 1,
            extents,
        }
    }

    pub const fn element(&self) -> ElementKind {
        self.element
    }

    pub const fn rank(&self) -> usize {
        self.rank as usize
    }

    pub const fn is_scalar(&self) -> bool {
        self.rank == 0
    }

    /// Declared bounds, outermost first. Empty for scalars.
    pub fn extents(&self) -> &[usize] {
        &self.extents[..self.rank as usize]
    }

    /// Number of innermost elements (product of extents, 1 for scalars).
    pub const fn element_count(&self) -> usize {
        let mut count = 1;
        let mut i = 0;
        while i < self.rank as usize {
            count *= self.extents[i];
            i += 1;
        }
        count
    }
}

impl fmt::Debug for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldShape")
            .field("element", &self.element)
            .field("extents", &self.extents())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F32: FieldShape = FieldShape::scalar(ElementKind::Primitive(Primitive::Float32));

    #[test]
    fn wrap_prepends_outer_extent() {
        let row = F32.wrap(3);
        let grid = row.wrap(2);
        assert_eq!(row.extents(), &[3]);
        assert_eq!(grid.extents(), &[2, 3]);
        assert_eq!(grid.rank(), 2);
        assert_eq!(grid.element_count(), 6);
        assert_eq!(grid.element(), ElementKind::Primitive(Primitive::Float32));
    }

    #[test]
    fn scalar_has_no_extents() {
        assert!(F32.is_scalar());
        assert!(F32.extents().is_empty());
        assert_eq!(F32.element_count(), 1);
    }

    #[test]
    #[should_panic(expected = "rank above 2")]
    fn rank_three_is_rejected() {
        let _ = F32.wrap(2).wrap(2).wrap(2);
    }
}
