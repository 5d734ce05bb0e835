// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scalar types with no native Rust counterpart.

use std::fmt;

/// Extended precision float (C `long double`), carried as opaque bytes.
///
/// Rust has no stable extended float, so the value is never interpreted
/// here: it is moved bit for bit. Size and alignment follow the x86-64 and
/// AArch64 ABIs (16 bytes, 16-byte aligned).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(C, align(16))]
pub struct LongDouble(pub [u8; 16]);

impl LongDouble {
    pub const ZERO: LongDouble = LongDouble([0; 16]);

    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Debug for LongDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LongDouble(0x")?;
        for byte in self.0.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

/// Opaque byte. Unlike `u8` it maps to the untyped byte wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Byte(pub u8);

impl From<u8> for Byte {
    fn from(value: u8) -> Self {
        Byte(value)
    }
}

impl From<Byte> for u8 {
    fn from(value: Byte) -> Self {
        value.0
    }
}

/// Complex number laid out as C `_Complex` (`re` then `im`).
///
/// Only `f32`, `f64` and [`LongDouble`] components have a wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn complex_is_two_packed_components() {
        assert_eq!(size_of::<Complex<f32>>(), 8);
        assert_eq!(size_of::<Complex<f64>>(), 16);
        assert_eq!(size_of::<Complex<LongDouble>>(), 32);
        assert_eq!(std::mem::offset_of!(Complex<f64>, im), 8);
    }

    #[test]
    fn long_double_is_sixteen_aligned() {
        assert_eq!(size_of::<LongDouble>(), 16);
        assert_eq!(align_of::<LongDouble>(), 16);
        let value = LongDouble::from_bytes([1; 16]);
        assert_eq!(value.to_bytes(), [1; 16]);
        assert_eq!(format!("{:?}", LongDouble::ZERO), format!("LongDouble(0x{})", "0".repeat(32)));
    }
}
