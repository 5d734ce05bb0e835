// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Primitive wire types.

use std::fmt;

/// Indivisible scalar understood by every transport.
///
/// Each variant has a fixed size and alignment. The Rust mapping is:
///
/// | variant | Rust type |
/// |---------|-----------|
/// | `Int8` .. `UInt64` | `i8` .. `u64` (`isize`/`usize` by pointer width) |
/// | `Float32`, `Float64` | `f32`, `f64` |
/// | `LongDouble` | [`LongDouble`](crate::LongDouble) |
/// | `WChar` | `char` |
/// | `Byte` | [`Byte`](crate::Byte) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Primitive {
    Int8 = 0x01,
    UInt8 = 0x02,
    Int16 = 0x03,
    UInt16 = 0x04,
    Int32 = 0x05,
    UInt32 = 0x06,
    Int64 = 0x07,
    UInt64 = 0x08,
    Float32 = 0x09,
    Float64 = 0x0A,
    /// Extended precision float, stored as 16 opaque bytes.
    LongDouble = 0x0B,
    /// Wide character (32-bit Unicode scalar value).
    WChar = 0x0C,
    /// Opaque byte, never interpreted.
    Byte = 0x0D,
}

impl Primitive {
    /// Every primitive, in tag order.
    pub const ALL: [Primitive; 13] = [
        Primitive::Int8,
        Primitive::UInt8,
        Primitive::Int16,
        Primitive::UInt16,
        Primitive::Int32,
        Primitive::UInt32,
        Primitive::Int64,
        Primitive::UInt64,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::LongDouble,
        Primitive::WChar,
        Primitive::Byte,
    ];

    /// Size in bytes.
    pub const fn size(self) -> usize {
        match self {
            Primitive::Int8 | Primitive::UInt8 | Primitive::Byte => 1,
            Primitive::Int16 | Primitive::UInt16 => 2,
            Primitive::Int32 | Primitive::UInt32 | Primitive::Float32 | Primitive::WChar => 4,
            Primitive::Int64 | Primitive::UInt64 | Primitive::Float64 => 8,
            Primitive::LongDouble => 16,
        }
    }

    /// Natural alignment in bytes.
    pub const fn alignment(self) -> usize {
        // Every primitive is naturally aligned to its own size.
        self.size()
    }

    /// Wire name used in logs and diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Int8 => "INT8",
            Primitive::UInt8 => "UINT8",
            Primitive::Int16 => "INT16",
            Primitive::UInt16 => "UINT16",
            Primitive::Int32 => "INT32",
            Primitive::UInt32 => "UINT32",
            Primitive::Int64 => "INT64",
            Primitive::UInt64 => "UINT64",
            Primitive::Float32 => "FLOAT32",
            Primitive::Float64 => "FLOAT64",
            Primitive::LongDouble => "LONG_DOUBLE",
            Primitive::WChar => "WCHAR",
            Primitive::Byte => "BYTE",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
