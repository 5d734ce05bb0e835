// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # wiretype - layout descriptors for plain Rust structs
//!
//! Derives, for a plain `#[repr(C)]` struct, its field table (count, shape,
//! true byte offsets) and from it a committed wire-layout descriptor that
//! a messaging transport uses to move instances with their exact in-memory
//! layout, padding included. No hand-written per-field descriptors.
//!
//! ## Quick Start
//!
//! ```rust
//! use wiretype::{Layout, LocalTransport, Reflect, Synthesizer};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Reflect, Layout)]
//! #[repr(C)]
//! pub struct Reading {
//!     pub sensor: u16,
//!     pub samples: [f32; 3],
//!     pub timestamp: f64,
//! }
//!
//! fn main() -> wiretype::Result<()> {
//!     let synth = Synthesizer::new(LocalTransport::new());
//!
//!     let datatype = synth.datatype::<Reading>()?;
//!     assert_eq!(datatype.extent().size, std::mem::size_of::<Reading>());
//!
//!     let src = [Reading { sensor: 3, samples: [0.5, 1.5, 2.5], timestamp: 12.0 }];
//!     let mut dst = [Reading { sensor: 0, samples: [0.0; 3], timestamp: 0.0 }];
//!     synth.transfer(&src, &mut dst)?;
//!     assert_eq!(src, dst);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! #[derive(Reflect)]  -> FIELD_COUNT, FIELD_SHAPES, field_offset, FieldAt<I>, visit
//!          |
//! #[derive(Layout)]   -> SHAPE, describe
//!          |
//! Synthesizer<Tr>     -> leaf | predefined pair | strided array | resized composite
//!          |             (committed once per type, cached in the transport)
//! Transport           -> runtime datatype constructors (LocalTransport in process)
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Reflect`] | Field table of a plain struct |
//! | [`Layout`] | Allow-list of types with a wire layout |
//! | [`Synthesizer`] | Builds and caches committed descriptors |
//! | [`Transport`] | Datatype constructors of a messaging runtime |
//! | [`LocalTransport`] | In-process transport with pack/unpack |
//!
//! ## Rejected at compile time
//!
//! `bool` fields have no wire type:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! #[repr(C)]
//! pub struct Flags {
//!     pub ready: bool,
//! }
//! ```
//!
//! More than [`MAX_FIELDS`] fields:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! #[repr(C)]
//! pub struct Wide(
//!     pub u8, pub u8, pub u8, pub u8, pub u8, pub u8, pub u8,
//!     pub u8, pub u8, pub u8, pub u8, pub u8, pub u8,
//! );
//! ```
//!
//! Private fields:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! #[repr(C)]
//! pub struct Hidden {
//!     pub id: u32,
//!     secret: u32,
//! }
//! ```
//!
//! Structs without a stable layout:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! pub struct Unordered {
//!     pub a: u8,
//!     pub b: u64,
//! }
//! ```
//!
//! Arrays of rank 3:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! #[repr(C)]
//! pub struct Cube {
//!     pub cells: [[[f32; 2]; 2]; 2],
//! }
//! ```
//!
//! A struct without fields can be reflected but has no wire layout:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect, wiretype::Layout)]
//! #[repr(C)]
//! pub struct Nothing;
//! ```
//!
//! Enums:
//!
//! ```compile_fail
//! #[derive(Clone, Copy, wiretype::Reflect)]
//! #[repr(C)]
//! pub enum Mode {
//!     On,
//!     Off,
//! }
//! ```

// Allow the derive macros to work inside this crate's tests
extern crate self as wiretype;

pub mod config;
pub mod error;
pub mod layout;
pub mod reflect;
pub mod synth;
pub mod transport;
pub mod types;

pub use config::{LocalConfig, SynthConfig, MAX_FIELDS, MAX_RANK};
pub use error::{Error, Result, TransportError};
pub use layout::Layout;
pub use reflect::{
    get, get_mut, ElementKind, FieldAt, FieldDescriptor, FieldShape, FieldVisitor,
    FieldVisitorMut, Reflect,
};
pub use synth::{DescriptorCache, LookupStats, Synthesizer};
pub use transport::{Block, Datatype, Extent, LocalStats, LocalTransport, Member, Transport};
pub use types::{Byte, Complex, LeafTag, LongDouble, Primitive};

// Derive macros (for #[derive(wiretype::Reflect, wiretype::Layout)])
pub use wiretype_codegen::{Layout, Reflect};
