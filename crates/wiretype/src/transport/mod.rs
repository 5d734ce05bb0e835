// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boundary with the messaging runtime that moves typed data.
//!
//! The synthesizer only needs a handful of datatype constructors from the
//! runtime; [`Transport`] is that narrow API. A binding for an external
//! runtime implements it over the runtime's native handles; the
//! in-process [`LocalTransport`] implements it over [`Datatype`] trees.
//!
//! # Implementations
//!
//! - `LocalTransport` - reference implementation with pack/unpack

pub mod datatype;
pub mod local;

pub use datatype::{Datatype, Member};
pub use local::{LocalStats, LocalTransport};

use crate::error::TransportError;
use crate::synth::DescriptorCache;
use crate::types::LeafTag;
use std::sync::Arc;

/// Memory footprint of a descriptor, as the runtime reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub lower_bound: isize,
    pub size: usize,
}

impl Extent {
    pub const fn new(lower_bound: isize, size: usize) -> Self {
        Self { lower_bound, size }
    }
}

/// One `(count, displacement, element)` entry of a composite descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<H> {
    /// Consecutive elements, each `extent(element)` apart.
    pub count: usize,
    /// Byte offset of the first element.
    pub displacement: isize,
    pub element: H,
}

impl<H> Block<H> {
    pub fn new(count: usize, displacement: isize, element: H) -> Self {
        Self {
            count,
            displacement,
            element,
        }
    }
}

/// Datatype constructors of a messaging runtime.
///
/// Every fallible call returns the runtime's failure as a
/// [`TransportError`]; callers propagate it as is.
pub trait Transport: Send + Sync {
    /// Runtime datatype handle. Cloning must be cheap and preserve identity.
    type Handle: Clone + Send + Sync + 'static;

    /// Committed descriptors derived over this transport instance.
    ///
    /// Every [`Synthesizer`](crate::Synthesizer) over the same instance
    /// reads and fills this one cache, so a type is built and committed once
    /// per transport no matter how many synthesizers share it.
    fn cache(&self) -> &DescriptorCache<Self::Handle>;

    /// Predefined handle for a leaf tag. Always committed.
    fn leaf(&self, tag: LeafTag) -> Self::Handle;

    /// Assemble a composite from `(count, displacement, element)` blocks.
    fn create_composite(
        &self,
        blocks: &[Block<Self::Handle>],
    ) -> Result<Self::Handle, TransportError>;

    /// `count` blocks of `block_len` contiguous elements, block starts
    /// `stride` bytes apart.
    fn create_strided(
        &self,
        count: usize,
        block_len: usize,
        stride: isize,
        element: &Self::Handle,
    ) -> Result<Self::Handle, TransportError>;

    fn extent(&self, handle: &Self::Handle) -> Result<Extent, TransportError>;

    /// Same element layout with a new extent.
    fn resize(
        &self,
        handle: &Self::Handle,
        lower_bound: isize,
        size: usize,
    ) -> Result<Self::Handle, TransportError>;

    /// Finalize for use in transfers.
    fn commit(&self, handle: &Self::Handle) -> Result<Self::Handle, TransportError>;
}

impl<T: Transport> Transport for Arc<T> {
    type Handle = T::Handle;

    fn cache(&self) -> &DescriptorCache<Self::Handle> {
        (**self).cache()
    }

    fn leaf(&self, tag: LeafTag) -> Self::Handle {
        (**self).leaf(tag)
    }

    fn create_composite(
        &self,
        blocks: &[Block<Self::Handle>],
    ) -> Result<Self::Handle, TransportError> {
        (**self).create_composite(blocks)
    }

    fn create_strided(
        &self,
        count: usize,
        block_len: usize,
        stride: isize,
        element: &Self::Handle,
    ) -> Result<Self::Handle, TransportError> {
        (**self).create_strided(count, block_len, stride, element)
    }

    fn extent(&self, handle: &Self::Handle) -> Result<Extent, TransportError> {
        (**self).extent(handle)
    }

    fn resize(
        &self,
        handle: &Self::Handle,
        lower_bound: isize,
        size: usize,
    ) -> Result<Self::Handle, TransportError> {
        (**self).resize(handle, lower_bound, size)
    }

    fn commit(&self, handle: &Self::Handle) -> Result<Self::Handle, TransportError> {
        (**self).commit(handle)
    }
}
