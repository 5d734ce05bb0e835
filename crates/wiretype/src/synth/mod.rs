// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Layout descriptor synthesis.
//!
//! [`Synthesizer::datatype`] is the entry point: it returns the committed
//! transport descriptor of any [`Layout`] type, building it on first use.
//!
//! | type | descriptor |
//! |------|------------|
//! | primitive | predefined leaf |
//! | `Complex<_>` | predefined complex leaf |
//! | predefined pair layout | predefined pair leaf |
//! | `[E; K]`, `[[E; C]; R]` | one strided block of all innermost elements |
//! | struct / other tuple | composite, resized to `size_of::<T>()` |
//!
//! Derived descriptors are committed and cached once per type in the
//! transport's [`DescriptorCache`], so synthesizers sharing a transport
//! share its descriptors.

pub mod cache;

pub use cache::{DescriptorCache, LookupStats};

use crate::config::SynthConfig;
use crate::error::{Error, Result, TransportError};
use crate::layout::{pairs, Layout};
use crate::reflect::Reflect;
use crate::transport::{Block, Datatype, Extent, LocalTransport, Transport};
use crate::types::LeafTag;
use core::mem::size_of;
use core::slice;

/// Builds committed descriptors on top of a [`Transport`] and caches them
/// in the transport.
pub struct Synthesizer<Tr: Transport> {
    transport: Tr,
    config: SynthConfig,
}

impl<Tr: Transport> Synthesizer<Tr> {
    pub fn new(transport: Tr) -> Self {
        Self::with_config(transport, SynthConfig::default())
    }

    pub fn with_config(transport: Tr, config: SynthConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn stats(&self) -> LookupStats {
        self.transport.cache().stats()
    }

    /// Descriptors currently cached.
    pub fn cached_types(&self) -> usize {
        self.transport.cache().len()
    }

    /// Committed descriptor of `T`.
    ///
    /// Repeated calls return the same handle. Transport failures are
    /// returned unchanged and nothing is cached for them.
    pub fn datatype<T: Layout>(&self) -> Result<Tr::Handle> {
        T::describe(self)
    }

    /// Predefined handle for `tag`.
    pub fn leaf(&self, tag: LeafTag) -> Tr::Handle {
        self.transport.leaf(tag)
    }

    /// Descriptor of a reflected two-or-more-field type: a predefined pair
    /// when the layout matches one, otherwise a resized composite.
    pub fn composite<T: Reflect>(&self) -> Result<Tr::Handle> {
        if let Some(tag) = pairs::match_pair::<T>() {
            log::trace!("[synth] {} -> {}", T::TYPE_NAME, tag);
            return Ok(self.transport.leaf(tag));
        }
        self.transport
            .cache()
            .get_or_try_build::<T, Error, _>(|| self.build_composite::<T>())
    }

    /// Descriptor of an array type: one block of every innermost element,
    /// stride `size_of::<A>()`.
    pub fn strided<A: Layout>(&self) -> Result<Tr::Handle> {
        self.transport.cache().get_or_try_build::<A, Error, _>(|| {
            let element = self.datatype::<A::Element>()?;
            let count = A::SHAPE.element_count();
            log::debug!(
                "[synth] building array {:?} ({} elements)",
                A::SHAPE,
                count
            );
            let stride = isize::try_from(size_of::<A>())
                .map_err(|_| invalid("array size overflows isize".into()))?;
            let handle = self.transport.create_strided(1, count, stride, &element)?;
            self.finalize(handle, "array", size_of::<A>())
        })
    }

    fn build_composite<T: Reflect>(&self) -> Result<Tr::Handle> {
        log::debug!(
            "[synth] building {} ({} fields, {} bytes)",
            T::TYPE_NAME,
            T::FIELD_COUNT,
            size_of::<T>()
        );

        let mut blocks = Vec::with_capacity(T::FIELD_COUNT);
        for field in T::fields() {
            let element = T::describe_field(field.index, self).ok_or_else(|| {
                invalid(format!("{} has no field {}", T::TYPE_NAME, field.index))
            })??;
            let displacement = isize::try_from(field.offset).map_err(|_| {
                invalid(format!("{} field {} offset overflows", T::TYPE_NAME, field.index))
            })?;
            blocks.push(Block::new(
                field.shape.element_count(),
                displacement,
                element,
            ));
        }

        let handle = self.transport.create_composite(&blocks)?;
        self.finalize(handle, T::TYPE_NAME, size_of::<T>())
    }

    /// Correct the extent to `(0, size)` if needed, then commit.
    fn finalize(&self, handle: Tr::Handle, type_name: &'static str, size: usize) -> Result<Tr::Handle> {
        let expected = Extent::new(0, size);
        let extent = self.transport.extent(&handle)?;

        let handle = if extent == expected {
            handle
        } else {
            log::debug!(
                "[synth] resizing {}: extent {:?} -> {:?}",
                type_name,
                extent,
                expected
            );
            let resized = self.transport.resize(&handle, 0, size)?;
            if self.config.verify_extent {
                let actual = self.transport.extent(&resized)?;
                if actual != expected {
                    return Err(Error::ExtentMismatch {
                        type_name,
                        expected: size,
                        actual,
                    });
                }
            }
            resized
        };

        Ok(self.transport.commit(&handle)?)
    }
}

fn invalid(message: String) -> Error {
    Error::Transport(TransportError::InvalidArgument(message))
}

/// Safe data movement over the in-process transport.
impl Synthesizer<LocalTransport> {
    /// Pack `values` into wire bytes.
    pub fn send<T: Layout>(&self, values: &[T]) -> Result<Vec<u8>> {
        let handle = self.checked_datatype::<T>()?;
        let len = self.transport.packed_len(&handle, values.len())?;
        let mut wire = vec![0u8; len];
        // SAFETY: the descriptor of `T` covers only initialized data bytes
        // of `T` and its extent is `size_of::<T>()`.
        unsafe {
            self.transport
                .pack(&handle, values.as_ptr().cast(), values.len(), &mut wire)?;
        }
        Ok(wire)
    }

    /// Unpack wire bytes into `values`, filling every slot. Returns the
    /// number of bytes consumed.
    pub fn recv<T: Layout>(&self, wire: &[u8], values: &mut [T]) -> Result<usize> {
        let handle = self.checked_datatype::<T>()?;
        // SAFETY: as in `send`; every primitive the descriptor writes
        // accepts all bit patterns except `char`, which unpack validates.
        let read = unsafe {
            self.transport
                .unpack(&handle, wire, values.as_mut_ptr().cast(), values.len())?
        };
        Ok(read)
    }

    /// Send `src` and receive it into `dst`.
    pub fn transfer<T: Layout>(&self, src: &[T], dst: &mut [T]) -> Result<()> {
        if src.len() != dst.len() {
            return Err(Error::LengthMismatch {
                source_len: src.len(),
                dest_len: dst.len(),
            });
        }
        let wire = self.send(src)?;
        self.recv(&wire, dst)?;
        Ok(())
    }

    /// Send a single value.
    pub fn send_one<T: Layout>(&self, value: &T) -> Result<Vec<u8>> {
        self.send(slice::from_ref(value))
    }

    fn checked_datatype<T: Layout>(&self) -> Result<Datatype> {
        let handle = self.datatype::<T>()?;
        let extent = handle.extent();
        if extent != Extent::new(0, size_of::<T>()) {
            return Err(TransportError::LayoutMismatch {
                expected: size_of::<T>(),
                actual: extent,
            }
            .into());
        }
        Ok(handle)
    }
}
