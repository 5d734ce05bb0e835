// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process reference transport.
//!
//! Implements [`Transport`] over [`Datatype`] trees and moves data with
//! `pack`/`unpack`. The wire form of one element is the bytes of every
//! primitive in type-map order, native endianness, padding skipped.
//!
//! Leaf handles are created once per transport, so the same leaf tag
//! always yields the same handle identity. The transport also owns the
//! descriptor cache, so derived descriptors have one identity per
//! transport as well.

use super::datatype::{Datatype, Member};
use super::{Block, Extent, Transport};
use crate::config::LocalConfig;
use crate::error::TransportError;
use crate::synth::DescriptorCache;
use crate::types::{LeafTag, Primitive, LEAF_TAG_COUNT};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Transport counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocalStats {
    /// Derived descriptors created (composite, strided, resized).
    pub types_created: usize,
    /// Descriptors committed for the first time (leaves excluded).
    pub commits: usize,
    /// Wire bytes produced by `pack`.
    pub bytes_packed: u64,
    /// Wire bytes consumed by `unpack`.
    pub bytes_unpacked: u64,
}

#[derive(Default)]
struct Counters {
    types_created: AtomicUsize,
    commits: AtomicUsize,
    bytes_packed: AtomicU64,
    bytes_unpacked: AtomicU64,
}

/// Reference transport keeping descriptors in memory.
pub struct LocalTransport {
    leaves: Vec<Datatype>,
    next_id: AtomicU64,
    counters: Counters,
    cache: DescriptorCache<Datatype>,
    config: LocalConfig,
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::with_config(LocalConfig::default())
    }

    pub fn with_config(config: LocalConfig) -> Self {
        let leaves = LeafTag::ALL
            .iter()
            .map(|&tag| Datatype::leaf(tag.index() as u64, tag))
            .collect();
        log::debug!(
            "[local] transport ready ({} leaf types, max_types={})",
            LEAF_TAG_COUNT,
            config.max_types
        );
        Self {
            leaves,
            next_id: AtomicU64::new(LEAF_TAG_COUNT as u64),
            counters: Counters::default(),
            cache: DescriptorCache::new(config.cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    pub fn stats(&self) -> LocalStats {
        LocalStats {
            types_created: self.counters.types_created.load(Ordering::Relaxed),
            commits: self.counters.commits.load(Ordering::Relaxed),
            bytes_packed: self.counters.bytes_packed.load(Ordering::Relaxed),
            bytes_unpacked: self.counters.bytes_unpacked.load(Ordering::Relaxed),
        }
    }

    /// Claim an id for a new derived descriptor, honouring `max_types`.
    fn allocate(&self) -> Result<u64, TransportError> {
        let limit = self.config.max_types;
        self.counters
            .types_created
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then_some(n + 1)
            })
            .map_err(|_| {
                log::warn!("[local] descriptor limit reached ({limit})");
                TransportError::ResourceExhausted { limit }
            })?;
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn committed_map<'a>(&self, handle: &'a Datatype) -> Result<&'a [Member], TransportError> {
        handle
            .type_map()
            .ok_or(TransportError::NotCommitted { id: handle.id() })
    }

    /// Wire bytes needed for `count` elements of `handle`.
    pub fn packed_len(&self, handle: &Datatype, count: usize) -> Result<usize, TransportError> {
        let map = self.committed_map(handle)?;
        let per_element: usize = map.iter().map(Member::len).sum();
        per_element.checked_mul(count).ok_or_else(|| {
            TransportError::InvalidArgument(format!("{count} elements overflow the wire size"))
        })
    }

    /// Serialize `count` elements starting at `src` into `out`.
    ///
    /// Element `i` is read at `src + i * extent.size`. Returns the number
    /// of bytes written.
    ///
    /// # Safety
    ///
    /// `src` must point to `count` consecutive elements laid out as
    /// `handle` describes, and every byte the type map covers must be
    /// initialized.
    pub unsafe fn pack(
        &self,
        handle: &Datatype,
        src: *const u8,
        count: usize,
        out: &mut [u8],
    ) -> Result<usize, TransportError> {
        let needed = self.packed_len(handle, count)?;
        if out.len() < needed {
            return Err(TransportError::BufferTooSmall {
                needed,
                available: out.len(),
            });
        }
        let map = self.committed_map(handle)?;
        let stride = handle.extent().size;

        let mut pos = 0;
        for i in 0..count {
            // SAFETY: caller guarantees `count` elements of `stride` bytes.
            let base = unsafe { src.add(i * stride) };
            for member in map {
                let len = member.len();
                // SAFETY: type map offsets stay within the element.
                let from = unsafe { base.offset(member.offset) };
                let to = &mut out[pos..pos + len];
                unsafe { std::ptr::copy_nonoverlapping(from, to.as_mut_ptr(), len) };
                pos += len;
            }
        }

        self.counters
            .bytes_packed
            .fetch_add(pos as u64, Ordering::Relaxed);
        Ok(pos)
    }

    /// Deserialize `count` elements from `input` into memory at `dst`.
    ///
    /// Wide characters are validated before anything is written, so a
    /// failed call leaves the destination untouched. Returns the number of
    /// bytes consumed.
    ///
    /// # Safety
    ///
    /// `dst` must point to `count` consecutive writable elements laid out
    /// as `handle` describes.
    pub unsafe fn unpack(
        &self,
        handle: &Datatype,
        input: &[u8],
        dst: *mut u8,
        count: usize,
    ) -> Result<usize, TransportError> {
        let needed = self.packed_len(handle, count)?;
        if input.len() < needed {
            return Err(TransportError::Truncated {
                needed,
                available: input.len(),
            });
        }
        let map = self.committed_map(handle)?;
        validate(map, &input[..needed], count)?;
        let stride = handle.extent().size;

        let mut pos = 0;
        for i in 0..count {
            // SAFETY: caller guarantees `count` elements of `stride` bytes.
            let base = unsafe { dst.add(i * stride) };
            for member in map {
                let len = member.len();
                let from = &input[pos..pos + len];
                // SAFETY: type map offsets stay within the element.
                unsafe {
                    std::ptr::copy_nonoverlapping(from.as_ptr(), base.offset(member.offset), len)
                };
                pos += len;
            }
        }

        self.counters
            .bytes_unpacked
            .fetch_add(pos as u64, Ordering::Relaxed);
        Ok(pos)
    }
}

/// Reject wire bytes that would not form valid values.
fn validate(map: &[Member], input: &[u8], count: usize) -> Result<(), TransportError> {
    if !map.iter().any(|m| m.primitive == Primitive::WChar) {
        return Ok(());
    }
    let mut pos = 0;
    for _ in 0..count {
        for member in map {
            if member.primitive != Primitive::WChar {
                pos += member.len();
                continue;
            }
            for _ in 0..member.count {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&input[pos..pos + 4]);
                let code = u32::from_ne_bytes(raw);
                if char::from_u32(code).is_none() {
                    return Err(TransportError::InvalidData {
                        offset: pos,
                        reason: format!("{code:#x} is not a Unicode scalar value"),
                    });
                }
                pos += 4;
            }
        }
    }
    Ok(())
}

impl Transport for LocalTransport {
    type Handle = Datatype;

    fn cache(&self) -> &DescriptorCache<Datatype> {
        &self.cache
    }

    fn leaf(&self, tag: LeafTag) -> Datatype {
        self.leaves[tag.index()].clone()
    }

    fn create_composite(&self, blocks: &[Block<Datatype>]) -> Result<Datatype, TransportError> {
        if blocks.is_empty() {
            return Err(TransportError::InvalidArgument(
                "composite descriptor needs at least one block".into(),
            ));
        }
        let id = self.allocate()?;
        let datatype = Datatype::composite(id, blocks)?;
        log::trace!(
            "[local] composite #{} ({} blocks, extent {:?})",
            id,
            blocks.len(),
            datatype.extent()
        );
        Ok(datatype)
    }

    fn create_strided(
        &self,
        count: usize,
        block_len: usize,
        stride: isize,
        element: &Datatype,
    ) -> Result<Datatype, TransportError> {
        let id = self.allocate()?;
        let datatype = Datatype::strided(id, count, block_len, stride, element)?;
        log::trace!(
            "[local] strided #{} ({}x{} stride {}, extent {:?})",
            id,
            count,
            block_len,
            stride,
            datatype.extent()
        );
        Ok(datatype)
    }

    fn extent(&self, handle: &Datatype) -> Result<Extent, TransportError> {
        Ok(handle.extent())
    }

    fn resize(
        &self,
        handle: &Datatype,
        lower_bound: isize,
        size: usize,
    ) -> Result<Datatype, TransportError> {
        if isize::try_from(size)
            .ok()
            .and_then(|s| lower_bound.checked_add(s))
            .is_none()
        {
            return Err(TransportError::InvalidArgument(format!(
                "resize to ({lower_bound}, {size}) overflows"
            )));
        }
        let id = self.allocate()?;
        log::trace!(
            "[local] resize #{} -> #{} ({:?} -> ({}, {}))",
            handle.id(),
            id,
            handle.extent(),
            lower_bound,
            size
        );
        Ok(Datatype::resized(id, handle, lower_bound, size))
    }

    fn commit(&self, handle: &Datatype) -> Result<Datatype, TransportError> {
        if handle.commit() {
            self.counters.commits.fetch_add(1, Ordering::Relaxed);
            log::trace!("[local] commit #{}", handle.id());
        }
        Ok(handle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(p: Primitive) -> LeafTag {
        LeafTag::Primitive(p)
    }

    #[test]
    fn leaves_keep_their_identity() {
        let transport = LocalTransport::new();
        let a = transport.leaf(LeafTag::FloatInt);
        let b = transport.leaf(LeafTag::FloatInt);
        assert_eq!(a, b);
        assert_ne!(a, transport.leaf(LeafTag::DoubleInt));
        assert_eq!(a.leaf_tag(), Some(LeafTag::FloatInt));
        assert_eq!(transport.stats(), LocalStats::default());
    }

    #[test]
    fn descriptor_limit_is_enforced() {
        let transport = LocalTransport::with_config(LocalConfig::default().max_types(2));
        let int = transport.leaf(prim(Primitive::Int32));
        let blocks = [Block::new(1, 0, int.clone())];

        transport.create_composite(&blocks).expect("first");
        transport.create_strided(1, 4, 16, &int).expect("second");
        let err = transport.create_composite(&blocks).unwrap_err();
        assert_eq!(err, TransportError::ResourceExhausted { limit: 2 });
        assert_eq!(transport.stats().types_created, 2);
    }

    #[test]
    fn uncommitted_handles_cannot_move_data() {
        let transport = LocalTransport::new();
        let int = transport.leaf(prim(Primitive::Int32));
        let dt = transport
            .create_composite(&[Block::new(2, 0, int)])
            .expect("composite");

        let value = [1i32, 2];
        let mut out = [0u8; 8];
        let err = unsafe { transport.pack(&dt, value.as_ptr().cast(), 1, &mut out) }.unwrap_err();
        assert_eq!(err, TransportError::NotCommitted { id: dt.id() });

        let committed = transport.commit(&dt).expect("commit");
        transport.commit(&committed).expect("recommit");
        assert_eq!(transport.stats().commits, 1);
        let written =
            unsafe { transport.pack(&committed, value.as_ptr().cast(), 1, &mut out) }.expect("pack");
        assert_eq!(written, 8);
    }

    #[test]
    fn pack_skips_padding_and_unpack_restores() {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Padded {
            tag: u8,
            value: f64,
        }

        let transport = LocalTransport::new();
        let blocks = [
            Block::new(1, 0, transport.leaf(prim(Primitive::UInt8))),
            Block::new(1, 8, transport.leaf(prim(Primitive::Float64))),
        ];
        let dt = transport.create_composite(&blocks).expect("composite");
        let dt = transport.commit(&dt).expect("commit");

        let src = [Padded { tag: 7, value: 1.5 }, Padded { tag: 9, value: -2.0 }];
        let mut wire = vec![0u8; transport.packed_len(&dt, 2).expect("len")];
        assert_eq!(wire.len(), 18);
        unsafe { transport.pack(&dt, src.as_ptr().cast(), 2, &mut wire) }.expect("pack");

        let mut dst = [Padded { tag: 0, value: 0.0 }; 2];
        let read = unsafe { transport.unpack(&dt, &wire, dst.as_mut_ptr().cast(), 2) }
            .expect("unpack");
        assert_eq!(read, 18);
        assert_eq!(dst, src);
        assert_eq!(transport.stats().bytes_packed, 18);
        assert_eq!(transport.stats().bytes_unpacked, 18);
    }

    #[test]
    fn short_buffers_are_reported() {
        let transport = LocalTransport::new();
        let int = transport.leaf(prim(Primitive::Int32));
        let value = 5i32;
        let mut small = [0u8; 2];
        let err = unsafe { transport.pack(&int, (&value as *const i32).cast(), 1, &mut small) }
            .unwrap_err();
        assert_eq!(err, TransportError::BufferTooSmall { needed: 4, available: 2 });

        let mut dst = 0i32;
        let err = unsafe { transport.unpack(&int, &small, (&mut dst as *mut i32).cast(), 1) }
            .unwrap_err();
        assert_eq!(err, TransportError::Truncated { needed: 4, available: 2 });
    }

    #[test]
    fn invalid_wide_chars_are_rejected() {
        let transport = LocalTransport::new();
        let wchar = transport.leaf(prim(Primitive::WChar));
        let wire = 0xD800u32.to_ne_bytes();
        let mut dst = 'a';
        let err = unsafe { transport.unpack(&wchar, &wire, (&mut dst as *mut char).cast(), 1) }
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidData { offset: 0, .. }));
        assert_eq!(dst, 'a');
    }

    #[test]
    fn resize_overflow_is_invalid() {
        let transport = LocalTransport::new();
        let int = transport.leaf(prim(Primitive::Int32));
        let err = transport.resize(&int, isize::MAX, 8).unwrap_err();
        assert!(matches!(err, TransportError::InvalidArgument(_)));
        assert_eq!(transport.stats().types_created, 0);
    }
}
