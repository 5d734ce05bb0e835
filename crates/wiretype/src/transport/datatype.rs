// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor trees of the in-process transport.
//!
//! A [`Datatype`] is an immutable node shared through `Arc`: leaf, strided
//! vector, composite or resized view. Extents follow the usual message
//! passing rules (lower bound = lowest element start, upper bound = highest
//! element end) without rounding up to alignment, so trailing padding of a
//! struct is not covered until the descriptor is resized.
//!
//! Committing flattens the tree once into a type map of contiguous
//! primitive runs; pack/unpack only walk that map.

use super::{Block, Extent};
use crate::error::TransportError;
use crate::types::{LeafTag, Primitive};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Run of `count` contiguous `primitive` values starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub offset: isize,
    pub primitive: Primitive,
    pub count: usize,
}

impl Member {
    /// Bytes covered by the run.
    pub const fn len(&self) -> usize {
        self.count * self.primitive.size()
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Shared handle to a descriptor node. Equality is identity.
#[derive(Clone)]
pub struct Datatype(Arc<Node>);

struct Node {
    id: u64,
    kind: Kind,
    extent: Extent,
    true_lb: isize,
    true_ub: isize,
    type_map: OnceLock<Arc<[Member]>>,
}

#[derive(Debug)]
enum Kind {
    Leaf(LeafTag),
    Strided {
        count: usize,
        block_len: usize,
        stride: isize,
        element: Datatype,
    },
    Composite {
        blocks: Vec<Block<Datatype>>,
    },
    Resized {
        inner: Datatype,
    },
}

/// Bounds accumulated in i128 so overflow is detected, not wrapped.
struct Bounds {
    lb: i128,
    ub: i128,
    true_lb: i128,
    true_ub: i128,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            lb: i128::MAX,
            ub: i128::MIN,
            true_lb: i128::MAX,
            true_ub: i128::MIN,
        }
    }

    /// Add `count` copies of `element` starting at `start`, `step` bytes apart.
    fn add_run(&mut self, start: i128, count: usize, step: i128, element: &Datatype) {
        let first = start;
        let last = start + (count as i128 - 1) * step;
        let (low, high) = if step >= 0 { (first, last) } else { (last, first) };
        let e = element.extent();
        let elb = e.lower_bound as i128;
        self.lb = self.lb.min(low + elb);
        self.ub = self.ub.max(high + elb + e.size as i128);
        self.true_lb = self.true_lb.min(low + element.0.true_lb as i128);
        self.true_ub = self.true_ub.max(high + element.0.true_ub as i128);
    }

    fn finish(self) -> Result<(Extent, isize, isize), TransportError> {
        let overflow = || TransportError::InvalidArgument("descriptor extent overflows".into());
        let lb = isize::try_from(self.lb).map_err(|_| overflow())?;
        let size = usize::try_from(self.ub - self.lb).map_err(|_| overflow())?;
        isize::try_from(self.ub).map_err(|_| overflow())?;
        let true_lb = isize::try_from(self.true_lb).map_err(|_| overflow())?;
        let true_ub = isize::try_from(self.true_ub).map_err(|_| overflow())?;
        Ok((Extent::new(lb, size), true_lb, true_ub))
    }
}

impl Datatype {
    pub(crate) fn leaf(id: u64, tag: LeafTag) -> Self {
        let true_ub = tag
            .members()
            .map(|(offset, p)| offset + p.size())
            .max()
            .unwrap_or(0);
        let node = Node {
            id,
            kind: Kind::Leaf(tag),
            extent: Extent::new(0, tag.extent()),
            true_lb: 0,
            true_ub: true_ub as isize,
            type_map: OnceLock::new(),
        };
        let datatype = Datatype(Arc::new(node));
        datatype.commit();
        datatype
    }

    pub(crate) fn strided(
        id: u64,
        count: usize,
        block_len: usize,
        stride: isize,
        element: &Datatype,
    ) -> Result<Self, TransportError> {
        if count == 0 || block_len == 0 {
            return Err(TransportError::InvalidArgument(format!(
                "strided descriptor needs count and block length > 0 (got {count} x {block_len})"
            )));
        }
        if count > 1 && stride == 0 {
            return Err(TransportError::InvalidArgument(
                "strided descriptor with several blocks needs a non-zero stride".into(),
            ));
        }

        let mut bounds = Bounds::empty();
        let step = element.extent().size as i128;
        for i in 0..count {
            let start = i as i128 * stride as i128;
            bounds.add_run(start, block_len, step, element);
        }
        let (extent, true_lb, true_ub) = bounds.finish()?;

        Ok(Self::from_kind(
            id,
            Kind::Strided {
                count,
                block_len,
                stride,
                element: element.clone(),
            },
            extent,
            true_lb,
            true_ub,
        ))
    }

    pub(crate) fn composite(id: u64, blocks: &[Block<Datatype>]) -> Result<Self, TransportError> {
        if blocks.is_empty() {
            return Err(TransportError::InvalidArgument(
                "composite descriptor needs at least one block".into(),
            ));
        }

        let mut bounds = Bounds::empty();
        for (index, block) in blocks.iter().enumerate() {
            if block.count == 0 {
                return Err(TransportError::InvalidArgument(format!(
                    "block {index} has a zero count"
                )));
            }
            let step = block.element.extent().size as i128;
            bounds.add_run(block.displacement as i128, block.count, step, &block.element);
        }
        let (extent, true_lb, true_ub) = bounds.finish()?;

        Ok(Self::from_kind(
            id,
            Kind::Composite {
                blocks: blocks.to_vec(),
            },
            extent,
            true_lb,
            true_ub,
        ))
    }

    pub(crate) fn resized(id: u64, inner: &Datatype, lower_bound: isize, size: usize) -> Self {
        Self::from_kind(
            id,
            Kind::Resized {
                inner: inner.clone(),
            },
            Extent::new(lower_bound, size),
            inner.0.true_lb,
            inner.0.true_ub,
        )
    }

    fn from_kind(id: u64, kind: Kind, extent: Extent, true_lb: isize, true_ub: isize) -> Self {
        Datatype(Arc::new(Node {
            id,
            kind,
            extent,
            true_lb,
            true_ub,
            type_map: OnceLock::new(),
        }))
    }

    /// Flatten into the type map. Returns `false` if already committed.
    pub(crate) fn commit(&self) -> bool {
        let mut fresh = false;
        self.0.type_map.get_or_init(|| {
            fresh = true;
            let mut members = Vec::new();
            self.flatten(0, &mut members);
            members.into()
        });
        fresh
    }

    fn flatten(&self, base: isize, out: &mut Vec<Member>) {
        if let Some(map) = self.0.type_map.get() {
            for m in map.iter() {
                push_member(out, base + m.offset, m.primitive, m.count);
            }
            return;
        }

        match &self.0.kind {
            Kind::Leaf(tag) => {
                for (offset, primitive) in tag.members() {
                    push_member(out, base + offset as isize, primitive, 1);
                }
            }
            Kind::Strided {
                count,
                block_len,
                stride,
                element,
            } => {
                let step = element.extent().size as isize;
                for i in 0..*count {
                    let start = base + i as isize * stride;
                    for j in 0..*block_len {
                        element.flatten(start + j as isize * step, out);
                    }
                }
            }
            Kind::Composite { blocks } => {
                for block in blocks {
                    let step = block.element.extent().size as isize;
                    for j in 0..block.count {
                        block
                            .element
                            .flatten(base + block.displacement + j as isize * step, out);
                    }
                }
            }
            Kind::Resized { inner } => inner.flatten(base, out),
        }
    }

    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn extent(&self) -> Extent {
        self.0.extent
    }

    /// Span from the first to the last data byte, padding excluded.
    pub fn true_extent(&self) -> Extent {
        Extent::new(self.0.true_lb, (self.0.true_ub - self.0.true_lb) as usize)
    }

    pub fn is_committed(&self) -> bool {
        self.0.type_map.get().is_some()
    }

    pub fn leaf_tag(&self) -> Option<LeafTag> {
        match self.0.kind {
            Kind::Leaf(tag) => Some(tag),
            _ => None,
        }
    }

    /// Flattened type map, once committed.
    pub fn type_map(&self) -> Option<&[Member]> {
        self.0.type_map.get().map(|m| &m[..])
    }

    /// Bytes one element occupies on the wire, once committed.
    pub fn packed_size(&self) -> Option<usize> {
        self.type_map().map(|m| m.iter().map(Member::len).sum())
    }

    pub fn ptr_eq(a: &Datatype, b: &Datatype) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

fn push_member(out: &mut Vec<Member>, offset: isize, primitive: Primitive, count: usize) {
    if let Some(last) = out.last_mut() {
        if last.primitive == primitive && last.offset + last.len() as isize == offset {
            last.count += count;
            return;
        }
    }
    out.push(Member {
        offset,
        primitive,
        count,
    });
}

impl PartialEq for Datatype {
    fn eq(&self, other: &Self) -> bool {
        Datatype::ptr_eq(self, other)
    }
}

impl Eq for Datatype {}

impl Hash for Datatype {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::Leaf(tag) => write!(f, "{tag}"),
            kind => f
                .debug_struct("Datatype")
                .field("id", &self.0.id)
                .field("extent", &self.0.extent)
                .field("committed", &self.is_committed())
                .field("kind", kind)
                .finish(),
        }
    }
}
