// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compute-once cache of committed descriptors, keyed by `TypeId`.
//!
//! Each type gets its own slot. A hit reads the slot under a brief map
//! shard read lock, then `OnceLock::get`; it never waits on a build in
//! progress. A miss takes only that slot's guard, with no shard lock held,
//! so building a struct may recurse into its field types (which take their
//! own guards) without deadlocking, and concurrent first requests for one
//! type build it exactly once. A failed build leaves the slot empty and the
//! next request retries. Entries are never evicted.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    pub hits: u64,
    /// Successful builds.
    pub misses: u64,
    /// Duration of the most recent build, nested builds included.
    pub last_build_ns: u64,
}

struct Slot<H> {
    guard: Mutex<()>,
    value: OnceLock<H>,
}

impl<H> Default for Slot<H> {
    fn default() -> Self {
        Self {
            guard: Mutex::new(()),
            value: OnceLock::new(),
        }
    }
}

/// Per-type descriptor cache.
pub struct DescriptorCache<H> {
    slots: DashMap<TypeId, Arc<Slot<H>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    last_build_ns: AtomicU64,
}

impl<H: Clone> DescriptorCache<H> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity(capacity),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            last_build_ns: AtomicU64::new(0),
        }
    }

    /// Cached descriptor of `T`, building it with `build` on first use.
    pub fn get_or_try_build<T, E, F>(&self, build: F) -> Result<H, E>
    where
        T: 'static,
        F: FnOnce() -> Result<H, E>,
    {
        let slot = self.slot::<T>();
        if let Some(hit) = slot.value.get() {
            self.record_hit();
            return Ok(hit.clone());
        }

        let _guard = slot.guard.lock();
        if let Some(hit) = slot.value.get() {
            self.record_hit();
            return Ok(hit.clone());
        }

        let start = Instant::now();
        let built = build()?;
        let stored = slot.value.get_or_init(|| built).clone();
        self.record_miss(start);
        Ok(stored)
    }

    /// Cached descriptor of `T`, without building.
    pub fn get<T: 'static>(&self) -> Option<H> {
        let slot = self.slots.get(&TypeId::of::<T>())?;
        slot.value.get().cloned()
    }

    /// Number of types with a committed descriptor.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().value.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            last_build_ns: self.last_build_ns.load(Ordering::Relaxed),
        }
    }

    // The Arc is cloned out so no map shard stays locked during a build.
    fn slot<T: 'static>(&self) -> Arc<Slot<H>> {
        let key = TypeId::of::<T>();
        if let Some(slot) = self.slots.get(&key) {
            return Arc::clone(slot.value());
        }
        Arc::clone(self.slots.entry(key).or_default().value())
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self, start: Instant) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last_build_ns.store(elapsed, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests;
