// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for DescriptorCache.

use super::*;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::Barrier;
use std::thread;

struct Outer;
struct Inner;

#[test]
fn cache_hit_and_miss_paths() {
    let cache = DescriptorCache::<u64>::new(4);
    let first = cache.get_or_try_build::<Outer, (), _>(|| Ok(7));
    assert_eq!(first, Ok(7));

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 0);

    let build_called = AtomicBool::new(false);
    let same = cache.get_or_try_build::<Outer, (), _>(|| {
        build_called.store(true, Ordering::Relaxed);
        Ok(8)
    });
    assert!(!build_called.load(Ordering::Relaxed));
    assert_eq!(same, Ok(7));

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(cache.get::<Outer>(), Some(7));
    assert_eq!(cache.get::<Inner>(), None);
}

#[test]
fn failed_build_leaves_slot_empty() {
    let cache = DescriptorCache::<u64>::new(4);
    let err = cache.get_or_try_build::<Outer, &str, _>(|| Err("backend down"));
    assert_eq!(err, Err("backend down"));
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 0);

    let retried = cache.get_or_try_build::<Outer, &str, _>(|| Ok(3));
    assert_eq!(retried, Ok(3));
    assert_eq!(cache.len(), 1);
}

#[test]
fn nested_builds_do_not_deadlock() {
    let cache = DescriptorCache::<u64>::new(4);
    let outer = cache.get_or_try_build::<Outer, (), _>(|| {
        let inner = cache.get_or_try_build::<Inner, (), _>(|| Ok(2))?;
        Ok(inner * 10)
    });
    assert_eq!(outer, Ok(20));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn concurrent_first_requests_build_once() {
    let cache = Arc::new(DescriptorCache::<u64>::new(16));
    let builds = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();

    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let builds = Arc::clone(&builds);
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            let mut seen = Vec::new();
            for _ in 0..200 {
                let value = cache
                    .get_or_try_build::<Outer, (), _>(|| {
                        builds.fetch_add(1, Ordering::SeqCst);
                        thread::yield_now();
                        Ok(fastrand::u64(..))
                    })
                    .expect("build never fails");
                seen.push(value);
            }
            seen
        }));
    }

    let mut values = Vec::new();
    for handle in handles {
        values.extend(handle.join().expect("thread should succeed"));
    }

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(values.windows(2).all(|w| w[0] == w[1]));
    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 8 * 200 - 1);
}

#[test]
fn hits_do_not_wait_on_a_running_build() {
    use std::sync::mpsc;
    use std::time::Duration;

    let cache = Arc::new(DescriptorCache::<u64>::new(4));
    assert_eq!(cache.get_or_try_build::<Inner, (), _>(|| Ok(5)), Ok(5));

    let (started_tx, started_rx) = mpsc::channel();
    let (hit_tx, hit_rx) = mpsc::channel::<u64>();
    let builder = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            cache.get_or_try_build::<Outer, &str, _>(|| {
                started_tx.send(()).map_err(|_| "main thread gone")?;
                // Hold the Outer guard until another thread has hit Inner.
                hit_rx
                    .recv_timeout(Duration::from_secs(5))
                    .map_err(|_| "hit blocked behind the build")
            })
        })
    };

    started_rx.recv().expect("build should start");
    let hit = cache
        .get_or_try_build::<Inner, (), _>(|| Ok(0))
        .expect("hit");
    assert_eq!(cache.get::<Outer>(), None);
    hit_tx.send(hit * 2).expect("builder waiting");

    assert_eq!(builder.join().expect("builder thread"), Ok(10));
    let stats = cache.stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 1);
}
