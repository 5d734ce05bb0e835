// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Limits and runtime configuration.
//!
//! # Architecture
//!
//! - **Static**: compile-time limits shared with `wiretype-codegen`
//!   (`MAX_FIELDS`, `MAX_RANK`).
//! - **Dynamic**: [`SynthConfig`] for the synthesizer and [`LocalConfig`]
//!   for the in-process transport, both overridable from the environment.
//!
//! | variable | default | effect |
//! |----------|---------|--------|
//! | `WIRETYPE_VERIFY_EXTENT` | `1` | re-check the corrected extent before commit |
//! | `WIRETYPE_CACHE_CAPACITY` | `64` | initial capacity of a transport's descriptor cache |
//! | `WIRETYPE_MAX_TYPES` | `65536` | descriptor limit of `LocalTransport` |

/// Maximum number of fields a reflected struct may declare.
///
/// `#[derive(Reflect)]` rejects larger structs at compile time.
pub const MAX_FIELDS: usize = 12;

/// Maximum array rank of a single field (`[[T; C]; R]`).
pub const MAX_RANK: usize = 2;

/// Initial capacity of the descriptor cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Default number of derived descriptors a `LocalTransport` may hold.
pub const DEFAULT_MAX_TYPES: usize = 65_536;

pub const ENV_VERIFY_EXTENT: &str = "WIRETYPE_VERIFY_EXTENT";
pub const ENV_CACHE_CAPACITY: &str = "WIRETYPE_CACHE_CAPACITY";
pub const ENV_MAX_TYPES: &str = "WIRETYPE_MAX_TYPES";

/// Synthesizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthConfig {
    /// Query the extent again after correction and fail with
    /// [`Error::ExtentMismatch`](crate::Error::ExtentMismatch) if it is
    /// still not `size_of::<T>()`.
    pub verify_extent: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            verify_extent: true,
        }
    }
}

impl SynthConfig {
    /// Defaults overridden by `WIRETYPE_*` environment variables.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            verify_extent: env_flag(ENV_VERIFY_EXTENT).unwrap_or(defaults.verify_extent),
        }
    }

    #[must_use]
    pub fn verify_extent(mut self, enabled: bool) -> Self {
        self.verify_extent = enabled;
        self
    }
}

/// `LocalTransport` settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalConfig {
    /// Derived (non-leaf) descriptors the transport will create before
    /// failing with `ResourceExhausted`.
    pub max_types: usize,

    /// Initial capacity of the descriptor cache the transport owns.
    pub cache_capacity: usize,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            max_types: DEFAULT_MAX_TYPES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl LocalConfig {
    /// Defaults overridden by `WIRETYPE_MAX_TYPES` and
    /// `WIRETYPE_CACHE_CAPACITY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_types: env_usize(ENV_MAX_TYPES).unwrap_or(DEFAULT_MAX_TYPES),
            cache_capacity: env_usize(ENV_CACHE_CAPACITY).unwrap_or(DEFAULT_CACHE_CAPACITY),
        }
    }

    #[must_use]
    pub fn max_types(mut self, limit: usize) -> Self {
        self.max_types = limit;
        self
    }

    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

fn env_flag(name: &str) -> Option<bool> {
    parse_flag(&std::env::var(name).ok()?)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
