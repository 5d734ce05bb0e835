// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime errors.
//!
//! Unsupported types, oversized structs and the like are rejected at
//! compile time and have no variant here. What remains is what a transport
//! can report while assembling or moving data, passed through unchanged.

use crate::transport::Extent;
use thiserror::Error;

/// Failure reported by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Malformed request (empty block list, zero count, overflow, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Handle used for data movement before `commit`.
    #[error("descriptor #{id} is not committed")]
    NotCommitted { id: u64 },

    /// The transport cannot hold more descriptors.
    #[error("descriptor limit reached ({limit})")]
    ResourceExhausted { limit: usize },

    /// Descriptor extent does not match the element type it is used with.
    #[error("descriptor extent {actual:?} does not match element size {expected}")]
    LayoutMismatch { expected: usize, actual: Extent },

    /// Output buffer shorter than the packed representation.
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Input shorter than the packed representation.
    #[error("truncated input: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Packed bytes that do not form a valid value.
    #[error("invalid data at byte {offset}: {reason}")]
    InvalidData { offset: usize, reason: String },

    /// Error code from an external runtime.
    #[error("transport error {code}: {message}")]
    Backend { code: i32, message: String },
}

/// Errors returned by wiretype operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The corrected descriptor still does not span exactly `size_of::<T>()`.
    #[error("extent of `{type_name}` is {actual:?} after correction, expected {expected} bytes")]
    ExtentMismatch {
        type_name: &'static str,
        expected: usize,
        actual: Extent,
    },

    /// Source and destination slices of a transfer differ in length.
    #[error("length mismatch: {source_len} source elements, {dest_len} destination slots")]
    LengthMismatch { source_len: usize, dest_len: usize },
}

/// Convenient alias for results using the crate [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
