// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Size-capped body accumulation
//!
//! Bodies arrive as an arbitrary sequence of chunks. The accumulator keeps
//! the exact prefix of their concatenation up to the configured ceiling:
//! the chunk that crosses the boundary is truncated, everything after it is
//! dropped. Joining into a single string happens once, at finalize time.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Default ceiling per body: 3,072,000 bytes (1024 * 1000 * 3)
pub const DEFAULT_MAX_BODY_LENGTH: usize = 1024 * 1000 * 3;

/// Maximum number of bytes retained per captured body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyLimit {
    /// Retain at most this many bytes
    Limited(usize),
    /// No ceiling
    Unlimited,
}

impl Default for BodyLimit {
    fn default() -> Self {
        BodyLimit::Limited(DEFAULT_MAX_BODY_LENGTH)
    }
}

impl BodyLimit {
    /// Bytes still available given `used` bytes already retained
    fn remaining(&self, used: usize) -> usize {
        match *self {
            BodyLimit::Limited(max) => max.saturating_sub(used),
            BodyLimit::Unlimited => usize::MAX,
        }
    }
}

/// Append-only, size-capped chunk buffer
#[derive(Debug, Clone)]
pub struct BoundedAccumulator {
    chunks: Vec<Bytes>,
    total: usize,
    limit: BodyLimit,
}

impl BoundedAccumulator {
    /// Create an empty accumulator with the given ceiling
    pub fn new(limit: BodyLimit) -> Self {
        Self {
            chunks: Vec::new(),
            total: 0,
            limit,
        }
    }

    /// Record a chunk, truncating it to whatever budget remains
    ///
    /// Empty chunks and appends past an exhausted budget are no-ops.
    pub fn append(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let keep = self.limit.remaining(self.total).min(chunk.len());
        if keep == 0 {
            return;
        }
        self.total += keep;
        self.chunks.push(Bytes::copy_from_slice(&chunk[..keep]));
    }

    /// Join all retained chunks into one string (lossy UTF-8)
    pub fn finish(&self) -> String {
        let mut joined = Vec::with_capacity(self.total);
        for chunk in &self.chunks {
            joined.extend_from_slice(chunk);
        }
        String::from_utf8_lossy(&joined).into_owned()
    }

    /// Total bytes retained so far
    pub fn len(&self) -> usize {
        self.total
    }

    /// True when nothing has been retained
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
