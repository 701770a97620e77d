// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build and decode diagnostics. Nothing reads these back; they exist to be
//! logged and eyeballed when an index suddenly doubles in size.

use std::time::Duration;

use serde::Serialize;
use tracing::info;

/// Counters accumulated by [`IndexBuilder`](crate::IndexBuilder)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub documents: usize,
    /// Text leaves that produced at least one token
    pub locations: usize,
    pub tokens: usize,
    /// Trie nodes, root excluded. Filled in by `store`.
    pub nodes: usize,
    /// Deepest trie node, in edges. Filled in by `store`.
    pub max_depth: usize,
    /// Encoded size in bytes. Filled in by `store`.
    pub size: usize,
}

impl BuildStats {
    pub fn log(&self) {
        info!(
            documents = self.documents,
            locations = self.locations,
            tokens = self.tokens,
            nodes = self.nodes,
            max_depth = self.max_depth,
            size_kib = kib(self.size),
            "built search index"
        );
    }
}

/// Time spent in each decode phase
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeTimings {
    pub documents: Duration,
    pub locations: Duration,
    pub trie: Duration,
    /// Whole load, magic check included
    pub total: Duration,
}

/// What [`Index::load`](crate::Index::load) found in a buffer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeStats {
    pub size: usize,
    pub documents: usize,
    pub locations: usize,
    pub nodes: usize,
    pub timings: DecodeTimings,
}

impl DecodeStats {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn log(&self) {
        info!(
            size_kib = kib(self.size),
            documents = self.documents,
            locations = self.locations,
            nodes = self.nodes,
            decode_ms = millis(self.timings.total),
            documents_ms = millis(self.timings.documents),
            locations_ms = millis(self.timings.locations),
            trie_ms = millis(self.timings.trie),
            "loaded search index"
        );
    }
}

/// Phase timer for decode timings.
///
/// `wasm32-unknown-unknown` has no monotonic clock (`Instant::now` panics
/// there), so on wasm32 every reading is zero.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    started: std::time::Instant,
}

impl Stopwatch {
    pub(crate) fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            started: std::time::Instant::now(),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

fn kib(bytes: usize) -> f64 {
    bytes as f64 / 1024.0
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
