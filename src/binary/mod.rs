// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for leafdex search indexes.
//!
//! The buffer is written once at the end of a site build and read once per
//! page load, so the format optimizes for small size and a single forward
//! pass. There is no section table and no random access: a reader walks the
//! buffer front to back and either ends up with a complete index or an error.
//!
//! # Security Considerations
//!
//! Buffers come over the network, so the decoder treats them as untrusted:
//! - Every read checks the remaining length and reports the failing offset
//! - Counts are bounded by the remaining bytes before anything is allocated
//! - Varints longer than MAX_VARINT_BYTES or overflowing u64 are rejected
//! - Trie nesting is capped at MAX_TRIE_DEPTH and decoded without recursion
//!
//! # Format Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ MAGIC: [u8; 4] = "SRCH" (0x53524348, big-endian)           │
//! ├────────────────────────────────────────────────────────────┤
//! │ DOCUMENTS                                                  │
//! │   doc_count: varint                                        │
//! │   doc_count × record (owned by the record type)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ LOCATIONS                                                  │
//! │   location_count: varint                                   │
//! │   location_count × (id, doc_id, path_len, path[path_len])  │
//! ├────────────────────────────────────────────────────────────┤
//! │ TRIE (pre-order)                                           │
//! │   fragment_len: varint, fragment: [u8; fragment_len]       │
//! │   posting_count: varint                                    │
//! │   posting_count × (location_delta, start, length)          │
//! │   child_count: varint                                      │
//! │   child_count × node                                       │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod encoding;
mod header;

pub use encoding::{decode_varint, encode_varint, Load, Store};
pub use header::{MAGIC, MAGIC_BYTES, MAX_FILE_SIZE, MAX_TRIE_DEPTH, MAX_VARINT_BYTES};
