// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Format constants and decoder limits.
//!
//! The format has exactly one fixed-width field: the 4-byte magic at the
//! start of the buffer. It doubles as the version sentinel, so a layout change
//! means a new magic. Everything after it is varints and raw UTF-8.
//!
//! The limits below only matter when decoding. A builder never produces
//! anything close to them, but a corrupted or hostile buffer can claim
//! whatever counts it likes, and we'd rather refuse than allocate.

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic number: "SRCH" in ASCII when written big-endian.
pub const MAGIC: u32 = 0x5352_4348;

/// Magic as it appears on the wire.
pub const MAGIC_BYTES: [u8; 4] = MAGIC.to_be_bytes();

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum nesting of trie nodes accepted by the decoder.
///
/// Depth is bounded by the longest token, which the tokenizer caps well
/// below this.
pub const MAX_TRIE_DEPTH: usize = 4096;

/// Maximum buffer size accepted by `persist::read_index` (256 MB).
pub const MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;
