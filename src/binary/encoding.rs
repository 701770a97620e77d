// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints, the `Store` writer and the `Load` reader.
//!
//! Nothing fancy here, just the classics done right. Varint for integers that
//! are usually small, length prefixes for everything variable-sized, and a
//! single big-endian u32 for the magic. The primitives know nothing about
//! documents, locations or tries; those types describe themselves in terms of
//! the calls below.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   Originally from DWARF debugging format (1992+), popularized by Protocol Buffers.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>

use super::header::MAX_VARINT_BYTES;
use crate::error::{Error, Result};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Offsets in the returned errors are relative to `bytes`.
///
/// Returns an error if:
/// - Buffer is empty or ends mid-varint (`UnexpectedEof`)
/// - Varint exceeds MAX_VARINT_BYTES or overflows u64 (`InvalidVarint`)
pub fn decode_varint(bytes: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if i >= MAX_VARINT_BYTES {
            return Err(Error::InvalidVarint { offset: 0 });
        }

        let group = (byte & 0x7F) as u64;
        // The tenth byte may only carry the single remaining bit of a u64
        if i == MAX_VARINT_BYTES - 1 && group > 1 {
            return Err(Error::InvalidVarint { offset: 0 });
        }

        result |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
        shift += 7;
    }

    if bytes.len() >= MAX_VARINT_BYTES {
        Err(Error::InvalidVarint { offset: 0 })
    } else {
        Err(Error::UnexpectedEof {
            offset: bytes.len(),
            needed: 1,
            remaining: 0,
        })
    }
}

/// Shift the offsets of an error produced against a sub-slice.
fn rebase(err: Error, base: usize) -> Error {
    match err {
        Error::UnexpectedEof {
            offset,
            needed,
            remaining,
        } => Error::UnexpectedEof {
            offset: base + offset,
            needed,
            remaining,
        },
        Error::InvalidVarint { offset } => Error::InvalidVarint {
            offset: base + offset,
        },
        other => other,
    }
}

// ============================================================================
// STORE (writer)
// ============================================================================

/// Append-only byte buffer the index is serialized into.
#[derive(Debug, Default, Clone)]
pub struct Store {
    buf: Vec<u8>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Fixed 4-byte big-endian integer. Only the magic uses this.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_varint(&mut self, value: u64) {
        encode_varint(value, &mut self.buf);
    }

    /// Length-prefixed sequence of varints.
    pub fn write_varint_seq(&mut self, values: &[u32]) {
        self.write_varint(values.len() as u64);
        for &value in values {
            self.write_varint(value as u64);
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) {
        self.write_varint(value.len() as u64);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

// ============================================================================
// LOAD (reader)
// ============================================================================

/// Cursor over a borrowed buffer.
///
/// Every read checks the remaining length first and reports the absolute
/// offset it failed at.
#[derive(Debug, Clone)]
pub struct Load<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Load<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Total buffer length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                needed: len,
                remaining,
            });
        }

        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Fixed 4-byte big-endian integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_varint(&mut self) -> Result<u64> {
        let (value, consumed) =
            decode_varint(&self.bytes[self.pos..]).map_err(|e| rebase(e, self.pos))?;
        self.pos += consumed;
        Ok(value)
    }

    /// Varint that must fit in a u32.
    pub fn read_varint_u32(&mut self) -> Result<u32> {
        let offset = self.pos;
        let value = self.read_varint()?;
        u32::try_from(value)
            .map_err(|_| Error::corrupt(offset, format!("value {} exceeds u32", value)))
    }

    /// Read an element count.
    ///
    /// Every element takes at least `min_item_size` bytes, so a count that
    /// could not possibly fit in the rest of the buffer is rejected before
    /// anything gets allocated for it.
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_varint()?;
        let limit = self.remaining() / min_item_size.max(1);
        if count > limit as u64 {
            return Err(Error::corrupt(
                offset,
                format!(
                    "count {} exceeds available bytes {}",
                    count,
                    self.remaining()
                ),
            ));
        }
        Ok(count as usize)
    }

    /// Length-prefixed sequence of varints.
    pub fn read_varint_seq(&mut self) -> Result<Vec<u32>> {
        let count = self.read_count(1)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.read_varint_u32()?);
        }
        Ok(values)
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = self.read_varint()?;
        let offset = self.pos;
        let len = usize::try_from(len).map_err(|_| Error::UnexpectedEof {
            offset,
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { offset })
    }
}


// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================
//
// These proofs show the varint functions cannot panic on any input.
// Run with: cargo kani
//
// Verified properties:
// 1. encode_varint never panics for any u64 value
// 2. decode_varint never panics for any byte sequence
// 3. Roundtrip: decode(encode(x)) == x for all x

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// encode_varint produces 1..=MAX_VARINT_BYTES bytes with a
    /// terminating final byte.
    #[kani::proof]
    fn verify_encode_varint_no_panic() {
        let value: u64 = kani::any();
        let mut buf = Vec::new();

        encode_varint(value, &mut buf);

        kani::assert(
            !buf.is_empty(),
            "encode_varint must produce at least 1 byte",
        );
        kani::assert(
            buf.len() <= MAX_VARINT_BYTES,
            "encode_varint must produce at most MAX_VARINT_BYTES bytes",
        );
        kani::assert(
            buf.last().map_or(false, |&b| b & 0x80 == 0),
            "Last byte must not have continuation bit",
        );
    }

    /// decode_varint returns Ok or Err for any input, never panics.
    #[kani::proof]
    #[kani::unwind(12)]
    fn verify_decode_varint_no_panic() {
        let len: usize = kani::any_where(|&n| n <= MAX_VARINT_BYTES + 1);
        let mut bytes = [0u8; 11];

        for i in 0..len {
            bytes[i] = kani::any();
        }

        if let Ok((_, consumed)) = decode_varint(&bytes[..len]) {
            kani::assert(consumed > 0, "Must consume at least 1 byte on success");
            kani::assert(consumed <= len, "Cannot consume more bytes than available");
        }
    }

    #[kani::proof]
    fn verify_varint_roundtrip() {
        let original: u64 = kani::any();
        let mut buf = Vec::new();

        encode_varint(original, &mut buf);

        let result = decode_varint(&buf);
        kani::assert(result.is_ok(), "Decoding encoded value must succeed");

        let (decoded, consumed) = result.unwrap();
        kani::assert(decoded == original, "Roundtrip must preserve value");
        kani::assert(consumed == buf.len(), "Must consume exactly the encoded bytes");
    }
}
