//! Negative tests for binary format validation.
//!
//! The decoder must reject malformed, truncated, or corrupted input with an
//! error. It must never panic, and never hand back a partially decoded index.
//!
//! ## Test Categories
//!
//! 1. **Varint rejection**: truncation, max bytes exceeded, overflow
//! 2. **Header rejection**: wrong or missing magic
//! 3. **Payload rejection**: truncation, trailing bytes, dangling references

use leafdex::binary::{decode_varint, encode_varint, Store, MAGIC, MAX_VARINT_BYTES};
use leafdex::{Error, Index, IndexDoc, Record};

use crate::common::site_bytes;

fn load(bytes: &[u8]) -> leafdex::Result<Index> {
    Index::load(bytes)
}

// ============================================================================
// VARINT REJECTION TESTS
// ============================================================================

#[test]
fn test_varint_empty_buffer() {
    assert!(matches!(
        decode_varint(&[]),
        Err(Error::UnexpectedEof { offset: 0, .. })
    ));
}

#[test]
fn test_varint_unterminated() {
    let bytes = [0x80, 0x80, 0x80, 0x80, 0x80];
    assert!(matches!(
        decode_varint(&bytes),
        Err(Error::UnexpectedEof { offset: 5, .. })
    ));
}

#[test]
fn test_varint_exceeds_max_bytes() {
    let bytes = vec![0x80; MAX_VARINT_BYTES + 1];
    assert!(matches!(
        decode_varint(&bytes),
        Err(Error::InvalidVarint { .. })
    ));
}

#[test]
fn test_varint_boundary_values() {
    let values = [
        0,
        1,
        127,   // Max single byte
        128,   // First 2-byte value
        16383, // Max 2-byte value
        16384, // First 3-byte value
        u32::MAX as u64,
        u64::MAX,
    ];

    for value in values {
        let mut buf = Vec::new();
        encode_varint(value, &mut buf);
        let (decoded, consumed) =
            decode_varint(&buf).unwrap_or_else(|_| panic!("should decode {}", value));
        assert_eq!(decoded, value);
        assert_eq!(consumed, buf.len());
    }
}

// ============================================================================
// HEADER REJECTION TESTS
// ============================================================================

#[test]
fn test_flipped_magic_is_a_format_error() {
    let valid = site_bytes();
    for byte in 0..4 {
        let mut bytes = valid.clone();
        bytes[byte] ^= 0x01;
        let err = load(&bytes).unwrap_err();
        assert!(err.is_format_error(), "byte {}: {:?}", byte, err);
    }
}

#[test]
fn test_short_buffers_are_format_errors() {
    for bytes in [&b""[..], b"S", b"SRC"] {
        let err = load(bytes).unwrap_err();
        assert!(err.is_format_error(), "{:?}: {:?}", bytes, err);
    }
}

#[test]
fn test_magic_only_is_truncated() {
    let mut store = Store::new();
    store.write_u32(MAGIC);
    let err = load(store.as_bytes()).unwrap_err();
    assert!(err.is_truncation(), "{:?}", err);
    assert!(!err.is_format_error());
}

// ============================================================================
// PAYLOAD REJECTION TESTS
// ============================================================================

#[test]
fn test_every_truncation_fails() {
    let bytes = site_bytes();
    for len in 0..bytes.len() {
        assert!(
            load(&bytes[..len]).is_err(),
            "prefix of {} / {} bytes decoded",
            len,
            bytes.len()
        );
    }
    assert!(load(&bytes).is_ok());
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = site_bytes();
    bytes.extend_from_slice(&[0, 0]);
    assert!(matches!(load(&bytes), Err(Error::Corrupt { .. })));
}

#[test]
fn test_single_byte_corruption_never_panics() {
    let valid = site_bytes();
    for at in 4..valid.len() {
        for flip in [0x01, 0x80, 0xFF] {
            let mut bytes = valid.clone();
            bytes[at] ^= flip;
            // Either outcome is fine; only a panic would fail the test
            let _ = load(&bytes);
        }
    }
}

/// Hand-assembled buffer: one document, the given registry, empty trie.
fn assemble(locations: &[(u64, u64)], postings: &[u64]) -> Vec<u8> {
    let mut store = Store::new();
    store.write_u32(MAGIC);

    store.write_varint(1);
    IndexDoc::new(1, "a", "A").store(&mut store);

    store.write_varint(locations.len() as u64);
    for &(id, doc) in locations {
        store.write_varint(id);
        store.write_varint(doc);
        store.write_varint_seq(&[0]);
    }

    // Root with a single child "x" holding `postings`
    store.write_str("");
    store.write_varint(0);
    store.write_varint(1);
    store.write_str("x");
    store.write_varint(postings.len() as u64);
    let mut previous = 0;
    for &location in postings {
        store.write_varint(location - previous);
        store.write_varint(0);
        store.write_varint(1);
        previous = location;
    }
    store.write_varint(0);

    store.finish()
}

#[test]
fn test_hand_assembled_buffer_loads() {
    let index = load(&assemble(&[(0, 1)], &[0])).unwrap();
    assert_eq!(index.search("x").len(), 1);
}

#[test]
fn test_location_for_unknown_document() {
    let err = load(&assemble(&[(0, 2)], &[])).unwrap_err();
    assert!(matches!(err, Error::Corrupt { .. }), "{:?}", err);
    assert!(err.to_string().contains("unknown document 2"));
}

#[test]
fn test_posting_for_unknown_location() {
    let err = load(&assemble(&[(0, 1)], &[0, 3])).unwrap_err();
    assert!(err.to_string().contains("unknown location 3"), "{}", err);
}

#[test]
fn test_duplicate_document_in_buffer() {
    let mut store = Store::new();
    store.write_u32(MAGIC);
    store.write_varint(2);
    IndexDoc::new(5, "a", "A").store(&mut store);
    IndexDoc::new(5, "b", "B").store(&mut store);
    store.write_varint(0);
    store.write_bytes(&[0, 0, 0]);

    let err = load(store.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("duplicate document id 5"), "{}", err);
}
