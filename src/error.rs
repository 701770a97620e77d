// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::document::DocId;

/// Errors raised while building, decoding or persisting an index.
#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate index document ID {0}")]
    DuplicateDocument(DocId),

    #[error("invalid index file: expected magic 0x{expected:08x}, found 0x{found:08x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("unexpected end of buffer at offset {offset}: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: usize },

    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("corrupt index at offset {offset}: {reason}")]
    Corrupt { offset: usize, reason: String },

    #[error("location id space exhausted")]
    LocationsExhausted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether this error came from the magic check rather than from a
    /// damaged payload.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Error::BadMagic { .. })
    }

    /// Whether the buffer ended before the decoder was done with it.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }

    pub(crate) fn corrupt(offset: usize, reason: impl Into<String>) -> Self {
        Error::Corrupt {
            offset,
            reason: reason.into(),
        }
    }
}
