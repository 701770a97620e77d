// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Writing finished indexes to disk, and reading them back.
//!
//! The index is built entirely in memory and flushed exactly once. The bytes
//! go to a temporary file in the target directory, which is then renamed
//! into place, so an interrupted build leaves either the previous artifact
//! or the new one, never half of one.
//!
//! File names carry the CRC32 of the contents (`index-1a2b3c4d.bin`), so a
//! CDN can cache them forever and a rebuild with identical content is a
//! no-op as far as caches are concerned.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::binary::MAX_FILE_SIZE;
use crate::error::{Error, Result};

/// Content-addressed file name for an index buffer.
pub fn index_file_name(bytes: &[u8]) -> String {
    format!("index-{:08x}.bin", crc32fast::hash(bytes))
}

/// Atomically write `bytes` into `dir`, returning the final path.
pub fn write_index(dir: impl AsRef<Path>, bytes: &[u8]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(index_file_name(bytes));

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(&path).map_err(|e| Error::Io(e.error))?;

    info!(path = %path.display(), size = bytes.len(), "wrote search index");
    Ok(path)
}

/// Read an index file, refusing anything larger than [`MAX_FILE_SIZE`].
pub fn read_index(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let file = fs::File::open(path.as_ref())?;
    let size = file.metadata()?.len();
    if size > MAX_FILE_SIZE {
        return Err(Error::corrupt(
            0,
            format!("index file is {} bytes, limit is {}", size, MAX_FILE_SIZE),
        ));
    }

    let mut bytes = Vec::with_capacity(size as usize);
    // The file may grow between the metadata call and the read
    file.take(MAX_FILE_SIZE + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(Error::corrupt(0, "index file exceeds the size limit"));
    }

    Ok(bytes)
}
