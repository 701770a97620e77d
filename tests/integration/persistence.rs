//! Writing indexes to disk and loading them back.

use std::fs;

use leafdex::binary::MAX_FILE_SIZE;
use leafdex::persist::{index_file_name, read_index, write_index};
use leafdex::{Index, IndexBuilder};
use tempfile::TempDir;

use crate::common::{paragraph, site_builder};

#[test]
fn test_write_load_query() {
    let dir = TempDir::new().unwrap();
    let bytes = site_builder().store();

    let path = write_index(dir.path(), &bytes).unwrap();
    let index: Index = Index::load(&read_index(&path).unwrap()).unwrap();

    assert_eq!(index.stats().size, bytes.len());
    assert!(index.query("radix", None).contains_key(&1));
}

#[test]
fn test_changed_content_gets_new_name() {
    let dir = TempDir::new().unwrap();

    let first = write_index(dir.path(), &site_builder().store()).unwrap();

    let mut builder = site_builder();
    builder
        .add_document(crate::common::doc(10, "new-post"), &[paragraph("fresh words")])
        .unwrap();
    let second = write_index(dir.path(), &builder.store()).unwrap();

    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());

    // Rewriting identical content lands on the same file
    let again = write_index(dir.path(), &site_builder().store()).unwrap();
    assert_eq!(first, again);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_file_name_format() {
    let bytes = IndexBuilder::<leafdex::IndexDoc>::new().store();
    let name = index_file_name(&bytes);
    assert!(name.starts_with("index-"));
    assert!(name.ends_with(".bin"));
    assert_eq!(name.len(), "index-".len() + 8 + ".bin".len());
}

#[test]
fn test_read_rejects_oversized_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.bin");

    // Sparse file: the length is all that matters
    let file = fs::File::create(&path).unwrap();
    file.set_len(MAX_FILE_SIZE + 1).unwrap();

    assert!(read_index(&path).is_err());
}
