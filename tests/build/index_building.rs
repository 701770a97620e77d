//! Builder behavior: locations, trie shape, statistics.

use leafdex::{Error, IndexBuilder, IndexDoc, StructNode, TokenizerConfig};

use crate::common::{code_block, doc, paragraph, site_builder};

// ============================================================================
// BASICS
// ============================================================================

#[test]
fn test_hello_world() {
    let mut builder = IndexBuilder::new();
    builder
        .add_document(IndexDoc::new(1, "hello", "Hello"), &[paragraph("hello world")])
        .unwrap();

    // One leaf, one location
    assert_eq!(builder.locations().len(), 1);
    let location = builder.locations().get(0).unwrap();
    assert_eq!(location.doc_id, 1);
    assert_eq!(location.path, vec![0, 0]);

    let root = builder.trie().root();
    let keys: Vec<char> = root.children().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!['h', 'w']);
    assert_eq!(root.child('h').unwrap().fragment(), "hello");
    assert_eq!(root.child('w').unwrap().fragment(), "world");

    let world = builder.trie().get("world");
    assert_eq!(world.len(), 1);
    assert_eq!((world[0].location, world[0].start, world[0].length), (0, 6, 5));
}

#[test]
fn test_location_ids_follow_insertion_order() {
    let mut builder = IndexBuilder::new();
    builder
        .add_document(doc(7, "first"), &[paragraph("alpha"), paragraph("beta")])
        .unwrap();
    builder
        .add_document(doc(3, "second"), &[paragraph("gamma")])
        .unwrap();

    let registered: Vec<(u32, u32, Vec<u32>)> = builder
        .locations()
        .iter()
        .map(|(id, location)| (id, location.doc_id, location.path.clone()))
        .collect();

    assert_eq!(
        registered,
        vec![
            (0, 7, vec![0, 0]),
            (1, 7, vec![1, 0]),
            (2, 3, vec![0, 0]),
        ]
    );

    // Documents come back in id order regardless of insertion order
    let ids: Vec<u32> = builder.documents().map(|doc| doc.id).collect();
    assert_eq!(ids, vec![3, 7]);
}

#[test]
fn test_duplicate_document_is_rejected_without_mutation() {
    let mut builder = site_builder();
    let locations = builder.locations().len();
    let nodes = builder.trie().node_count();
    let stats = *builder.stats();

    let err = builder
        .add_document(doc(2, "again"), &[paragraph("entirely new vocabulary here")])
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateDocument(2)));
    assert_eq!(err.to_string(), "duplicate index document ID 2");
    assert_eq!(builder.locations().len(), locations);
    assert_eq!(builder.trie().node_count(), nodes);
    assert_eq!(*builder.stats(), stats);
    assert!(builder.trie().search("vocabulari").is_empty());
}

#[test]
fn test_empty_structure_adds_document_only() {
    let mut builder = IndexBuilder::new();
    builder.add_document(doc(1, "empty"), &[]).unwrap();

    assert_eq!(builder.stats().documents, 1);
    assert!(builder.locations().is_empty());
    assert!(builder.trie().is_empty());
}

// ============================================================================
// TOKENIZATION MODES
// ============================================================================

#[test]
fn test_code_leaf_splits_identifiers() {
    let mut builder = IndexBuilder::new();
    builder
        .add_document(doc(1, "code"), &[code_block("let xmlHttpRequest = new_request();")])
        .unwrap();

    for token in ["let", "xml", "http", "request", "new"] {
        assert_eq!(builder.trie().get(token).len(), if token == "request" { 2 } else { 1 }, "{}", token);
    }

    // Code is never stemmed
    assert!(builder.trie().get("request").iter().all(|p| p.length == 7));
}

#[test]
fn test_code_mode_applies_to_direct_children_only() {
    let tree = vec![StructNode::element(
        "code",
        vec![StructNode::element("span", vec![StructNode::text("running_tests")])],
    )];

    let mut builder = IndexBuilder::new();
    builder.add_document(doc(1, "nested"), &tree).unwrap();

    // Under <span>, so prose rules apply: a single word, not split
    assert!(builder.trie().get("running").is_empty());
    assert!(builder.trie().get("tests").is_empty());
    assert_eq!(builder.trie().search("running_").len(), 1);
}

#[test]
fn test_verbatim_config_keeps_every_word() {
    let mut builder = IndexBuilder::with_config(TokenizerConfig::verbatim());
    builder
        .add_document(doc(1, "v"), &[paragraph("The dogs were running")])
        .unwrap();

    for word in ["the", "dogs", "were", "running"] {
        assert_eq!(builder.trie().get(word).len(), 1, "{}", word);
    }
}

// ============================================================================
// TRIE SHAPE
// ============================================================================

#[test]
fn test_node_count_bounded_by_token_chars() {
    let words = ["interstellar", "internal", "interval", "into", "tokenizer"];
    let mut builder = IndexBuilder::with_config(TokenizerConfig::verbatim());
    builder
        .add_document(doc(1, "words"), &[paragraph(&words.join(" "))])
        .unwrap();

    let chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let nodes = builder.trie().node_count();
    assert!(nodes < chars, "{} nodes for {} chars", nodes, chars);

    // int ─┬─ er ─┬─ stellar
    //      │      ├─ nal
    //      │      └─ val
    //      └─ o
    // tokenizer
    assert_eq!(nodes, 7);
    assert_eq!(builder.trie().max_depth(), 3);
}

#[test]
fn test_site_statistics() {
    let mut builder = site_builder();
    let bytes = builder.store();
    let stats = builder.stats();

    assert_eq!(stats.documents, 3);
    assert_eq!(stats.locations, 9);
    assert_eq!(stats.size, bytes.len());
    assert_eq!(stats.nodes, builder.trie().node_count());
    assert_eq!(stats.max_depth, builder.trie().max_depth());
    assert!(stats.tokens >= stats.locations);
}
