//! Structure walking as seen through the builder.

use leafdex::{parse_structure, walk, IndexBuilder, StructNode, Tokenizer};
use leafdex::structure::{outline, selector_for_path};

use crate::common::{doc, SITE_JSON};

#[test]
fn test_sibling_leaves_get_sibling_paths() {
    let tree = vec![StructNode::element(
        "div",
        vec![
            StructNode::element("h1", vec![StructNode::text("heading")]),
            StructNode::element(
                "p",
                vec![StructNode::text("first leaf"), StructNode::text("second leaf")],
            ),
        ],
    )];

    let mut builder = IndexBuilder::new();
    builder.add_document(doc(1, "siblings"), &tree).unwrap();

    let paths: Vec<Vec<u32>> = builder
        .locations()
        .iter()
        .map(|(_, location)| location.path.clone())
        .collect();
    assert_eq!(paths, vec![vec![0, 0, 0], vec![0, 1, 0], vec![0, 1, 1]]);

    let leaf = builder.trie().get("second");
    assert_eq!(leaf.len(), 1);
    assert_eq!(builder.locations().get(leaf[0].location).unwrap().path, vec![0, 1, 1]);
}

#[test]
fn test_paths_address_the_leaf() {
    let structure = parse_structure(SITE_JSON[0].1).unwrap();

    for item in walk(&structure) {
        let mut children = structure.as_slice();
        let mut node = None;
        for &index in &item.path {
            let current = &children[index as usize];
            node = Some(current);
            if let StructNode::Element { children: next, .. } = current {
                children = next;
            }
        }

        match node {
            Some(StructNode::Text { content: Some(content) }) => {
                assert_eq!(content, item.content)
            }
            other => panic!("path {:?} resolved to {:?}", item.path, other),
        }
    }
}

#[test]
fn test_null_text_keeps_its_index() {
    let structure = parse_structure(SITE_JSON[1].1).unwrap();
    let last = walk(&structure).last().unwrap();
    assert_eq!(last.path, vec![2, 1]);
    assert_eq!(last.content, "Prefix trees make it fast enough.");
}

#[test]
fn test_walk_reports_enclosing_tag() {
    let structure = parse_structure(SITE_JSON[0].1).unwrap();
    let tags: Vec<&str> = walk(&structure).map(|item| item.tag_name).collect();
    assert_eq!(tags, vec!["h1", "p", "em", "p", "code"]);
}

#[test]
fn test_selector_for_match() {
    let structure = parse_structure(SITE_JSON[0].1).unwrap();
    let selector = selector_for_path(&structure, &[1, 1, 0]);
    assert_eq!(selector.selector, "p:nth-of-type(1) > em:nth-of-type(1)");
    assert_eq!(selector.index, 0);
}

#[test]
fn test_outline_shows_code_tokens() {
    let structure = parse_structure(SITE_JSON[0].1).unwrap();
    let text = outline(&structure, &Tokenizer::default());
    assert!(text.contains("<code> (2,0)"), "{}", text);
    assert!(text.contains("#text: insert token node mut trie node"), "{}", text);
}
