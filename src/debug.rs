// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Graphviz export of the trie, for looking at what the builder produced.
//!
//! ```bash
//! dot -Tsvg trie.dot > trie.svg
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::trie::{Trie, TrieNode};

/// Render `trie` as a `digraph`.
///
/// Nodes are labeled with their fragment (and posting count, when they have
/// postings); edges with the child key. The root is left out, so each of its
/// children starts its own tree.
pub fn trie_to_dot(trie: &Trie) -> String {
    let mut out = String::from("digraph {\n");
    let mut next_id = 0usize;

    let mut stack: Vec<(Option<usize>, char, &TrieNode)> = trie
        .root()
        .children()
        .rev()
        .map(|(key, child)| (None, key, child))
        .collect();

    while let Some((parent, key, node)) = stack.pop() {
        let id = next_id;
        next_id += 1;

        let label = if node.postings().is_empty() {
            node.fragment().to_string()
        } else {
            format!("{} ({})", node.fragment(), node.postings().len())
        };
        let _ = writeln!(out, "  node{} [label={}];", id, quote(&label));

        if let Some(parent) = parent {
            let _ = writeln!(
                out,
                "  node{} -> node{} [label={}];",
                parent,
                id,
                quote(&key.to_string())
            );
        }

        stack.extend(
            node.children()
                .rev()
                .map(|(key, child)| (Some(id), key, child)),
        );
    }

    out.push_str("}\n");
    out
}

/// Write [`trie_to_dot`] output to `path`.
pub fn write_trie_dot(path: impl AsRef<Path>, trie: &Trie) -> Result<()> {
    fs::write(path, trie_to_dot(trie))?;
    Ok(())
}

/// DOT string literal. JSON string escaping is a valid subset.
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}
