// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compressed radix trie mapping token text to postings.
//!
//! Edges carry whole runs of characters, so the node count tracks the number
//! of branching points rather than the number of characters indexed:
//!
//! ```text
//! insert "test", "testing", "tested"
//!
//!   (root)
//!     └─ "test" ● ─┬─ "ed" ●
//!                  └─ "ing" ●
//! ```
//!
//! Nodes marked ● carry postings. A node's children are keyed by the first
//! char of their fragment, which makes both insertion and lookup a single
//! map probe per edge.
//!
//! The trie never references the location registry directly; postings hold
//! plain [`LocationId`]s.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;

use serde::Serialize;

use crate::binary::{Load, Store, MAX_TRIE_DEPTH};
use crate::error::{Error, Result};
use crate::location::LocationId;
use crate::utils::common_prefix_len;

// ============================================================================
// POSTINGS
// ============================================================================

/// One occurrence of a token: where it is and which chars of the leaf it spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Posting {
    pub location: LocationId,
    pub start: u32,
    pub length: u32,
}

impl Posting {
    pub fn range(&self) -> Range {
        Range {
            start: self.start,
            length: self.length,
        }
    }
}

/// A span of chars within a text leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Range {
    pub start: u32,
    pub length: u32,
}

impl Range {
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.length)
    }

    /// Merge `from` into `ranges`.
    ///
    /// Afterwards `ranges` is sorted by start and no two ranges overlap or
    /// touch; such pairs are coalesced into one range covering both.
    pub fn merge(ranges: &mut Vec<Range>, from: impl IntoIterator<Item = Range>) {
        ranges.extend(from);
        if ranges.len() < 2 {
            return;
        }

        ranges.sort_unstable();

        let mut write = 0;
        for read in 1..ranges.len() {
            let next = ranges[read];
            let current = &mut ranges[write];
            if next.start <= current.end() {
                let end = current.end().max(next.end());
                current.length = end - current.start;
            } else {
                write += 1;
                ranges[write] = next;
            }
        }
        ranges.truncate(write + 1);
    }
}

// ============================================================================
// NODES
// ============================================================================

/// A trie node: an edge label plus whatever hangs off it
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrieNode {
    fragment: String,
    children: BTreeMap<char, TrieNode>,
    postings: Vec<Posting>,
}

impl TrieNode {
    fn new(fragment: &str) -> Self {
        Self {
            fragment: fragment.to_string(),
            ..Self::default()
        }
    }

    /// Edge label leading into this node (empty for the root)
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Postings of tokens ending exactly here, ordered by location
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Children in key order
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (char, &TrieNode)> + '_ {
        self.children.iter().map(|(&key, child)| (key, child))
    }

    pub fn child(&self, key: char) -> Option<&TrieNode> {
        self.children.get(&key)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Keep postings ordered by location; equal locations stay in
    /// insertion order.
    fn add_posting(&mut self, posting: Posting) {
        let at = self
            .postings
            .partition_point(|p| p.location <= posting.location);
        self.postings.insert(at, posting);
    }

    /// Cut the fragment at byte offset `at`, moving the tail, the children
    /// and the postings into a single new child.
    fn split_at(&mut self, at: usize) {
        let suffix = self.fragment.split_off(at);
        let Some(key) = suffix.chars().next() else {
            return;
        };

        let tail = TrieNode {
            fragment: suffix,
            children: mem::take(&mut self.children),
            postings: mem::take(&mut self.postings),
        };
        self.children.insert(key, tail);
    }
}

// ============================================================================
// TRIE
// ============================================================================

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Trie {
    root: TrieNode,
    /// Nodes below the root
    nodes: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of nodes, not counting the root.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && self.root.postings.is_empty()
    }

    /// Longest root-to-node path, in edges.
    pub fn max_depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children.values().map(|child| (child, depth + 1)));
        }
        max
    }

    /// Record an occurrence of `text`.
    pub fn insert(&mut self, text: &str, location: LocationId, range: Range) {
        let posting = Posting {
            location,
            start: range.start,
            length: range.length,
        };

        let mut node = &mut self.root;
        let mut rest = text;

        loop {
            let Some(first) = rest.chars().next() else {
                node.add_posting(posting);
                return;
            };

            match node.children.entry(first) {
                Entry::Vacant(entry) => {
                    let mut leaf = TrieNode::new(rest);
                    leaf.add_posting(posting);
                    entry.insert(leaf);
                    self.nodes += 1;
                    return;
                }
                Entry::Occupied(entry) => {
                    let child = entry.into_mut();
                    let common = common_prefix_len(&child.fragment, rest);

                    // `common` covers at least `first`, so the split never
                    // leaves an empty fragment behind.
                    if common < child.fragment.len() {
                        child.split_at(common);
                        self.nodes += 1;
                    }

                    rest = &rest[common..];
                    node = child;
                }
            }
        }
    }

    /// Root of the subtree holding every token that starts with `prefix`.
    ///
    /// A prefix that ends partway through a fragment matches that fragment's
    /// node. The empty prefix matches the root.
    pub fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        let mut rest = prefix;

        while let Some(first) = rest.chars().next() {
            let child = node.children.get(&first)?;
            let common = common_prefix_len(&child.fragment, rest);

            if common == rest.len() {
                return Some(child);
            }
            if common < child.fragment.len() {
                return None;
            }

            rest = &rest[common..];
            node = child;
        }

        Some(node)
    }

    /// Postings of exactly `text`.
    pub fn get(&self, text: &str) -> &[Posting] {
        let mut node = &self.root;
        let mut rest = text;

        while let Some(first) = rest.chars().next() {
            let Some(child) = node.children.get(&first) else {
                return &[];
            };
            let Some(tail) = rest.strip_prefix(child.fragment.as_str()) else {
                return &[];
            };
            rest = tail;
            node = child;
        }

        &node.postings
    }

    /// Every posting of every token starting with `prefix`, ordered by
    /// `(location, start, length)`.
    pub fn search(&self, prefix: &str) -> Vec<Posting> {
        let Some(found) = self.find(prefix) else {
            return Vec::new();
        };

        let mut postings = Vec::new();
        let mut stack = vec![found];
        while let Some(node) = stack.pop() {
            postings.extend_from_slice(&node.postings);
            stack.extend(node.children.values());
        }

        postings.sort_unstable();
        postings
    }

    /// [`search`](Self::search), grouped by location.
    pub fn search_ranges(&self, prefix: &str) -> BTreeMap<LocationId, Vec<Range>> {
        let mut grouped: BTreeMap<LocationId, Vec<Range>> = BTreeMap::new();
        for posting in self.search(prefix) {
            grouped
                .entry(posting.location)
                .or_default()
                .push(posting.range());
        }
        grouped
    }

    // ========================================================================
    // SERIALIZATION
    // ========================================================================

    /// Pre-order node records: fragment, postings (location delta-encoded),
    /// child count. Children follow in key order.
    pub fn store(&self, store: &mut Store) {
        let mut stack = vec![&self.root];

        while let Some(node) = stack.pop() {
            store.write_str(&node.fragment);

            store.write_varint(node.postings.len() as u64);
            let mut previous = 0;
            for posting in &node.postings {
                store.write_varint((posting.location - previous) as u64);
                store.write_varint(posting.start as u64);
                store.write_varint(posting.length as u64);
                previous = posting.location;
            }

            store.write_varint(node.children.len() as u64);
            // Reversed so the smallest key comes off the stack first
            stack.extend(node.children.values().rev());
        }
    }

    pub fn load(load: &mut Load<'_>) -> Result<Self> {
        struct Pending {
            node: TrieNode,
            remaining: usize,
            offset: usize,
        }

        let offset = load.position();
        let (root, remaining) = read_node(load)?;
        if !root.fragment.is_empty() {
            return Err(Error::corrupt(offset, "trie root has a fragment"));
        }

        let mut nodes = 0;
        let mut stack = vec![Pending {
            node: root,
            remaining,
            offset,
        }];

        while let Some(top) = stack.last_mut() {
            if top.remaining > 0 {
                top.remaining -= 1;

                let offset = load.position();
                if stack.len() > MAX_TRIE_DEPTH {
                    return Err(Error::corrupt(
                        offset,
                        format!("trie deeper than {} levels", MAX_TRIE_DEPTH),
                    ));
                }

                let (node, remaining) = read_node(load)?;
                if node.fragment.is_empty() {
                    return Err(Error::corrupt(offset, "empty fragment below the trie root"));
                }

                nodes += 1;
                stack.push(Pending {
                    node,
                    remaining,
                    offset,
                });
                continue;
            }

            let Some(done) = stack.pop() else { break };
            let Some(parent) = stack.last_mut() else {
                return Ok(Self {
                    root: done.node,
                    nodes,
                });
            };

            let Some(key) = done.node.fragment.chars().next() else {
                return Err(Error::corrupt(done.offset, "empty fragment below the trie root"));
            };
            match parent.node.children.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(done.node);
                }
                Entry::Occupied(_) => {
                    return Err(Error::corrupt(
                        done.offset,
                        format!("duplicate child key {:?}", key),
                    ));
                }
            }
        }

        Err(Error::corrupt(load.position(), "trie has no root"))
    }
}

/// A node record without its children, plus the number of children to follow.
fn read_node(load: &mut Load<'_>) -> Result<(TrieNode, usize)> {
    let fragment = load.read_str()?.to_string();

    // delta, start and length take a byte each at minimum
    let count = load.read_count(3)?;
    let mut postings = Vec::with_capacity(count);
    let mut location: LocationId = 0;
    for _ in 0..count {
        let offset = load.position();
        let delta = load.read_varint_u32()?;
        location = location
            .checked_add(delta)
            .ok_or_else(|| Error::corrupt(offset, "posting location exceeds u32"))?;
        let start = load.read_varint_u32()?;
        let length = load.read_varint_u32()?;
        postings.push(Posting {
            location,
            start,
            length,
        });
    }

    // Smallest child record: one-byte fragment with its length, two counts
    let children = load.read_count(4)?;

    Ok((
        TrieNode {
            fragment,
            children: BTreeMap::new(),
            postings,
        },
        children,
    ))
}
