// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document structure trees and the leaf walker.
//!
//! The tree comes from an external HTML/Markdown parser. We only care about
//! two node kinds: elements (tag name + children) and text. A text leaf is
//! addressed by its path, the child index at every level from the root, which
//! is what the frontend uses to find the DOM text node to highlight.

use std::fmt::Write as _;
use std::iter::Enumerate;
use std::slice::Iter;

use serde::{Deserialize, Serialize};

use crate::tokens::{TokenMode, Tokenizer};

/// A node of a document structure tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StructNode {
    #[serde(rename_all = "camelCase")]
    Element {
        tag_name: String,
        #[serde(default)]
        children: Vec<StructNode>,
    },
    Text {
        #[serde(default)]
        content: Option<String>,
    },
}

impl StructNode {
    pub fn element(tag_name: impl Into<String>, children: Vec<StructNode>) -> Self {
        StructNode::Element {
            tag_name: tag_name.into(),
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        StructNode::Text {
            content: Some(content.into()),
        }
    }
}

/// Parse the parser's JSON rendition of a structure forest.
pub fn parse_structure(json: &str) -> serde_json::Result<Vec<StructNode>> {
    serde_json::from_str(json)
}

// ============================================================================
// WALKER
// ============================================================================

/// A text leaf found by [`walk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkItem<'a> {
    pub path: Vec<u32>,
    /// Tag of the immediately enclosing element, `""` at the root
    pub tag_name: &'a str,
    pub content: &'a str,
}

struct Frame<'a> {
    siblings: Enumerate<Iter<'a, StructNode>>,
    tag_name: &'a str,
}

/// Depth-first, pre-order iterator over the non-empty text leaves of a tree.
///
/// Keeps its own stack of sibling iterators instead of recursing, so a
/// pathologically deep tree costs heap, not call stack.
pub struct StructWalker<'a> {
    stack: Vec<Frame<'a>>,
    /// Child index of every element on the stack below the top frame
    path: Vec<u32>,
}

/// Walk the text leaves of a structure forest.
pub fn walk(root: &[StructNode]) -> StructWalker<'_> {
    StructWalker {
        stack: vec![Frame {
            siblings: root.iter().enumerate(),
            tag_name: "",
        }],
        path: Vec::new(),
    }
}

impl<'a> Iterator for StructWalker<'a> {
    type Item = WalkItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let tag_name = frame.tag_name;

            let Some((index, node)) = frame.siblings.next() else {
                self.stack.pop();
                self.path.pop();
                continue;
            };

            match node {
                StructNode::Text {
                    content: Some(content),
                } if !content.is_empty() => {
                    let mut path = Vec::with_capacity(self.path.len() + 1);
                    path.extend_from_slice(&self.path);
                    path.push(index as u32);
                    return Some(WalkItem {
                        path,
                        tag_name,
                        content,
                    });
                }
                StructNode::Text { .. } => {}
                StructNode::Element { tag_name, children } => {
                    self.path.push(index as u32);
                    self.stack.push(Frame {
                        siblings: children.iter().enumerate(),
                        tag_name,
                    });
                }
            }
        }
    }
}

// ============================================================================
// SELECTORS
// ============================================================================

/// CSS selector for the element that holds a leaf, plus the leaf's index
/// among that element's child nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructSelector {
    pub selector: String,
    pub index: u32,
}

/// Resolve a location path to `tag:nth-of-type(n) > ...` form.
///
/// The walk stops at the first text node or out-of-range index, so the
/// selector always names an element.
pub fn selector_for_path(root: &[StructNode], path: &[u32]) -> StructSelector {
    let mut children = root;
    let mut parts = Vec::new();

    for &index in path {
        let index = index as usize;
        let Some(StructNode::Element {
            tag_name,
            children: next,
        }) = children.get(index)
        else {
            break;
        };

        let nth_of_type = 1 + children[..index]
            .iter()
            .filter(|prev| {
                matches!(prev, StructNode::Element { tag_name: t, .. } if t == tag_name)
            })
            .count();

        parts.push(format!("{}:nth-of-type({})", tag_name, nth_of_type));
        children = next;
    }

    StructSelector {
        selector: parts.join(" > "),
        index: path.last().copied().unwrap_or(0),
    }
}

// ============================================================================
// OUTLINE
// ============================================================================

/// Indented outline of a tree with each text leaf's tokens. Debugging aid.
pub fn outline(root: &[StructNode], tokenizer: &Tokenizer) -> String {
    fn node(
        out: &mut String,
        tokenizer: &Tokenizer,
        item: &StructNode,
        parent_tag: &str,
        depth: usize,
        path: &mut Vec<u32>,
    ) {
        let indent = "  ".repeat(depth);
        match item {
            StructNode::Element { tag_name, children } => {
                let joined = path
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                let _ = writeln!(out, "{}<{}> ({})", indent, tag_name, joined);
                for (index, child) in children.iter().enumerate() {
                    path.push(index as u32);
                    node(out, tokenizer, child, tag_name, depth + 1, path);
                    path.pop();
                }
                let _ = writeln!(out, "{}</{}>", indent, tag_name);
            }
            StructNode::Text { content } => {
                let tokens = tokenizer
                    .tokenize(
                        content.as_deref().unwrap_or_default(),
                        TokenMode::for_tag(parent_tag),
                    )
                    .into_iter()
                    .map(|token| token.text)
                    .collect::<Vec<_>>()
                    .join(" ");
                let _ = writeln!(out, "{}#text: {}", indent, tokens);
            }
        }
    }

    let mut out = String::new();
    let mut path = Vec::new();
    for (index, item) in root.iter().enumerate() {
        path.push(index as u32);
        node(&mut out, tokenizer, item, "", 0, &mut path);
        path.pop();
    }
    out
}
