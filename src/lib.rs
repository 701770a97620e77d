// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build-time full-text search indexes for static sites.
//!
//! At build time, every page's parsed structure is walked, its text leaves
//! are tokenized, and each token is recorded in a compressed radix trie
//! along with the leaf it came from. The whole thing is then written into
//! one compact binary buffer that the browser downloads and queries locally.
//! No search server.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ structure.rs │──▶│  tokens.rs  │──▶│   trie.rs    │
//! │ (walk leaves)│   │ (prose/code)│   │ (postings)   │
//! └──────────────┘   └─────────────┘   └──────────────┘
//!         │                                   ▲
//!         ▼                                   │ location ids
//! ┌──────────────┐                    ┌──────────────┐
//! │ location.rs  │◀───────────────────│   build/     │
//! │ (doc, path)  │                    │(IndexBuilder)│
//! └──────────────┘                    └──────────────┘
//!         │                                   │ store()
//!         ▼                                   ▼
//! ┌─────────────────────────────────────────────────────┐
//! │ binary/  (varints, Store, Load)     →  index.rs     │
//! │                                       (Index::load) │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use leafdex::{Index, IndexBuilder, IndexDoc, StructNode};
//!
//! let mut builder = IndexBuilder::new();
//! builder.add_document(
//!     IndexDoc::new(1, "hello", "Hello"),
//!     &[StructNode::element("p", vec![StructNode::text("hello world")])],
//! )?;
//!
//! let bytes = builder.store();
//! let index: Index = Index::load(&bytes)?;
//!
//! let results = index.query("world", None);
//! assert_eq!(results[&1][0].ranges[0].start, 6);
//! # Ok::<(), leafdex::Error>(())
//! ```

pub mod binary;
pub mod config;
pub mod debug;
pub mod document;
pub mod error;
pub mod location;
pub mod persist;
pub mod stats;
pub mod stop;
pub mod structure;
pub mod tokens;
pub mod trie;
mod build;
mod index;
mod utils;

pub use build::IndexBuilder;
pub use config::TokenizerConfig;
pub use document::{DocId, IndexDoc, Record};
pub use error::{Error, Result};
pub use index::{Index, SearchMatch, SearchPosition};
pub use location::{Location, LocationId, LocationRegistry};
pub use stats::{BuildStats, DecodeStats, DecodeTimings};
pub use structure::{parse_structure, walk, StructNode, StructSelector, StructWalker, WalkItem};
pub use tokens::{tokenize, Token, TokenMode, Tokenizer};
pub use trie::{Posting, Range, Trie, TrieNode};
pub use utils::{common_prefix_len, normalize};
