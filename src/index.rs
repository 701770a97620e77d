// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Loaded indexes and the query surface.
//!
//! [`Index::load`] is the mirror of [`IndexBuilder::store`]: magic first,
//! then documents, locations and the trie. Loading is all-or-nothing; a
//! buffer either decodes completely, with every cross-reference checked, or
//! the call returns the first problem found.
//!
//! [`IndexBuilder::store`]: crate::IndexBuilder::store

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::binary::{Load, MAGIC, MAGIC_BYTES};
use crate::config::TokenizerConfig;
use crate::document::{DocId, IndexDoc, Record};
use crate::error::{Error, Result};
use crate::location::{LocationId, LocationRegistry};
use crate::stats::{DecodeStats, Stopwatch};
use crate::tokens::Tokenizer;
use crate::trie::{Range, Trie};

/// One posting resolved to its document and leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub doc_id: DocId,
    pub location: LocationId,
    pub path: Vec<u32>,
    pub start: u32,
    pub length: u32,
}

/// Merged match ranges within one text leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPosition {
    pub location: LocationId,
    pub ranges: Vec<Range>,
}

/// A read-only index, decoded from a buffer or taken from a builder.
#[derive(Debug)]
pub struct Index<D: Record = IndexDoc> {
    tokenizer: Tokenizer,
    documents: BTreeMap<DocId, D>,
    locations: LocationRegistry,
    trie: Trie,
    stats: DecodeStats,
}

impl<D: Record> Index<D> {
    pub(crate) fn from_parts(
        tokenizer: Tokenizer,
        documents: BTreeMap<DocId, D>,
        locations: LocationRegistry,
        trie: Trie,
    ) -> Self {
        let stats = DecodeStats {
            documents: documents.len(),
            locations: locations.len(),
            nodes: trie.node_count(),
            ..DecodeStats::default()
        };

        Self {
            tokenizer,
            documents,
            locations,
            trie,
            stats,
        }
    }

    /// Decode an index from a buffer produced by [`IndexBuilder::store`].
    ///
    /// [`IndexBuilder::store`]: crate::IndexBuilder::store
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let started = Stopwatch::start();
        let mut stats = DecodeStats::new(bytes.len());
        let mut load = Load::new(bytes);

        check_magic(&mut load)?;

        let phase = Stopwatch::start();
        let documents = load_documents::<D>(&mut load)?;
        stats.documents = documents.len();
        stats.timings.documents = phase.elapsed();

        let phase = Stopwatch::start();
        let offset = load.position();
        let locations = LocationRegistry::load(&mut load)?;
        if let Some((id, location)) = locations
            .iter()
            .find(|(_, location)| !documents.contains_key(&location.doc_id))
        {
            return Err(Error::corrupt(
                offset,
                format!("location {} names unknown document {}", id, location.doc_id),
            ));
        }
        stats.locations = locations.len();
        stats.timings.locations = phase.elapsed();

        let phase = Stopwatch::start();
        let offset = load.position();
        let trie = Trie::load(&mut load)?;
        check_postings(&trie, &locations, offset)?;
        stats.nodes = trie.node_count();
        stats.timings.trie = phase.elapsed();

        if !load.is_exhausted() {
            return Err(Error::corrupt(
                load.position(),
                format!("{} trailing byte(s)", load.remaining()),
            ));
        }

        stats.timings.total = started.elapsed();
        stats.log();

        Ok(Self {
            tokenizer: Tokenizer::default(),
            documents,
            locations,
            trie,
            stats,
        })
    }

    /// Use `config` for [`query`](Self::query). Must match the configuration
    /// the index was built with.
    pub fn with_config(mut self, config: TokenizerConfig) -> Self {
        self.tokenizer = Tokenizer::new(&config);
        self
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn document(&self, id: DocId) -> Option<&D> {
        self.documents.get(&id)
    }

    /// Documents in id order
    pub fn documents(&self) -> impl Iterator<Item = &D> + '_ {
        self.documents.values()
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Every occurrence of a token starting with `prefix`.
    ///
    /// `prefix` is matched as-is against the indexed (normalized, stemmed)
    /// forms. Results are ordered by location, then start.
    pub fn search(&self, prefix: &str) -> Vec<SearchMatch> {
        self.trie
            .search(prefix)
            .into_iter()
            .filter_map(|posting| {
                let location = self.locations.get(posting.location)?;
                Some(SearchMatch {
                    doc_id: location.doc_id,
                    location: posting.location,
                    path: location.path.clone(),
                    start: posting.start,
                    length: posting.length,
                })
            })
            .collect()
    }

    /// Search for user input.
    ///
    /// The input is tokenized like prose, and every token is matched as a
    /// prefix. Only documents matching all tokens are returned, optionally
    /// restricted to `doc`. Overlapping ranges within a leaf are merged.
    pub fn query(&self, input: &str, doc: Option<DocId>) -> BTreeMap<DocId, Vec<SearchPosition>> {
        let tokens = self.tokenizer.tokenize_phrasing(input);
        if tokens.is_empty() {
            return BTreeMap::new();
        }

        let matches: Vec<_> = tokens
            .iter()
            .map(|token| self.query_term(&token.text, doc))
            .collect();

        let mut common: Option<BTreeSet<DocId>> = None;
        for found in &matches {
            let ids: BTreeSet<DocId> = found.keys().copied().collect();
            common = Some(match common {
                Some(common) => common.intersection(&ids).copied().collect(),
                None => ids,
            });
        }

        let common = common.unwrap_or_default();
        if common.is_empty() {
            return BTreeMap::new();
        }

        let mut combined: BTreeMap<DocId, BTreeMap<LocationId, Vec<Range>>> = BTreeMap::new();
        for found in matches {
            for (doc_id, locations) in found {
                if !common.contains(&doc_id) {
                    continue;
                }

                let positions = combined.entry(doc_id).or_default();
                for (location, ranges) in locations {
                    Range::merge(positions.entry(location).or_default(), ranges);
                }
            }
        }

        combined
            .into_iter()
            .map(|(doc_id, positions)| {
                let positions = positions
                    .into_iter()
                    .map(|(location, ranges)| SearchPosition { location, ranges })
                    .collect();
                (doc_id, positions)
            })
            .collect()
    }

    fn query_term(
        &self,
        prefix: &str,
        doc: Option<DocId>,
    ) -> BTreeMap<DocId, BTreeMap<LocationId, Vec<Range>>> {
        let mut found: BTreeMap<DocId, BTreeMap<LocationId, Vec<Range>>> = BTreeMap::new();

        for (location, ranges) in self.trie.search_ranges(prefix) {
            let Some(resolved) = self.locations.get(location) else {
                continue;
            };
            if doc.is_some_and(|doc| doc != resolved.doc_id) {
                continue;
            }

            found
                .entry(resolved.doc_id)
                .or_default()
                .insert(location, ranges);
        }

        found
    }
}

fn check_magic(load: &mut Load<'_>) -> Result<()> {
    if load.remaining() < MAGIC_BYTES.len() {
        let mut found = [0u8; 4];
        let available = load.remaining();
        found[..available].copy_from_slice(load.read_bytes(available)?);
        return Err(Error::BadMagic {
            expected: MAGIC,
            found: u32::from_be_bytes(found),
        });
    }

    let found = load.read_u32()?;
    if found != MAGIC {
        return Err(Error::BadMagic {
            expected: MAGIC,
            found,
        });
    }
    Ok(())
}

fn load_documents<D: Record>(load: &mut Load<'_>) -> Result<BTreeMap<DocId, D>> {
    let count = load.read_count(1)?;
    let mut documents = BTreeMap::new();

    for _ in 0..count {
        let offset = load.position();
        let doc = D::load(load)?;
        match documents.entry(doc.id()) {
            Entry::Vacant(entry) => {
                entry.insert(doc);
            }
            Entry::Occupied(entry) => {
                return Err(Error::corrupt(
                    offset,
                    format!("duplicate document id {}", entry.key()),
                ));
            }
        }
    }

    Ok(documents)
}

/// Every posting must name a registered location.
fn check_postings(trie: &Trie, locations: &LocationRegistry, offset: usize) -> Result<()> {
    let mut stack = vec![trie.root()];
    while let Some(node) = stack.pop() {
        if let Some(posting) = node
            .postings()
            .iter()
            .find(|posting| locations.get(posting.location).is_none())
        {
            return Err(Error::corrupt(
                offset,
                format!("posting names unknown location {}", posting.location),
            ));
        }
        stack.extend(node.children().map(|(_, child)| child));
    }
    Ok(())
}
