// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction.
//!
//! One [`IndexBuilder`] per site build. Documents go in one at a time with
//! their structure trees; when the last one is in, [`IndexBuilder::store`]
//! writes the whole index into a single buffer.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **UNIQUE_DOCUMENTS**: a document id is added at most once. A duplicate
//!    is rejected before the walker runs, so a failed call changes nothing.
//! 2. **LOCATIONS_HAVE_TOKENS**: a leaf gets a location only if it produced
//!    at least one token.
//! 3. **POSTINGS_RESOLVE**: every posting in the trie names a location in the
//!    registry, and every location names a stored document.
//! 4. **IDS_NOT_REUSED**: a document that would need more location ids than
//!    remain is rejected whole, before any leaf is registered.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::debug;

use crate::binary::{Store, MAGIC};
use crate::config::TokenizerConfig;
use crate::document::{DocId, IndexDoc, Record};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::location::LocationRegistry;
use crate::stats::BuildStats;
use crate::structure::{walk, StructNode};
use crate::tokens::{TokenMode, Tokenizer};
use crate::trie::{Range, Trie};

/// Accumulates documents, locations and the trie for one index.
#[derive(Debug)]
pub struct IndexBuilder<D: Record = IndexDoc> {
    tokenizer: Tokenizer,
    documents: BTreeMap<DocId, D>,
    locations: LocationRegistry,
    trie: Trie,
    stats: BuildStats,
}

impl<D: Record> Default for IndexBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Record> IndexBuilder<D> {
    pub fn new() -> Self {
        Self::with_config(TokenizerConfig::default())
    }

    /// Builder with a custom tokenizer configuration. Query with
    /// [`Index::with_config`] using the same configuration.
    pub fn with_config(config: TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(&config),
            documents: BTreeMap::new(),
            locations: LocationRegistry::new(),
            trie: Trie::new(),
            stats: BuildStats::default(),
        }
    }

    /// Index a document's text leaves.
    ///
    /// Text directly inside a `<code>` element is tokenized as code,
    /// everything else as prose.
    pub fn add_document(&mut self, doc: D, structure: &[StructNode]) -> Result<()> {
        let id = doc.id();
        let Entry::Vacant(slot) = self.documents.entry(id) else {
            return Err(Error::DuplicateDocument(id));
        };

        let leaves: Vec<_> = walk(structure)
            .filter_map(|item| {
                let found = self
                    .tokenizer
                    .tokenize(item.content, TokenMode::for_tag(item.tag_name));
                (!found.is_empty()).then_some((item.path, found))
            })
            .collect();

        if leaves.len() as u64 > self.locations.remaining_ids() {
            return Err(Error::LocationsExhausted);
        }

        let locations = leaves.len();
        let mut tokens = 0;

        for (path, found) in leaves {
            let location = self.locations.add_location(id, path)?;
            for token in &found {
                self.trie.insert(
                    &token.text,
                    location,
                    Range::new(span(token.start), span(token.length)),
                );
            }
            tokens += found.len();
        }

        slot.insert(doc);

        self.stats.documents += 1;
        self.stats.locations += locations;
        self.stats.tokens += tokens;

        debug!(doc_id = id, locations, tokens, "indexed document");
        Ok(())
    }

    /// Serialize the index into a fresh buffer.
    pub fn store(&mut self) -> Vec<u8> {
        // Roughly three posting varints per token, plus headers
        let mut store = Store::with_capacity(64 + self.stats.tokens * 4);
        self.store_into(&mut store);
        store.finish()
    }

    /// Append the serialized index to `store`.
    ///
    /// Layout: magic, documents in id order, location registry, trie. Fills
    /// in the size and shape fields of [`stats`](Self::stats).
    pub fn store_into(&mut self, store: &mut Store) {
        let start = store.len();

        store.write_u32(MAGIC);

        store.write_varint(self.documents.len() as u64);
        for doc in self.documents.values() {
            doc.store(store);
        }

        self.locations.store(store);
        self.trie.store(store);

        self.stats.nodes = self.trie.node_count();
        self.stats.max_depth = self.trie.max_depth();
        self.stats.size = store.len() - start;
        self.stats.log();
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Documents in id order
    pub fn documents(&self) -> impl Iterator<Item = &D> + '_ {
        self.documents.values()
    }

    pub fn document(&self, id: DocId) -> Option<&D> {
        self.documents.get(&id)
    }

    pub fn locations(&self) -> &LocationRegistry {
        &self.locations
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Query the index as built, without encoding it first.
    pub fn into_index(self) -> Index<D> {
        Index::from_parts(self.tokenizer, self.documents, self.locations, self.trie)
    }
}

/// Token offsets are measured in chars of a single text leaf.
fn span(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
