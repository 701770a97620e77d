// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Location registry: every indexed text leaf gets a small integer handle.
//!
//! The trie stores these ids instead of `(doc_id, path)` pairs, which keeps
//! postings tiny and keeps the trie free of references into the registry.

use std::collections::BTreeMap;

use crate::binary::{Load, Store};
use crate::document::DocId;
use crate::error::{Error, Result};

pub type LocationId = u32;

/// A text leaf within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub doc_id: DocId,
    /// Child index at every level from the structure root to the leaf
    pub path: Vec<u32>,
}

/// Append-only id → location table
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocationRegistry {
    locations: BTreeMap<LocationId, Location>,
    /// One past the largest id handed out or loaded; may reach `u32::MAX + 1`
    next_id: u64,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location and return its id (0-based, in insertion order).
    ///
    /// Fails with [`Error::LocationsExhausted`] once every id is taken; an
    /// existing id is never handed out again.
    pub fn add_location(&mut self, doc_id: DocId, path: Vec<u32>) -> Result<LocationId> {
        let id = LocationId::try_from(self.next_id).map_err(|_| Error::LocationsExhausted)?;
        self.next_id += 1;
        self.locations.insert(id, Location { doc_id, path });
        Ok(id)
    }

    /// Ids still available to [`add_location`](Self::add_location).
    pub fn remaining_ids(&self) -> u64 {
        (u64::from(LocationId::MAX) + 1) - self.next_id
    }

    #[inline]
    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(&id)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations in id order
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> + '_ {
        self.locations.iter().map(|(&id, location)| (id, location))
    }

    /// Count, then `(id, doc_id, path)` per entry.
    ///
    /// Ids are written explicitly even though a builder assigns them
    /// sequentially, so a reader never has to assume the numbering.
    pub fn store(&self, store: &mut Store) {
        store.write_varint(self.locations.len() as u64);
        for (&id, location) in &self.locations {
            store.write_varint(id as u64);
            store.write_varint(location.doc_id as u64);
            store.write_varint_seq(&location.path);
        }
    }

    pub fn load(load: &mut Load<'_>) -> Result<Self> {
        // id, doc_id and path length take a byte each at minimum
        let count = load.read_count(3)?;
        let mut registry = Self::new();

        for _ in 0..count {
            let offset = load.position();
            let id = load.read_varint_u32()?;
            let doc_id = load.read_varint_u32()?;
            let path = load.read_varint_seq()?;

            if registry
                .locations
                .insert(id, Location { doc_id, path })
                .is_some()
            {
                return Err(Error::corrupt(offset, format!("duplicate location id {}", id)));
            }

            registry.next_id = registry.next_id.max(u64::from(id) + 1);
        }

        Ok(registry)
    }
}
