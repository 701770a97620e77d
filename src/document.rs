// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::binary::{Load, Store};
use crate::error::{Error, Result};

/// Unique id of a document within one build
pub type DocId = u32;

/// A document stored alongside the index.
///
/// The index treats documents as opaque: it needs the id to attribute
/// locations, and otherwise lets the record write and read itself.
pub trait Record: Sized {
    fn id(&self) -> DocId;

    fn store(&self, store: &mut Store);

    fn load(load: &mut Load<'_>) -> Result<Self>;
}

const FLAG_PAGE: u64 = 0x01;
const FLAG_PUBLISHED: u64 = 0x02;
const FLAG_COVER: u64 = 0x04;
const FLAG_EXCERPT: u64 = 0x08;
const FLAG_BITS: u32 = 4;

/// The blog's summary of a post or page, enough to render a result card.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexDoc {
    pub id: DocId,
    /// Static page rather than a blog post
    #[serde(default)]
    pub page: bool,
    pub slug: String,
    pub title: String,
    /// Publication date as rendered by the site
    #[serde(default)]
    pub published: Option<String>,
    /// Cover image URL
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
}

impl IndexDoc {
    pub fn new(id: DocId, slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            page: false,
            slug: slug.into(),
            title: title.into(),
            published: None,
            cover: None,
            excerpt: None,
        }
    }

    pub fn url(&self) -> String {
        if self.page {
            format!("/{}", self.slug)
        } else {
            format!("/blog/{}", self.slug)
        }
    }
}

impl Record for IndexDoc {
    fn id(&self) -> DocId {
        self.id
    }

    /// `(id << 4) | flags` tag, then slug and title, then whichever optional
    /// strings the flags announce, in flag order.
    fn store(&self, store: &mut Store) {
        let mut tag = (self.id as u64) << FLAG_BITS;
        if self.page {
            tag |= FLAG_PAGE;
        }
        if self.published.is_some() {
            tag |= FLAG_PUBLISHED;
        }
        if self.cover.is_some() {
            tag |= FLAG_COVER;
        }
        if self.excerpt.is_some() {
            tag |= FLAG_EXCERPT;
        }

        store.write_varint(tag);
        store.write_str(&self.slug);
        store.write_str(&self.title);

        for value in [&self.published, &self.cover, &self.excerpt]
            .into_iter()
            .flatten()
        {
            store.write_str(value);
        }
    }

    fn load(load: &mut Load<'_>) -> Result<Self> {
        let offset = load.position();
        let tag = load.read_varint()?;
        let id = DocId::try_from(tag >> FLAG_BITS)
            .map_err(|_| Error::corrupt(offset, format!("document id {} exceeds u32", tag >> FLAG_BITS)))?;

        let slug = load.read_str()?.to_string();
        let title = load.read_str()?.to_string();

        let mut optional = |flag: u64| -> Result<Option<String>> {
            if tag & flag == flag {
                Ok(Some(load.read_str()?.to_string()))
            } else {
                Ok(None)
            }
        };

        let published = optional(FLAG_PUBLISHED)?;
        let cover = optional(FLAG_COVER)?;
        let excerpt = optional(FLAG_EXCERPT)?;

        Ok(Self {
            id,
            page: tag & FLAG_PAGE == FLAG_PAGE,
            slug,
            title,
            published,
            cover,
            excerpt,
        })
    }
}
