//! Item Entity
//!
//! A rankable thing: a catalog image, a user upload, or a placeholder
//! standing in for an id nothing else knows about.

use serde::{Deserialize, Serialize};

/// Which resolver strategy produced an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    /// Bundled catalog (authoritative)
    Catalog,
    /// User-supplied, persisted in local storage
    Custom,
    /// Synthesized from the token content alone
    #[default]
    Placeholder,
}

/// A single item placed on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique across every source, e.g. `"games-zelda.png"`
    pub id: String,
    /// Display label, also the sort key and dedup fallback
    pub content: String,
    /// Absolute URL, site-relative path or data URL
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: ItemSource,
}

impl Item {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            image_url: None,
            source: ItemSource::Placeholder,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_source(mut self, source: ItemSource) -> Self {
        self.source = source;
        self
    }
}
