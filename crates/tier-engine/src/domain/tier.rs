//! Tier and Board Entities
//!
//! A board is an ordered list of tiers; the first tier is the highest rank.
//! The sink tier ("uncategorized") is a typed marker rather than a magic id.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::Item;

/// Wire spelling of the sink tier id
pub const SINK_TIER_ID: &str = "uncategorized";

/// Display name given to a conjured sink tier
pub const SINK_TIER_NAME: &str = "Uncategorized";

/// Tier identity
///
/// `Sink` is serialized as `"uncategorized"` and that literal always
/// parses back to `Sink`, so no named tier can shadow it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TierId {
    Named(String),
    Sink,
}

impl TierId {
    pub fn named(id: impl Into<String>) -> Self {
        Self::from(id.into())
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, TierId::Sink)
    }

    pub fn as_str(&self) -> &str {
        match self {
            TierId::Named(id) => id,
            TierId::Sink => SINK_TIER_ID,
        }
    }
}

impl From<String> for TierId {
    fn from(id: String) -> Self {
        if id == SINK_TIER_ID {
            TierId::Sink
        } else {
            TierId::Named(id)
        }
    }
}

impl From<&str> for TierId {
    fn from(id: &str) -> Self {
        Self::from(id.to_string())
    }
}

impl From<TierId> for String {
    fn from(id: TierId) -> Self {
        match id {
            TierId::Named(id) => id,
            TierId::Sink => SINK_TIER_ID.to_string(),
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a row draws its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Left,
    Top,
    Right,
}

impl LabelPosition {
    pub const ALL: [LabelPosition; 3] = [LabelPosition::Left, LabelPosition::Top, LabelPosition::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelPosition::Left => "left",
            LabelPosition::Top => "top",
            LabelPosition::Right => "right",
        }
    }
}

/// A labeled row holding items in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: TierId,
    pub name: String,
    pub items: Vec<Item>,
    #[serde(rename = "labelPosition", default, skip_serializing_if = "Option::is_none")]
    pub label_position: Option<LabelPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Tier {
    pub fn new(id: impl Into<TierId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            items: Vec::new(),
            label_position: None,
            placeholder: None,
        }
    }

    /// A fresh, empty sink tier
    pub fn sink(label_position: Option<LabelPosition>) -> Self {
        Self {
            id: TierId::Sink,
            name: SINK_TIER_NAME.to_string(),
            items: Vec::new(),
            label_position,
            placeholder: None,
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Same tier with no items
    pub fn emptied(&self) -> Self {
        Self {
            items: Vec::new(),
            ..self.clone()
        }
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }
}

/// The full ordered set of tiers
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    pub tiers: Vec<Tier>,
}

impl Board {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    /// All items in display order, top tier first
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.tiers.iter().flat_map(|tier| tier.items.iter())
    }

    pub fn item_count(&self) -> usize {
        self.tiers.iter().map(|tier| tier.items.len()).sum()
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items().any(|item| item.id == item_id)
    }

    pub fn tier(&self, id: &TierId) -> Option<&Tier> {
        self.tiers.iter().find(|tier| &tier.id == id)
    }

    /// Tier currently holding the item
    pub fn tier_of(&self, item_id: &str) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.contains(item_id))
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}
