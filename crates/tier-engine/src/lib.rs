//! Tier List State Engine
//!
//! Layered like the rest of the app:
//! - domain: items, tiers, boards, template presets
//! - resolver: id -> item across catalog, custom store and placeholder
//! - codec: board <-> URL token
//! - reconciler: template migration, reset, delete-all, item edits
//! - engine: per-session owner of all of the above plus undo

mod config;
mod domain;
mod engine;
mod error;
mod og_image;
mod storage;

pub mod codec;
pub mod reconciler;
pub mod resolver;


pub use config::EngineConfig;
pub use domain::{
    Board, Item, ItemSource, LabelPosition, Template, TemplateRegistry, Tier, TierId, TierSkeleton,
    DEFAULT_TEMPLATE, SINK_TIER_ID, SINK_TIER_NAME,
};
pub use engine::TierStateEngine;
pub use error::{CatalogError, CodecError, EngineError, EngineResult, LzError, StorageError};
pub use og_image::OgImageNormalizer;
pub use resolver::{Catalog, CustomItem, CustomItemStore, ItemLookup, ItemResolver};
pub use storage::{KeyValueStore, MemoryStore, UnavailableStore};
