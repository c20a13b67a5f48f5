//! Domain Layer
//!
//! Items, tiers, boards and template presets.
//! Nothing in here touches storage or the URL token.

mod item;
mod tier;
mod template;

pub use item::{Item, ItemSource};
pub use tier::{Board, LabelPosition, Tier, TierId, SINK_TIER_ID, SINK_TIER_NAME};
pub use template::{Template, TemplateRegistry, TierSkeleton, DEFAULT_TEMPLATE};
