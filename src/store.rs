//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.
//! A read-only mirror of the engine, refreshed after every action.

use leptos::prelude::*;
use reactive_stores::Store;
use tier_engine::{Board, LabelPosition, TierStateEngine};

/// What the views render
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub board: Board,
    /// Active template preset
    pub template: String,
    pub label_position: LabelPosition,
    pub can_undo: bool,
    /// Catalog package names for the picker
    pub packages: Vec<String>,
}

impl AppState {
    pub fn from_engine(engine: &TierStateEngine) -> Self {
        Self {
            board: engine.board().clone(),
            template: engine.template_name().to_string(),
            label_position: engine.label_position(),
            can_undo: engine.can_undo(),
            packages: engine.catalog().package_names().map(str::to_string).collect(),
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Copy the engine's current state into the store
///
/// Fields are only written when they changed, so untouched views stay put.
pub fn store_sync(store: &AppStore, engine: &TierStateEngine) {
    if store.board().with_untracked(|board| board != engine.board()) {
        store.board().set(engine.board().clone());
    }
    if store.template().with_untracked(|name| name != engine.template_name()) {
        store.template().set(engine.template_name().to_string());
    }
    if store.label_position().get_untracked() != engine.label_position() {
        store.label_position().set(engine.label_position());
    }
    if store.can_undo().get_untracked() != engine.can_undo() {
        store.can_undo().set(engine.can_undo());
    }
}
