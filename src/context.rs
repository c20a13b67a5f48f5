//! Application Context
//!
//! Shared engine handle provided via Leptos Context API.

use leptos::prelude::*;
use tier_engine::TierStateEngine;

use crate::browser;
use crate::store::{store_sync, AppStore};

/// Session engine plus the store mirroring it
#[derive(Clone, Copy)]
pub struct EngineContext {
    engine: StoredValue<TierStateEngine, LocalStorage>,
    pub store: AppStore,
}

impl EngineContext {
    pub fn new(engine: TierStateEngine, store: AppStore) -> Self {
        Self {
            engine: StoredValue::new_local(engine),
            store,
        }
    }

    /// Read engine state without touching the board
    pub fn with<R>(&self, f: impl FnOnce(&TierStateEngine) -> R) -> R {
        self.engine.with_value(f)
    }

    /// Run one user action, then refresh the store and the address bar
    ///
    /// `None` once the owning scope is gone.
    pub fn apply<R>(&self, f: impl FnOnce(&mut TierStateEngine) -> R) -> Option<R> {
        let result = self.engine.try_update_value(f)?;
        let store = self.store;
        let (param, token) = self.engine.try_with_value(|engine| {
            store_sync(&store, engine);
            (engine.config().query_param.clone(), engine.token())
        })?;
        browser::replace_query(&param, &token);
        Some(result)
    }
}

pub fn use_engine() -> EngineContext {
    use_context::<EngineContext>().expect("EngineContext should be provided")
}
