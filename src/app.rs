//! Tier List Frontend App
//!
//! Builds the session engine, seeds it from the address bar and lays out
//! toolbar, board and item form.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use tier_engine::{Catalog, EngineConfig, TierStateEngine};

use crate::browser::{self, BrowserStorage};
use crate::components::{NewItemForm, TierBoard, Toolbar};
use crate::context::EngineContext;
use crate::store::{AppState, AppStateStoreFields};

const CATALOG_JSON: &str = include_str!("../assets/catalog.json");

fn build_engine() -> Result<TierStateEngine, tier_engine::EngineError> {
    let mut config = EngineConfig::default();
    if let Some(origin) = browser::page_origin() {
        config = config.with_base_origin(origin);
    }

    let catalog = Catalog::from_json(CATALOG_JSON).unwrap_or_else(|e| {
        log::error!("bundled catalog is unreadable: {}", e);
        Catalog::empty()
    });

    let mut engine = match TierStateEngine::new(config, catalog.clone(), Box::new(BrowserStorage)) {
        Ok(engine) => engine,
        Err(e) => {
            log::warn!("page origin rejected ({}), using the default origin", e);
            let fallback = EngineConfig::default();
            TierStateEngine::new(fallback, catalog, Box::new(BrowserStorage))?
        }
    };

    let token = browser::query_token(&engine.config().query_param);
    engine.load_token(token.as_deref());
    Ok(engine)
}

/// Copies the buffered log for bug reports
#[component]
fn CopyLogButton() -> impl IntoView {
    let copy_log = move |_| {
        let lines = rolling_logger::recent_lines().join("\n");
        spawn_local(async move {
            if let Err(e) = browser::copy_to_clipboard(&lines).await {
                log::warn!("clipboard refused the log: {}", e);
            }
        });
    };

    view! { <button type="button" class="log-btn" on:click=copy_log>"Copy debug log"</button> }
}

#[component]
pub fn App() -> impl IntoView {
    let engine = match build_engine() {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("cannot start tier list: {}", e);
            return view! { <p class="fatal">"Tier list failed to start."</p> }.into_any();
        }
    };

    let store = Store::new(AppState::from_engine(&engine));
    provide_context(EngineContext::new(engine, store));

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Tier List"</h1>
                <Toolbar />
                <TierBoard />
                <NewItemForm />
                <p class="item-count">
                    {move || format!("{} items", store.board().with(|board| board.item_count()))}
                </p>
                <footer class="app-footer">
                    <CopyLogButton />
                </footer>
            </main>
        </div>
    }
    .into_any()
}
