//! Browser Bindings
//!
//! `localStorage`, the address bar and the clipboard. Everything degrades
//! to a logged warning when the API is missing.

use tier_engine::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

// ========================
// Local Storage
// ========================

/// `KeyValueStore` over `window.localStorage`
///
/// Looked up on every call: a private window can refuse access at any time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe(e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // quota errors land here
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(describe(e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write(describe(e)))
    }
}

// ========================
// Address Bar
// ========================

pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// Value of `param` in the current query string
pub fn query_token(param: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get(param).filter(|token| !token.is_empty())
}

/// `origin + path + "?" + query`; the token alphabet needs no escaping
pub fn share_url(origin: &str, path: &str, query: &str) -> String {
    let path = if path.is_empty() { "/" } else { path };
    format!("{}{}?{}", origin.trim_end_matches('/'), path, query)
}

/// `search` with `param` set to `value`
///
/// The first pair for `param` is replaced in place and later repeats are
/// dropped; every other pair is kept verbatim.
pub fn merge_query(search: &str, param: &str, value: &str) -> String {
    let mut pairs: Vec<String> = Vec::new();
    let mut replaced = false;
    for pair in search.trim_start_matches('?').split('&').filter(|pair| !pair.is_empty()) {
        let key = pair.split_once('=').map_or(pair, |(key, _)| key);
        if key != param {
            pairs.push(pair.to_string());
        } else if !replaced {
            pairs.push(format!("{}={}", param, value));
            replaced = true;
        }
    }
    if !replaced {
        pairs.push(format!("{}={}", param, value));
    }
    pairs.join("&")
}

/// Set one query parameter in place, without a history entry
///
/// Other parameters and the fragment are left alone.
pub fn replace_query(param: &str, value: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let location = window.location();
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    let hash = location.hash().unwrap_or_default();
    let url = format!("{}{}", share_url("", &path, &merge_query(&search, param, value)), hash);
    match window.history() {
        Ok(history) => {
            if let Err(e) = history.replace_state_with_url(&JsValue::NULL, "", Some(&url)) {
                log::warn!("failed to update address bar: {}", describe(e));
            }
        }
        Err(e) => log::warn!("history unavailable: {}", describe(e)),
    }
}

/// Full link to the current page with `query`
pub fn current_share_url(query: &str) -> Option<String> {
    let location = web_sys::window()?.location();
    let origin = location.origin().ok()?;
    let path = location.pathname().unwrap_or_default();
    Some(share_url(&origin, &path, query))
}

// ========================
// Clipboard
// ========================

pub async fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("no window")?;
    let promise = window.navigator().clipboard().write_text(text);
    JsFuture::from(promise).await.map(|_| ()).map_err(describe)
}
