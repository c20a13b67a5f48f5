//! Custom Item Store
//!
//! User-supplied items, persisted as one JSON array under a fixed key.
//! Loaded lazily on first access; absent, corrupt or unreachable storage
//! all degrade to an empty store.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};

use super::ItemLookup;
use crate::domain::{Item, ItemSource};
use crate::storage::KeyValueStore;

/// Persisted record for a user-supplied item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomItem {
    pub id: String,
    pub content: String,
    /// Usually a data URL of the uploaded image
    pub image_data: String,
}

impl CustomItem {
    pub fn new(id: impl Into<String>, content: impl Into<String>, image_data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            image_data: image_data.into(),
        }
    }

    pub fn to_item(&self) -> Item {
        Item::new(self.id.clone(), self.content.clone())
            .with_image(self.image_data.clone())
            .with_source(ItemSource::Custom)
    }
}

pub struct CustomItemStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    /// Cleared for the rest of the session once storage refuses access
    enabled: Cell<bool>,
    entries: RefCell<Option<Vec<CustomItem>>>,
}

impl CustomItemStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: impl Into<String>, has_persistent_store: bool) -> Self {
        Self {
            backend,
            key: key.into(),
            enabled: Cell::new(has_persistent_store),
            entries: RefCell::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Stored records in insertion order
    pub fn items(&self) -> Vec<CustomItem> {
        self.with_entries(|entries| entries.clone())
    }

    pub fn get(&self, id: &str) -> Option<CustomItem> {
        self.with_entries(|entries| entries.iter().find(|e| e.id == id).cloned())
    }

    /// Upsert by id (last write wins), then persist the whole store
    pub fn add(&mut self, items: &[CustomItem]) {
        // first access may discover that storage is gone
        self.with_entries(|_| ());
        if !self.is_enabled() || items.is_empty() {
            return;
        }
        let snapshot = self.with_entries(|entries| {
            for item in items {
                match entries.iter_mut().find(|e| e.id == item.id) {
                    Some(existing) => *existing = item.clone(),
                    None => entries.push(item.clone()),
                }
            }
            entries.clone()
        });
        self.persist(&snapshot);
    }

    /// Forget every stored record and drop the key
    pub fn clear(&mut self) {
        if !self.is_enabled() {
            return;
        }
        *self.entries.get_mut() = Some(Vec::new());
        if let Err(e) = self.backend.remove(&self.key) {
            log::warn!("failed to clear custom items: {}", e);
        }
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut Vec<CustomItem>) -> R) -> R {
        let mut slot = self.entries.borrow_mut();
        let entries = slot.get_or_insert_with(|| self.load());
        f(entries)
    }

    fn load(&self) -> Vec<CustomItem> {
        if !self.is_enabled() {
            return Vec::new();
        }
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("custom item storage unavailable, continuing without it: {}", e);
                self.enabled.set(false);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<CustomItem>>(&raw) {
            Ok(entries) => {
                log::debug!("loaded {} custom items", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("discarding corrupt custom item store: {}", e);
                if let Err(e) = self.backend.remove(&self.key) {
                    log::warn!("failed to remove corrupt entry: {}", e);
                }
                Vec::new()
            }
        }
    }

    fn persist(&self, entries: &[CustomItem]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to serialize custom items: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set(&self.key, &json) {
            log::warn!("failed to persist custom items: {}", e);
        }
    }
}

impl ItemLookup for CustomItemStore {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn lookup(&self, id: &str) -> Option<Item> {
        if !self.is_enabled() {
            return None;
        }
        self.get(id).map(|record| record.to_item())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, UnavailableStore};

    const KEY: &str = "tierlist.customItems";

    fn store_over(backend: &MemoryStore) -> CustomItemStore {
        CustomItemStore::new(Box::new(backend.clone()), KEY, true)
    }

    #[test]
    fn test_add_persists_whole_store_as_json_array() {
        let backend = MemoryStore::new();
        let mut store = store_over(&backend);

        store.add(&[CustomItem::new("c-1", "Mine", "data:image/png;base64,AA")]);
        store.add(&[CustomItem::new("c-2", "Also mine", "data:image/png;base64,BB")]);

        let raw = backend.raw(KEY).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["imageData"], "data:image/png;base64,AA");
        assert_eq!(parsed[1]["id"], "c-2");
    }

    #[test]
    fn test_upsert_is_last_write_wins_and_keeps_order() {
        let backend = MemoryStore::new();
        let mut store = store_over(&backend);

        store.add(&[CustomItem::new("c-1", "Old", "a"), CustomItem::new("c-2", "Two", "b")]);
        store.add(&[CustomItem::new("c-1", "New", "c")]);

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], CustomItem::new("c-1", "New", "c"));
        assert_eq!(items[1].id, "c-2");
    }

    #[test]
    fn test_lazy_load_from_existing_entry() {
        let backend = MemoryStore::with_entry(KEY, r#"[{"id":"c-9","content":"Saved","imageData":"x"}]"#);
        let store = store_over(&backend);

        let item = store.lookup("c-9").unwrap();
        assert_eq!(item.content, "Saved");
        assert_eq!(item.source, ItemSource::Custom);
        assert_eq!(item.image_url.as_deref(), Some("x"));
    }

    #[test]
    fn test_corrupt_entry_discarded() {
        let backend = MemoryStore::with_entry(KEY, "{{{ not json");
        let store = store_over(&backend);

        assert!(store.items().is_empty());
        assert_eq!(backend.raw(KEY), None);
        assert!(store.is_enabled());
    }

    #[test]
    fn test_unavailable_storage_disables_store() {
        let mut store = CustomItemStore::new(Box::new(UnavailableStore), KEY, true);

        assert!(store.lookup("anything").is_none());
        assert!(!store.is_enabled());

        store.add(&[CustomItem::new("c-1", "Lost", "x")]);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_without_persistent_store_is_noop() {
        let backend = MemoryStore::with_entry(KEY, r#"[{"id":"c-1","content":"Saved","imageData":"x"}]"#);
        let mut store = CustomItemStore::new(Box::new(backend.clone()), KEY, false);

        assert!(store.lookup("c-1").is_none());
        store.add(&[CustomItem::new("c-2", "New", "y")]);
        assert_eq!(
            backend.raw(KEY).as_deref(),
            Some(r#"[{"id":"c-1","content":"Saved","imageData":"x"}]"#)
        );
    }

    #[test]
    fn test_clear_removes_key() {
        let backend = MemoryStore::new();
        let mut store = store_over(&backend);
        store.add(&[CustomItem::new("c-1", "Mine", "x")]);

        store.clear();
        assert!(store.items().is_empty());
        assert_eq!(backend.raw(KEY), None);
    }
}
