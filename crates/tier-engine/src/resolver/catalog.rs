//! Bundled Catalog
//!
//! Built once from the static catalog document:
//! `{ "<catalog>": [ { "filename": "...", "label": "..." } ] }`.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::ItemLookup;
use crate::domain::{Item, ItemSource};
use crate::error::CatalogError;

#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    filename: String,
    #[serde(default)]
    label: Option<String>,
}

/// Items grouped by package, plus an id index
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: BTreeMap<String, Vec<Item>>,
    by_id: HashMap<String, Item>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: BTreeMap<String, Vec<CatalogEntry>> = serde_json::from_str(json)?;
        let mut catalog = Self::default();

        for (name, entries) in document {
            let mut items = Vec::with_capacity(entries.len());
            for entry in entries {
                if entry.filename.is_empty() {
                    return Err(CatalogError::EmptyFilename { catalog: name });
                }
                items.push(catalog_item(&name, &entry));
            }
            for item in &items {
                catalog.by_id.insert(item.id.clone(), item.clone());
            }
            catalog.packages.insert(name, items);
        }

        log::debug!("catalog loaded: {} packages, {} items", catalog.packages.len(), catalog.by_id.len());
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.by_id.get(id)
    }

    /// Package names in sorted order
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn package(&self, name: &str) -> Option<&[Item]> {
        self.packages.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl ItemLookup for Catalog {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn lookup(&self, id: &str) -> Option<Item> {
        self.get(id).cloned()
    }
}

fn catalog_item(catalog: &str, entry: &CatalogEntry) -> Item {
    let content = entry
        .label
        .clone()
        .unwrap_or_else(|| strip_extension(&entry.filename).to_string());

    Item::new(format!("{}-{}", catalog, entry.filename), content)
        .with_image(format!("/images/{}/{}", catalog, entry.filename))
        .with_source(ItemSource::Catalog)
}

/// `"zelda.botw.png"` -> `"zelda.botw"`; dotfiles keep their name
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "games": [
            { "filename": "zelda.png", "label": "Breath of the Wild" },
            { "filename": "portal.2.webp" }
        ],
        "animals": [
            { "filename": "cat.png" }
        ]
    }"#;

    #[test]
    fn test_ids_content_and_images() {
        let catalog = Catalog::from_json(DOC).unwrap();
        assert_eq!(catalog.len(), 3);

        let zelda = catalog.get("games-zelda.png").unwrap();
        assert_eq!(zelda.content, "Breath of the Wild");
        assert_eq!(zelda.image_url.as_deref(), Some("/images/games/zelda.png"));
        assert_eq!(zelda.source, ItemSource::Catalog);

        let portal = catalog.get("games-portal.2.webp").unwrap();
        assert_eq!(portal.content, "portal.2");
    }

    #[test]
    fn test_packages_sorted_and_ordered() {
        let catalog = Catalog::from_json(DOC).unwrap();
        let names: Vec<&str> = catalog.package_names().collect();
        assert_eq!(names, vec!["animals", "games"]);

        let games = catalog.package("games").unwrap();
        assert_eq!(games[0].id, "games-zelda.png");
        assert_eq!(games[1].id, "games-portal.2.webp");
    }

    #[test]
    fn test_strip_extension_edge_cases() {
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("a.b.c"), "a.b");
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Parse(_))));
        assert!(matches!(
            Catalog::from_json(r#"{"x":[{"filename":""}]}"#),
            Err(CatalogError::EmptyFilename { .. })
        ));
    }
}
