//! Item Resolver
//!
//! Turns an item id into a full record. Sources are tried in a fixed
//! order and the first hit wins: catalog, then custom store, then any
//! extra strategies. Unknown ids get a placeholder carrying the caller's
//! fallback content.

mod catalog;
mod custom;

pub use catalog::Catalog;
pub use custom::{CustomItem, CustomItemStore};

use crate::domain::{Item, ItemSource};
use crate::og_image::OgImageNormalizer;

/// One resolution strategy
pub trait ItemLookup {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn lookup(&self, id: &str) -> Option<Item>;
}

pub struct ItemResolver {
    catalog: Catalog,
    custom: CustomItemStore,
    extra: Vec<Box<dyn ItemLookup>>,
    placeholder_image: String,
}

impl ItemResolver {
    /// `placeholder_image` should already be absolute
    pub fn new(catalog: Catalog, custom: CustomItemStore, placeholder_image: impl Into<String>) -> Self {
        Self {
            catalog,
            custom,
            extra: Vec::new(),
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Resolve the placeholder path against the normalizer's origin
    pub fn with_normalizer(
        catalog: Catalog,
        custom: CustomItemStore,
        placeholder_path: &str,
        normalizer: &OgImageNormalizer,
    ) -> Self {
        Self::new(catalog, custom, normalizer.absolutize(placeholder_path))
    }

    /// Append a strategy tried after the built-in sources
    pub fn push_source(&mut self, source: Box<dyn ItemLookup>) {
        self.extra.push(source);
    }

    fn strategies(&self) -> impl Iterator<Item = &dyn ItemLookup> {
        [&self.catalog as &dyn ItemLookup, &self.custom as &dyn ItemLookup]
            .into_iter()
            .chain(self.extra.iter().map(|source| source.as_ref() as &dyn ItemLookup))
    }

    pub fn resolve(&self, id: &str, fallback_content: &str) -> Item {
        for strategy in self.strategies() {
            if let Some(item) = strategy.lookup(id) {
                log::trace!("{} resolved {:?}", strategy.name(), id);
                return item;
            }
        }
        log::debug!("no source knows {:?}, using placeholder", id);
        self.placeholder(id, fallback_content)
    }

    pub fn placeholder(&self, id: &str, content: &str) -> Item {
        Item::new(id, content)
            .with_image(self.placeholder_image.clone())
            .with_source(ItemSource::Placeholder)
    }

    pub fn add_custom_items(&mut self, items: &[CustomItem]) {
        self.custom.add(items);
    }

    pub fn clear_custom_items(&mut self) {
        self.custom.clear();
    }

    pub fn custom_items(&self) -> Vec<CustomItem> {
        self.custom.items()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "custom";
    const PLACEHOLDER: &str = "https://tierlist.app/images/placeholder.png";

    fn resolver_with(backend: &MemoryStore) -> ItemResolver {
        let catalog = Catalog::from_json(r#"{"games":[{"filename":"zelda.png","label":"Zelda"}]}"#).unwrap();
        let custom = CustomItemStore::new(Box::new(backend.clone()), KEY, true);
        ItemResolver::new(catalog, custom, PLACEHOLDER)
    }

    #[test]
    fn test_catalog_wins_over_custom() {
        let backend = MemoryStore::new();
        let mut resolver = resolver_with(&backend);
        resolver.add_custom_items(&[CustomItem::new("games-zelda.png", "Impostor", "data:fake")]);

        let item = resolver.resolve("games-zelda.png", "fallback");
        assert_eq!(item.content, "Zelda");
        assert_eq!(item.image_url.as_deref(), Some("/images/games/zelda.png"));
        assert_eq!(item.source, ItemSource::Catalog);
    }

    #[test]
    fn test_custom_used_when_catalog_misses() {
        let backend = MemoryStore::new();
        let mut resolver = resolver_with(&backend);
        resolver.add_custom_items(&[CustomItem::new("c-1", "Mine", "data:mine")]);

        let item = resolver.resolve("c-1", "fallback");
        assert_eq!(item.content, "Mine");
        assert_eq!(item.source, ItemSource::Custom);
    }

    #[test]
    fn test_placeholder_uses_fallback_content() {
        let resolver = resolver_with(&MemoryStore::new());
        let item = resolver.resolve("gone-1", "Whatever it was");
        assert_eq!(item.id, "gone-1");
        assert_eq!(item.content, "Whatever it was");
        assert_eq!(item.image_url.as_deref(), Some(PLACEHOLDER));
        assert_eq!(item.source, ItemSource::Placeholder);
    }

    struct Fixed;

    impl ItemLookup for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn lookup(&self, id: &str) -> Option<Item> {
            (id == "extra-1" || id == "games-zelda.png").then(|| Item::new(id, "From extra"))
        }
    }

    #[test]
    fn test_extra_sources_come_last() {
        let mut resolver = resolver_with(&MemoryStore::new());
        resolver.push_source(Box::new(Fixed));

        assert_eq!(resolver.resolve("extra-1", "fb").content, "From extra");
        assert_eq!(resolver.resolve("games-zelda.png", "fb").content, "Zelda");
    }

    #[test]
    fn test_with_normalizer_absolutizes_placeholder() {
        let normalizer = OgImageNormalizer::new("https://example.com").unwrap();
        let custom = CustomItemStore::new(Box::new(MemoryStore::new()), KEY, false);
        let resolver = ItemResolver::with_normalizer(Catalog::empty(), custom, "/images/placeholder.png", &normalizer);

        let item = resolver.resolve("x", "X");
        assert_eq!(item.image_url.as_deref(), Some("https://example.com/images/placeholder.png"));
    }
}
