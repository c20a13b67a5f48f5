//! Tier State Engine
//!
//! One instance per session. Owns the resolver, the current board and the
//! single undo checkpoint; every UI action goes through here.

use std::collections::HashSet;

use crate::codec;
use crate::config::EngineConfig;
use crate::domain::{Board, Item, LabelPosition, Template, TemplateRegistry, Tier, TierId, DEFAULT_TEMPLATE};
use crate::error::{EngineError, EngineResult};
use crate::og_image::OgImageNormalizer;
use crate::reconciler;
use crate::resolver::{Catalog, CustomItem, CustomItemStore, ItemResolver};
use crate::storage::KeyValueStore;

/// Board and preset as they were before a destructive operation
#[derive(Debug, Clone)]
struct Checkpoint {
    board: Board,
    template: String,
}

pub struct TierStateEngine {
    config: EngineConfig,
    resolver: ItemResolver,
    normalizer: OgImageNormalizer,
    templates: &'static TemplateRegistry,
    board: Board,
    template: String,
    label_position: LabelPosition,
    /// Board before the last reset/delete-all; replaced, never stacked
    checkpoint: Option<Checkpoint>,
}

impl TierStateEngine {
    /// Start a session on the default template
    ///
    /// `storage` is only touched when `config.has_persistent_store` is set.
    pub fn new(config: EngineConfig, catalog: Catalog, storage: Box<dyn KeyValueStore>) -> EngineResult<Self> {
        let normalizer = OgImageNormalizer::new(&config.base_origin)?;
        let custom = CustomItemStore::new(storage, config.storage_key.clone(), config.has_persistent_store);
        let resolver = ItemResolver::with_normalizer(catalog, custom, &config.placeholder_image, &normalizer);

        let templates = TemplateRegistry::presets();
        let template = if templates.get(&config.default_template).is_some() {
            config.default_template.clone()
        } else {
            log::warn!("unknown default template {:?}, using {}", config.default_template, DEFAULT_TEMPLATE);
            DEFAULT_TEMPLATE.to_string()
        };
        let label_position = config.label_position;

        let mut engine = Self {
            config,
            resolver,
            normalizer,
            templates,
            board: Board::default(),
            template,
            label_position,
            checkpoint: None,
        };
        engine.board = engine.default_board();
        Ok(engine)
    }

    fn active_template(&self) -> EngineResult<&Template> {
        self.templates
            .get(&self.template)
            .ok_or_else(|| EngineError::TemplateNotFound(self.template.clone()))
    }

    fn default_board(&self) -> Board {
        match self.active_template() {
            Ok(template) => Board::new(template.instantiate(self.label_position)),
            Err(e) => {
                log::warn!("{}", e);
                Board::new(vec![Tier::sink(Some(self.label_position))])
            }
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn template_name(&self) -> &str {
        &self.template
    }

    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.names()
    }

    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    pub fn catalog(&self) -> &Catalog {
        self.resolver.catalog()
    }

    pub fn can_undo(&self) -> bool {
        self.checkpoint.is_some()
    }

    pub fn resolve(&self, id: &str, fallback_content: &str) -> Item {
        self.resolver.resolve(id, fallback_content)
    }

    // ========================
    // URL State
    // ========================

    /// Seed the board from a URL token; falls back to the default board
    ///
    /// Returns whether the token was usable. The active template follows
    /// the restored rows when they match a preset exactly.
    pub fn load_token(&mut self, token: Option<&str>) -> bool {
        let decoded = token.and_then(|token| codec::decode(token, &self.resolver, self.label_position));
        match decoded {
            Some(mut board) => {
                for tier in &mut board.tiers {
                    if let Some(skeleton) = self.templates.skeleton_for(&tier.id) {
                        tier.placeholder = skeleton.placeholder.clone();
                    }
                }
                match self.templates.matching(&board) {
                    Some(template) => self.template = template.name().to_string(),
                    None => log::debug!("restored rows match no preset, keeping {}", self.template),
                }
                log::info!("restored board: {} tiers, {} items", board.tiers.len(), board.item_count());
                self.board = board;
                true
            }
            None => {
                self.board = self.default_board();
                false
            }
        }
    }

    pub fn token(&self) -> String {
        codec::encode(&self.board)
    }

    /// `"<param>=<token>"`, ready to follow a `?`
    pub fn share_query(&self) -> String {
        format!("{}={}", self.config.query_param, self.token())
    }

    pub fn og_image_url(&self, url: &str) -> String {
        self.normalizer.normalize(url)
    }

    // ========================
    // Schema Changes
    // ========================

    pub fn change_template(&mut self, name: &str) -> EngineResult<()> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| EngineError::TemplateNotFound(name.to_string()))?;
        self.board = reconciler::reconcile(&self.board, template, self.label_position);
        self.template = name.to_string();
        log::info!("switched to template {}", name);
        Ok(())
    }

    pub fn set_label_position(&mut self, label_position: LabelPosition) {
        self.label_position = label_position;
        self.board = reconciler::with_label_position(&self.board, label_position);
    }

    pub fn rename_tier(&mut self, tier_id: &TierId, name: &str) -> EngineResult<()> {
        self.board = reconciler::rename_tier(&self.board, tier_id, name)?;
        Ok(())
    }

    // ========================
    // Destructive Operations + Undo
    // ========================

    fn save_checkpoint(&mut self) {
        self.checkpoint = Some(Checkpoint {
            board: self.board.clone(),
            template: self.template.clone(),
        });
    }

    pub fn reset_items(&mut self) {
        self.save_checkpoint();
        self.board = reconciler::reset_items(&self.board);
    }

    pub fn delete_all_items(&mut self) {
        self.save_checkpoint();
        self.board = reconciler::delete_all_items(&self.board);
    }

    /// Restore the last checkpoint; the checkpoint itself stays put
    ///
    /// The preset comes back with the rows, the label position does not.
    pub fn undo(&mut self) -> bool {
        match &self.checkpoint {
            Some(previous) => {
                self.board = reconciler::with_label_position(&previous.board, self.label_position);
                self.template = previous.template.clone();
                true
            }
            None => false,
        }
    }

    // ========================
    // Items
    // ========================

    /// Returns how many items were actually added
    pub fn add_items(&mut self, items: Vec<Item>) -> usize {
        let before = self.board.item_count();
        self.board = reconciler::add_items(&self.board, items);
        self.board.item_count() - before
    }

    /// Place user-supplied items on the board and persist the ones that landed
    ///
    /// Records dropped as duplicates are never stored. Without persistent
    /// storage the placed records still show for this session.
    pub fn add_custom_items(&mut self, records: Vec<CustomItem>) -> usize {
        let items = records
            .iter()
            .map(|record| match self.resolver.catalog().get(&record.id) {
                Some(item) => item.clone(),
                None => record.to_item(),
            })
            .collect();
        let next = reconciler::add_items(&self.board, items);

        let placed: Vec<CustomItem> = records
            .into_iter()
            .filter(|record| !self.board.contains_item(&record.id) && next.contains_item(&record.id))
            .collect();
        self.resolver.add_custom_items(&placed);

        let added = next.item_count() - self.board.item_count();
        self.board = next;
        added
    }

    pub fn custom_items(&self) -> Vec<CustomItem> {
        self.resolver.custom_items()
    }

    pub fn clear_custom_items(&mut self) {
        self.resolver.clear_custom_items();
    }

    pub fn add_catalog_package(&mut self, package: &str) -> EngineResult<usize> {
        let items = self
            .resolver
            .catalog()
            .package(package)
            .ok_or_else(|| EngineError::PackageNotFound(package.to_string()))?
            .to_vec();
        Ok(self.add_items(items))
    }

    pub fn remove_items<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: HashSet<String> = ids.into_iter().map(Into::into).collect();
        self.board = reconciler::remove_items(&self.board, &ids);
    }

    pub fn move_item(&mut self, item_id: &str, target: &TierId, position: usize) -> EngineResult<()> {
        self.board = reconciler::move_item(&self.board, item_id, target, position)?;
        Ok(())
    }
}
