//! Template Presets
//!
//! Named, immutable row layouts. A template only describes skeletons;
//! the board is always derived from one by the reconciler.

use std::sync::OnceLock;

use super::tier::{Board, LabelPosition, Tier, TierId, SINK_TIER_NAME};
use crate::error::{EngineError, EngineResult};

/// Preset used when nothing else is selected
pub const DEFAULT_TEMPLATE: &str = "5-row";

/// Sink row placeholder shared by every preset
const SINK_PLACEHOLDER: &str = "Drag items from here into a tier";

/// Row definition without items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSkeleton {
    pub id: TierId,
    pub name: String,
    pub placeholder: Option<String>,
}

impl TierSkeleton {
    pub fn new(id: impl Into<TierId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    fn instantiate(&self, label_position: LabelPosition) -> Tier {
        Tier {
            id: self.id.clone(),
            name: self.name.clone(),
            items: Vec::new(),
            label_position: Some(label_position),
            placeholder: self.placeholder.clone(),
        }
    }
}

/// A named preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    tiers: Vec<TierSkeleton>,
}

impl Template {
    /// Build a template; at least one tier is required
    pub fn new(name: impl Into<String>, tiers: Vec<TierSkeleton>) -> EngineResult<Self> {
        let name = name.into();
        if tiers.is_empty() {
            return Err(EngineError::InvalidTemplate(format!("{} has no tiers", name)));
        }
        Ok(Self { name, tiers })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tiers(&self) -> &[TierSkeleton] {
        &self.tiers
    }

    pub fn has_sink(&self) -> bool {
        self.tiers.iter().any(|tier| tier.id.is_sink())
    }

    /// Empty tiers carrying the given label position
    pub fn instantiate(&self, label_position: LabelPosition) -> Vec<Tier> {
        self.tiers.iter().map(|tier| tier.instantiate(label_position)).collect()
    }

    /// Letter-graded preset: `S`, `A`, `B`, … followed by the sink row
    fn graded(name: &str, grades: &[&str]) -> Self {
        let mut tiers: Vec<TierSkeleton> = grades
            .iter()
            .map(|grade| {
                TierSkeleton::new(format!("tier-{}", grade.to_lowercase()), *grade)
                    .with_placeholder(format!("Drop {}-tier items here", grade))
            })
            .collect();
        tiers.push(TierSkeleton::new(TierId::Sink, SINK_TIER_NAME).with_placeholder(SINK_PLACEHOLDER));
        Self {
            name: name.to_string(),
            tiers,
        }
    }
}

/// The fixed set of presets, built once per process
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
}

static PRESETS: OnceLock<TemplateRegistry> = OnceLock::new();

impl TemplateRegistry {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Built-in 3, 5 and 7 row presets
    pub fn presets() -> &'static TemplateRegistry {
        PRESETS.get_or_init(|| {
            Self::new(vec![
                Template::graded("3-row", &["S", "A", "B"]),
                Template::graded("5-row", &["S", "A", "B", "C", "D"]),
                Template::graded("7-row", &["S", "A", "B", "C", "D", "E", "F"]),
            ])
        })
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    /// Preset whose rows are exactly the board's tier ids, in order
    pub fn matching(&self, board: &Board) -> Option<&Template> {
        self.templates.iter().find(|template| {
            template.tiers.len() == board.tiers.len()
                && template.tiers.iter().zip(&board.tiers).all(|(skeleton, tier)| skeleton.id == tier.id)
        })
    }

    /// First skeleton across all presets with this id
    pub fn skeleton_for(&self, id: &TierId) -> Option<&TierSkeleton> {
        self.templates
            .iter()
            .flat_map(|t| t.tiers.iter())
            .find(|skeleton| &skeleton.id == id)
    }
}
