//! Tier Reconciler
//!
//! Pure board transformations. Each function takes the current board and
//! returns the next one; the engine decides which ones get an undo
//! checkpoint.

use std::collections::HashSet;

use crate::domain::{Board, Item, LabelPosition, Template, Tier, TierId};
use crate::error::{EngineError, EngineResult};

/// Every item with the tier it came from, in board order, first id wins
fn placements(board: &Board) -> Vec<(Item, TierId)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(board.item_count());
    for tier in &board.tiers {
        for item in &tier.items {
            if seen.insert(item.id.as_str()) {
                out.push((item.clone(), tier.id.clone()));
            } else {
                log::debug!("dropping duplicate item {:?} from {}", item.id, tier.id);
            }
        }
    }
    out
}

/// Re-seat items onto a new template
///
/// Items keep their tier when the template still has it, fall back to the
/// template's sink tier, and otherwise land in a sink tier appended once.
pub fn reconcile(board: &Board, template: &Template, label_position: LabelPosition) -> Board {
    let mut tiers = template.instantiate(label_position);
    let mut sink = tiers.iter().position(|tier| tier.id.is_sink());

    for (item, origin) in placements(board) {
        let target = match tiers.iter().position(|tier| tier.id == origin) {
            Some(index) => index,
            None => match sink {
                Some(index) => index,
                None => {
                    tiers.push(Tier::sink(Some(label_position)));
                    let index = tiers.len() - 1;
                    sink = Some(index);
                    index
                }
            },
        };
        tiers[target].items.push(item);
    }

    if tiers.is_empty() {
        tiers.push(Tier::sink(Some(label_position)));
    }
    Board::new(tiers)
}

/// Pull every item into the sink tier, sorted by content
///
/// The first sink tier is reused wherever it sits; one is appended only
/// when the board has none.
pub fn reset_items(board: &Board) -> Board {
    let mut items: Vec<Item> = board.items().cloned().collect();
    // stable, byte-wise: "Apple" < "Banana" < "cherry"
    items.sort_by(|a, b| a.content.cmp(&b.content));

    let mut tiers: Vec<Tier> = board.tiers.iter().map(Tier::emptied).collect();
    let sink = match tiers.iter().position(|tier| tier.id.is_sink()) {
        Some(index) => index,
        None => {
            let label_position = tiers.last().and_then(|tier| tier.label_position);
            tiers.push(Tier::sink(label_position));
            tiers.len() - 1
        }
    };
    tiers[sink].items = items;
    Board::new(tiers)
}

/// Empty every tier, keeping tier identity and order
pub fn delete_all_items(board: &Board) -> Board {
    Board::new(board.tiers.iter().map(Tier::emptied).collect())
}

/// Append to the last tier, skipping anything whose id or content is
/// already on the board (or earlier in the same batch)
pub fn add_items(board: &Board, new_items: Vec<Item>) -> Board {
    let mut ids: HashSet<String> = board.items().map(|item| item.id.clone()).collect();
    let mut contents: HashSet<String> = board.items().map(|item| item.content.clone()).collect();

    let mut next = board.clone();
    if next.tiers.is_empty() {
        next.tiers.push(Tier::sink(None));
    }
    let last = next.tiers.len() - 1;

    for item in new_items {
        if ids.contains(&item.id) || contents.contains(&item.content) {
            log::debug!("skipping duplicate item {:?} ({:?})", item.id, item.content);
            continue;
        }
        ids.insert(item.id.clone());
        contents.insert(item.content.clone());
        next.tiers[last].items.push(item);
    }
    next
}

/// Drop the given ids from every tier
pub fn remove_items(board: &Board, ids: &HashSet<String>) -> Board {
    let tiers = board
        .tiers
        .iter()
        .map(|tier| {
            if !tier.items.iter().any(|item| ids.contains(&item.id)) {
                return tier.clone();
            }
            Tier {
                items: tier.items.iter().filter(|item| !ids.contains(&item.id)).cloned().collect(),
                ..tier.clone()
            }
        })
        .collect();
    Board::new(tiers)
}

/// Move one item to `position` within `target` (clamped to the row)
pub fn move_item(board: &Board, item_id: &str, target: &TierId, position: usize) -> EngineResult<Board> {
    let target_index = board
        .tiers
        .iter()
        .position(|tier| &tier.id == target)
        .ok_or_else(|| EngineError::TierNotFound(target.to_string()))?;

    let mut next = board.clone();
    let mut moved = None;
    for tier in &mut next.tiers {
        if let Some(index) = tier.items.iter().position(|item| item.id == item_id) {
            moved = Some(tier.items.remove(index));
            break;
        }
    }
    let item = moved.ok_or_else(|| EngineError::ItemNotFound(item_id.to_string()))?;

    let row = &mut next.tiers[target_index].items;
    let position = position.min(row.len());
    row.insert(position, item);
    Ok(next)
}

/// Rename one tier
pub fn rename_tier(board: &Board, tier_id: &TierId, name: &str) -> EngineResult<Board> {
    let mut next = board.clone();
    let tier = next
        .tiers
        .iter_mut()
        .find(|tier| &tier.id == tier_id)
        .ok_or_else(|| EngineError::TierNotFound(tier_id.to_string()))?;
    tier.name = name.to_string();
    Ok(next)
}

/// Same board with every tier drawing its label at `label_position`
pub fn with_label_position(board: &Board, label_position: LabelPosition) -> Board {
    let tiers = board
        .tiers
        .iter()
        .map(|tier| Tier {
            label_position: Some(label_position),
            ..tier.clone()
        })
        .collect();
    Board::new(tiers)
}
