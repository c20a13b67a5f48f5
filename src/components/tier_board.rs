//! Tier Board Component
//!
//! One row per tier, with drag-and-drop between rows.
//! Uses leptos-dragdrop: items are drop targets (insert before) and each
//! row body is a zone (append).

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use leptos_dragdrop::*;
use tier_engine::{Board, LabelPosition, TierId};

use crate::components::ItemCard;
use crate::context::use_engine;
use crate::store::AppStateStoreFields;

/// Zone position meaning "after the last item"
const APPEND: usize = usize::MAX;

/// Where a drop lands on the board
fn drop_placement(board: &Board, dragged: &str, target: &DropTarget) -> Option<(TierId, usize)> {
    match target {
        DropTarget::Item(before) => {
            let tier = board.tier_of(before)?;
            let ids: Vec<&str> = tier.items.iter().map(|item| item.id.as_str()).collect();
            let position = insertion_index(&ids, dragged, before)?;
            Some((tier.id.clone(), position))
        }
        DropTarget::Zone { container, position } => {
            let tier_id = TierId::from(container.as_str());
            board.tier(&tier_id)?;
            Some((tier_id, *position))
        }
    }
}

#[component]
pub fn TierBoard() -> impl IntoView {
    let ctx = use_engine();
    let store = ctx.store;

    // Create DnD signals
    let dnd = create_dnd_signals();

    bind_global_mouseup(dnd, move |dragged, target| {
        let Some((tier_id, position)) = ctx.with(|engine| drop_placement(engine.board(), &dragged, &target)) else {
            log::debug!("drop of {:?} on {:?} has no placement", dragged, target);
            return;
        };
        if let Some(Err(e)) = ctx.apply(|engine| engine.move_item(&dragged, &tier_id, position)) {
            log::warn!("move failed: {}", e);
        }
    });

    let tier_ids = move || {
        store
            .board()
            .with(|board| board.tiers.iter().map(|tier| tier.id.clone()).collect::<Vec<_>>())
    };

    view! {
        <div class="tier-board">
            <For
                each=tier_ids
                key=|tier_id| tier_id.to_string()
                children=move |tier_id| view! { <TierRow tier_id=tier_id dnd=dnd /> }
            />
        </div>
    }
}

/// A single tier: editable label plus its items
#[component]
fn TierRow(tier_id: TierId, dnd: DndSignals) -> impl IntoView {
    let ctx = use_engine();
    let store = ctx.store;

    let lookup_id = tier_id.clone();
    let tier = Memo::new(move |_| store.board().with(|board| board.tier(&lookup_id).cloned()));

    let container = tier_id.to_string();
    let on_mouseover = make_on_zone_mouseover(dnd, container.clone(), APPEND);
    let on_mouseleave = make_on_mouseleave(dnd);

    let is_drop_target = {
        let container = container.clone();
        move || {
            dnd.drop_target_read.with(|target| {
                matches!(target, Some(DropTarget::Zone { container: c, .. }) if *c == container)
            })
        }
    };

    let row_class = move || {
        let position = tier
            .with(|tier| tier.as_ref().and_then(|t| t.label_position))
            .unwrap_or_else(|| store.label_position().get());
        let mut c = format!("tier-row label-{}", position.as_str());
        if position == LabelPosition::Top {
            c.push_str(" stacked");
        }
        if is_drop_target() {
            c.push_str(" drop-target");
        }
        c
    };

    let name = move || tier.with(|tier| tier.as_ref().map(|t| t.name.clone()).unwrap_or_default());
    let items = move || tier.with(|tier| tier.as_ref().map(|t| t.items.clone()).unwrap_or_default());
    let placeholder = move || {
        tier.with(|tier| {
            tier.as_ref()
                .filter(|t| t.items.is_empty())
                .and_then(|t| t.placeholder.clone())
        })
    };

    let rename_id = tier_id.clone();
    let on_rename = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return;
        };
        let value = input.value();
        if let Some(Err(e)) = ctx.apply(|engine| engine.rename_tier(&rename_id, value.trim())) {
            log::warn!("{}", e);
        }
    };

    view! {
        <section class=row_class>
            <div class="tier-label">
                <input type="text" prop:value=name on:change=on_rename />
            </div>
            <div class="tier-items" on:mouseover=on_mouseover on:mouseleave=on_mouseleave>
                <For
                    each=items
                    key=|item| item.id.clone()
                    children=move |item| view! { <ItemCard item=item dnd=dnd /> }
                />
                {move || placeholder().map(|text| view! { <span class="tier-placeholder">{text}</span> })}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tier_engine::{Item, Tier};

    fn board() -> Board {
        Board::new(vec![
            Tier::new("tier-s", "S").with_items(vec![Item::new("a", "A"), Item::new("b", "B"), Item::new("c", "C")]),
            Tier::sink(None).with_items(vec![Item::new("d", "D")]),
        ])
    }

    #[test]
    fn test_drop_on_item_inserts_before_it() {
        let board = board();
        assert_eq!(
            drop_placement(&board, "a", &DropTarget::Item("c".to_string())),
            Some((TierId::named("tier-s"), 1))
        );
        assert_eq!(
            drop_placement(&board, "d", &DropTarget::Item("b".to_string())),
            Some((TierId::named("tier-s"), 1))
        );
    }

    #[test]
    fn test_drop_on_sink_zone() {
        let target = DropTarget::Zone {
            container: "uncategorized".to_string(),
            position: APPEND,
        };
        assert_eq!(drop_placement(&board(), "a", &target), Some((TierId::Sink, APPEND)));
    }

    #[test]
    fn test_drop_on_vanished_tier() {
        let target = DropTarget::Zone {
            container: "tier-z".to_string(),
            position: 0,
        };
        assert_eq!(drop_placement(&board(), "a", &target), None);
        assert_eq!(drop_placement(&board(), "a", &DropTarget::Item("gone".to_string())), None);
    }
}
