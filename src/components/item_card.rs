//! Item Card Component
//!
//! Draggable image tile with a remove button.

use leptos::prelude::*;

use leptos_dragdrop::*;
use tier_engine::{Item, ItemSource};

use crate::context::use_engine;

#[component]
pub fn ItemCard(item: Item, dnd: DndSignals) -> impl IntoView {
    let ctx = use_engine();

    let id = item.id.clone();
    let on_mousedown = make_on_mousedown(dnd, id.clone());
    let on_mouseover = make_on_item_mouseover(dnd, id.clone());

    // Visual state
    let is_dragging = {
        let id = id.clone();
        move || dnd.dragging_id_read.with(|dragging| dragging.as_deref() == Some(id.as_str()))
    };
    let is_drop_target = {
        let id = id.clone();
        move || dnd.drop_target_read.with(|target| matches!(target, Some(DropTarget::Item(tid)) if *tid == id))
    };
    let source_class = match item.source {
        ItemSource::Catalog => "catalog",
        ItemSource::Custom => "custom",
        ItemSource::Placeholder => "placeholder",
    };
    let card_class = move || {
        let mut c = format!("item-card {}", source_class);
        if is_dragging() {
            c.push_str(" dragging");
        }
        if is_drop_target() {
            c.push_str(" drop-target");
        }
        c
    };

    let remove = move |_| {
        let id = id.clone();
        ctx.apply(move |engine| engine.remove_items([id]));
    };

    let label = item.content;
    let image = item.image_url.map(|src| {
        view! { <img src=src alt=label.clone() draggable="false" /> }
    });
    let title = label.clone();

    view! {
        <div class=card_class title=title on:mousedown=on_mousedown on:mouseover=on_mouseover>
            {image}
            <span class="item-label">{label}</span>
            <button class="remove-btn" on:click=remove>"×"</button>
        </div>
    }
}
