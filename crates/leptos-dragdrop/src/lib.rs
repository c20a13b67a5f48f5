//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//! Draggables and containers are identified by string ids.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Drop target types
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Drop onto an item: take its place, pushing it back
    Item(String),
    /// Drop into a container at a slot
    Zone { container: String, position: usize },
}

/// DnD state signals
#[derive(Clone, Copy)]
pub struct DndSignals {
    pub dragging_id_read: ReadSignal<Option<String>>,
    pub dragging_id_write: WriteSignal<Option<String>>,
    pub drop_target_read: ReadSignal<Option<DropTarget>>,
    pub drop_target_write: WriteSignal<Option<DropTarget>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending item id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<String>>,
    pub pending_id_write: WriteSignal<Option<String>>,
    /// Start position for movement detection
    pub start_x_read: ReadSignal<i32>,
    pub start_x_write: WriteSignal<i32>,
    pub start_y_read: ReadSignal<i32>,
    pub start_y_write: WriteSignal<i32>,
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

pub fn create_dnd_signals() -> DndSignals {
    let (dragging_id_read, dragging_id_write) = signal(None::<String>);
    let (drop_target_read, drop_target_write) = signal(None::<DropTarget>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<String>);
    let (start_x_read, start_x_write) = signal(0i32);
    let (start_y_read, start_y_write) = signal(0i32);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_x_read,
        start_x_write,
        start_y_read,
        start_y_write,
    }
}

// ========================
// Pure Helpers
// ========================

/// Whether the pointer moved far enough from the mousedown point
pub fn past_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    (now.0 - start.0).abs() > DRAG_THRESHOLD_PX || (now.1 - start.1).abs() > DRAG_THRESHOLD_PX
}

/// An item is never a drop target for itself
pub fn accepts(dragging: &str, target: &DropTarget) -> bool {
    match target {
        DropTarget::Item(id) => id != dragging,
        DropTarget::Zone { .. } => true,
    }
}

/// Slot that puts `dragging` right before `before` once `dragging` has
/// been lifted out of `ids`
pub fn insertion_index<S: AsRef<str>>(ids: &[S], dragging: &str, before: &str) -> Option<usize> {
    ids.iter()
        .map(AsRef::as_ref)
        .filter(|id| *id != dragging)
        .position(|id| id == before)
}

// ========================
// Event Handlers
// ========================

/// End drag operation
pub fn end_drag(dnd: &DndSignals) {
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown(dnd: DndSignals, item_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Ignore if target is input or button
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() {
                return;
            }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() {
                return;
            }
        }
        ev.prevent_default();
        dnd.pending_id_write.set(Some(item_id.clone()));
        dnd.start_x_write.set(ev.client_x());
        dnd.start_y_write.set(ev.client_y());
    }
}

/// Create mousemove handler for document - starts drag if moved enough
pub fn bind_global_mousemove(dnd: DndSignals) {
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            return;
        }
        let Some(pending) = dnd.pending_id_read.get_untracked() else {
            return;
        };
        let start = (dnd.start_x_read.get_untracked(), dnd.start_y_read.get_untracked());
        if past_threshold(start, (ev.client_x(), ev.client_y())) {
            dnd.dragging_id_write.set(Some(pending));
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
        }
    }
    on_mousemove.forget();
}

fn offer_target(dnd: &DndSignals, target: DropTarget) {
    let allowed = dnd
        .dragging_id_read
        .with_untracked(|dragging| dragging.as_deref().map(|id| accepts(id, &target)));
    if allowed == Some(true) {
        dnd.drop_target_write.set(Some(target));
    }
}

/// Create mouseover handler for items
pub fn make_on_item_mouseover(dnd: DndSignals, item_id: String) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |ev: web_sys::MouseEvent| {
        // items sit inside their container; keep the zone from overriding
        ev.stop_propagation();
        offer_target(&dnd, DropTarget::Item(item_id.clone()));
    }
}

/// Create mouseover handler for zones
///
/// Bound to `mouseover` so moving off a child item re-targets the zone.
/// A `position` past the end appends.
pub fn make_on_zone_mouseover(
    dnd: DndSignals,
    container: String,
    position: usize,
) -> impl Fn(web_sys::MouseEvent) + Clone + 'static {
    move |_ev: web_sys::MouseEvent| {
        offer_target(
            &dnd,
            DropTarget::Zone {
                container: container.clone(),
                position,
            },
        );
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave(dnd: DndSignals) -> impl Fn(web_sys::MouseEvent) + Copy + 'static {
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<F>(dnd: DndSignals, on_drop: F)
where
    F: Fn(String, DropTarget) + Clone + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();

        // Clear pending state first
        dnd.pending_id_write.set(None);
        end_drag(&dnd);

        // Only a real drag drops; a plain click falls through to the element
        if let (Some(dragged), Some(target)) = (dragging_id, drop_target) {
            on_drop(dragged, target);
        }
    });

    if let Some(win) = web_sys::window() {
        if let Some(doc) = win.document() {
            let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
        }
    }
    on_mouseup.forget();

    // Also bind global mousemove
    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        assert!(!past_threshold((10, 10), (15, 15)));
        assert!(past_threshold((10, 10), (16, 10)));
        assert!(past_threshold((10, 10), (10, 4)));
    }

    #[test]
    fn test_item_rejects_itself() {
        assert!(!accepts("a", &DropTarget::Item("a".to_string())));
        assert!(accepts("a", &DropTarget::Item("b".to_string())));
        assert!(accepts(
            "a",
            &DropTarget::Zone {
                container: "tier-s".to_string(),
                position: 0
            }
        ));
    }

    #[test]
    fn test_insertion_index_accounts_for_lifted_item() {
        let ids = ["a", "b", "c", "d"];
        // moving forward: "a" leaves, so "c" slides to index 1
        assert_eq!(insertion_index(&ids, "a", "c"), Some(1));
        // moving backward: indices before the lifted item are unchanged
        assert_eq!(insertion_index(&ids, "d", "b"), Some(1));
        // dragged from another row
        assert_eq!(insertion_index(&ids, "z", "c"), Some(2));
        assert_eq!(insertion_index(&ids, "a", "missing"), None);
    }
}
