//! Toolbar Component
//!
//! Template, label position, catalog packages, destructive actions with
//! undo, forgetting saved custom items, and the share link.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use tier_engine::LabelPosition;

use crate::browser;
use crate::components::ConfirmButton;
use crate::context::use_engine;
use crate::store::AppStateStoreFields;

fn select_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    Some(target.dyn_ref::<web_sys::HtmlSelectElement>()?.value())
}

/// Preset picker
#[component]
fn TemplateSelect() -> impl IntoView {
    let ctx = use_engine();
    let names: Vec<String> = ctx.with(|engine| engine.template_names().map(str::to_string).collect());

    let on_change = move |ev: web_sys::Event| {
        let Some(name) = select_value(&ev) else { return };
        if let Some(Err(e)) = ctx.apply(|engine| engine.change_template(&name)) {
            log::warn!("{}", e);
        }
    };

    view! {
        <select class="template-select" on:change=on_change>
            {names.into_iter().map(|name| {
                let value = name.clone();
                let selected = move || ctx.store.template().get() == value;
                view! { <option value=name.clone() selected=selected>{name.clone()}</option> }
            }).collect_view()}
        </select>
    }
}

/// Left / top / right toggle
#[component]
fn LabelPositionToggle() -> impl IntoView {
    let ctx = use_engine();

    view! {
        <div class="label-position">
            {LabelPosition::ALL.iter().map(|&position| {
                let is_active = move || ctx.store.label_position().get() == position;
                view! {
                    <button
                        type="button"
                        class=move || if is_active() { "type-btn small active" } else { "type-btn small" }
                        on:click=move |_| {
                            ctx.apply(|engine| engine.set_label_position(position));
                        }
                    >
                        {position.as_str()}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}

/// Drop a whole catalog package into the sink
#[component]
fn PackagePicker() -> impl IntoView {
    let ctx = use_engine();
    let (package, set_package) = signal(None::<String>);

    let add_package = move |_| {
        let Some(name) = package.get_untracked() else { return };
        match ctx.apply(|engine| engine.add_catalog_package(&name)) {
            Some(Ok(added)) => log::info!("added {} items from {}", added, name),
            Some(Err(e)) => log::warn!("{}", e),
            None => {}
        }
    };

    view! {
        <div class="package-picker">
            <select on:change=move |ev| set_package.set(select_value(&ev).filter(|v| !v.is_empty()))>
                <option value="">"Add a catalog…"</option>
                {move || ctx.store.packages().get().into_iter().map(|name| {
                    let value = name.clone();
                    view! { <option value=value>{name}</option> }
                }).collect_view()}
            </select>
            <button type="button" disabled=move || package.get().is_none() on:click=add_package>
                "Add"
            </button>
        </div>
    }
}

/// Copy the shareable link
#[component]
fn ShareButton() -> impl IntoView {
    let ctx = use_engine();
    let (copied, set_copied) = signal(false);

    let share = move |_| {
        let query = ctx.with(|engine| engine.share_query());
        let Some(url) = browser::current_share_url(&query) else { return };
        spawn_local(async move {
            match browser::copy_to_clipboard(&url).await {
                Ok(()) => {
                    set_copied.set(true);
                    TimeoutFuture::new(1_500).await;
                    let _ = set_copied.try_set(false);
                }
                Err(e) => log::warn!("clipboard refused the link: {}", e),
            }
        });
    };

    view! {
        <button type="button" class="share-btn" on:click=share>
            {move || if copied.get() { "Copied!" } else { "Share" }}
        </button>
    }
}

#[component]
pub fn Toolbar() -> impl IntoView {
    let ctx = use_engine();

    view! {
        <div class="toolbar">
            <TemplateSelect />
            <LabelPositionToggle />
            <PackagePicker />

            <ConfirmButton
                label="Reset"
                prompt="Move everything back?"
                button_class="reset-btn"
                on_confirm=move |_| {
                    ctx.apply(|engine| engine.reset_items());
                }
            />
            <ConfirmButton
                label="Delete all"
                prompt="Remove every item?"
                button_class="delete-btn"
                on_confirm=move |_| {
                    ctx.apply(|engine| engine.delete_all_items());
                }
            />
            <button
                type="button"
                class="undo-btn"
                disabled=move || !ctx.store.can_undo().get()
                on:click=move |_| {
                    ctx.apply(|engine| engine.undo());
                }
            >
                "Undo"
            </button>
            <ConfirmButton
                label="Forget my items"
                prompt="Delete saved custom items?"
                button_class="forget-btn"
                on_confirm=move |_| {
                    ctx.apply(|engine| engine.clear_custom_items());
                }
            />

            <ShareButton />
        </div>
    }
}
