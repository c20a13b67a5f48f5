//! New Item Form Component
//!
//! Form for adding custom items: a label plus an uploaded image or an
//! image URL. Saved items survive reloads through local storage.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use tier_engine::CustomItem;

use crate::context::use_engine;

fn input_of(ev: &web_sys::Event) -> Option<web_sys::HtmlInputElement> {
    ev.target()?.dyn_into::<web_sys::HtmlInputElement>().ok()
}

/// Id for a freshly created custom item
fn custom_item_id(millis: f64, sequence: u32) -> String {
    format!("custom-{}-{}", millis as u64, sequence)
}

#[component]
pub fn NewItemForm() -> impl IntoView {
    let ctx = use_engine();

    let (new_text, set_new_text) = signal(String::new());
    let (image_url, set_image_url) = signal(String::new());
    let (image_data, set_image_data) = signal(None::<String>);
    let (sequence, set_sequence) = signal(0u32);

    let on_file = move |ev: web_sys::Event| {
        let Some(file) = input_of(&ev).and_then(|input| input.files()).and_then(|files| files.get(0)) else {
            return;
        };
        if new_text.get_untracked().is_empty() {
            let name = file.name();
            let stem = name.rsplit_once('.').map(|(stem, _)| stem.to_string()).unwrap_or(name);
            set_new_text.set(stem);
        }

        let reader = match web_sys::FileReader::new() {
            Ok(reader) => reader,
            Err(e) => {
                log::warn!("file reader unavailable: {:?}", e);
                return;
            }
        };
        let loaded = reader.clone();
        let onload = Closure::<dyn FnMut(web_sys::Event)>::new(move |_ev: web_sys::Event| {
            match loaded.result().ok().and_then(|value| value.as_string()) {
                Some(data_url) => set_image_data.set(Some(data_url)),
                None => log::warn!("uploaded file produced no data URL"),
            }
        });
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();
        if let Err(e) = reader.read_as_data_url(&file) {
            log::warn!("failed to read upload: {:?}", e);
        }
    };

    let create_item = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = new_text.get().trim().to_string();
        if text.is_empty() {
            return;
        }
        let image = image_data
            .get()
            .or_else(|| Some(image_url.get().trim().to_string()).filter(|url| !url.is_empty()))
            .unwrap_or_else(|| ctx.with(|engine| engine.config().placeholder_image.clone()));

        let seq = sequence.get();
        set_sequence.set(seq + 1);
        let record = CustomItem::new(custom_item_id(js_sys::Date::now(), seq), text, image);

        match ctx.apply(|engine| engine.add_custom_items(vec![record])) {
            Some(0) => log::info!("item already on the board"),
            Some(_) => {
                set_new_text.set(String::new());
                set_image_url.set(String::new());
                set_image_data.set(None);
            }
            None => {}
        }
    };

    view! {
        <form class="new-item-form" on:submit=create_item>
            <div class="new-item-row">
                <input
                    type="text"
                    placeholder="Add new item..."
                    prop:value=move || new_text.get()
                    on:input=move |ev| {
                        if let Some(input) = input_of(&ev) {
                            set_new_text.set(input.value());
                        }
                    }
                />
                <button type="submit">"Add"</button>
            </div>
            <div class="new-item-row">
                <input
                    type="url"
                    placeholder="Image URL (optional)"
                    prop:value=move || image_url.get()
                    disabled=move || image_data.get().is_some()
                    on:input=move |ev| {
                        if let Some(input) = input_of(&ev) {
                            set_image_url.set(input.value());
                        }
                    }
                />
                <input type="file" accept="image/*" on:change=on_file />
            </div>
            {move || image_data.get().map(|src| view! {
                <div class="upload-preview">
                    <img src=src alt="preview" />
                    <button type="button" class="cancel-btn" on:click=move |_| set_image_data.set(None)>
                        "Remove image"
                    </button>
                </div>
            })}
        </form>
    }
}
