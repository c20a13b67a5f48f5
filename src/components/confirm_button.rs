//! Confirm Button Component
//!
//! Inline confirmation for destructive board actions.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

/// Confirmation falls back to the plain button after this long
const CONFIRM_WINDOW_MS: u32 = 4_000;

/// Inline confirmation button
///
/// Shows `label` initially. When clicked, shows `prompt` with ✓/✗ buttons.
///
/// # Arguments
/// * `button_class` - CSS class for the initial button
/// * `on_confirm` - Callback to execute when user confirms
#[component]
pub fn ConfirmButton(
    #[prop(into)] label: String,
    #[prop(into)] prompt: String,
    #[prop(into)] button_class: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirming, set_confirming) = signal(false);

    let ask = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_confirming.set(true);
        Timeout::new(CONFIRM_WINDOW_MS, move || {
            let _ = set_confirming.try_set(false);
        })
        .forget();
    };

    view! {
        <Show when=move || !confirming.get()>
            <button class=button_class.clone() on:click=ask>
                {label.clone()}
            </button>
        </Show>
        <Show when=move || confirming.get()>
            <span class="confirm">
                <span class="confirm-text">{prompt.clone()}</span>
                <button
                    class="confirm-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirming.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
