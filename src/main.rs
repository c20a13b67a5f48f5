//! Tier List Frontend Entry Point

mod app;
mod browser;
mod components;
mod context;
mod store;

use app::App;
use leptos::prelude::*;

/// Lines kept for bug reports
const LOG_CAPACITY: usize = 500;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = rolling_logger::init_logger("TierList", LOG_CAPACITY) {
        web_sys::console::warn_1(&format!("logger not installed: {}", e).into());
    }
    mount_to_body(App);
}
