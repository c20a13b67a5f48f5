//! UI Components
//!
//! Reusable Leptos components.

mod confirm_button;
mod item_card;
mod new_item_form;
mod tier_board;
mod toolbar;

pub use confirm_button::ConfirmButton;
pub use item_card::ItemCard;
pub use new_item_form::NewItemForm;
pub use tier_board::TierBoard;
pub use toolbar::Toolbar;
