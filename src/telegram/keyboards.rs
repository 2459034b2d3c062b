//! Inline keyboard builders.

use crate::platform::Platform;
use crate::telegram::callback::CallbackAction;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Shorthand for a callback button built from a structured action.
fn cb(label: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), action.encode())
}

/// Main menu shown with /start, /help, and after cancellation.
pub fn main_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            cb("📥 Download", CallbackAction::DownloadMenu),
            cb("❓ Help", CallbackAction::Help),
        ],
        vec![cb("ℹ️ About", CallbackAction::About)],
    ])
}

/// Platform picker, two platforms per row, table order.
pub fn platform_keyboard() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = vec![];
    let mut current_row: Vec<InlineKeyboardButton> = vec![];

    for platform in Platform::all() {
        let label = format!("{} {}", platform.icon(), platform.title());
        current_row.push(cb(label, CallbackAction::Platform(platform)));
        if current_row.len() == 2 {
            rows.push(std::mem::take(&mut current_row));
        }
    }
    if !current_row.is_empty() {
        rows.push(current_row);
    }
    rows.push(vec![cb("🔙 Back", CallbackAction::BackMain)]);

    InlineKeyboardMarkup::new(rows)
}

/// Download options attached to an info card.
pub fn download_options_keyboard(url: &str) -> InlineKeyboardMarkup {
    use crate::download::Mode;
    let dl = |mode| CallbackAction::Download {
        mode,
        url: url.to_string(),
    };
    InlineKeyboardMarkup::new(vec![
        vec![cb("📹 Video", dl(Mode::Video)), cb("🎵 Audio", dl(Mode::Audio))],
        vec![
            cb("🎬 HD Quality", dl(Mode::HdVideo)),
            cb("ℹ️ Info", CallbackAction::Info { url: url.to_string() }),
        ],
        vec![cb("❌ Cancel", CallbackAction::Cancel)],
    ])
}

/// Single cancel button (platform hint screens).
pub fn cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![cb("❌ Cancel", CallbackAction::Cancel)]])
}

/// Single close button (admin stats).
pub fn close_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![cb("❌ Close", CallbackAction::Close)]])
}
