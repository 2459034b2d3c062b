//! Core utilities, configuration, and errors

pub mod config;
pub mod error;
pub mod utils;

pub use error::{AppError, AppResult};
pub use utils::{escape_html, format_duration, format_size, is_valid_url, truncate_text};
