//! mediadown: a Telegram bot that downloads video and audio from social
//! platforms through yt-dlp, with a direct GraphQL path for Instagram.
//!
//! The crate splits into five layers:
//! - [`core`]: configuration, errors, and formatting helpers
//! - [`platform`]: URL to platform resolution
//! - [`download`]: the extraction engine wrappers and the fetch orchestrator
//! - [`storage`]: persisted download/user counters
//! - [`telegram`]: bot wiring, dispatch schema, and handlers

pub mod core;
pub mod download;
pub mod platform;
pub mod storage;
pub mod telegram;

pub use crate::core::error::{AppError, AppResult};
pub use crate::download::{FetchResult, MediaFetcher, Mode};
pub use crate::platform::Platform;
