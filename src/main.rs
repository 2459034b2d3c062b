use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use mediadown::core::config;
use mediadown::download::MediaFetcher;
use mediadown::storage::FileCounterStore;
use mediadown::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, filesystem, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    pretty_env_logger::init();

    // Catch panics escaping the dispatcher so they end up in the log
    // instead of silently killing a worker
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    fs_err::create_dir_all(&*config::DOWNLOAD_FOLDER)?;

    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let stats = FileCounterStore::new(&*config::STATS_FILE);
    log::info!(
        "Starting mediadown bot (downloads: {}, stats: {})",
        &*config::DOWNLOAD_FOLDER,
        stats.path().display()
    );

    let deps = HandlerDeps {
        fetcher: Arc::new(MediaFetcher::new()),
        stats: Arc::new(stats),
    };

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
