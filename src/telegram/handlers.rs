//! Message and callback endpoints: the dispatch layer between the chat
//! gateway and the download core.
//!
//! Every error is recovered here and turned into a user-facing message;
//! nothing propagates out of a handler except gateway errors the dispatcher
//! already knows how to log.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatId, InputFile, MessageId, ParseMode};

use crate::core::config;
use crate::core::error::AppError;
use crate::download::{FetchResult, MediaFetcher, Mode};
use crate::platform;
use crate::storage::CounterStore;
use crate::telegram::bot::Command;
use crate::telegram::callback::CallbackAction;
use crate::telegram::keyboards;
use crate::telegram::messages;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for handlers
pub type HandlerResult = Result<(), HandlerError>;

/// Dependencies shared by all handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub fetcher: Arc<MediaFetcher>,
    pub stats: Arc<dyn CounterStore>,
}

/// Last-resort conversion of an endpoint outcome: an escaped error is
/// logged and turned into the generic failure notice for the user; success
/// passes through silently. The caller delivers the notice best effort.
pub fn recover_unhandled(result: HandlerResult) -> Option<&'static str> {
    match result {
        Ok(()) => None,
        Err(e) => {
            log::error!("Unhandled handler error: {}", e);
            Some(messages::GENERIC_FAILURE)
        }
    }
}

/// Rejects results over the transmit limit, deleting the file immediately.
///
/// A result exactly at the limit passes; one byte over is cleaned up and
/// reported as `FileTooLarge` without any transmission attempt.
pub fn enforce_size_limit(result: FetchResult, limit: u64) -> Result<FetchResult, AppError> {
    if result.size_bytes > limit {
        let size = result.size_bytes;
        result.cleanup();
        return Err(AppError::FileTooLarge { size, limit });
    }
    Ok(result)
}

/// Handles /start, /help, /about, and the admin-only /stats.
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, deps: HandlerDeps) -> HandlerResult {
    let chat_id = msg.chat.id;

    match cmd {
        Command::Start => {
            if let Some(user) = &msg.from {
                if let Err(e) = deps.stats.record_user(user.id.0) {
                    log::error!("Failed to record user {}: {}", user.id.0, e);
                }
            }
            bot.send_message(chat_id, messages::WELCOME)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        Command::Help => {
            bot.send_message(chat_id, messages::HELP)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        Command::About => {
            let (downloads, users) = deps.stats.read_stats().unwrap_or((0, 0));
            bot.send_message(chat_id, messages::about(downloads, users))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        Command::Stats => {
            let is_admin = msg
                .from
                .as_ref()
                .map(|user| config::ADMIN_IDS.contains(&user.id.0))
                .unwrap_or(false);
            if !is_admin {
                bot.send_message(chat_id, messages::NOT_ADMIN).await?;
                return Ok(());
            }
            let (downloads, users) = deps.stats.read_stats().unwrap_or((0, 0));
            bot.send_message(chat_id, messages::admin_stats(downloads, users))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::close_keyboard())
                .await?;
        }
    }

    Ok(())
}

/// Handles plain text messages: treats the text as a candidate URL and,
/// when recognized, replies with the info card and download options.
pub async fn handle_url_message(bot: Bot, msg: Message, deps: HandlerDeps) -> HandlerResult {
    let chat_id = msg.chat.id;
    let url = match msg.text() {
        Some(text) => text.trim().to_string(),
        None => return Ok(()),
    };

    if !crate::core::is_valid_url(&url) {
        bot.send_message(chat_id, messages::INVALID_URL)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    let platform = platform::resolve(&url);
    if !platform.is_known() {
        bot.send_message(chat_id, messages::UNSUPPORTED_PLATFORM)
            .parse_mode(ParseMode::Html)
            .await?;
        return Ok(());
    }

    let processing = bot
        .send_message(chat_id, messages::detecting(platform))
        .parse_mode(ParseMode::Html)
        .await?;

    match deps.fetcher.get_info(&url).await {
        Ok(meta) => {
            bot.edit_message_text(chat_id, processing.id, messages::info_card(platform, &meta))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboards::download_options_keyboard(&url))
                .await?;
        }
        Err(e) => {
            log::warn!("get_info failed for {}: {}", url, e);
            bot.edit_message_text(chat_id, processing.id, messages::failure(&e.to_string()))
                .parse_mode(ParseMode::Html)
                .await?;
        }
    }

    Ok(())
}

/// Handles button presses: menu navigation, info cards, and downloads.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, deps: HandlerDeps) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let data = match &q.data {
        Some(data) => data.clone(),
        None => return Ok(()),
    };
    let (chat_id, message_id) = match q.message.as_ref().map(|m| (m.chat().id, m.id())) {
        Some(ids) => ids,
        None => return Ok(()),
    };

    let action = match CallbackAction::parse(&data) {
        Some(action) => action,
        None => {
            log::warn!("Unrecognized callback token: {:?}", data);
            return Ok(());
        }
    };

    match action {
        CallbackAction::DownloadMenu => {
            edit(&bot, chat_id, message_id, messages::PLATFORM_MENU)
                .reply_markup(keyboards::platform_keyboard())
                .await?;
        }
        CallbackAction::Help => {
            edit(&bot, chat_id, message_id, messages::HELP)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        CallbackAction::About => {
            let (downloads, users) = deps.stats.read_stats().unwrap_or((0, 0));
            edit(&bot, chat_id, message_id, messages::about(downloads, users))
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        CallbackAction::BackMain => {
            edit(&bot, chat_id, message_id, messages::WELCOME)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        CallbackAction::Platform(platform) => {
            edit(&bot, chat_id, message_id, messages::platform_hint(platform))
                .reply_markup(keyboards::cancel_keyboard())
                .await?;
        }
        CallbackAction::Cancel => {
            edit(&bot, chat_id, message_id, messages::CANCELLED)
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
        CallbackAction::Close => {
            bot.delete_message(chat_id, message_id).await?;
        }
        CallbackAction::Info { url } => {
            show_media_info(&bot, chat_id, message_id, &url, &deps).await?;
        }
        CallbackAction::Download { mode, url } => {
            process_download(&bot, chat_id, message_id, &url, mode, &deps).await?;
        }
    }

    Ok(())
}

/// `edit_message_text` with HTML parse mode preset.
fn edit(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
) -> teloxide::requests::JsonRequest<teloxide::payloads::EditMessageText> {
    bot.edit_message_text(chat_id, message_id, text.into())
        .parse_mode(ParseMode::Html)
}

/// Shows the extended metadata card for a URL.
async fn show_media_info(bot: &Bot, chat_id: ChatId, message_id: MessageId, url: &str, deps: &HandlerDeps) -> HandlerResult {
    let platform = platform::resolve(url);
    match deps.fetcher.get_info(url).await {
        Ok(meta) => {
            edit(bot, chat_id, message_id, messages::extended_info_card(platform, &meta))
                .reply_markup(keyboards::download_options_keyboard(url))
                .await?;
        }
        Err(e) => {
            log::warn!("Info request failed for {}: {}", url, e);
            edit(bot, chat_id, message_id, messages::failure(&e.to_string())).await?;
        }
    }
    Ok(())
}

/// Runs the full download pipeline for one button press: download, size
/// gate, transmit, unconditional cleanup, counter update.
async fn process_download(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    url: &str,
    mode: Mode,
    deps: &HandlerDeps,
) -> HandlerResult {
    let platform = platform::resolve(url);

    edit(bot, chat_id, message_id, messages::downloading(platform, mode)).await?;

    let result = match deps.fetcher.download(url, mode).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!("Download failed for {}: {}", url, e);
            edit(bot, chat_id, message_id, messages::failure(&e.to_string()))
                .reply_markup(keyboards::main_keyboard())
                .await?;
            return Ok(());
        }
    };

    let result = match enforce_size_limit(result, config::validation::MAX_FILE_SIZE_BYTES) {
        Ok(result) => result,
        Err(AppError::FileTooLarge { size, limit }) => {
            edit(bot, chat_id, message_id, messages::too_large(size, limit)).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    edit(bot, chat_id, message_id, messages::uploading(&result.metadata.title, result.size_bytes)).await?;

    let caption = messages::caption(platform, &result.metadata, result.size_bytes);
    let as_audio = mode == Mode::Audio
        || result
            .file_path
            .extension()
            .map(|ext| ext == "mp3")
            .unwrap_or(false);

    let sent = if as_audio {
        bot.send_audio(chat_id, InputFile::file(result.file_path.clone()))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .title(result.metadata.title.clone())
            .performer(result.metadata.uploader.clone())
            .await
            .map(|_| ())
    } else {
        bot.send_video(chat_id, InputFile::file(result.file_path.clone()))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .supports_streaming(true)
            .await
            .map(|_| ())
    };

    // Transmission has been attempted: the file goes away either way
    result.cleanup();

    match sent {
        Ok(()) => {
            let _ = bot.delete_message(chat_id, message_id).await;
            if let Err(e) = deps.stats.record_download() {
                log::error!("Failed to record download: {}", e);
            }
        }
        Err(e) => {
            log::error!("Failed to send file for {}: {}", url, e);
            edit(bot, chat_id, message_id, messages::failure(&e.to_string()))
                .reply_markup(keyboards::main_keyboard())
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::MediaMetadata;
    use std::path::PathBuf;

    fn fetch_result(dir: &std::path::Path, size: u64) -> FetchResult {
        let path: PathBuf = dir.join("media.mp4");
        fs_err::write(&path, vec![0u8; size as usize]).unwrap();
        FetchResult {
            file_path: path,
            metadata: MediaMetadata::default(),
            size_bytes: size,
        }
    }

    #[test]
    fn test_recover_unhandled_passes_success_through() {
        assert_eq!(recover_unhandled(Ok(())), None);
    }

    #[test]
    fn test_recover_unhandled_yields_the_generic_notice() {
        let err: HandlerError = Box::new(AppError::Extraction("engine blew up".to_string()));
        assert_eq!(recover_unhandled(Err(err)), Some(messages::GENERIC_FAILURE));
    }

    #[test]
    fn test_size_limit_accepts_exactly_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let result = fetch_result(dir.path(), 1024);
        let accepted = enforce_size_limit(result, 1024).unwrap();
        assert!(accepted.file_path.exists());
        accepted.cleanup();
    }

    #[test]
    fn test_size_limit_rejects_one_byte_over_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let result = fetch_result(dir.path(), 1025);
        let path = result.file_path.clone();

        match enforce_size_limit(result, 1024) {
            Err(AppError::FileTooLarge { size, limit }) => {
                assert_eq!(size, 1025);
                assert_eq!(limit, 1024);
            }
            other => panic!("expected FileTooLarge, got {:?}", other.map(|r| r.size_bytes)),
        }
        assert!(!path.exists(), "oversized file must be deleted without transmission");
    }
}
