//! Dispatcher schema and handler chain builders.

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::telegram::bot::Command;
use crate::telegram::handlers::{
    handle_callback, handle_command, handle_url_message, recover_unhandled, HandlerDeps, HandlerError,
};

/// Creates the main dispatcher schema for the bot.
///
/// Returns a handler tree for teloxide's Dispatcher. The same schema is used
/// in production and can be wired against mock dependencies in tests.
///
/// Each endpoint is wrapped so an error that escapes its handler is logged
/// and answered with a generic failure notice instead of vanishing into the
/// dispatcher's default error handler.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Plain text that the URL handler should look at. Slash-commands,
/// registered or not, never reach it.
fn is_url_candidate(text: &str) -> bool {
    !text.trim_start().starts_with('/')
}

/// Handler for the registered commands
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let chat_id = msg.chat.id;
                if let Some(notice) = recover_unhandled(handle_command(bot.clone(), msg, cmd, deps).await) {
                    let _ = bot.send_message(chat_id, notice).parse_mode(ParseMode::Html).await;
                }
                Ok(())
            }
        })
}

/// Handler for plain text messages (candidate URLs)
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().map(is_url_candidate).unwrap_or(false))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let chat_id = msg.chat.id;
                if let Some(notice) = recover_unhandled(handle_url_message(bot.clone(), msg, deps).await) {
                    let _ = bot.send_message(chat_id, notice).parse_mode(ParseMode::Html).await;
                }
                Ok(())
            }
        })
}

/// Handler for inline keyboard button presses
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            let chat_id = q.message.as_ref().map(|m| m.chat().id);
            if let Some(notice) = recover_unhandled(handle_callback(bot.clone(), q, deps).await) {
                if let Some(chat_id) = chat_id {
                    let _ = bot.send_message(chat_id, notice).parse_mode(ParseMode::Html).await;
                }
            }
            Ok(())
        }
    })
}
