//! Telegram-facing layer: bot setup, dispatch schema, handlers, keyboards,
//! message texts, and the callback token wire format.

pub mod bot;
pub mod callback;
pub mod handlers;
pub mod keyboards;
pub mod messages;
pub mod schema;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use callback::CallbackAction;
pub use handlers::{HandlerDeps, HandlerError, HandlerResult};
pub use schema::schema;
