//! Typed boundary to the Telegram API.
//!
//! Everything the bot does against the platform goes through the
//! [`TelegramApi`] trait: the real client is [`HttpApi`] speaking the
//! Bot API wire shape over reqwest, and tests substitute their own
//! implementations.

pub mod api;
pub mod error;
pub mod http;
pub mod types;
pub mod updates;

pub use api::TelegramApi;
pub use error::TelegramError;
pub use http::HttpApi;
