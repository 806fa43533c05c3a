//! The command system.
//!
//! The key things that make up the command system are:
//!
//! - The [`Command`] trait: Defines the `execute` method which executes the actual command.
//!
//!   This is relatively low-level and only gives you a `CommandCtxt`, from which you manually
//!   have to extract args.
//!
//!   Normally, you don't want or need to implement this trait manually.
//!   Just write the function and annotate it with `#[command]`, which generates a type
//!   that implements this trait (and delegates to the annotated function).
//!   See its documentation for how that works.
//!
//!   This is used as a trait object (`&dyn Command`), because commands are stored along with
//!   all other commands in the registry.
//!
//! - The [`arguments::ParseArgument`] trait: Implemented for types that can be parsed from
//!   arguments.
//!
//!   These types also compose well: for example, `Option<T>` implements `ParseArgument` if
//!   `T: ParseArgument`, which allows recovering from low-severity errors in `T`'s parser
//!   (e.g. if the argument is not present, it will be set to `None`).
//!
//! - The registry: a [`registry::CommandRegistry`] instance owned by the bot state maps
//!   command names and aliases to trait objects, and module names to their command sets.
//!   It is built at startup from the built-in modules plus whichever extensions the
//!   installer has enabled.

use std::fmt::Display;

use async_trait::async_trait;
use ferrite_telegram::TelegramError;
use ferrite_telegram::api::TelegramApi;
use ferrite_telegram::types::{EntityKind, Message, User};

use self::errors::ArgsExhausted;
pub use self::errors::ExecutionError;
use crate::ferrite::ThreadSafeFerrite;
use crate::update_handler::reply;

pub mod admin;
pub mod arguments;
pub mod errors;
pub mod help;
pub mod info;
pub mod notes;
pub mod registry;
pub mod text;

#[derive(Debug)]
pub struct CommandMetadata {
    pub description: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub examples: &'static [&'static str],
    pub usage: &'static str,
}

impl CommandMetadata {
    /// The name plus its usage string, as shown on help pages.
    pub fn signature(&self) -> String {
        if self.usage.is_empty() {
            self.name.to_owned()
        } else {
            format!("{} {}", self.name, self.usage)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Category {
    Admin,
    Core,
    Fun,
    Utils,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Core => "core",
            Self::Fun => "fun",
            Self::Utils => "utils",
        }
    }

    /// Header form for rendering ("Admin").
    pub fn title(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Core => "Core",
            Self::Fun => "Fun",
            Self::Utils => "Utils",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A command that can be executed.
///
/// You usually don't want to or need to implement this manually -- write the function that
/// handles the command and apply the `#[command]` proc macro. It will generate a struct that
/// implements this.
/// See the proc macro's documentation too for more details.
// This trait is used as a trait object and AFIT makes traits not object safe, so we still need
// #[async_trait] here :(
#[async_trait]
pub trait Command {
    fn metadata(&self) -> &'static CommandMetadata;

    /// Parses arguments off the context's cursor and executes the command.
    async fn execute(&self, ctxt: CommandCtxt<'_>) -> Result<(), ExecutionError>;
}

/// Just a type alias for a command as a trait object with other necessary bounds.
/// See [Command] for more documentation.
pub type TCommand = &'static (dyn Command + Send + Sync);

impl std::fmt::Debug for dyn Command + Send + Sync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.metadata().name).finish()
    }
}

/// Static data shared between subcontexts of one invocation.
#[derive(Clone)]
pub struct CommandData<'a> {
    pub ferrite: &'a ThreadSafeFerrite,
    /// The triggering message, authored by the session user.
    pub message: &'a Message,
    pub calling_prefix: &'a str,
}

/// Cursor over the whitespace-separated words following the command name.
///
/// The window is a subslice of the message text, which lets argument
/// parsers recover a word's position inside the original text.
#[derive(Clone, Copy)]
struct Args<'a> {
    window: &'a str,
}

impl<'a> Args<'a> {
    fn new(raw: &'a str) -> Self {
        Self { window: raw.trim_start() }
    }

    fn next_word(&mut self) -> Option<&'a str> {
        let trimmed = self.window.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, tail) = trimmed.split_at(end);
        self.window = tail;
        Some(word)
    }

    fn take_rest(&mut self) -> &'a str {
        let rest = self.window.trim();
        self.window = "";
        rest
    }
}

/// A parsing context: the shared invocation data plus the argument cursor.
#[derive(Clone)]
pub struct CommandCtxt<'a> {
    pub data: &'a CommandData<'a>,
    args: Args<'a>,
}

impl<'a> CommandCtxt<'a> {
    pub fn new(data: &'a CommandData<'a>, args: &'a str) -> Self {
        Self {
            data,
            args: Args::new(args),
        }
    }

    /// Cheaply forks this context. Useful for trying a parse and throwing
    /// the fork away after failing; assign the fork back to commit.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Eagerly takes a word. If you aren't sure you want to keep it,
    /// use `fork` to try it in a subcontext first.
    pub fn next_word(&mut self) -> Result<&'a str, ArgsExhausted> {
        self.args.next_word().ok_or(ArgsExhausted)
    }

    /// The rest of the message.
    pub fn rest(&mut self) -> Result<&'a str, ArgsExhausted> {
        let rest = self.args.take_rest();
        if rest.is_empty() { Err(ArgsExhausted) } else { Ok(rest) }
    }

    /// The structured mention entity starting exactly at `word`, if the
    /// message carries one. `word` must be a subslice of the message text;
    /// anything else simply finds nothing.
    pub fn text_mention_at(&self, word: &str) -> Option<&'a User> {
        let text = self.data.message.text.as_deref()?;
        let byte_offset = (word.as_ptr() as usize).checked_sub(text.as_ptr() as usize)?;
        if byte_offset > text.len() {
            return None;
        }
        // entity offsets count UTF-16 units
        let utf16_offset = text.get(..byte_offset)?.encode_utf16().count() as i64;
        self.data
            .message
            .entities
            .iter()
            .find(|entity| entity.kind == EntityKind::TextMention && entity.offset == utf16_offset)
            .and_then(|entity| entity.user.as_ref())
    }

    pub fn ferrite(&self) -> &'a ThreadSafeFerrite {
        self.data.ferrite
    }

    pub fn telegram(&self) -> &'a dyn TelegramApi {
        self.data.ferrite.telegram.as_ref()
    }

    pub fn chat_id(&self) -> i64 {
        self.data.message.chat.id
    }

    /// Renders command output into the chat, editing in place.
    pub async fn reply(&self, text: impl AsRef<str>) -> Result<(), TelegramError> {
        reply::respond(self, text.as_ref()).await
    }
}
