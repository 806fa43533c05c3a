use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use ferrite_common::config::CONFIG;
use ferrite_database::DatabaseHandler;
use ferrite_database::model::installed_module::InstalledModule;
use ferrite_telegram::types::User;
use ferrite_telegram::{HttpApi, TelegramApi};
use tracing::warn;

use crate::command::registry::{self, CommandRegistry};
use crate::replies::Replies;

pub type ThreadSafeFerrite = Arc<Ferrite>;

/// Central bot state: the platform client, the logged-in session's
/// identity, the command registry, persistence, and reply bookkeeping.
pub struct Ferrite {
    pub telegram: Arc<dyn TelegramApi>,
    pub database_handler: DatabaseHandler,
    pub registry: CommandRegistry,
    pub replies: Replies,
    /// Profile of the session user, fetched once at startup. Messages not
    /// authored by this user never reach the command parser.
    pub me: User,
    pub started_at: Instant,
}

impl Ferrite {
    /// Connects everything up from `CONFIG` and registers the built-in
    /// modules plus every installed extension.
    pub async fn new() -> anyhow::Result<Ferrite> {
        let telegram: Arc<dyn TelegramApi> = Arc::new(HttpApi::with_api_url(
            &CONFIG.authentication.token,
            &CONFIG.telegram.api_url,
        ));
        let me = telegram.get_me().await.context("failed to fetch the session user")?;
        let database_handler = DatabaseHandler::new(&CONFIG.database.path)
            .await
            .context("failed to open the database")?;

        let ferrite = Ferrite {
            telegram,
            database_handler,
            registry: CommandRegistry::new(),
            replies: Replies::new(),
            me,
            started_at: Instant::now(),
        };
        ferrite.register_startup_modules().await?;
        Ok(ferrite)
    }

    async fn register_startup_modules(&self) -> anyhow::Result<()> {
        for module in registry::BUILTIN_MODULES.iter().copied() {
            self.registry.register(module)?;
        }

        // a clashing or stale installed record should not kill startup
        for name in InstalledModule::list(&self.database_handler).await? {
            match registry::find_extension(&name) {
                Some(module) => {
                    if let Err(err) = self.registry.register(module) {
                        warn!("skipping installed module {name}: {err}");
                    }
                },
                None => warn!("installed module {name} is not in the extension catalog, skipping"),
            }
        }
        Ok(())
    }
}
