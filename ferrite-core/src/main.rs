use std::sync::Arc;

use ferrite_common::config::CONFIG;
use ferrite_common::tracing_init;
use ferrite_telegram::updates::UpdatePoller;
use tracing::info;

use crate::ferrite::{Ferrite, ThreadSafeFerrite};
use crate::update_handler::handle_update;

mod command;
mod ferrite;
mod replies;
#[cfg(test)]
mod testutil;
mod update_handler;

#[tokio::main]
async fn main() {
    tracing_init!();

    info!("Initialising");
    let ferrite: ThreadSafeFerrite = Arc::new(Ferrite::new().await.unwrap());
    info!("Logged in as {} ({})", ferrite.me.first_name, ferrite.me.id);

    let mut poller = UpdatePoller::new(ferrite.telegram.clone(), CONFIG.telegram.poll_timeout_seconds);
    info!("Polling for updates with prefix {}", CONFIG.prefix.default);

    loop {
        for update in poller.next_batch().await {
            tokio::spawn(handle_update(ferrite.clone(), update));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::command::registry::{BUILTIN_MODULES, CommandRegistry, EXTENSIONS};

    #[test]
    fn the_full_module_catalog_registers_cleanly() {
        let registry = CommandRegistry::new();
        for module in BUILTIN_MODULES.iter().chain(EXTENSIONS.iter()).copied() {
            registry.register(module).unwrap();
        }

        assert_eq!(registry.module_count(), 5);
        for name in ["ban", "help", "h", "modules", "loadmodule", "about", "info", "id", "save", "type"] {
            assert!(registry.find_command(name).is_some(), "{name} should dispatch");
        }
    }
}
