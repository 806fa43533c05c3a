//! The help surface and the extension module installer.

use std::fmt::Write;
use std::time::Duration;

use ferrite_common::html::Html;
use ferrite_database::model::installed_module::InstalledModule;
use ferrite_proc_macro::command;
use tracing::debug;

use super::arguments::Word;
use super::errors::CommandError;
use super::registry::find_extension;
use super::{Category, CommandCtxt};
use crate::update_handler::reply::rendered_message_id;

/// How long the "module not found" notice stays up before it is removed.
const NOT_FOUND_DISPLAY_TIME: Duration = Duration::from_secs(3);

#[command(
    description = "list all modules, or the commands of one module",
    aliases = ["h"],
    usage = "[module]",
    examples = ["", "admin"]
)]
pub async fn help(ctxt: CommandCtxt<'_>, module: Option<Word>) -> Result<(), CommandError> {
    let prefix = ctxt.data.calling_prefix;

    let Some(Word(name)) = module else {
        let registry = &ctxt.ferrite().registry;
        let mut text = String::from("<b>🚀 Ferrite-UserBot Help</b>\n\n");
        for (category, modules) in registry.modules_by_category() {
            let _ = writeln!(text, "<b>📂 {}</b>", category.title());
            for module in modules {
                let _ = writeln!(text, "  • <code>{prefix}help {}</code>", module.name);
            }
            text.push('\n');
        }
        let _ = writeln!(text, "<b>Total modules:</b> {}", registry.module_count());
        let _ = write!(text, "<b>Command prefix:</b> <code>{prefix}</code>");
        ctxt.reply(text).await?;
        return Ok(());
    };

    match ctxt.ferrite().registry.module(&name) {
        Some(module) => {
            let mut text = format!("<b>📚 Help for {} module</b>\n\n", module.name);
            for command in module.commands {
                let meta = command.metadata();
                let _ = writeln!(
                    text,
                    "<code>{prefix}{}</code>: {}",
                    meta.signature().escaped(),
                    meta.description
                );
            }
            ctxt.reply(text).await?;
        },
        None => {
            // show the mistake briefly, then clean the chat up again
            ctxt.reply(format!("<b>❌ Module {} not found!</b>", name.escaped())).await?;
            tokio::time::sleep(NOT_FOUND_DISPLAY_TIME).await;
            let target = rendered_message_id(&ctxt);
            if let Err(err) = ctxt.telegram().delete_message(ctxt.chat_id(), target).await {
                debug!("failed to remove the help notice: {err}");
            }
        },
    }
    Ok(())
}

#[command(description = "list every installed module by category", usage = "", examples = [""])]
pub async fn modules(ctxt: CommandCtxt<'_>) -> Result<(), CommandError> {
    let registry = &ctxt.ferrite().registry;

    let mut text = String::from("<b>📋 Installed modules:</b>\n\n");
    for (category, modules) in registry.modules_by_category() {
        let names = modules.iter().map(|module| module.name.code()).collect::<Vec<_>>().join(", ");
        let _ = writeln!(text, "<b>📂 {}:</b> {names}", category.title());
    }
    let _ = writeln!(text, "\n<b>Total:</b> {} modules", registry.module_count());
    let _ = write!(
        text,
        "Use <code>{}help [module]</code> for detailed command information.",
        ctxt.data.calling_prefix
    );
    ctxt.reply(text).await?;
    Ok(())
}

#[command(
    description = "install an extension module from the compiled-in catalog",
    usage = "[module_name]",
    examples = ["notes", "text"]
)]
pub async fn loadmodule(ctxt: CommandCtxt<'_>, module: Option<Word>) -> Result<(), CommandError> {
    let Some(Word(raw)) = module else {
        return Err(CommandError::user(format!(
            "<b>❌ Usage:</b> <code>{}loadmodule [module_name]</code>",
            ctxt.data.calling_prefix
        )));
    };
    let name = raw.to_lowercase();

    ctxt.reply(format!("<b>⏳ Loading module {}...</b>", name.escaped())).await?;

    if ctxt.ferrite().registry.module(&name).is_some() {
        return Err(CommandError::user(format!(
            "<b>⚠️ Module {} is already installed!</b>",
            name.escaped()
        )));
    }
    let Some(module) = find_extension(&name) else {
        return Err(CommandError::user(format!(
            "<b>❌ Module {} not found in the extension catalog!</b>",
            name.escaped()
        )));
    };

    let handler = &ctxt.ferrite().database_handler;
    InstalledModule::add(handler, module.name).await.map_err(anyhow::Error::from)?;
    if let Err(err) = ctxt.ferrite().registry.register(module) {
        // keep the persisted list in sync with what actually registered
        InstalledModule::remove(handler, module.name).await.map_err(anyhow::Error::from)?;
        return Err(CommandError::user(format!(
            "<b>❌ Error loading module:</b>\n<code>{}</code>",
            err.escaped()
        )));
    }

    ctxt.reply(format!("<b>✅ Module {} loaded successfully!</b>", name.escaped())).await?;
    Ok(())
}

crate::declare_module!(
    name: "help",
    category: Category::Core,
    commands: [help_command, modules_command, loadmodule_command]
);
