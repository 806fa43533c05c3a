use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::bail;

use super::{Category, TCommand, admin, help, info, notes, text};

/// A named group of commands sharing a help page.
pub struct Module {
    pub name: &'static str,
    pub category: Category,
    pub commands: &'static [TCommand],
}

/// Declares the `MODULE` static for a command module file.
#[macro_export]
macro_rules! declare_module {
    (name: $name:literal, category: $category:expr, commands: [$($command:ident),+ $(,)?]) => {
        pub static MODULE: $crate::command::registry::Module = $crate::command::registry::Module {
            name: $name,
            category: $category,
            commands: &[$(&$command as $crate::command::TCommand),+],
        };
    };
}

/// Modules registered unconditionally at startup.
pub static BUILTIN_MODULES: &[&Module] = &[&admin::MODULE, &help::MODULE, &info::MODULE];

/// The compiled-in extension catalog the module installer loads from.
pub static EXTENSIONS: &[&Module] = &[&notes::MODULE, &text::MODULE];

pub fn find_extension(name: &str) -> Option<&'static Module> {
    EXTENSIONS.iter().copied().find(|module| module.name.eq_ignore_ascii_case(name))
}

/// All registered modules and the name/alias map used for dispatch.
///
/// Owned by the bot state and built at startup from [`BUILTIN_MODULES`]
/// plus whichever extensions the installer has enabled. The installer is
/// the only runtime writer.
pub struct CommandRegistry {
    modules: RwLock<Vec<&'static Module>>,
    commands: RwLock<HashMap<&'static str, TCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            modules: RwLock::new(Vec::new()),
            commands: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a module and all of its command names and aliases.
    ///
    /// Fails without side effects when the module name or any command
    /// name is already taken.
    pub fn register(&self, module: &'static Module) -> anyhow::Result<()> {
        let mut modules = self.modules.write().unwrap();
        let mut commands = self.commands.write().unwrap();

        if modules.iter().any(|m| m.name.eq_ignore_ascii_case(module.name)) {
            bail!("module {} is already registered", module.name);
        }

        let mut entries: Vec<(&'static str, TCommand)> = Vec::new();
        for command in module.commands {
            let meta = command.metadata();
            for name in std::iter::once(meta.name).chain(meta.aliases.iter().copied()) {
                if commands.contains_key(name) || entries.iter().any(|(taken, _)| *taken == name) {
                    bail!("command name {name} is already taken");
                }
                entries.push((name, *command));
            }
        }

        for (name, command) in entries {
            commands.insert(name, command);
        }
        modules.push(module);
        Ok(())
    }

    /// Removes a module and its command names again; the installer's
    /// rollback path. Returns whether the module was present.
    pub fn deregister(&self, name: &str) -> bool {
        let mut modules = self.modules.write().unwrap();
        let mut commands = self.commands.write().unwrap();

        let Some(index) = modules.iter().position(|m| m.name.eq_ignore_ascii_case(name)) else {
            return false;
        };
        let module = modules.remove(index);
        for command in module.commands {
            let meta = command.metadata();
            commands.remove(meta.name);
            for alias in meta.aliases {
                commands.remove(*alias);
            }
        }
        true
    }

    /// Finds a command by name or alias, case-insensitively.
    pub fn find_command(&self, name: &str) -> Option<TCommand> {
        let lowered = name.to_lowercase();
        self.commands.read().unwrap().get(lowered.as_str()).copied()
    }

    /// Finds a module by exact (case-insensitive) name.
    pub fn module(&self, name: &str) -> Option<&'static Module> {
        self.modules
            .read()
            .unwrap()
            .iter()
            .find(|module| module.name.eq_ignore_ascii_case(name))
            .copied()
    }

    pub fn module_count(&self) -> usize {
        self.modules.read().unwrap().len()
    }

    /// All modules grouped by category; categories and the modules inside
    /// them both come out sorted by name.
    pub fn modules_by_category(&self) -> Vec<(Category, Vec<&'static Module>)> {
        let mut sorted: Vec<&'static Module> = self.modules.read().unwrap().clone();
        sorted.sort_by_key(|module| (module.category.label(), module.name));

        let mut grouped: Vec<(Category, Vec<&'static Module>)> = Vec::new();
        for module in sorted {
            match grouped.last_mut() {
                Some((category, members)) if *category == module.category => members.push(module),
                _ => grouped.push((module.category, vec![module])),
            }
        }
        grouped
    }
}
