//! Command trait, registry, and dispatch logic.

use std::collections::HashMap;

use pokedex_types::error::{PokedexError, Result};

use crate::api::PageFetcher;
use crate::session::Session;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the driver to stop reading input.
    Exit {
        /// Farewell line printed before stopping.
        message: String,
    },
}

/// Mutable state handed to every command.
pub struct Environment<'a> {
    /// Pagination cursors.
    pub session: &'a mut Session,
    /// Page source for `map` / `mapb`.
    pub fetcher: &'a dyn PageFetcher,
    /// The registry the command was dispatched from (for `help`).
    pub registry: &'a CommandRegistry,
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Execute the command against the environment.
    fn execute(&self, env: &mut Environment<'_>) -> Result<CommandOutput>;
}

/// Registry of available commands.
///
/// Filled once at startup, then only read.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }

    /// All commands, sorted by name.
    pub fn list(&self) -> Vec<&dyn Command> {
        let mut cmds: Vec<&dyn Command> = self.commands.values().map(|c| c.as_ref()).collect();
        cmds.sort_by(|a, b| a.name().cmp(b.name()));
        cmds
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Look `name` up and run it.
    ///
    /// An unknown name yields [`PokedexError::CommandNotFound`] carrying the
    /// input unchanged.
    pub fn dispatch(&self, name: &str, env: &mut Environment<'_>) -> Result<CommandOutput> {
        match self.lookup(name) {
            Some(cmd) => cmd.execute(env),
            None => Err(PokedexError::CommandNotFound(name.to_string())),
        }
    }
}
