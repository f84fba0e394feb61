//! Command interpreter and REPL for the Pokedex explorer.
//!
//! Commands implement the `Command` trait and are registered by name. The
//! REPL reads one line at a time, resolves it to a command, and runs it
//! against the pagination `Session`.

pub mod api;
mod commands;
mod interpreter;
pub mod repl;
pub mod session;
#[cfg(test)]
mod test_utils;

/// A fetched listing page and the capability that fetches pages.
pub use api::{HttpPageFetcher, NamedResource, Page, PageFetcher};
/// Register `help`, `exit`, `map` and `mapb` into a registry.
pub use commands::register_builtins;
/// A single executable command trait.
pub use interpreter::Command;
/// Output produced by a command (text or the exit signal).
pub use interpreter::CommandOutput;
/// Registry of available commands with lookup and dispatch.
pub use interpreter::CommandRegistry;
/// Mutable state passed to every command.
pub use interpreter::Environment;
/// The read-eval-print loop and its lifecycle state.
pub use repl::{Repl, ReplState};
/// Forward/backward pagination cursors.
pub use session::Session;
