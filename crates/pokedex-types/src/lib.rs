//! Foundation types for the Pokedex explorer.
//!
//! Shared by every other crate in the workspace: the error taxonomy and the
//! runtime configuration.

pub mod config;
pub mod error;
