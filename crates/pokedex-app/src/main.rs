//! Pokedex entry point.
//!
//! Interactive explorer over the PokeAPI location listing. Type `help` at
//! the `pokedex > ` prompt for commands; `exit` or end of input quits.
//! Set `POKEDEX_CONFIG` to a TOML file to override defaults and `RUST_LOG`
//! to see diagnostics on stderr.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use pokedex_net::{RustlsTlsProvider, TlsProvider};
use pokedex_terminal::{CommandRegistry, HttpPageFetcher, Repl, Session};
use pokedex_types::config::PokedexConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::var_os("POKEDEX_CONFIG") {
        Some(path) => PokedexConfig::load(Path::new(&path))
            .with_context(|| format!("loading {}", Path::new(&path).display()))?,
        None => PokedexConfig::default(),
    };
    log::info!("Starting Pokedex (first page: {})", config.first_page_url);

    let tls: Arc<dyn TlsProvider> = Arc::new(RustlsTlsProvider::new());
    let fetcher = HttpPageFetcher::from_config(&config).with_tls(tls);

    let registry = CommandRegistry::pokedex();
    log::debug!("Registered {} commands", registry.len());

    let session = Session::with_first_page(config.first_page_url.clone());
    let mut repl = Repl::new(&registry, &fetcher, session).with_prompt(config.prompt.clone());

    repl.run(io::stdin().lock(), io::stdout().lock())
        .context("terminal I/O failed")?;
    Ok(())
}
