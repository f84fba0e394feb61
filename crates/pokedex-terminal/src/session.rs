//! Pagination cursor state carried across REPL iterations.

use pokedex_types::config::DEFAULT_FIRST_PAGE_URL;
use pokedex_types::error::{PokedexError, Result};

use crate::api::{Page, PageFetcher};

/// Forward/backward cursors over a paginated listing.
///
/// Cursors hold the server's links verbatim. Both are replaced together on
/// every successful fetch and left alone when a fetch fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    first_page_url: String,
    next: Option<String>,
    previous: Option<String>,
}

impl Session {
    /// Fresh session starting at the public location listing.
    pub fn new() -> Self {
        Self::with_first_page(DEFAULT_FIRST_PAGE_URL)
    }

    /// Fresh session whose first `advance` fetches `url`.
    pub fn with_first_page(url: impl Into<String>) -> Self {
        Self {
            first_page_url: url.into(),
            next: None,
            previous: None,
        }
    }

    /// Session positioned mid-listing.
    #[cfg(test)]
    pub(crate) fn with_cursors(first: &str, next: Option<&str>, previous: Option<&str>) -> Self {
        Self {
            first_page_url: first.to_string(),
            next: next.map(str::to_string),
            previous: previous.map(str::to_string),
        }
    }

    pub fn first_page_url(&self) -> &str {
        &self.first_page_url
    }

    /// Forward cursor, `None` until a page reports a next link.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }

    /// Backward cursor, `None` when there is no previous page.
    pub fn previous_url(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Fetch the page after the current one (the first page on a fresh
    /// session, or once the listing has no next link).
    pub fn advance(&mut self, fetcher: &dyn PageFetcher) -> Result<Page> {
        let url = self
            .next
            .clone()
            .unwrap_or_else(|| self.first_page_url.clone());
        self.load(&url, fetcher)
    }

    /// Fetch the page before the current one.
    ///
    /// Fails with [`PokedexError::NoPreviousPage`] without touching the
    /// network when there is no backward cursor.
    pub fn retreat(&mut self, fetcher: &dyn PageFetcher) -> Result<Page> {
        let Some(url) = self.previous.clone() else {
            return Err(PokedexError::NoPreviousPage);
        };
        self.load(&url, fetcher)
    }

    fn load(&mut self, url: &str, fetcher: &dyn PageFetcher) -> Result<Page> {
        let page = fetcher.fetch(url).inspect_err(|e| {
            log::debug!("Fetch of {url} failed, cursors unchanged: {e}");
        })?;
        self.next = page.next.clone();
        self.previous = page.previous.clone();
        log::trace!(
            "Cursors now next={:?} previous={:?}",
            self.next,
            self.previous
        );
        Ok(page)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
