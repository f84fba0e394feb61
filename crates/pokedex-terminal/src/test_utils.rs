//! Scripted [`PageFetcher`] for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use pokedex_types::error::FetchError;

use crate::api::{NamedResource, Page, PageFetcher};

/// Replays queued responses and records every URL it was asked for.
#[derive(Default)]
pub struct StubFetcher {
    responses: RefCell<VecDeque<Result<Page, FetchError>>>,
    calls: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Page) -> &Self {
        self.responses.borrow_mut().push_back(Ok(page));
        self
    }

    pub fn push_error(&self, err: FetchError) -> &Self {
        self.responses.borrow_mut().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PageFetcher for StubFetcher {
    fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no stub response for {url}"))))
    }
}

/// Build a page from names and raw link strings (`""` means absent).
pub fn page(names: &[&str], next: &str, previous: &str) -> Page {
    let link = |s: &str| (!s.is_empty()).then(|| s.to_string());
    Page {
        count: names.len() as u64,
        next: link(next),
        previous: link(previous),
        results: names
            .iter()
            .map(|name| NamedResource {
                name: (*name).to_string(),
                url: format!("https://pokeapi.co/api/v2/location/{name}/"),
            })
            .collect(),
    }
}
