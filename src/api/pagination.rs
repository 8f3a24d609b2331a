// src/api/pagination.rs
//! Cursor pagination: drives a fetch-one-page function until the cursor runs
//! out or the caller only wants the first page.

use super::responses::PaginatedResponse;
use crate::error::Result;
use std::future::Future;

/// Accumulates pages in order.
///
/// Kept separate from [`collect_all`] so a caller can look at what arrived
/// before a fetch failed.
#[derive(Debug)]
pub struct PageCollector<T> {
    items: Vec<T>,
    cursor: Option<String>,
    pages_fetched: usize,
}

impl<T> PageCollector<T> {
    /// Starts at `start_cursor`; `None` or an empty cursor starts from the top.
    pub fn new(start_cursor: Option<&str>) -> Self {
        Self {
            items: Vec::new(),
            cursor: start_cursor.filter(|c| !c.is_empty()).map(str::to_string),
            pages_fetched: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The cursor the next fetch will use.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Appends one page and moves the cursor. Returns whether another page
    /// should be fetched.
    pub fn absorb(&mut self, page: PaginatedResponse<T>, stop_early: bool) -> bool {
        self.pages_fetched += 1;
        self.items.extend(page.results);
        self.cursor = page.next_cursor.filter(|c| !c.is_empty());

        if !page.has_more || stop_early {
            return false;
        }
        if self.cursor.is_none() {
            log::warn!(
                "Page {} reported more results but no cursor; stopping",
                self.pages_fetched
            );
            return false;
        }
        true
    }

    /// Fetches pages until [`absorb`](Self::absorb) says stop. A failing
    /// fetch returns its error at once and leaves earlier pages in place.
    pub async fn run<F, Fut>(&mut self, mut fetch_page: F, stop_early: bool) -> Result<()>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<PaginatedResponse<T>>>,
    {
        loop {
            let page = fetch_page(self.cursor.clone()).await?;
            log::debug!(
                "Fetched page {} with {} results (has_more: {})",
                self.pages_fetched + 1,
                page.results.len(),
                page.has_more
            );
            if !self.absorb(page, stop_early) {
                break;
            }
        }
        log::debug!(
            "Collected {} results over {} pages",
            self.items.len(),
            self.pages_fetched
        );
        Ok(())
    }
}

/// Collects every result from `start_cursor` onwards, strictly in sequence.
///
/// With `stop_early` only the first page is fetched.
pub async fn collect_all<T, F, Fut>(
    fetch_page: F,
    start_cursor: Option<&str>,
    stop_early: bool,
) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>>>,
{
    let mut collector = PageCollector::new(start_cursor);
    collector.run(fetch_page, stop_early).await?;
    Ok(collector.into_items())
}
