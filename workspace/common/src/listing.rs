//! In-memory search and pagination of an already fetched, already sorted
//! profile list.

use serde::{Deserialize, Serialize};
use tracing::trace;
use utoipa::ToSchema;

use crate::ProfileDto;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
/// Pages shown on each side of the current one in the link strip.
pub const PAGE_LINK_SIBLINGS: u64 = 2;

/// Keeps the profiles whose fullname contains `term`, ignoring case.
/// Order is preserved; an empty term keeps everything.
pub fn filter_by_fullname(profiles: Vec<ProfileDto>, term: &str) -> Vec<ProfileDto> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return profiles;
    }
    profiles
        .into_iter()
        .filter(|profile| profile.fullname.to_lowercase().contains(&needle))
        .collect()
}

/// One entry of the pagination strip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PageLink {
    Page(u64),
    Ellipsis,
}

/// Link strip: first page, `siblings` pages around `current`, last page,
/// with an ellipsis wherever pages are skipped. Empty for a single page.
pub fn page_links(current: u64, total_pages: u64, siblings: u64) -> Vec<PageLink> {
    let mut links = Vec::new();
    if total_pages <= 1 {
        return links;
    }

    links.push(PageLink::Page(1));

    let start = current.saturating_sub(siblings).max(2);
    let end = current.saturating_add(siblings).min(total_pages - 1);

    if start > 2 {
        links.push(PageLink::Ellipsis);
    }
    for number in start..=end {
        links.push(PageLink::Page(number));
    }
    if end < total_pages - 1 {
        links.push(PageLink::Ellipsis);
    }

    links.push(PageLink::Page(total_pages));
    links
}

/// Position of one page inside a list of `total_items` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    /// Index of the first row on the page (inclusive).
    pub start: u64,
    /// Index past the last row on the page (exclusive).
    pub end: u64,
}

impl PageWindow {
    /// Page numbers are 1-indexed; page 0 is read as page 1 and a zero page
    /// size as 1. A page past the end yields an empty window.
    pub fn new(total_items: u64, page: u64, page_size: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let start = ((page - 1).saturating_mul(page_size)).min(total_items);
        let end = start.saturating_add(page_size).min(total_items);
        trace!(
            "Page window {} of {} (size {}): rows {}..{}",
            page, total_pages, page_size, start, end
        );
        Self {
            page,
            page_size,
            total_items,
            total_pages,
            start,
            end,
        }
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.start as usize).min(items.len());
        let end = (self.end as usize).min(items.len());
        &items[start..end]
    }

    /// 1-based number of the first row shown, 0 when the page is empty.
    pub fn showing_from(&self) -> u64 {
        if self.end > self.start { self.start + 1 } else { 0 }
    }

    pub fn showing_to(&self) -> u64 {
        self.end
    }
}

/// Search term, page and page size of a listing view.
///
/// Changing the search term or the page size sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    search: String,
    page: u64,
    page_size: u64,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingState {
    /// State as requested by a client. The page is applied last so the
    /// requested page survives the resets of the other two settings.
    pub fn new(search: Option<String>, page: Option<u64>, page_size: Option<u64>) -> Self {
        let mut state = Self::default();
        if let Some(page_size) = page_size {
            state.set_page_size(page_size);
        }
        if let Some(term) = search {
            state.set_search(term);
        }
        if let Some(page) = page {
            state.go_to(page);
        }
        state
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.page = 1;
    }

    pub fn go_to(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Filters `profiles` by the search term and cuts out the current page.
    pub fn apply(&self, profiles: Vec<ProfileDto>) -> ProfilePage {
        let filtered = filter_by_fullname(profiles, &self.search);
        let window = PageWindow::new(filtered.len() as u64, self.page, self.page_size);
        ProfilePage {
            items: window.slice(&filtered).to_vec(),
            search: self.search.clone(),
            page: window.page,
            page_size: window.page_size,
            total_items: window.total_items,
            total_pages: window.total_pages,
            showing_from: window.showing_from(),
            showing_to: window.showing_to(),
            links: page_links(window.page, window.total_pages, PAGE_LINK_SIBLINGS),
        }
    }
}

/// One page of a profile listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfilePage {
    pub items: Vec<ProfileDto>,
    pub search: String,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub showing_from: u64,
    pub showing_to: u64,
    pub links: Vec<PageLink>,
}
