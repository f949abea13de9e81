//! In-memory state behind the object list and comparison views.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::auth::Session;
use crate::feed::{DEFAULT_WINDOW_DAYS, NeoFeedClient, add_days};
use crate::fetch::HttpClient;
use crate::filter::{FilterConfig, apply_filter_and_sort};
use crate::model::Neo;

/// Cards shown initially and added by each `show_more`.
pub const PAGE_SIZE: usize = 10;

pub const SIGN_IN_REQUIRED: &str =
    "Authentication Required: Please sign in to access the comparison feature.";

/// The date range that the next fetch will cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub days: u64,
}

impl DateWindow {
    pub fn new(start: NaiveDate, days: u64) -> Self {
        Self { start, days }
    }

    pub fn end(&self) -> NaiveDate {
        add_days(self.start, self.days)
    }

    pub fn next(&self) -> Self {
        Self::new(self.end(), self.days)
    }
}

/// Loaded objects plus everything the views derive from them.
///
/// Mutated only through `&mut self`, so fetches issued through one state
/// complete in the order they were started.
#[derive(Debug, Clone)]
pub struct DashboardState {
    neos: Vec<Neo>,
    window: DateWindow,
    filter: FilterConfig,
    selected: Vec<Neo>,
    display_count: usize,
    error: Option<String>,
}

impl DashboardState {
    pub fn new(start: NaiveDate) -> Self {
        Self::with_window(DateWindow::new(start, DEFAULT_WINDOW_DAYS))
    }

    pub fn with_window(window: DateWindow) -> Self {
        Self {
            neos: Vec::new(),
            window,
            filter: FilterConfig::default(),
            selected: Vec::new(),
            display_count: PAGE_SIZE,
            error: None,
        }
    }

    pub fn neos(&self) -> &[Neo] {
        &self.neos
    }

    pub fn window(&self) -> DateWindow {
        self.window
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the current window and replaces the loaded objects.
    pub async fn load<C: HttpClient>(&mut self, client: &NeoFeedClient<C>) -> bool {
        self.fetch_window(client, false).await
    }

    /// Advances the window and appends what it holds. Objects already loaded
    /// from an earlier window are not deduplicated.
    pub async fn load_more<C: HttpClient>(&mut self, client: &NeoFeedClient<C>) -> bool {
        self.window = self.window.next();
        self.fetch_window(client, true).await
    }

    /// Starts over from `today` with the default window and page size.
    pub async fn refresh<C: HttpClient>(
        &mut self,
        client: &NeoFeedClient<C>,
        today: NaiveDate,
    ) -> bool {
        self.window = DateWindow::new(today, DEFAULT_WINDOW_DAYS);
        self.display_count = PAGE_SIZE;
        self.fetch_window(client, false).await
    }

    async fn fetch_window<C: HttpClient>(
        &mut self,
        client: &NeoFeedClient<C>,
        append: bool,
    ) -> bool {
        self.error = None;
        match client
            .fetch_paginated_window(self.window.start, self.window.days)
            .await
        {
            Ok(response) => {
                let fetched = response.flatten();
                info!(
                    start = %self.window.start,
                    days = self.window.days,
                    fetched = fetched.len(),
                    append,
                    "Window loaded"
                );
                if append {
                    self.neos.extend(fetched);
                } else {
                    self.neos = fetched;
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "Window load failed, keeping loaded objects");
                self.error = Some(e.to_string());
                false
            }
        }
    }

    /// Replaces the loaded objects directly, as a completed fetch would.
    pub fn set_neos(&mut self, neos: Vec<Neo>) {
        self.neos = neos;
    }

    pub fn set_filter(&mut self, filter: FilterConfig) {
        self.filter = filter;
    }

    pub fn reset_filter(&mut self) {
        self.filter = FilterConfig::default();
    }

    pub fn visible(&self) -> Vec<Neo> {
        apply_filter_and_sort(&self.neos, &self.filter)
    }

    /// The first `display_count` visible objects.
    pub fn page(&self) -> Vec<Neo> {
        let mut visible = self.visible();
        visible.truncate(self.display_count);
        visible
    }

    pub fn show_more(&mut self) {
        self.display_count += PAGE_SIZE;
    }

    /// Grows the page by whole steps until it holds at least `n` objects.
    pub fn show_at_least(&mut self, n: usize) {
        if n > self.display_count {
            let steps = (n - self.display_count).div_ceil(PAGE_SIZE);
            self.display_count = self
                .display_count
                .saturating_add(steps.saturating_mul(PAGE_SIZE));
        }
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    /// Visible objects beyond the current page.
    pub fn remaining(&self) -> usize {
        self.visible().len().saturating_sub(self.display_count)
    }

    /// Adds `neo` to the selection, or removes every entry with its id.
    pub fn toggle_selection(&mut self, neo: &Neo, selected: bool) {
        if selected {
            self.selected.push(neo.clone());
        } else {
            self.selected.retain(|n| n.id != neo.id);
        }
    }

    pub fn selected(&self) -> &[Neo] {
        &self.selected
    }

    /// Selects the loaded objects whose id is in `ids`, in loaded order.
    ///
    /// Records an error when nothing matches, since the ids may belong to a
    /// window that is not loaded.
    pub fn select_by_ids(&mut self, ids: &[String]) -> usize {
        self.selected = self
            .neos
            .iter()
            .filter(|n| ids.iter().any(|id| *id == n.id))
            .cloned()
            .collect();
        if self.selected.is_empty() {
            self.error = Some(
                "No matching NEOs found. They may have been from a different date range."
                    .to_string(),
            );
        }
        self.selected.len()
    }

    /// Loads the current window and selects `ids` for comparison.
    ///
    /// Nothing is fetched without a signed-in user; the error then asks the
    /// user to sign in. Returns the number of objects selected.
    pub async fn load_comparison<C: HttpClient>(
        &mut self,
        session: &Session,
        client: &NeoFeedClient<C>,
        ids: &[String],
    ) -> usize {
        if session.current_user().is_none() {
            warn!("Comparison requested without a signed-in user");
            self.selected.clear();
            self.error = Some(SIGN_IN_REQUIRED.to_string());
            return 0;
        }
        if !self.load(client).await {
            return 0;
        }
        self.select_by_ids(ids)
    }
}
