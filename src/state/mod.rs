//! Pagination state store
//!
//! The store is the single writer of [`PaginationState`]. Recomputes are
//! tagged with a monotonic [`Generation`]; only the latest requested
//! generation may publish, so a superseded result is dropped instead of
//! overwriting newer pages.

mod debounce;

pub use debounce::{now_ms, Debouncer};

use crate::layout::{PageBreak, PageInfo, PageLayout};
use serde::Serialize;

/// Recompute ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(pub u64);

/// Read-only snapshot handed to view consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub pages: Vec<PageInfo>,
    pub total_pages: usize,
    /// 1-based, clamped to `[1, total_pages]`
    pub current_page: usize,
    pub is_calculating: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            pages: vec![PageInfo::empty()],
            total_pages: 1,
            current_page: 1,
            is_calculating: false,
        }
    }
}

impl PaginationState {
    /// Serialize for export pipelines
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Change notifications for observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    PagesChanged { total_pages: usize },
    CurrentPageChanged { page: usize },
    CalculatingChanged(bool),
}

/// Owner of the pagination state
#[derive(Debug, Default)]
pub struct PaginationStore {
    state: PaginationState,
    breaks: Vec<PageBreak>,
    /// Latest generation handed out
    requested: Generation,
    /// Generation the current pages came from
    applied: Generation,
    events: Vec<StoreEvent>,
}

impl PaginationStore {
    /// Store with one implicit empty page
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    pub fn breaks(&self) -> &[PageBreak] {
        &self.breaks
    }

    pub fn is_calculating(&self) -> bool {
        self.state.is_calculating
    }

    /// Generation the published pages came from
    pub fn applied_generation(&self) -> Generation {
        self.applied
    }

    /// Idle -> Calculating. Any generation handed out earlier becomes stale.
    pub fn begin(&mut self) -> Generation {
        self.requested = Generation(self.requested.0 + 1);
        self.set_calculating(true);
        log::debug!("Recompute {:?} started", self.requested);
        self.requested
    }

    /// Calculating -> Idle with new pages. Returns false, leaving the store
    /// untouched, when `generation` has been superseded.
    pub fn complete(&mut self, generation: Generation, layout: PageLayout) -> bool {
        if generation != self.requested {
            log::warn!(
                "Discarding stale recompute {:?} (latest {:?})",
                generation,
                self.requested
            );
            return false;
        }

        let PageLayout { breaks, mut pages } = layout;
        if pages.is_empty() {
            pages.push(PageInfo::empty());
        }

        let total_pages = pages.len();
        let pages_changed = pages != self.state.pages;

        self.breaks = breaks;
        self.state.pages = pages;
        self.state.total_pages = total_pages;
        self.applied = generation;

        if pages_changed {
            self.events.push(StoreEvent::PagesChanged { total_pages });
        }
        let current = self.state.current_page;
        self.set_current_page(current);
        self.set_calculating(false);

        log::debug!("Recompute {:?} published {} pages", generation, total_pages);
        true
    }

    /// Calculating -> Idle keeping the previous pages (inputs not ready)
    pub fn abandon(&mut self, generation: Generation) {
        if generation == self.requested {
            log::debug!("Recompute {:?} abandoned, keeping prior pages", generation);
            self.set_calculating(false);
        }
    }

    /// Navigation setter; clamps to the current page range and returns the
    /// page actually selected
    pub fn set_current_page(&mut self, page: usize) -> usize {
        let clamped = page.clamp(1, self.state.total_pages.max(1));
        if clamped != self.state.current_page {
            self.state.current_page = clamped;
            self.events
                .push(StoreEvent::CurrentPageChanged { page: clamped });
        }
        clamped
    }

    /// Drain queued notifications
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_calculating(&mut self, calculating: bool) {
        if self.state.is_calculating != calculating {
            self.state.is_calculating = calculating;
            self.events.push(StoreEvent::CalculatingChanged(calculating));
        }
    }
}
