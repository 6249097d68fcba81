use std::{
    collections::HashSet,
    time::{Duration, Instant},
};

use super::{
    customer::Customer,
    debounce::Debounced,
    filters::CustomerFilters,
    local_view::{self, LocalCriteria, SortDirection, SortKey, SortOrder},
    pagination::{PageCursor, PaginationInfo},
    visibility::Viewport,
};

/// Number of rows kept visible above/below the selection before scrolling.
const SCROLL_MARGIN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Loaded,
    Error,
}

/// A page fetch, tagged with the filter generation it was issued under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub page: u32,
    pub per_page: u32,
    pub filters: CustomerFilters,
}

impl PageRequest {
    pub fn is_first_page(&self) -> bool {
        self.page <= 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageApplied {
    Applied { appended: usize },
    Failed,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerListState {
    phase: ListPhase,
    generation: u64,
    committed: CustomerFilters,
    draft: CustomerFilters,
    pending_filters: Debounced<CustomerFilters>,
    cursor: PageCursor,
    items: Vec<Customer>,
    seen_ids: HashSet<String>,
    in_flight: Option<PageRequest>,
    failed: Option<PageRequest>,
    error_message: Option<String>,
    order: Option<SortOrder>,
    selected_index: Option<usize>,
    scroll_offset: usize,
    viewport_height: usize,
}

impl Default for CustomerListState {
    fn default() -> Self {
        Self::new(super::pagination::DEFAULT_PAGE_SIZE, super::debounce::DEFAULT_QUIET_PERIOD)
    }
}

impl CustomerListState {
    pub fn new(per_page: u32, quiet_period: Duration) -> Self {
        Self {
            phase: ListPhase::Idle,
            generation: 0,
            committed: CustomerFilters::default(),
            draft: CustomerFilters::default(),
            pending_filters: Debounced::new(quiet_period),
            cursor: PageCursor::start(per_page),
            items: Vec::new(),
            seen_ids: HashSet::new(),
            in_flight: None,
            failed: None,
            error_message: None,
            order: None,
            selected_index: None,
            scroll_offset: 0,
            viewport_height: 0,
        }
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Items in fetch order.
    pub fn items(&self) -> &[Customer] {
        &self.items
    }

    /// Filters currently applied to the loaded items.
    pub fn committed_filters(&self) -> &CustomerFilters {
        &self.committed
    }

    /// Filters as the user is editing them, possibly not yet committed.
    pub fn draft_filters(&self) -> &CustomerFilters {
        &self.draft
    }

    pub fn has_pending_filters(&self) -> bool {
        self.pending_filters.is_pending()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_empty_result(&self) -> bool {
        self.phase == ListPhase::Loaded && self.items.is_empty()
    }

    pub fn reached_end(&self) -> bool {
        self.phase == ListPhase::Loaded && !self.items.is_empty() && !self.cursor.has_more()
    }

    /// Issues the very first fetch. Does nothing once loading has started.
    pub fn start(&mut self) -> Option<PageRequest> {
        if self.phase != ListPhase::Idle {
            return None;
        }

        Some(self.apply_filters(self.committed.clone()))
    }

    /// Edits the draft filters and restarts the debounce window.
    pub fn edit_filters(&mut self, edit: impl FnOnce(&mut CustomerFilters), now: Instant) {
        edit(&mut self.draft);
        self.pending_filters.set(self.draft.clone(), now);
    }

    pub fn clear_filters(&mut self, now: Instant) {
        self.edit_filters(|filters| *filters = CustomerFilters::default(), now);
    }

    /// Commits settled filter edits. Returns a first-page request only when
    /// the settled filters differ from the committed ones.
    pub fn poll_filters(&mut self, now: Instant) -> Option<PageRequest> {
        let settled = self.pending_filters.poll(now)?;
        self.commit_settled(settled)
    }

    /// Commits pending edits without waiting out the quiet period.
    pub fn commit_filters_now(&mut self) -> Option<PageRequest> {
        let settled = self.pending_filters.flush()?;
        self.commit_settled(settled)
    }

    fn commit_settled(&mut self, settled: CustomerFilters) -> Option<PageRequest> {
        if settled == self.committed && self.phase != ListPhase::Idle {
            return None;
        }

        Some(self.apply_filters(settled))
    }

    /// Starts a new filter generation and requests its first page.
    ///
    /// Anything still in flight for an older generation is discarded on arrival.
    pub fn apply_filters(&mut self, filters: CustomerFilters) -> PageRequest {
        self.generation = self.generation.wrapping_add(1);
        if !self.pending_filters.is_pending() {
            self.draft = filters.clone();
        }
        self.committed = filters;
        self.cursor = PageCursor::start(self.cursor.per_page());
        self.items.clear();
        self.seen_ids.clear();
        self.failed = None;
        self.error_message = None;
        self.selected_index = None;
        self.scroll_offset = 0;

        self.issue(1, ListPhase::LoadingFirstPage)
    }

    /// Re-fetches the current filters from the first page.
    pub fn refresh(&mut self) -> PageRequest {
        self.apply_filters(self.committed.clone())
    }

    /// Called when the end-of-list sentinel is visible.
    ///
    /// Yields at most one request per page; nothing while a request is in flight.
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.phase != ListPhase::Loaded || !self.cursor.has_more()
        {
            return None;
        }

        Some(self.issue(self.cursor.next_page(), ListPhase::LoadingNextPage))
    }

    /// Re-issues the request that failed, under the same generation.
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.phase != ListPhase::Error || self.in_flight.is_some() {
            return None;
        }

        let failed = self.failed.take()?;
        let phase = if failed.is_first_page() {
            ListPhase::LoadingFirstPage
        } else {
            ListPhase::LoadingNextPage
        };
        self.error_message = None;
        self.phase = phase;
        self.in_flight = Some(failed.clone());

        Some(failed)
    }

    pub fn apply_page(
        &mut self,
        request: &PageRequest,
        result: Result<CustomerPage, String>,
    ) -> PageApplied {
        let awaited = self.in_flight.as_ref().is_some_and(|in_flight| {
            in_flight.generation == request.generation && in_flight.page == request.page
        });
        if !awaited {
            return PageApplied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.cursor.advance(request.page, &page.pagination);
                let before = self.items.len();
                for customer in page.customers {
                    if self.seen_ids.insert(customer.id.clone()) {
                        self.items.push(customer);
                    }
                }
                self.phase = ListPhase::Loaded;
                if self.selected_index.is_none() && !self.items.is_empty() {
                    self.selected_index = Some(0);
                }

                PageApplied::Applied {
                    appended: self.items.len() - before,
                }
            }
            Err(message) => {
                self.phase = ListPhase::Error;
                self.error_message = Some(message);
                self.failed = Some(request.clone());
                PageApplied::Failed
            }
        }
    }

    fn issue(&mut self, page: u32, phase: ListPhase) -> PageRequest {
        let request = PageRequest {
            generation: self.generation,
            page,
            per_page: self.cursor.per_page(),
            filters: self.committed.clone(),
        };
        self.phase = phase;
        self.in_flight = Some(request.clone());
        request
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// Cycles fetch order -> name -> score -> fetch order.
    pub fn cycle_sort_key(&mut self) {
        self.order = match self.order {
            None => Some(SortOrder::new(SortKey::Name, SortDirection::Asc)),
            Some(order) if order.key == SortKey::Name => {
                Some(SortOrder::new(SortKey::Score, order.direction))
            }
            Some(_) => None,
        };
        self.reset_selection();
    }

    pub fn toggle_sort_direction(&mut self) {
        if let Some(order) = self.order.as_mut() {
            order.direction = order.direction.toggle();
            self.reset_selection();
        }
    }

    /// Rows as displayed: fetch order, or locally sorted when a sort is chosen.
    pub fn visible(&self) -> Vec<&Customer> {
        match self.order {
            None => self.items.iter().collect(),
            Some(order) => local_view::derive(&self.items, &LocalCriteria::sorted_by(order)),
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn selected_customer(&self) -> Option<&Customer> {
        let index = self.selected_index?;
        self.visible().get(index).copied()
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        let last_index = self.items.len().saturating_sub(1);
        self.selected_index = Some(index.saturating_add(1).min(last_index));
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index else {
            return;
        };

        self.selected_index = Some(index.saturating_sub(1));
    }

    fn reset_selection(&mut self) {
        self.selected_index = (!self.items.is_empty()).then_some(0);
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Keeps the selection visible with a margin, given the rendered height.
    pub fn update_viewport(&mut self, viewport_height: usize) {
        self.viewport_height = viewport_height;
        if viewport_height == 0 {
            return;
        }

        let Some(selected) = self.selected_index else {
            self.scroll_offset = 0;
            return;
        };

        let margin = SCROLL_MARGIN.min(viewport_height / 2);
        if selected < self.scroll_offset + margin {
            self.scroll_offset = selected.saturating_sub(margin);
        }

        let visible_bottom = self.scroll_offset + viewport_height;
        if selected + margin >= visible_bottom {
            self.scroll_offset = (selected + margin + 1).saturating_sub(viewport_height);
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll_offset, self.viewport_height)
    }

    /// Row index of the end-of-list sentinel, right after the last item.
    pub fn sentinel_row(&self) -> usize {
        self.items.len()
    }
}
