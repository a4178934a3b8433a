use std::{
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::OffsetFetcher;
use crate::{
    state::{lock, Gate, LoadingGuard, Ticket},
    trigger::{ContinuationTrigger, Sentinel},
    ApiResponse, KeyedList, LoadOutcome, OffsetPage, OffsetRequest, Paginate, PaginationParams,
    Result,
};

/// A consistent copy of an offset engine's state.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetSnapshot<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub has_more: bool,
    pub page: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_previous: bool,
}

struct OffsetState<T> {
    gate: Gate,
    items: KeyedList<T>,
    page: u32,
    total_elements: u64,
    total_pages: u32,
    has_previous: bool,
}

impl<T> Default for OffsetState<T> {
    fn default() -> Self {
        Self {
            gate: Gate::default(),
            items: KeyedList::new(),
            page: 0,
            total_elements: 0,
            total_pages: 0,
            has_previous: false,
        }
    }
}

impl<T> AsMut<Gate> for OffsetState<T> {
    fn as_mut(&mut self) -> &mut Gate {
        &mut self.gate
    }
}

impl<T> OffsetState<T> {
    /// Writes the page metadata and returns the content.
    fn apply_meta(&mut self, page: OffsetPage<T>) -> Vec<T> {
        self.total_elements = page.total_elements;
        self.total_pages = page.total_pages;
        self.has_previous = page.has_previous;
        self.gate.set_has_more(page.has_next);

        page.content
    }

    fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.total_elements = 0;
        self.total_pages = 0;
        self.has_previous = false;
        self.gate.reset();
    }
}

/// Restores the page index of a continuation load when dropped armed.
///
/// Dropped after a failure or with an abandoned load future, so the next
/// load asks for the same page again. A reset in between turns the rollback
/// into a no-op.
struct PageRollback<'a, T> {
    state: &'a Mutex<OffsetState<T>>,
    ticket: Ticket,
    requested: u32,
    armed: bool,
}

impl<'a, T> PageRollback<'a, T> {
    fn new(state: &'a Mutex<OffsetState<T>>, ticket: Ticket, requested: u32) -> Self {
        Self {
            state,
            ticket,
            requested,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<T> Drop for PageRollback<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut state = lock(self.state);
        if state.gate.is_current(self.ticket) {
            state.page = self.requested;
        }
    }
}

struct Inner<T, F> {
    params: PaginationParams,
    fetcher: F,
    state: Mutex<OffsetState<T>>,
}

/// Paged list driven by a zero-based page index.
///
/// [`Paginate::load`] requests the next page and advances the index
/// optimistically; a failed request rolls the index back so a retry asks for
/// the same page. [`OffsetPagination::go_to_page`] serves jump-to-page
/// navigation and always replaces the list.
///
/// Clones share the same list.
pub struct OffsetPagination<T, F> {
    inner: Arc<Inner<T, F>>,
}

impl<T, F> Clone for OffsetPagination<T, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// Constructors
impl<T, F> OffsetPagination<T, F>
where
    F: OffsetFetcher<T>,
{
    pub fn new(fetcher: F) -> Self {
        Self::with_params(fetcher, PaginationParams::default())
    }

    pub fn with_params(fetcher: F, params: impl Into<PaginationParams>) -> Self {
        Self {
            inner: Arc::new(Inner {
                params: params.into(),
                fetcher,
                state: Mutex::new(OffsetState::default()),
            }),
        }
    }
}

// Loading
impl<T, F> OffsetPagination<T, F>
where
    F: OffsetFetcher<T>,
{
    async fn fetch_page(&self, request: OffsetRequest) -> Result<OffsetPage<T>> {
        debug!(
            "Loading offset page: page={}, size={}",
            request.page, request.size
        );

        let response = self
            .inner
            .fetcher
            .fetch(request)
            .await
            .and_then(ApiResponse::into_result);

        if let Err(err) = &response {
            warn!("Offset page fetch failed: {err}");
        }

        response
    }

    /// Admits a continuation load and advances the page index, returning the
    /// index to request.
    ///
    /// A list whose index cannot advance any further counts as exhausted.
    fn begin_next(&self) -> Option<(Ticket, u32)> {
        let mut state = lock(&self.inner.state);

        let Some(next) = state.page.checked_add(1) else {
            debug!("Offset page index exhausted at page {}", state.page);
            state.gate.set_has_more(false);
            return None;
        };

        let ticket = state.gate.try_begin()?;
        let current = std::mem::replace(&mut state.page, next);

        Some((ticket, current))
    }

    fn complete_next(
        &self,
        rollback: &mut PageRollback<'_, T>,
        response: Result<OffsetPage<T>>,
    ) -> Result<LoadOutcome> {
        let requested = rollback.requested;
        let page = response?;

        let mut state = lock(&self.inner.state);

        if !state.gate.is_current(rollback.ticket) {
            debug!("Discarding offset page {requested} fetched before reset");
            return Ok(LoadOutcome::Discarded);
        }

        rollback.disarm();

        let content = state.apply_meta(page);
        let received = content.len();

        if self.inner.params.infinite_scroll {
            state.items.extend(content);
        } else {
            state.items.replace(content);
        }

        Ok(LoadOutcome::Loaded { received })
    }

    /// Fetches `target_page` and replaces the list with its content.
    ///
    /// Runs even when the list is exhausted, but is skipped while another
    /// fetch is in flight. On success the page index is set to `target_page`.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's failure, leaving the state untouched.
    pub async fn go_to_page(&self, target_page: u32) -> Result<LoadOutcome> {
        let Some(ticket) = lock(&self.inner.state).gate.try_begin_any() else {
            return Ok(LoadOutcome::Skipped);
        };

        let _loading = LoadingGuard::new(&self.inner.state);

        let request = OffsetRequest::new(target_page, self.inner.params.size);
        let page = self.fetch_page(request).await?;

        let mut state = lock(&self.inner.state);

        if !state.gate.is_current(ticket) {
            debug!("Discarding jump to page {target_page} fetched before reset");
            return Ok(LoadOutcome::Discarded);
        }

        let content = state.apply_meta(page);
        let received = content.len();

        state.items.replace(content);
        state.page = target_page;

        Ok(LoadOutcome::Loaded { received })
    }
}

#[async_trait]
impl<T, F> Paginate for OffsetPagination<T, F>
where
    T: Send + 'static,
    F: OffsetFetcher<T> + 'static,
{
    async fn load(&self) -> Result<LoadOutcome> {
        let Some((ticket, requested)) = self.begin_next() else {
            return Ok(LoadOutcome::Skipped);
        };

        let _loading = LoadingGuard::new(&self.inner.state);
        let mut rollback = PageRollback::new(&self.inner.state, ticket, requested);

        let response = self
            .fetch_page(OffsetRequest::new(requested, self.inner.params.size))
            .await;

        self.complete_next(&mut rollback, response)
    }

    fn reset(&self) {
        lock(&self.inner.state).reset();
    }

    fn is_loading(&self) -> bool {
        lock(&self.inner.state).gate.is_loading()
    }

    fn has_more(&self) -> bool {
        lock(&self.inner.state).gate.has_more()
    }
}

// Accessors
impl<T, F> OffsetPagination<T, F> {
    pub fn params(&self) -> &PaginationParams {
        &self.inner.params
    }

    /// Index of the next page a continuation load will request.
    pub fn page(&self) -> u32 {
        lock(&self.inner.state).page
    }

    pub fn total_elements(&self) -> u64 {
        lock(&self.inner.state).total_elements
    }

    pub fn total_pages(&self) -> u32 {
        lock(&self.inner.state).total_pages
    }

    pub fn has_previous(&self) -> bool {
        lock(&self.inner.state).has_previous
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.state).items.is_empty()
    }

    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&lock(&self.inner.state).items)
    }

    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        lock(&self.inner.state).items.to_vec()
    }

    pub fn snapshot(&self) -> OffsetSnapshot<T>
    where
        T: Clone,
    {
        let state = lock(&self.inner.state);

        OffsetSnapshot {
            items: state.items.to_vec(),
            is_loading: state.gate.is_loading(),
            has_more: state.gate.has_more(),
            page: state.page,
            total_elements: state.total_elements,
            total_pages: state.total_pages,
            has_previous: state.has_previous,
        }
    }
}

// List mutations
impl<T, F> OffsetPagination<T, F> {
    pub fn prepend(&self, item: T) {
        lock(&self.inner.state).items.prepend(item);
    }

    pub fn append(&self, item: T) {
        lock(&self.inner.state).items.append(item);
    }

    pub fn merge<K>(&self, new_items: impl IntoIterator<Item = T>, key_fn: impl Fn(&T) -> K) -> usize
    where
        K: Eq + Hash,
    {
        lock(&self.inner.state).items.merge(new_items, key_fn)
    }

    pub fn insert_after<K>(&self, item: T, target_key: &K, key_fn: impl Fn(&T) -> K)
    where
        K: PartialEq,
    {
        lock(&self.inner.state)
            .items
            .insert_after(item, target_key, key_fn);
    }

    pub fn insert_after_group<K>(
        &self,
        item: T,
        target_key: &K,
        key_fn: impl Fn(&T) -> K,
        is_group_end: impl Fn(&T) -> bool,
    ) where
        K: PartialEq,
    {
        lock(&self.inner.state)
            .items
            .insert_after_group(item, target_key, key_fn, is_group_end);
    }

    pub fn remove<K>(&self, target_key: &K, key_fn: impl Fn(&T) -> K) -> Option<T>
    where
        K: PartialEq,
    {
        lock(&self.inner.state).items.remove(target_key, key_fn)
    }

    pub fn update<K>(&self, target_key: &K, key_fn: impl Fn(&T) -> K, updater: impl FnOnce(T) -> T) -> bool
    where
        K: PartialEq,
    {
        lock(&self.inner.state)
            .items
            .update(target_key, key_fn, updater)
    }
}

// Continuation
impl<T, F> OffsetPagination<T, F>
where
    T: Send + 'static,
    F: OffsetFetcher<T> + 'static,
{
    /// Wires the continuation trigger at mount time.
    ///
    /// The trigger observes `target` if one is present now and infinite
    /// scroll is enabled; later target changes are not followed. Dropping the
    /// returned trigger on unmount stops the observation.
    pub fn mount(&self, target: Option<&Sentinel>) -> ContinuationTrigger<Self> {
        let mut trigger = ContinuationTrigger::new(self.clone(), &self.inner.params);

        if let Some(target) = target {
            trigger.arm(target);
        }

        trigger
    }
}

impl<T, F> Debug for OffsetPagination<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);

        f.debug_struct("OffsetPagination")
            .field("params", &self.inner.params)
            .field("len", &state.items.len())
            .field("is_loading", &state.gate.is_loading())
            .field("has_more", &state.gate.has_more())
            .field("page", &state.page)
            .finish()
    }
}

// region:    --- Tests


// endregion: --- Tests
