use std::{
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::CursorFetcher;
use crate::{
    state::{lock, Gate, LoadingGuard, Ticket},
    trigger::ContinuationTrigger,
    ApiResponse, Cursor, CursorPage, CursorRequest, KeyedList, LoadOutcome, Paginate,
    PaginationParams, Result,
};

/// A consistent copy of a cursor engine's state.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSnapshot<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub has_more: bool,
    pub cursor: Option<Cursor>,
    pub next_cursor: Option<Cursor>,
}

struct CursorState<T> {
    gate: Gate,
    items: KeyedList<T>,
    cursor: Option<Cursor>,
    next_cursor: Option<Cursor>,
}

impl<T> Default for CursorState<T> {
    fn default() -> Self {
        Self {
            gate: Gate::default(),
            items: KeyedList::new(),
            cursor: None,
            next_cursor: None,
        }
    }
}

impl<T> AsMut<Gate> for CursorState<T> {
    fn as_mut(&mut self) -> &mut Gate {
        &mut self.gate
    }
}

impl<T> CursorState<T> {
    fn apply(&mut self, page: CursorPage<T>, infinite_scroll: bool) -> usize {
        let received = page.content.len();

        if infinite_scroll {
            self.items.extend(page.content);
        } else {
            self.items.replace(page.content);
        }

        self.next_cursor = page.next_cursor;
        self.cursor = self.next_cursor.clone();
        self.gate.set_has_more(page.has_next);

        received
    }

    fn reset(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.next_cursor = None;
        self.gate.reset();
    }
}

struct Inner<T, F> {
    params: PaginationParams,
    fetcher: F,
    state: Mutex<CursorState<T>>,
}

/// Paged list driven by an opaque server cursor.
///
/// Each successful load sends the cursor received with the previous page
/// (none on the first request) and either appends the new items or replaces
/// the list, depending on [`PaginationParams::infinite_scroll`]. At most one
/// fetch is in flight at a time; overlapping calls are dropped, not queued.
///
/// The engine is a cheap handle: clones share the same list, which is how
/// the continuation trigger drives it.
///
/// # Example
///
/// ```rust,no_run
/// use infiniscroll::cursor::CursorPagination;
/// use infiniscroll::{ApiResponse, CursorPage, CursorRequest, Paginate, Result};
///
/// # async fn fetch_feed(_: CursorRequest) -> Result<ApiResponse<CursorPage<String>>> { unimplemented!() }
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let feed = CursorPagination::new(fetch_feed);
///
/// while feed.has_more() {
///     feed.load().await?;
/// }
///
/// println!("{} posts", feed.len());
/// # Ok(())
/// # }
/// ```
pub struct CursorPagination<T, F> {
    inner: Arc<Inner<T, F>>,
}

impl<T, F> Clone for CursorPagination<T, F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// Constructors
impl<T, F> CursorPagination<T, F>
where
    F: CursorFetcher<T>,
{
    pub fn new(fetcher: F) -> Self {
        Self::with_params(fetcher, PaginationParams::default())
    }

    pub fn with_params(fetcher: F, params: impl Into<PaginationParams>) -> Self {
        Self {
            inner: Arc::new(Inner {
                params: params.into(),
                fetcher,
                state: Mutex::new(CursorState::default()),
            }),
        }
    }
}

// Loading
impl<T, F> CursorPagination<T, F>
where
    F: CursorFetcher<T>,
{
    fn begin(&self) -> Option<(Ticket, CursorRequest)> {
        let mut state = lock(&self.inner.state);
        let ticket = state.gate.try_begin()?;

        let request = CursorRequest {
            size: self.inner.params.size,
            cursor: state.cursor.clone(),
        };

        Some((ticket, request))
    }

    fn complete(&self, ticket: Ticket, response: Result<CursorPage<T>>) -> Result<LoadOutcome> {
        let page = match response {
            Ok(page) => page,
            Err(err) => {
                warn!("Cursor page fetch failed: {err}");
                return Err(err);
            }
        };

        let mut state = lock(&self.inner.state);

        if !state.gate.is_current(ticket) {
            debug!("Discarding cursor page fetched before reset");
            return Ok(LoadOutcome::Discarded);
        }

        let received = state.apply(page, self.inner.params.infinite_scroll);

        Ok(LoadOutcome::Loaded { received })
    }
}

#[async_trait]
impl<T, F> Paginate for CursorPagination<T, F>
where
    T: Send + 'static,
    F: CursorFetcher<T> + 'static,
{
    async fn load(&self) -> Result<LoadOutcome> {
        let Some((ticket, request)) = self.begin() else {
            return Ok(LoadOutcome::Skipped);
        };

        let _loading = LoadingGuard::new(&self.inner.state);

        debug!(
            "Loading cursor page: size={}, cursor={:?}",
            request.size, request.cursor
        );

        let response = self
            .inner
            .fetcher
            .fetch(request)
            .await
            .and_then(ApiResponse::into_result);

        self.complete(ticket, response)
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
impl<T, F> CursorPagination<T, F> {
    pub fn params(&self) -> &PaginationParams {
        &self.inner.params
    }

    pub fn cursor(&self) -> Option<Cursor> {
        lock(&self.inner.state).cursor.clone()
    }

    pub fn next_cursor(&self) -> Option<Cursor> {
        lock(&self.inner.state).next_cursor.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.inner.state).items.is_empty()
    }

    /// Runs `f` against the current items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&lock(&self.inner.state).items)
    }

    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        lock(&self.inner.state).items.to_vec()
    }

    pub fn snapshot(&self) -> CursorSnapshot<T>
    where
        T: Clone,
    {
        let state = lock(&self.inner.state);

        CursorSnapshot {
            items: state.items.to_vec(),
            is_loading: state.gate.is_loading(),
            has_more: state.gate.has_more(),
            cursor: state.cursor.clone(),
            next_cursor: state.next_cursor.clone(),
        }
    }
}

// List mutations
impl<T, F> CursorPagination<T, F> {
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
impl<T, F> CursorPagination<T, F>
where
    T: Send + 'static,
    F: CursorFetcher<T> + 'static,
{
    /// Creates the continuation trigger for this list.
    ///
    /// Point it at the sentinel with [`ContinuationTrigger::set_target`]; it
    /// re-arms every time the target changes. The trigger stays inert when
    /// infinite scroll is disabled.
    pub fn continuation(&self) -> ContinuationTrigger<Self> {
        ContinuationTrigger::new(self.clone(), &self.inner.params)
    }
}

impl<T, F> Debug for CursorPagination<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.inner.state);

        f.debug_struct("CursorPagination")
            .field("params", &self.inner.params)
            .field("len", &state.items.len())
            .field("is_loading", &state.gate.is_loading())
            .field("has_more", &state.gate.has_more())
            .field("cursor", &state.cursor)
            .finish()
    }
}

// region:    --- Tests


// endregion: --- Tests
