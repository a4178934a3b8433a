//! `infiniscroll` provides the data-fetching layer behind paginated, infinitely
//! scrolling views.
//!
//! Two engines share the same responsibilities and differ in how they continue:
//! the cursor engine follows an opaque server-issued cursor, the offset engine
//! walks numbered pages and can also jump directly to a page. Both compose with
//! a [`trigger::ContinuationTrigger`] that loads the next page when a sentinel
//! becomes visible. Engines are selected through feature flags.

// region:    --- Modules

use async_trait::async_trait;

// -- Modules

mod error;
mod params;
mod state;

pub mod list;
pub mod response;
pub mod trigger;

#[cfg(feature = "cursor")]
pub mod cursor;

#[cfg(feature = "offset")]
pub mod offset;

#[cfg(feature = "ui")]
pub mod ui;

pub use error::{Error, Result, Translate, NETWORK_ERROR_KEY, SERVER_MESSAGE_PREFIX};
pub use list::KeyedList;
pub use params::PaginationParams;
pub use response::{ApiResponse, Cursor, CursorPage, CursorRequest, OffsetPage, OffsetRequest};

// endregion: --- Modules

/// What a call to [`Paginate::load`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was fetched and written into the list.
    Loaded { received: usize },
    /// The gate refused the call: a fetch is in flight or the list is exhausted.
    Skipped,
    /// The response belonged to a generation that was reset while it was in flight.
    Discarded,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Trait for paginated lists that can continue loading.
///
/// It is the seam between an engine and whatever decides when the next page
/// is needed, such as the continuation trigger.
///
/// # Methods
///
/// - `load`: fetches the next page unless a fetch is in flight or no data remains.
/// - `reset`: restores the initial state without touching an in-flight fetch.
/// - `reload`: `reset` followed by `load`.
/// - `is_loading` / `has_more`: the gate flags consulted before loading.
#[async_trait]
pub trait Paginate: Send + Sync {
    /// Fetches the next page.
    ///
    /// Returns [`LoadOutcome::Skipped`] without calling the fetcher when a
    /// fetch is already in flight or the server reported no more data.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher's failure. The list, its position and
    /// `has_more` are left exactly as they were before the call.
    async fn load(&self) -> Result<LoadOutcome>;

    /// Restores the list to its initial state.
    ///
    /// A fetch in flight is not cancelled, but its response will be discarded.
    fn reset(&self);

    /// Resets and loads the first page.
    ///
    /// # Errors
    ///
    /// See [`Paginate::load`].
    async fn reload(&self) -> Result<LoadOutcome> {
        self.reset();
        self.load().await
    }

    fn is_loading(&self) -> bool;

    fn has_more(&self) -> bool;
}
