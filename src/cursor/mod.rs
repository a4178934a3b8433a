//! Cursor pagination engine
//!
//! This module provides a paged list that continues from an opaque cursor
//! issued by the server, typically the identifier of the last record seen.
//! Cursor pagination keeps the window stable when records are inserted or
//! deleted concurrently, which makes it the right choice for feeds.
//!
//! # Modules
//!
//! - `fetcher`: Defines the `CursorFetcher` collaborator trait the engine
//!   pulls pages from.
//! - `pagination`: Implements `CursorPagination`, the paged list itself, with
//!   its keyed list mutations and continuation wiring.

// region:    --- Modules

mod fetcher;
mod pagination;

pub use fetcher::CursorFetcher;
pub use pagination::{CursorPagination, CursorSnapshot};

// endregion: --- Modules
