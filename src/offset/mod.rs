//! Offset pagination engine
//!
//! This module provides a paged list addressed by a zero-based page index.
//! It supports infinite accumulation as well as direct jumps to a page for
//! numbered navigation.
//!
//! # Modules
//!
//! - `fetcher`: Defines the `OffsetFetcher` collaborator trait.
//! - `pagination`: Implements `OffsetPagination`.

mod fetcher;
mod pagination;

pub use fetcher::OffsetFetcher;
pub use pagination::{OffsetPagination, OffsetSnapshot};
