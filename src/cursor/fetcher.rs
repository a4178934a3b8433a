use std::future::Future;

use async_trait::async_trait;

use crate::{ApiResponse, CursorPage, CursorRequest, Result};

/// The network collaborator a [`super::CursorPagination`] pulls pages from.
///
/// Implementations own transport, session and timeout policy. A transport
/// failure should be reported as [`crate::Error::Network`]; a server-side
/// failure may either be returned as [`ApiResponse::Failure`] or as an error.
///
/// Any `Fn(CursorRequest) -> impl Future` closure is a fetcher.
///
/// # Example
///
/// ```rust
/// use infiniscroll::{ApiResponse, CursorPage, CursorRequest, Result};
/// use infiniscroll::cursor::CursorPagination;
///
/// let feed: CursorPagination<u32, _> = CursorPagination::new(|request: CursorRequest| async move {
///     Result::Ok(ApiResponse::success(CursorPage {
///         content: vec![request.size],
///         next_cursor: None,
///         has_next: false,
///         size: request.size,
///     }))
/// });
/// # let _ = feed;
/// ```
#[async_trait]
pub trait CursorFetcher<T>: Send + Sync {
    async fn fetch(&self, request: CursorRequest) -> Result<ApiResponse<CursorPage<T>>>;
}

#[async_trait]
impl<T, F, Fut> CursorFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(CursorRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse<CursorPage<T>>>> + Send + 'static,
{
    async fn fetch(&self, request: CursorRequest) -> Result<ApiResponse<CursorPage<T>>> {
        (self)(request).await
    }
}
