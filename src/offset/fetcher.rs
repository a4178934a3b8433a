use std::future::Future;

use async_trait::async_trait;

use crate::{ApiResponse, OffsetPage, OffsetRequest, Result};

/// The network collaborator a [`super::OffsetPagination`] pulls pages from.
///
/// Any `Fn(OffsetRequest) -> impl Future` closure is a fetcher.
#[async_trait]
pub trait OffsetFetcher<T>: Send + Sync {
    async fn fetch(&self, request: OffsetRequest) -> Result<ApiResponse<OffsetPage<T>>>;
}

#[async_trait]
impl<T, F, Fut> OffsetFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(OffsetRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse<OffsetPage<T>>>> + Send + 'static,
{
    async fn fetch(&self, request: OffsetRequest) -> Result<ApiResponse<OffsetPage<T>>> {
        (self)(request).await
    }
}
