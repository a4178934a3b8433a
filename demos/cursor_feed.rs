use std::sync::Arc;

use infiniscroll::{
    cursor::CursorPagination, trigger::Sentinel, ApiResponse, Cursor, CursorPage, CursorRequest,
    Paginate, PaginationParams,
};
use serde::{Deserialize, Serialize};

pub type Result<T> = core::result::Result<T, Error>;
pub type Error = Box<dyn std::error::Error>; // For early dev.

// region:    --- Model Definition

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    id: i64,
    title: String,
}

// endregion: --- Model Definition

// region:    --- Fake Backend

/// Serves posts newest first, `size` at a time, the way the feed endpoint does.
fn backend(posts: Arc<Vec<Post>>) -> impl Fn(CursorRequest) -> futures::future::Ready<infiniscroll::Result<ApiResponse<CursorPage<Post>>>> {
    move |request: CursorRequest| {
        let start = match request.cursor {
            Some(Cursor::Id(last_seen)) => posts.iter().position(|p| p.id == last_seen).map_or(0, |i| i + 1),
            _ => 0,
        };
        let end = (start + request.size as usize).min(posts.len());
        let content = posts[start..end].to_vec();

        futures::future::ready(Ok(ApiResponse::success(CursorPage {
            next_cursor: content.last().map(|p| Cursor::Id(p.id)),
            has_next: end < posts.len(),
            size: request.size,
            content,
        })))
    }
}

// endregion: --- Fake Backend

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -- Init feed
    let posts: Vec<Post> = (1..=7)
        .rev()
        .map(|id| Post {
            id,
            title: format!("Post #{id}"),
        })
        .collect();

    let params = PaginationParams::default().with_size(3);
    let feed = CursorPagination::with_params(backend(Arc::new(posts)), params);

    // -- Manual loads
    feed.load().await?;
    println!("First page: {:?}", feed.items().iter().map(|p| p.id).collect::<Vec<_>>());

    // -- Infinite scroll
    let sentinel = Sentinel::new();
    let mut trigger = feed.continuation();
    trigger.set_target(Some(&sentinel));

    while feed.has_more() {
        // Sentinel scrolls into view, then out again once the page renders.
        sentinel.report(1.0);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        sentinel.report(0.0);
        tokio::task::yield_now().await;
    }

    println!("All posts: {:?}", feed.items().iter().map(|p| p.id).collect::<Vec<_>>());

    // -- Local mutations
    feed.prepend(Post {
        id: 8,
        title: "Just posted".into(),
    });
    feed.remove(&3, |p| p.id);
    println!("After edits: {:?}", feed.items().iter().map(|p| p.id).collect::<Vec<_>>());

    Ok(())
}
