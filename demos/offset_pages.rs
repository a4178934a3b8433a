use std::collections::HashMap;

use infiniscroll::{
    offset::OffsetPagination, ApiResponse, OffsetPage, OffsetRequest, Paginate, PaginationParams,
};

pub type Result<T> = core::result::Result<T, Error>;
pub type Error = Box<dyn std::error::Error>; // For early dev.

const TOTAL: u32 = 45;

async fn fetch_coupons(request: OffsetRequest) -> infiniscroll::Result<ApiResponse<OffsetPage<String>>> {
    if request.page == 4 {
        return Ok(ApiResponse::failure("존재하지 않는 페이지", Some("PAGE_NOT_FOUND")));
    }

    let start = request.page * request.size;
    let end = (start + request.size).min(TOTAL);
    let total_pages = TOTAL.div_ceil(request.size);

    Ok(ApiResponse::success(OffsetPage {
        content: (start..end).map(|n| format!("COUPON-{n:03}")).collect(),
        page: request.page,
        size: request.size,
        total_elements: u64::from(TOTAL),
        total_pages,
        has_next: request.page + 1 < total_pages,
        has_previous: request.page > 0,
    }))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -- Numbered navigation
    let params = PaginationParams::default()
        .with_size(10)
        .with_infinite_scroll(false);
    let pages = OffsetPagination::with_params(fetch_coupons, params);

    pages.load().await?;
    println!("Page 0 of {}: {:?}", pages.total_pages(), pages.items());

    pages.go_to_page(3).await?;
    println!("Page 3: {:?}", pages.items());

    // -- Failures resolve to a localized message
    let translations = HashMap::from([(
        "serverMessages.PAGE_NOT_FOUND".to_string(),
        "That page does not exist".to_string(),
    )]);

    if let Err(err) = pages.go_to_page(4).await {
        println!("Jump failed: {}", err.message(&translations));
    }
    println!("Still on page {}", pages.page());

    Ok(())
}
