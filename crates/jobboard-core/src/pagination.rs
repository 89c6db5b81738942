use axum::response::{IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Hard cap on page size; larger requests are silently clamped.
pub const MAX_PAGE_SIZE: i64 = 50;

pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: i64,
    pub size: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: MAX_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    pub fn limit(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.page.max(0) * self.limit()
    }
}

/// Plain JSON array body with the total element count in a header, the way
/// every list endpoint reports pagination.
pub fn paged<T: Serialize>(total: i64, items: Vec<T>) -> impl IntoResponse {
    ([(TOTAL_COUNT_HEADER, total.to_string())], Json(items))
}
