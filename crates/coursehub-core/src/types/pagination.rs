//! Pagination window calculation shared by every list query.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Default page size when the caller does not supply one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A skip/limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    /// Number of leading results to skip.
    pub skip: u64,
    /// Maximum number of results to return.
    pub limit: u64,
}

/// Convert a 1-indexed page and a page size into a skip/limit window.
///
/// `skip = page * page_size - page_size`, so page 1 always starts at 0.
pub fn compute_window(page: u64, page_size: u64) -> AppResult<PaginationWindow> {
    if page == 0 {
        return Err(AppError::invalid_argument("page must be at least 1"));
    }
    if page_size == 0 {
        return Err(AppError::invalid_argument("page size must be at least 1"));
    }
    let span = page
        .checked_mul(page_size)
        .ok_or_else(|| AppError::invalid_argument("page window is out of range"))?;
    Ok(PaginationWindow {
        skip: span - page_size,
        limit: page_size,
    })
}

/// Page/size pair as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Create a new page request. Bounds are checked by [`PageRequest::window`].
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Compute the skip/limit window for this request.
    pub fn window(&self) -> AppResult<PaginationWindow> {
        compute_window(self.page, self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
