// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Page size used when none (or a non-positive one) is requested.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 40;

/// A normalized page request.
///
/// Pages are 1-based. Construction clamps the inputs, so every value of this
/// type is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
}

impl Pagination {
    /// Normalizes raw page and limit values.
    ///
    /// * page below 1 becomes 1
    /// * limit below 1 becomes [`DEFAULT_PAGE_LIMIT`]
    /// * limit above [`MAX_PAGE_LIMIT`] becomes [`MAX_PAGE_LIMIT`]
    #[must_use]
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = match limit {
            Some(l) if l > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
            Some(l) if l >= 1 => l,
            _ => DEFAULT_PAGE_LIMIT,
        };
        Self { page, limit }
    }

    #[must_use]
    pub const fn page(&self) -> i64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}
