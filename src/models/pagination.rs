//! Page-number resolution for the list views

use serde::Deserialize;
use utoipa::IntoParams;

/// `?page=` as typed by the user; anything unparsable falls back to page 1
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (1-based)
    pub page: Option<String>,
}

/// A resolved page window over `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageWindow {
    /// Resolve the requested page against the row count.
    ///
    /// Missing, non-numeric or non-positive pages resolve to the first page and
    /// pages past the end resolve to the last one. An empty list still has a
    /// single (empty) page.
    pub fn resolve(requested: Option<&str>, total: i64, per_page: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total.max(0);
        let num_pages = ((total + per_page - 1) / per_page).max(1);

        let number = match requested.and_then(|p| p.trim().parse::<i64>().ok()) {
            Some(n) if n >= 1 => n.min(num_pages),
            Some(_) => num_pages,
            None => 1,
        };

        Self {
            number,
            num_pages,
            per_page,
            total,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
}

/// One page of rows together with its window
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}
