//! Page-number pagination for reader listings.

use serde::Serialize;

/// Posts per listing page.
pub const PAGE_SIZE: u64 = 12;

/// Requested page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// A page number as given. May be out of range.
    Number(i64),
    /// Missing or not a number.
    Invalid,
}

impl PageRequest {
    /// Parse a `?page=` query value.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<i64>().ok())
            .map_or(Self::Invalid, Self::Number)
    }

    /// Page number to show out of `num_pages`.
    ///
    /// Anything that is not a number shows the first page; numbers out of
    /// range show the last one.
    #[must_use]
    pub fn resolve(self, num_pages: u64) -> u64 {
        match self {
            Self::Invalid => 1,
            Self::Number(n) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Self::Number(_) => num_pages,
        }
    }
}

/// Number of pages for `total` items. An empty listing still has one page.
#[must_use]
pub const fn num_pages(total: u64, per_page: u64) -> u64 {
    if total == 0 {
        1
    } else {
        total.div_ceil(per_page)
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Wrap the items of page `number`.
    #[must_use]
    pub const fn new(items: Vec<T>, number: u64, num_pages: u64, total: u64) -> Self {
        Self {
            items,
            number,
            num_pages,
            total,
            has_previous: number > 1,
            has_next: number < num_pages,
        }
    }

    /// Offset of the first item of page `number`.
    #[must_use]
    pub const fn offset(number: u64) -> u64 {
        number.saturating_sub(1) * PAGE_SIZE
    }
}
