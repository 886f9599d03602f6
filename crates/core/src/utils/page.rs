use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::errors::{Error, Result};

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    /// Builds a page request from optional query values, applying defaults.
    pub fn new(page: Option<i64>, size: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page < 0 {
            return Err(Error::invalid_input("page must be >= 0"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(Error::invalid_input(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if page.checked_mul(size).is_none() {
            return Err(Error::invalid_input("page is out of range"));
        }
        Ok(Self { page, size })
    }

    /// Rows to skip. Saturates for hand-built requests that `new` would reject.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: i64, request: PageRequest) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        Self {
            items,
            total_elements,
            total_pages,
            current_page: request.page,
            page_size: request.size,
        }
    }

    /// Slices an already fully materialized, ordered listing.
    pub fn from_full(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Self::new(items, total, request)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::new(vec![1, 2], 21, PageRequest { page: 0, size: 10 });
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn from_full_slices_requested_window() {
        let page = Page::from_full((0..25).collect(), PageRequest { page: 2, size: 10 });
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn rejects_invalid_size() {
        assert!(PageRequest::new(Some(0), Some(0)).is_err());
        assert!(PageRequest::new(Some(-1), None).is_err());
    }

    #[test]
    fn rejects_page_whose_offset_overflows() {
        assert!(PageRequest::new(Some(i64::MAX / 2), Some(20)).is_err());
        let far = PageRequest::new(Some(i64::MAX / 500), Some(500)).unwrap();
        assert_eq!(far.offset(), (i64::MAX / 500) * 500);
    }
}
