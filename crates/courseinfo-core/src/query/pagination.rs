//! Page requests and page slicing.

use serde::Serialize;

use crate::catalog::{EntityKind, OrderBy};
use crate::validation::ValidationError;

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Page size bounds applied to listing requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Page size used when the request names none.
    pub default_page_size: usize,
    /// Largest accepted page size.
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// A listing request: ordering plus a 1-based page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Caller ordering; empty means the kind's natural order.
    pub order_by: Vec<OrderBy>,
    /// Page number, starting at 1. `None` means the first page.
    pub page: Option<usize>,
    /// Page size. `None` means the configured default.
    pub page_size: Option<usize>,
}

impl ListRequest {
    /// First page in natural order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering.
    pub fn with_order(mut self, order_by: impl IntoIterator<Item = OrderBy>) -> Self {
        self.order_by = order_by.into_iter().collect();
        self
    }

    /// Set the page number.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Resolve page and page size against limits, collecting both errors.
    pub fn resolve_page(&self, kind: EntityKind, limits: &PageLimits) -> Result<(usize, usize), ValidationError> {
        let mut errors = ValidationError::new(kind);
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(limits.default_page_size);

        if page == 0 {
            errors.add("page", "Page numbers start at 1.");
        }
        if page_size == 0 || page_size > limits.max_page_size {
            errors.add(
                "page_size",
                format!("Page size must be between 1 and {}.", limits.max_page_size),
            );
        }

        if errors.is_empty() {
            Ok((page, page_size))
        } else {
            Err(errors)
        }
    }
}

/// One page of an ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Page number, starting at 1.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// Records across all pages.
    pub total_count: usize,
    /// Number of pages; at least 1.
    pub page_count: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Convert every item, keeping the page metadata; stops at the first error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
            page: self.page,
            page_size: self.page_size,
            total_count: self.total_count,
            page_count: self.page_count,
            has_next: self.has_next,
            has_previous: self.has_previous,
        })
    }
}

/// Slice an already ordered collection.
///
/// A page past the last one is empty but still reports the true totals.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_count = items.len();
    let page_count = total_count.div_ceil(page_size).max(1);
    let start = (page - 1).saturating_mul(page_size);

    let items = if start >= total_count {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(page_size).collect()
    };

    Page {
        items,
        page,
        page_size,
        total_count,
        page_count,
        has_next: page < page_count,
        has_previous: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_page() {
        let page = paginate((1..=7).collect(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.page_count, 3);
        assert!(page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((1..=7).collect(), 3, 3);
        assert_eq!(page.items, vec![7]);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate((1..=7).collect::<Vec<i32>>(), 9, 3);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 7);
        assert_eq!(page.page_count, 3);
        assert!(!page.has_next);
        assert!(page.has_previous);
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = paginate(Vec::<i32>::new(), 1, 25);
        assert_eq!(page.page_count, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn test_try_map_keeps_metadata() {
        let page = paginate((1..=7).collect::<Vec<i32>>(), 2, 3)
            .try_map(|n| Ok::<_, String>(n.to_string()))
            .unwrap();
        assert_eq!(page.items, ["4", "5", "6"]);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count, 3);

        let err = paginate((1..=7).collect::<Vec<i32>>(), 1, 3)
            .try_map(|n| if n == 2 { Err("two") } else { Ok(n) })
            .unwrap_err();
        assert_eq!(err, "two");
    }

    #[test]
    fn test_resolve_page() {
        let limits = PageLimits::default();
        assert_eq!(ListRequest::new().resolve_page(EntityKind::Year, &limits).unwrap(), (1, 25));

        let err = ListRequest::new()
            .with_page(0)
            .with_page_size(101)
            .resolve_page(EntityKind::Year, &limits)
            .unwrap_err();
        assert_eq!(err.messages("page"), ["Page numbers start at 1."]);
        assert_eq!(err.messages("page_size"), ["Page size must be between 1 and 100."]);
    }
}
