//! Generic filter-then-slice pagination.
//!
//! Works on an already-sorted candidate sequence: the predicate is applied
//! first, preserving relative order, then the filtered sequence is cut into
//! a page. Out-of-range pages are legitimately empty, not errors; only a
//! zero page size is rejected.

use serde::Serialize;

use crate::errors::AppError;

/// One page of results plus the counts needed to render pagination controls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
    /// Number of elements matching the filter across all pages.
    pub total_count: usize,
    pub total_pages: usize,
}

/// Filter `items` with `pred` (order-preserving), then return page `page`
/// of size `page_size`.
pub fn paginate<T, F>(
    items: Vec<T>,
    page: usize,
    page_size: usize,
    pred: F,
) -> Result<Page<T>, AppError>
where
    T: Serialize,
    F: Fn(&T) -> bool,
{
    if page_size == 0 {
        return Err(AppError::BadRequest(
            "Page size must be positive".to_string(),
        ));
    }

    let filtered: Vec<T> = items.into_iter().filter(|item| pred(item)).collect();
    let total_count = filtered.len();
    let total_pages = total_count.div_ceil(page_size);

    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_count);
    let page_items = if start >= total_count {
        Vec::new()
    } else {
        filtered.into_iter().skip(start).take(end - start).collect()
    };

    Ok(Page {
        items: page_items,
        page,
        page_size,
        total_count,
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_zero_rejected() {
        let err = paginate(vec![1, 2, 3], 0, 0, |_| true).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_25_items_page_size_10() {
        let items: Vec<i32> = (0..25).collect();

        let p0 = paginate(items.clone(), 0, 10, |_| true).unwrap();
        assert_eq!(p0.items.len(), 10);
        assert_eq!(p0.total_count, 25);
        assert_eq!(p0.total_pages, 3);

        let p2 = paginate(items.clone(), 2, 10, |_| true).unwrap();
        assert_eq!(p2.items.len(), 5);

        let p3 = paginate(items, 3, 10, |_| true).unwrap();
        assert!(p3.items.is_empty());
        assert_eq!(p3.total_count, 25);
        assert_eq!(p3.total_pages, 3);
    }

    #[test]
    fn test_pages_are_disjoint_order_preserving_and_cover_everything() {
        let items: Vec<i32> = (0..23).collect();
        let page_size = 7;

        let mut seen = Vec::new();
        let mut page = 0;
        loop {
            let result = paginate(items.clone(), page, page_size, |_| true).unwrap();
            if result.items.is_empty() {
                assert_eq!(page, result.total_pages);
                break;
            }
            seen.extend(result.items);
            page += 1;
        }
        // Concatenated pages reproduce the input exactly: disjoint, ordered, complete.
        assert_eq!(seen, items);
    }

    #[test]
    fn test_filter_applied_before_slicing() {
        let items: Vec<i32> = (0..20).collect();
        let page = paginate(items, 0, 5, |n| n % 2 == 0).unwrap();
        assert_eq!(page.items, vec![0, 2, 4, 6, 8]);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_empty_input() {
        let page = paginate(Vec::<i32>::new(), 0, 10, |_| true).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_far_out_of_range_page() {
        let items: Vec<i32> = (0..3).collect();
        let page = paginate(items, 1000, 10, |_| true).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_page() {
        let items: Vec<i32> = (0..20).collect();
        let page = paginate(items, 1, 10, |_| true).unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 2);
    }
}
