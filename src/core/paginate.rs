// LogKeep - core/paginate.rs
//
// Slices a filtered, ordered sequence into one bounded page.
// Never fails: out-of-range input is sanitised before slicing.

use crate::core::model::{Page, PageInfo};
use crate::util::constants;

/// Requested page position. Values are sanitised by `paginate`, so any
/// combination is accepted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: constants::FIRST_PAGE,
            page_size: constants::DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Page size within `1..=MAX_PAGE_SIZE`; anything else falls back to the
    /// default.
    pub fn effective_page_size(&self) -> usize {
        if (1..=constants::MAX_PAGE_SIZE).contains(&self.page_size) {
            self.page_size
        } else {
            constants::DEFAULT_PAGE_SIZE
        }
    }
}

/// Number of pages needed for `total` items; at least one, so an empty
/// result still has a (blank) first page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Cut `items` down to the requested page.
///
/// A page number past the end is clamped to the last page and page 0 is
/// treated as page 1.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let page_size = request.effective_page_size();
    let total_items = items.len();
    let total_pages = total_pages(total_items, page_size);
    let current_page = request.page.clamp(constants::FIRST_PAGE, total_pages);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total_items);

    let page_items: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();

    Page {
        items: page_items,
        info: PageInfo {
            current_page,
            total_pages,
            page_size,
            total_items,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = paginate((0..120).collect::<Vec<_>>(), PageRequest::new(1, 50));
        assert_eq!(page.items, (0..50).collect::<Vec<_>>());
        assert_eq!(page.info.total_pages, 3);
        assert_eq!(page.info.total_items, 120);
        assert!(!page.info.has_previous);
        assert!(page.info.has_next);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((0..120).collect::<Vec<_>>(), PageRequest::new(3, 50));
        assert_eq!(page.items, (100..120).collect::<Vec<_>>());
        assert!(page.info.has_previous);
        assert!(!page.info.has_next);
    }

    #[test]
    fn test_page_past_end_is_clamped() {
        let page = paginate((0..10).collect::<Vec<_>>(), PageRequest::new(99, 4));
        assert_eq!(page.info.current_page, 3);
        assert_eq!(page.items, vec![8, 9]);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let page = paginate((0..10).collect::<Vec<_>>(), PageRequest::new(0, 4));
        assert_eq!(page.info.current_page, 1);
        assert_eq!(page.items, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_empty_input_has_one_empty_page() {
        let page = paginate(Vec::<u8>::new(), PageRequest::default());
        assert!(page.items.is_empty());
        assert_eq!(page.info.current_page, 1);
        assert_eq!(page.info.total_pages, 1);
        assert!(!page.info.has_previous);
        assert!(!page.info.has_next);
    }

    #[test]
    fn test_invalid_page_size_falls_back_to_default() {
        assert_eq!(PageRequest::new(1, 0).effective_page_size(), 50);
        assert_eq!(PageRequest::new(1, 501).effective_page_size(), 50);
        assert_eq!(PageRequest::new(1, 500).effective_page_size(), 500);
        assert_eq!(PageRequest::new(1, 1).effective_page_size(), 1);
    }

    #[test]
    fn test_pages_reconstruct_input_exactly() {
        for total in [0usize, 1, 7, 49, 50, 51, 100, 233] {
            for size in [1usize, 3, 50, 500] {
                let items: Vec<usize> = (0..total).collect();
                let pages = total_pages(total, size);
                let mut rebuilt = Vec::new();
                for p in 1..=pages {
                    let page = paginate(items.clone(), PageRequest::new(p, size));
                    assert_eq!(page.info.current_page, p);
                    rebuilt.extend(page.items);
                }
                assert_eq!(rebuilt, items, "total={total} size={size}");
            }
        }
    }
}
