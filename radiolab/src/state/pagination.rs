/// Number of page buttons shown before the label list collapses into ellipses.
const MAX_PAGE_LABELS: usize = 5;

/// One page of a collection together with the page that was actually shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
    /// The requested page clamped into `1..=total_pages`.
    pub effective_page: usize,
}

/// Slices `items` into the page at `requested_page` (1-based).
///
/// `total_pages` is never below 1 and the requested page is clamped into range, so a
/// non-empty collection always yields a non-empty page. A page size of 0 is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let effective_page = requested_page.clamp(1, total_pages);

    let start = (effective_page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        total_pages,
        effective_page,
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(usize),
    Ellipsis,
}

/// Labels for a pagination bar: every page when there are few, otherwise the first
/// page, a window around `current`, the last page, and ellipses for the gaps.
pub fn page_labels(current: usize, total: usize) -> Vec<PageLabel> {
    if total <= MAX_PAGE_LABELS {
        return (1..=total).map(PageLabel::Page).collect();
    }

    let current = current.clamp(1, total);
    let (start, end) = if current <= 2 {
        (2, 4)
    } else if current >= total - 1 {
        (total - 3, total - 1)
    } else {
        (current - 1, current + 1)
    };

    let mut labels = vec![PageLabel::Page(1)];
    if start > 2 {
        labels.push(PageLabel::Ellipsis);
    }
    labels.extend((start..=end).map(PageLabel::Page));
    if end < total - 1 {
        labels.push(PageLabel::Ellipsis);
    }
    labels.push(PageLabel::Page(total));
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLabel::{Ellipsis, Page as P};

    #[test]
    fn test_thirteen_items_page_size_five() {
        let items: Vec<u32> = (1..=13).collect();

        let first = paginate(&items, 5, 1);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.effective_page, 1);

        let beyond = paginate(&items, 5, 4);
        assert_eq!(beyond.effective_page, 3);
        assert_eq!(beyond.items, vec![11, 12, 13]);
    }

    #[test]
    fn test_empty_collection_has_one_empty_page() {
        let page = paginate::<u32>(&[], 6, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.effective_page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_zero_clamps_to_first_page() {
        let items = vec!["a", "b", "c"];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.effective_page, 1);
        assert_eq!(page.items, vec!["a", "b"]);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let items = vec!["a", "b"];
        let page = paginate(&items, 0, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items, vec!["b"]);
    }

    #[test]
    fn test_effective_page_always_in_range() {
        for len in 1..=20usize {
            let items: Vec<usize> = (0..len).collect();
            for page_size in 1..=7 {
                for requested in 0..=10 {
                    let page = paginate(&items, page_size, requested);
                    assert!(page.effective_page >= 1);
                    assert!(page.effective_page <= page.total_pages);
                    assert!(!page.items.is_empty());
                    assert!(page.items.len() <= page_size);
                }
            }
        }
    }

    #[test]
    fn test_labels_show_all_pages_when_few() {
        assert_eq!(page_labels(1, 1), vec![P(1)]);
        assert_eq!(page_labels(2, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
    }

    #[test]
    fn test_labels_near_start() {
        assert_eq!(
            page_labels(1, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
        assert_eq!(
            page_labels(2, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_labels_in_the_middle() {
        assert_eq!(
            page_labels(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_labels_near_end() {
        assert_eq!(
            page_labels(10, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
        assert_eq!(page_labels(6, 7), vec![P(1), Ellipsis, P(4), P(5), P(6), P(7)]);
    }

    #[test]
    fn test_labels_window_abutting_both_ends() {
        assert_eq!(page_labels(3, 6), vec![P(1), P(2), P(3), P(4), Ellipsis, P(6)]);
    }
}
