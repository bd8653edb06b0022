//! Client-side pagination of already loaded lists.

/// One page of a list.
#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Returns page `page` (1-based) of `items`, `page_size` items per page.
///
/// Page `k` holds `items[(k-1)*size .. min(k*size, len)]`. Page 0, pages past
/// the end and a zero `page_size` give an empty page.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let total_pages = total_pages(items.len(), page_size);
    let slice = if page == 0 || page > total_pages {
        &items[0..0]
    } else {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(items.len());
        &items[start..end]
    };
    Page {
        items: slice.iter().collect(),
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// `ceil(len / page_size)`, 0 when `page_size` is 0.
#[must_use]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Page numbers for the pager buttons around `current`.
///
/// Shows at most `width` numbers; starts at 1 until `current` passes 3, then
/// slides so `current` sits third, clamped at the last page.
#[must_use]
pub fn page_window(current: usize, total: usize, width: usize) -> Vec<usize> {
    if total == 0 || width == 0 {
        return Vec::new();
    }
    let width = width.min(total);
    let start = if current > 3 {
        (current - 2).min(total - width + 1)
    } else {
        1
    };
    (start..start + width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_slice_in_order() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 1, 10);
        assert_eq!(first.items, items[0..10].iter().collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, vec![&21, &22, &23]);
        assert_eq!(last.total_items, 23);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 10).items.is_empty());
        assert!(paginate(&items, 2, 10).items.is_empty());
        assert!(paginate(&items, 1, 0).items.is_empty());
        assert!(paginate::<u8>(&[], 1, 10).items.is_empty());
    }

    #[test]
    fn exact_multiple() {
        let items: Vec<u32> = (0..20).collect();
        assert_eq!(total_pages(items.len(), 10), 2);
        assert_eq!(paginate(&items, 2, 10).items.len(), 10);
    }

    #[test]
    fn window_slides_after_third_page() {
        assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 10, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(4, 10, 5), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(2, 3, 5), vec![1, 2, 3]);
        assert!(page_window(1, 0, 5).is_empty());
    }
}
