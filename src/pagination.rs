//! Page arithmetic, page-number windowing, and pagination button layout.

use crate::types::{PageButton, PageButtonKind, PageItem};

/// Show every page when there are at most this many.
const FULL_WINDOW_MAX: usize = 7;

pub const PREV_LABEL: &str = "‹ Prev";
pub const NEXT_LABEL: &str = "Next ›";
pub const ELLIPSIS_LABEL: &str = "...";

/// Number of pages needed for `total` rows; zero when there are no rows.
pub fn total_pages(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Clamp a requested page into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total: usize, per_page: usize) -> usize {
    page.clamp(1, total_pages(total, per_page).max(1))
}

/// Half-open row range `[start, end)` of `page` within `total` rows.
pub fn page_range(page: usize, per_page: usize, total: usize) -> (usize, usize) {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);
    (start, end)
}

/// Page-number window around `current`.
///
/// All pages when `total <= 7`; otherwise first and last page plus a five-wide
/// window anchored to the start, the end, or centered on `current`.
pub fn visible_pages(current: usize, total: usize) -> Vec<PageItem> {
    if total <= FULL_WINDOW_MAX {
        return (1..=total).map(PageItem::Page).collect();
    }
    if current <= 4 {
        let mut items: Vec<PageItem> = (1..=5).map(PageItem::Page).collect();
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
        return items;
    }
    if current >= total - 3 {
        let mut items = vec![PageItem::Page(1), PageItem::Ellipsis];
        items.extend((total - 4..=total).map(PageItem::Page));
        return items;
    }
    vec![
        PageItem::Page(1),
        PageItem::Ellipsis,
        PageItem::Page(current - 1),
        PageItem::Page(current),
        PageItem::Page(current + 1),
        PageItem::Ellipsis,
        PageItem::Page(total),
    ]
}

/// Full button strip for the pagination region; empty for a single page.
pub fn page_buttons(current: usize, total: usize) -> Vec<PageButton> {
    if total <= 1 {
        return Vec::new();
    }
    let mut buttons = Vec::with_capacity(FULL_WINDOW_MAX + 2);
    buttons.push(PageButton {
        kind: PageButtonKind::Prev,
        label: PREV_LABEL.to_string(),
        disabled: current <= 1,
        active: false,
    });
    for item in visible_pages(current, total) {
        buttons.push(match item {
            PageItem::Page(n) => PageButton {
                kind: PageButtonKind::Page(n),
                label: n.to_string(),
                disabled: false,
                active: n == current,
            },
            PageItem::Ellipsis => PageButton {
                kind: PageButtonKind::Ellipsis,
                label: ELLIPSIS_LABEL.to_string(),
                disabled: true,
                active: false,
            },
        });
    }
    buttons.push(PageButton {
        kind: PageButtonKind::Next,
        label: NEXT_LABEL.to_string(),
        disabled: current >= total,
        active: false,
    });
    buttons
}

/// "Showing S to E of T entries", with `0 to 0 of 0` when empty.
pub fn info_text(page: usize, per_page: usize, total: usize) -> String {
    let (start, end) = if total == 0 {
        (0, 0)
    } else {
        let (start, end) = page_range(page, per_page, total);
        (start + 1, end)
    };
    format!("Showing {start} to {end} of {total} entries")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn numbers(items: &[PageItem]) -> Vec<Option<usize>> {
        items
            .iter()
            .map(|i| match i {
                PageItem::Page(n) => Some(*n),
                PageItem::Ellipsis => None,
            })
            .collect()
    }

    #[test_case(1, 1 => vec![Some(1)]; "single page")]
    #[test_case(3, 7 => vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6), Some(7)]; "seven pages shows all")]
    #[test_case(4, 10 => vec![Some(1), Some(2), Some(3), Some(4), Some(5), None, Some(10)]; "near start")]
    #[test_case(7, 10 => vec![Some(1), None, Some(6), Some(7), Some(8), Some(9), Some(10)]; "near end")]
    #[test_case(5, 10 => vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]; "middle")]
    #[test_case(6, 10 => vec![Some(1), None, Some(5), Some(6), Some(7), None, Some(10)]; "last middle page")]
    #[test_case(0, 0 => Vec::<Option<usize>>::new(); "no pages")]
    fn test_visible_pages(current: usize, total: usize) -> Vec<Option<usize>> {
        numbers(&visible_pages(current, total))
    }

    #[test]
    fn test_total_pages_and_clamp() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(12, 10), 2);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(clamp_page(0, 12, 10), 1);
        assert_eq!(clamp_page(5, 12, 10), 2);
        assert_eq!(clamp_page(3, 0, 10), 1);
    }

    #[test]
    fn test_info_text_clamps_end() {
        assert_eq!(info_text(1, 10, 12), "Showing 1 to 10 of 12 entries");
        assert_eq!(info_text(2, 10, 12), "Showing 11 to 12 of 12 entries");
        assert_eq!(info_text(1, 10, 0), "Showing 0 to 0 of 0 entries");
    }

    #[test]
    fn test_page_buttons_disable_edges() {
        let buttons = page_buttons(1, 2);
        assert_eq!(buttons.len(), 4);
        assert!(buttons[0].disabled);
        assert!(buttons[1].active);
        assert!(!buttons[3].disabled);

        let last = page_buttons(2, 2);
        assert!(!last[0].disabled);
        assert!(last[3].disabled);

        assert!(page_buttons(1, 1).is_empty());
    }

    #[test]
    fn test_ellipsis_buttons_are_disabled() {
        let buttons = page_buttons(5, 10);
        let ellipses: Vec<_> = buttons
            .iter()
            .filter(|b| b.kind == PageButtonKind::Ellipsis)
            .collect();
        assert_eq!(ellipses.len(), 2);
        assert!(ellipses.iter().all(|b| b.disabled && b.label == "..."));
    }
}
