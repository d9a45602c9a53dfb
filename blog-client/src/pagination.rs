use std::fmt;

/// Pages shown in full before the window starts compressing.
const FULL_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Compressed list of page links around `current`, 1-based.
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= FULL_WINDOW {
        return (1..=total_pages).map(Page).collect();
    }

    if current <= 3 {
        let mut items: Vec<_> = (1..=FULL_WINDOW).map(Page).collect();
        items.extend([Ellipsis, Page(total_pages)]);
        return items;
    }

    if current >= total_pages - 2 {
        let mut items = vec![Page(1), Ellipsis];
        items.extend((total_pages - FULL_WINDOW + 1..=total_pages).map(Page));
        return items;
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total_pages: u32) -> bool {
    current < total_pages
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    fn render(items: &[PageItem]) -> String {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn small_totals_show_every_page() {
        assert!(page_window(1, 0).is_empty());
        assert_eq!(page_window(2, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(render(&page_window(5, 5)), "1 2 3 4 5");
    }

    #[test]
    fn near_start() {
        assert_eq!(
            page_window(1, 20),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Ellipsis, Page(20)]
        );
        assert_eq!(render(&page_window(3, 20)), "1 2 3 4 5 ... 20");
    }

    #[test]
    fn near_end() {
        assert_eq!(
            page_window(20, 20),
            vec![Page(1), Ellipsis, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
        assert_eq!(render(&page_window(18, 20)), "1 ... 16 17 18 19 20");
    }

    #[test]
    fn sliding_window_in_the_middle() {
        assert_eq!(
            page_window(10, 20),
            vec![Page(1), Ellipsis, Page(9), Page(10), Page(11), Ellipsis, Page(20)]
        );
        assert_eq!(render(&page_window(4, 6)), "1 ... 2 3 4 5 6");
    }

    #[test]
    fn prev_next_bounds() {
        assert!(!has_previous(1));
        assert!(has_previous(2));
        assert!(has_next(19, 20));
        assert!(!has_next(20, 20));
    }
}
