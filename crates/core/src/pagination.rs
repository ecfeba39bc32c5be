//! Page-number model for paginated listings.

/// Rows shown per page of the invoices listing.
pub const ITEMS_PER_PAGE: u32 = 6;

/// Listings with at most this many pages show every page number.
const SHOW_ALL_THRESHOLD: u32 = 7;

/// One slot in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Number of pages needed for `count` rows, `per_page` at a time.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // bounded by the check below
pub const fn total_pages(count: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    let pages = count.div_ceil(per_page as u64);
    if pages > u32::MAX as u64 {
        u32::MAX
    } else {
        pages as u32
    }
}

/// Parse a `page` query value. Missing, non-numeric, and values below 1 all
/// become page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1)
}

/// Row offset of the first item on `page` (1-based).
#[must_use]
pub const fn offset(page: u32, per_page: u32) -> u64 {
    (page.saturating_sub(1) as u64) * per_page as u64
}

/// Page items to render for `current` of `total` pages.
///
/// ```
/// use acme_core::pagination::{PageItem::{Ellipsis, Page}, generate_pagination};
///
/// assert_eq!(
///     generate_pagination(5, 10),
///     [Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
#[must_use]
pub fn generate_pagination(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= SHOW_ALL_THRESHOLD {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        return vec![Page(1), Page(2), Page(3), Ellipsis, Page(total - 1), Page(total)];
    }

    if current >= total - 2 {
        return vec![Page(1), Page(2), Ellipsis, Page(total - 2), Page(total - 1), Page(total)];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}

#[cfg(test)]
mod tests {
    use super::PageItem::{Ellipsis, Page};
    use super::*;

    #[test]
    fn test_few_pages_lists_all() {
        assert!(generate_pagination(1, 0).is_empty());
        assert_eq!(generate_pagination(1, 1), [Page(1)]);
        assert_eq!(
            generate_pagination(4, 7),
            [Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Page(7)]
        );
    }

    #[test]
    fn test_near_start() {
        for current in 1..=3 {
            assert_eq!(
                generate_pagination(current, 10),
                [Page(1), Page(2), Page(3), Ellipsis, Page(9), Page(10)]
            );
        }
    }

    #[test]
    fn test_near_end() {
        for current in 8..=10 {
            assert_eq!(
                generate_pagination(current, 10),
                [Page(1), Page(2), Ellipsis, Page(8), Page(9), Page(10)]
            );
        }
    }

    #[test]
    fn test_middle() {
        assert_eq!(
            generate_pagination(4, 8),
            [Page(1), Ellipsis, Page(3), Page(4), Page(5), Ellipsis, Page(8)]
        );
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, ITEMS_PER_PAGE), 0);
        assert_eq!(total_pages(6, ITEMS_PER_PAGE), 1);
        assert_eq!(total_pages(7, ITEMS_PER_PAGE), 2);
        assert_eq!(total_pages(15, ITEMS_PER_PAGE), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("4")), 4);
    }

    #[test]
    fn test_offset() {
        assert_eq!(offset(1, ITEMS_PER_PAGE), 0);
        assert_eq!(offset(3, ITEMS_PER_PAGE), 12);
        assert_eq!(offset(0, ITEMS_PER_PAGE), 0);
    }
}
