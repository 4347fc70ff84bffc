/// Position inside a paged list, as reported by the list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub limit: u32,
    pub total_count: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { current_page: 1, limit: 10, total_count: 0 }
    }
}

impl Pagination {
    /// Page is clamped into `1..=total_pages` (1 for an empty list).
    pub fn new(current_page: u32, limit: u32, total_count: u32) -> Self {
        let limit = limit.max(1);
        let last_page = total_count.div_ceil(limit).max(1);
        Self { current_page: current_page.clamp(1, last_page), limit, total_count }
    }

    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.limit.max(1))
    }

    /// 1-based index of the first row on this page, 0 for an empty list.
    pub fn start_item(&self) -> u32 {
        if self.total_count == 0 {
            0
        } else {
            self.current_page
                .saturating_sub(1)
                .saturating_mul(self.limit)
                .saturating_add(1)
                .min(self.total_count)
        }
    }

    pub fn end_item(&self) -> u32 {
        self.current_page.saturating_mul(self.limit).min(self.total_count)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        1..=self.total_pages()
    }

    pub fn summary(&self) -> String {
        format!("Showing {} to {} of {} results", self.start_item(), self.end_item(), self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_partial_page() {
        let p = Pagination::new(5, 5, 23);
        assert_eq!(p.start_item(), 21);
        assert_eq!(p.end_item(), 23);
        assert_eq!(p.total_pages(), 5);
        assert!(!p.has_next());
        assert!(p.has_previous());
    }

    #[test]
    fn first_page() {
        let p = Pagination::new(1, 5, 23);
        assert_eq!((p.start_item(), p.end_item()), (1, 5));
        assert!(!p.has_previous());
        assert!(p.has_next());
        assert_eq!(p.pages().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_list_disables_both_directions() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.start_item(), 0);
        assert_eq!(p.end_item(), 0);
        assert_eq!(p.total_pages(), 0);
        assert!(!p.has_previous());
        assert!(!p.has_next());
        assert_eq!(p.summary(), "Showing 0 to 0 of 0 results");
    }

    #[test]
    fn out_of_range_page_from_server_is_clamped() {
        let p = Pagination::new(500_000_000, 10, 23);
        assert_eq!(p.current_page, 3);
        assert_eq!(p.summary(), "Showing 21 to 23 of 23 results");
        assert!(!p.has_next());
    }

    #[test]
    fn huge_fields_saturate_instead_of_overflowing() {
        let p = Pagination { current_page: u32::MAX, limit: u32::MAX, total_count: 23 };
        assert_eq!((p.start_item(), p.end_item()), (23, 23));
        let p = Pagination::new(2, u32::MAX, u32::MAX);
        assert_eq!(p.current_page, 1);
        assert_eq!((p.start_item(), p.end_item()), (1, u32::MAX));
    }

    #[test]
    fn exact_multiple() {
        let p = Pagination::new(2, 10, 20);
        assert_eq!((p.start_item(), p.end_item()), (11, 20));
        assert!(!p.has_next());
    }
}
