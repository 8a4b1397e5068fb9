//! Pagination footer.  The controller counts pages from zero; everything in
//! here that the user sees counts from one.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// 1-based page number shown to the user.
    pub display_page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub range_label: String,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PaginationView {
    pub fn new(page_index: u32, page_size: u32, total_elements: u64, shown: usize) -> Self {
        let size = u64::from(page_size.max(1));
        let page_count = total_elements.div_ceil(size).max(1) as u32;
        let first = u64::from(page_index) * size;
        let range_label = if shown == 0 {
            format!("0 of {}", total_elements)
        } else {
            format!("{}-{} of {}", first + 1, first + shown as u64, total_elements)
        };
        Self {
            display_page: page_index + 1,
            page_count,
            page_size,
            range_label,
            has_prev: page_index > 0,
            has_next: page_index + 1 < page_count,
        }
    }
}

/// Convert a page number typed or clicked by the user into an index.
pub fn to_page_index(display_page: u32) -> u32 {
    display_page.saturating_sub(1)
}
