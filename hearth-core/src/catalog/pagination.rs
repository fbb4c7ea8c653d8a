//! Pagination arithmetic shared by every backend.
//!
//! All three store variants compute offsets and page metadata through this
//! module so equivalent queries produce byte-identical pagination results.

/// A validated (page, page size) pair. Both are clamped to at least 1;
/// callers asking for page 0 get page 1, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// First page sized to hold `limit` records; used by the similarity and
    /// recommendation paths which take rather than paginate.
    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Zero-based record offset of this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

/// `ceil(total_count / per_page)`; `0` when nothing matched.
pub fn total_pages(total_count: u64, per_page: u32) -> u64 {
    total_count.div_ceil(u64::from(per_page.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_and_size_clamp_to_one() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.per_page(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
        assert_eq!(PageRequest::new(5, 10).offset(), 40);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 10), 1);
    }
}
