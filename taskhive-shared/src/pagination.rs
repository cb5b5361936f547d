/// Pagination primitives shared by all paginated queries
///
/// A `PageSpec` describes what slice of a result set the caller wants and
/// how it should be ordered. A `Page<T>` is the envelope returned to the
/// caller: the slice plus total-count metadata.
///
/// # Example
///
/// ```
/// use taskhive_shared::pagination::{Page, PageSpec, SortDir};
///
/// let spec = PageSpec::new(0, 10, "created_at".to_string(), SortDir::Desc);
/// assert_eq!(spec.offset(), 0);
///
/// let page = Page::new(vec![1, 2, 3], &spec, 25);
/// assert_eq!(page.total_pages, 3);
/// ```

use serde::{Deserialize, Serialize};

/// Sort direction for paginated queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending order
    Asc,

    /// Descending order
    Desc,
}

impl SortDir {
    /// Parses a direction string, case-insensitively
    ///
    /// Anything other than "desc" is treated as ascending, matching the
    /// permissive query-parameter handling elsewhere.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Requested page of a larger ordered result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    /// Zero-based page index
    pub page: u32,

    /// Page size (clamped to 1..=100)
    pub size: u32,

    /// Requested sort field (validated against an allow-list by the query)
    pub sort_by: String,

    /// Sort direction
    pub sort_dir: SortDir,
}

impl PageSpec {
    /// Maximum allowed page size
    pub const MAX_SIZE: u32 = 100;

    /// Creates a page spec, clamping the size into 1..=MAX_SIZE
    pub fn new(page: u32, size: u32, sort_by: String, sort_dir: SortDir) -> Self {
        Self {
            page,
            size: size.clamp(1, Self::MAX_SIZE),
            sort_by,
            sort_dir,
        }
    }

    /// Row offset for this page
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Row limit for this page
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: "created_at".to_string(),
            sort_dir: SortDir::Desc,
        }
    }
}

/// A bounded slice of a result set plus total-count metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Zero-based page index
    pub page: u32,

    /// Requested page size
    pub size: u32,

    /// Total matching rows across all pages
    pub total_elements: i64,

    /// Total number of pages
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Builds a page envelope from fetched items and the total row count
    pub fn new(items: Vec<T>, spec: &PageSpec, total_elements: i64) -> Self {
        let size = i64::from(spec.size.max(1));
        let total_pages = (total_elements + size - 1) / size;

        Self {
            items,
            page: spec.page,
            size: spec.size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_dir_parse() {
        assert_eq!(SortDir::parse("desc"), SortDir::Desc);
        assert_eq!(SortDir::parse("DESC"), SortDir::Desc);
        assert_eq!(SortDir::parse("asc"), SortDir::Asc);
        assert_eq!(SortDir::parse("garbage"), SortDir::Asc);
    }

    #[test]
    fn test_page_spec_clamps_size() {
        let spec = PageSpec::new(0, 0, "created_at".to_string(), SortDir::Asc);
        assert_eq!(spec.size, 1);

        let spec = PageSpec::new(0, 1000, "created_at".to_string(), SortDir::Asc);
        assert_eq!(spec.size, PageSpec::MAX_SIZE);
    }

    #[test]
    fn test_page_spec_offset() {
        let spec = PageSpec::new(2, 10, "created_at".to_string(), SortDir::Asc);
        assert_eq!(spec.offset(), 20);
        assert_eq!(spec.limit(), 10);
    }

    #[test]
    fn test_page_totals() {
        // 25 rows, size 10: pages of 10, 10, 5.
        let spec = PageSpec::new(0, 10, "created_at".to_string(), SortDir::Desc);
        let page: Page<i32> = Page::new(vec![0; 10], &spec, 25);
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages, 3);

        let spec = PageSpec::new(2, 10, "created_at".to_string(), SortDir::Desc);
        let page: Page<i32> = Page::new(vec![0; 5], &spec, 25);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_elements, 25);
    }

    #[test]
    fn test_page_empty() {
        let spec = PageSpec::default();
        let page: Page<i32> = Page::new(vec![], &spec, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
