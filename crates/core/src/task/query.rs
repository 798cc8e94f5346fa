//! Query types for task listing
//!
//! Raw paging and sorting input from the HTTP layer is normalized here.
//! Out-of-range values fall back to defaults instead of erroring, and
//! sort keys pass through an allow-list enum, so untrusted input never
//! reaches SQL text.

use chrono::NaiveDate;
use serde::Serialize;

use super::model::TaskStatus;

/// Page size applied when the requested size is out of range.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound for the requested page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sortable columns. The enum is the allow-list: anything else falls
/// back to `CreatedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Status,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Accepts both snake_case and camelCase spellings.
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "status" => Some(Self::Status),
            "due_date" | "dueDate" => Some(Self::DueDate),
            "created_at" | "createdAt" => Some(Self::CreatedAt),
            "updated_at" | "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// Column name used in ORDER BY.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Status => "status",
            Self::DueDate => "due_date",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// SQL keyword used in ORDER BY.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Normalized paging and ordering for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    /// Normalize raw paging input. Pure; never fails.
    ///
    /// Negative pages clamp to zero, sizes outside (0, `MAX_PAGE_SIZE`]
    /// become `DEFAULT_PAGE_SIZE`, and a sort token whose field is not
    /// in the allow-list sorts by creation time. The token is
    /// "field,direction"; a missing or unrecognized direction means
    /// descending.
    pub fn from_raw(page: i64, size: i64, sort: &str) -> Self {
        let page = page.max(0);
        let size = if size <= 0 || size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            size
        };

        let mut parts = sort.split(',');
        let sort_field = parts
            .next()
            .and_then(SortField::parse)
            .unwrap_or(SortField::CreatedAt);
        let direction = parts
            .next()
            .and_then(SortDirection::parse)
            .unwrap_or(SortDirection::Desc);

        Self {
            page,
            size,
            sort_field,
            direction,
        }
    }

    /// Row offset of this page. Saturates so an absurd page number
    /// stays a valid OFFSET instead of overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_raw(0, DEFAULT_PAGE_SIZE, "")
    }
}

/// Optional predicates for task search. Present predicates are ANDed.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category_id: Option<i64>,
    pub due_date_before: Option<NaiveDate>,
    pub due_date_after: Option<NaiveDate>,
    pub title: Option<String>,
}

impl TaskFilter {
    /// Filter by status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by category id
    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Keep tasks strictly before the given due date
    pub fn with_due_date_before(mut self, bound: NaiveDate) -> Self {
        self.due_date_before = Some(bound);
        self
    }

    /// Keep tasks strictly after the given due date
    pub fn with_due_date_after(mut self, bound: NaiveDate) -> Self {
        self.due_date_after = Some(bound);
        self
    }

    /// Case-insensitive title substring filter
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// One page of results plus total-count metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            (total_elements + request.size - 1) / request.size
        };
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }

    /// Map page content to another type, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_page_clamps_to_zero() {
        assert_eq!(PageRequest::from_raw(-7, 10, "").page, 0);
        assert_eq!(PageRequest::from_raw(-1, 10, "").page, 0);
    }

    #[test]
    fn out_of_range_size_falls_back_to_default() {
        assert_eq!(PageRequest::from_raw(0, 0, "").size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::from_raw(0, -3, "").size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::from_raw(0, 101, "").size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn size_within_range_is_kept() {
        assert_eq!(PageRequest::from_raw(0, 1, "").size, 1);
        assert_eq!(PageRequest::from_raw(0, 100, "").size, 100);
    }

    #[test]
    fn sort_field_accepts_both_spellings() {
        let snake = PageRequest::from_raw(0, 10, "due_date,asc");
        let camel = PageRequest::from_raw(0, 10, "dueDate,asc");
        assert_eq!(snake.sort_field, SortField::DueDate);
        assert_eq!(camel.sort_field, SortField::DueDate);

        assert_eq!(
            PageRequest::from_raw(0, 10, "createdAt,desc").sort_field,
            SortField::CreatedAt
        );
    }

    #[test]
    fn unknown_sort_field_falls_back_to_created_at() {
        let request = PageRequest::from_raw(0, 10, "password,asc");
        assert_eq!(request.sort_field, SortField::CreatedAt);
        // the direction segment is still honored
        assert_eq!(request.direction, SortDirection::Asc);

        let injection = PageRequest::from_raw(0, 10, "created_at; DROP TABLE tasks,asc");
        assert_eq!(injection.sort_field, SortField::CreatedAt);
    }

    #[test]
    fn direction_is_case_insensitive_and_defaults_to_desc() {
        assert_eq!(
            PageRequest::from_raw(0, 10, "title,ASC").direction,
            SortDirection::Asc
        );
        assert_eq!(
            PageRequest::from_raw(0, 10, "title,sideways").direction,
            SortDirection::Desc
        );
        assert_eq!(
            PageRequest::from_raw(0, 10, "title").direction,
            SortDirection::Desc
        );
        assert_eq!(PageRequest::from_raw(0, 10, "").direction, SortDirection::Desc);
    }

    #[test]
    fn extra_token_segments_are_ignored() {
        let request = PageRequest::from_raw(0, 10, "title,asc,bogus");
        assert_eq!(request.sort_field, SortField::Title);
        assert_eq!(request.direction, SortDirection::Asc);
    }

    #[test]
    fn offset_is_page_times_size() {
        assert_eq!(PageRequest::from_raw(3, 20, "").offset(), 60);
        assert_eq!(PageRequest::from_raw(0, 20, "").offset(), 0);
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let request = PageRequest::from_raw(i64::MAX, 500, "createdAt,desc");
        assert_eq!(request.page, i64::MAX);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), i64::MAX);

        let request = PageRequest::from_raw(i64::MAX / 2, 100, "");
        assert_eq!(request.offset(), i64::MAX);
    }

    #[test]
    fn page_counts_round_up() {
        let request = PageRequest::from_raw(0, 10, "");
        assert_eq!(Page::<i64>::new(vec![], &request, 0).total_pages, 0);
        assert_eq!(Page::<i64>::new(vec![], &request, 1).total_pages, 1);
        assert_eq!(Page::<i64>::new(vec![], &request, 10).total_pages, 1);
        assert_eq!(Page::<i64>::new(vec![], &request, 11).total_pages, 2);
    }

    #[test]
    fn page_map_keeps_metadata() {
        let request = PageRequest::from_raw(2, 5, "");
        let page = Page::new(vec![1_i64, 2, 3], &request, 13).map(|n| n.to_string());
        assert_eq!(page.content, vec!["1", "2", "3"]);
        assert_eq!(page.page, 2);
        assert_eq!(page.size, 5);
        assert_eq!(page.total_elements, 13);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_serializes_camel_case() {
        let request = PageRequest::from_raw(0, 10, "");
        let page = Page::new(vec![1_i64], &request, 1);
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalElements"], 1);
        assert_eq!(value["totalPages"], 1);
        assert!(value["content"].is_array());
    }
}
