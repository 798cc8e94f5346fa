//! Task module
//!
//! Task model, query normalization, SQLite persistence, and statistics.

mod model;
mod query;
mod stats;
mod store;

pub use model::{Task, TaskDraft, TaskStatus, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
pub use query::{
    Page, PageRequest, SortDirection, SortField, TaskFilter, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use stats::{CategoryCount, StatusCount, TaskStatistics, UNCATEGORIZED};
pub use store::TaskRepo;
