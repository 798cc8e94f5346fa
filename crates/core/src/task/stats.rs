//! Aggregated task counts

use serde::Serialize;

use super::model::TaskStatus;

/// Bucket name for tasks without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub name: String,
    pub count: i64,
}

/// Snapshot of task counts, overall and per bucket.
///
/// `by_status` always lists every status, including zero counts.
/// `by_category` lists only categories that currently have tasks,
/// ordered by name with [`UNCATEGORIZED`] last.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total: i64,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,
}
