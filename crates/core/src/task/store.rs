//! SQLite persistence for tasks

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};

use crate::category::CategoryRepo;
use crate::error::Error;
use crate::Result;

use super::model::{Task, TaskDraft, TaskStatus};
use super::query::{Page, PageRequest, TaskFilter};
use super::stats::{CategoryCount, StatusCount, TaskStatistics, UNCATEGORIZED};

/// Base SELECT with the category name joined in.
const SELECT_TASK: &str = "SELECT t.id, t.title, t.description, t.status, t.due_date, \
     t.category_id, c.name, t.created_at, t.updated_at \
     FROM tasks t LEFT JOIN categories c ON c.id = t.category_id";

/// Task persistence. Stateless; every method borrows the connection so
/// the caller controls locking.
pub struct TaskRepo;

impl TaskRepo {
    /// Validate the draft and insert it. Returns the stored row.
    pub fn create(conn: &Connection, draft: &TaskDraft) -> Result<Task> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if let Some(category_id) = draft.category_id {
            if !CategoryRepo::exists(conn, category_id)? {
                return Err(Error::CategoryNotFound(category_id));
            }
        }

        let now = Utc::now();
        conn.execute(
            "INSERT INTO tasks (title, description, status, due_date, category_id, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft.title,
                draft.description,
                draft.status.as_str(),
                draft.due_date.map(|d| d.to_string()),
                draft.category_id,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        Self::get(conn, conn.last_insert_rowid())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Task> {
        let sql = format!("{SELECT_TASK} WHERE t.id = ?1");
        conn.query_row(&sql, params![id], map_task)
            .optional()?
            .ok_or(Error::TaskNotFound(id))
    }

    /// Replace every mutable field of an existing task.
    pub fn update(conn: &Connection, id: i64, draft: &TaskDraft) -> Result<Task> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        if !Self::exists(conn, id)? {
            return Err(Error::TaskNotFound(id));
        }
        if let Some(category_id) = draft.category_id {
            if !CategoryRepo::exists(conn, category_id)? {
                return Err(Error::CategoryNotFound(category_id));
            }
        }

        conn.execute(
            "UPDATE tasks SET title = ?1, description = ?2, status = ?3, due_date = ?4, \
             category_id = ?5, updated_at = ?6 WHERE id = ?7",
            params![
                draft.title,
                draft.description,
                draft.status.as_str(),
                draft.due_date.map(|d| d.to_string()),
                draft.category_id,
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        Self::get(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(Error::TaskNotFound(id));
        }
        Ok(())
    }

    pub fn exists(conn: &Connection, id: i64) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Run the filter with paging and ordering, returning one page plus
    /// the total match count.
    ///
    /// Due-date bounds are exclusive on both sides. The title predicate
    /// is a case-insensitive substring match. Ties on the sort column
    /// break by id in the same direction so pages never overlap.
    pub fn search(
        conn: &Connection,
        filter: &TaskFilter,
        request: &PageRequest,
    ) -> Result<Page<Task>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("t.status = ?".to_string());
            params.push(Box::new(status.as_str()));
        }
        if let Some(category_id) = filter.category_id {
            clauses.push("t.category_id = ?".to_string());
            params.push(Box::new(category_id));
        }
        if let Some(bound) = filter.due_date_before {
            clauses.push("t.due_date < ?".to_string());
            params.push(Box::new(bound.to_string()));
        }
        if let Some(bound) = filter.due_date_after {
            clauses.push("t.due_date > ?".to_string());
            params.push(Box::new(bound.to_string()));
        }
        if let Some(title) = &filter.title {
            clauses.push("LOWER(t.title) LIKE '%' || LOWER(?) || '%'".to_string());
            params.push(Box::new(title.clone()));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM tasks t{where_sql}");
        let total: i64 =
            conn.query_row(&count_sql, params_from_iter(params.iter()), |row| row.get(0))?;

        let direction = request.direction.keyword();
        let page_sql = format!(
            "{SELECT_TASK}{where_sql} ORDER BY t.{} {direction}, t.id {direction} LIMIT {} OFFSET {}",
            request.sort_field.column(),
            request.size,
            request.offset(),
        );
        let mut stmt = conn.prepare(&page_sql)?;
        let tasks = stmt
            .query_map(params_from_iter(params.iter()), map_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Page::new(tasks, request, total))
    }

    /// Every task, newest first. Used by the CSV export.
    pub fn list_all(conn: &Connection) -> Result<Vec<Task>> {
        let sql = format!("{SELECT_TASK} ORDER BY t.created_at DESC, t.id DESC");
        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], map_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    pub fn statistics(conn: &Connection) -> Result<TaskStatistics> {
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;

        let mut by_status = Vec::with_capacity(TaskStatus::ALL.len());
        for status in TaskStatus::ALL {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )?;
            by_status.push(StatusCount { status, count });
        }

        let mut stmt = conn.prepare(
            "SELECT c.name, COUNT(*) FROM tasks t \
             LEFT JOIN categories c ON c.id = t.category_id \
             GROUP BY c.name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Option<String>>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut by_category: Vec<CategoryCount> = Vec::new();
        let mut uncategorized: Option<CategoryCount> = None;
        for row in rows {
            let (name, count) = row?;
            match name {
                Some(name) => by_category.push(CategoryCount { name, count }),
                None => {
                    uncategorized = Some(CategoryCount {
                        name: UNCATEGORIZED.to_string(),
                        count,
                    })
                }
            }
        }
        by_category.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(bucket) = uncategorized {
            by_category.push(bucket);
        }

        Ok(TaskStatistics {
            total,
            by_status,
            by_category,
        })
    }
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: parse_status(row, 3)?,
        due_date: parse_due_date(row, 4)?,
        category_id: row.get(5)?,
        category_name: row.get(6)?,
        created_at: parse_timestamp(row, 7)?,
        updated_at: parse_timestamp(row, 8)?,
    })
}

fn parse_status(row: &Row<'_>, idx: usize) -> rusqlite::Result<TaskStatus> {
    let raw: String = row.get(idx)?;
    TaskStatus::parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown task status: {raw}").into(),
        )
    })
}

fn parse_due_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|value| {
        value
            .parse::<NaiveDate>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryDraft, CategoryRepo};
    use crate::db::Database;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn create_assigns_id_and_timestamps() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let task = TaskRepo::create(&conn, &TaskDraft::new("Write report")).unwrap();
        assert!(task.id > 0);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.category_id, None);
        assert_eq!(task.category_name, None);
    }

    #[test]
    fn create_rejects_invalid_draft() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let err = TaskRepo::create(&conn, &TaskDraft::new("   ")).unwrap_err();
        match err {
            Error::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "title");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_unknown_category() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let draft = TaskDraft::new("Orphan").with_category_id(42);
        let err = TaskRepo::create(&conn, &draft).unwrap_err();
        assert!(matches!(err, Error::CategoryNotFound(42)));
    }

    #[test]
    fn create_round_trips_every_field() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let category = CategoryRepo::create(&conn, &CategoryDraft::new("Work")).unwrap();

        let draft = TaskDraft::new("Quarterly review")
            .with_description("Slides and numbers")
            .with_status(TaskStatus::InProgress)
            .with_due_date(date(2026, 3, 31))
            .with_category_id(category.id);
        let task = TaskRepo::create(&conn, &draft).unwrap();

        let fetched = TaskRepo::get(&conn, task.id).unwrap();
        assert_eq!(fetched.title, "Quarterly review");
        assert_eq!(fetched.description.as_deref(), Some("Slides and numbers"));
        assert_eq!(fetched.status, TaskStatus::InProgress);
        assert_eq!(fetched.due_date, Some(date(2026, 3, 31)));
        assert_eq!(fetched.category_id, Some(category.id));
        assert_eq!(fetched.category_name.as_deref(), Some("Work"));
    }

    #[test]
    fn get_missing_task_returns_not_found() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let err = TaskRepo::get(&conn, 99999).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(99999)));
    }

    #[test]
    fn update_replaces_fields() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let category = CategoryRepo::create(&conn, &CategoryDraft::new("Home")).unwrap();

        let task = TaskRepo::create(
            &conn,
            &TaskDraft::new("Original").with_category_id(category.id),
        )
        .unwrap();

        let updated = TaskRepo::update(
            &conn,
            task.id,
            &TaskDraft::new("Renamed").with_status(TaskStatus::Done),
        )
        .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, TaskStatus::Done);
        // category was not part of the new draft, so the link is cleared
        assert_eq!(updated.category_id, None);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn update_missing_task_returns_not_found() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let err = TaskRepo::update(&conn, 500, &TaskDraft::new("Ghost")).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(500)));
    }

    #[test]
    fn delete_removes_task() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let task = TaskRepo::create(&conn, &TaskDraft::new("Short lived")).unwrap();
        TaskRepo::delete(&conn, task.id).unwrap();

        let err = TaskRepo::get(&conn, task.id).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
    }

    #[test]
    fn delete_missing_task_returns_not_found() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let err = TaskRepo::delete(&conn, 99999).unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(99999)));
    }

    #[test]
    fn search_filters_by_status_and_title() {
        let db = test_db();
        let conn = db.conn().unwrap();

        TaskRepo::create(&conn, &TaskDraft::new("URGENT: call vendor")).unwrap();
        TaskRepo::create(
            &conn,
            &TaskDraft::new("File the urgent paperwork").with_status(TaskStatus::Done),
        )
        .unwrap();
        TaskRepo::create(&conn, &TaskDraft::new("Water plants")).unwrap();

        let by_title = TaskRepo::search(
            &conn,
            &TaskFilter::default().with_title("urgent"),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(by_title.total_elements, 2);

        let combined = TaskRepo::search(
            &conn,
            &TaskFilter::default()
                .with_title("urgent")
                .with_status(TaskStatus::Done),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(combined.total_elements, 1);
        assert_eq!(combined.content[0].title, "File the urgent paperwork");
    }

    #[test]
    fn due_date_bounds_are_exclusive() {
        let db = test_db();
        let conn = db.conn().unwrap();

        for day in [1, 15, 31] {
            TaskRepo::create(
                &conn,
                &TaskDraft::new(format!("Task {day}")).with_due_date(date(2026, 1, day)),
            )
            .unwrap();
        }

        let before = TaskRepo::search(
            &conn,
            &TaskFilter::default().with_due_date_before(date(2026, 1, 15)),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(before.total_elements, 1);
        assert_eq!(before.content[0].due_date, Some(date(2026, 1, 1)));

        let after = TaskRepo::search(
            &conn,
            &TaskFilter::default().with_due_date_after(date(2026, 1, 15)),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(after.total_elements, 1);
        assert_eq!(after.content[0].due_date, Some(date(2026, 1, 31)));
    }

    #[test]
    fn tasks_without_due_date_never_match_date_filters() {
        let db = test_db();
        let conn = db.conn().unwrap();

        TaskRepo::create(&conn, &TaskDraft::new("No deadline")).unwrap();

        let filter = TaskFilter::default().with_due_date_before(date(2030, 1, 1));
        let page = TaskRepo::search(&conn, &filter, &PageRequest::default()).unwrap();
        assert_eq!(page.total_elements, 0);
    }

    #[test]
    fn unknown_category_filter_matches_nothing() {
        let db = test_db();
        let conn = db.conn().unwrap();

        TaskRepo::create(&conn, &TaskDraft::new("Visible")).unwrap();

        let page = TaskRepo::search(
            &conn,
            &TaskFilter::default().with_category_id(999),
            &PageRequest::default(),
        )
        .unwrap();
        assert_eq!(page.total_elements, 0);
        assert!(page.content.is_empty());
    }

    #[test]
    fn search_pages_and_counts() {
        let db = test_db();
        let conn = db.conn().unwrap();

        for i in 0..25 {
            TaskRepo::create(&conn, &TaskDraft::new(format!("Task {i:02}"))).unwrap();
        }

        let first = TaskRepo::search(
            &conn,
            &TaskFilter::default(),
            &PageRequest::from_raw(0, 10, "title,asc"),
        )
        .unwrap();
        assert_eq!(first.content.len(), 10);
        assert_eq!(first.total_elements, 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.content[0].title, "Task 00");

        let last = TaskRepo::search(
            &conn,
            &TaskFilter::default(),
            &PageRequest::from_raw(2, 10, "title,asc"),
        )
        .unwrap();
        assert_eq!(last.content.len(), 5);
        assert_eq!(last.content[4].title, "Task 24");
    }

    #[test]
    fn search_orders_by_requested_field() {
        let db = test_db();
        let conn = db.conn().unwrap();

        for title in ["Banana", "Apple", "Cherry"] {
            TaskRepo::create(&conn, &TaskDraft::new(title)).unwrap();
        }

        let ascending = TaskRepo::search(
            &conn,
            &TaskFilter::default(),
            &PageRequest::from_raw(0, 10, "title,asc"),
        )
        .unwrap();
        let titles: Vec<&str> = ascending.content.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Apple", "Banana", "Cherry"]);

        // default ordering is newest first
        let newest = TaskRepo::search(&conn, &TaskFilter::default(), &PageRequest::default())
            .unwrap();
        assert_eq!(newest.content[0].title, "Cherry");
    }

    #[test]
    fn statistics_counts_statuses_and_categories() {
        let db = test_db();
        let conn = db.conn().unwrap();
        let work = CategoryRepo::create(&conn, &CategoryDraft::new("Work")).unwrap();
        let errands = CategoryRepo::create(&conn, &CategoryDraft::new("Errands")).unwrap();

        TaskRepo::create(&conn, &TaskDraft::new("A").with_category_id(work.id)).unwrap();
        TaskRepo::create(
            &conn,
            &TaskDraft::new("B")
                .with_category_id(errands.id)
                .with_status(TaskStatus::Done),
        )
        .unwrap();
        TaskRepo::create(&conn, &TaskDraft::new("C")).unwrap();

        let stats = TaskRepo::statistics(&conn).unwrap();
        assert_eq!(stats.total, 3);

        let status_counts: Vec<(TaskStatus, i64)> =
            stats.by_status.iter().map(|s| (s.status, s.count)).collect();
        assert_eq!(
            status_counts,
            vec![
                (TaskStatus::Todo, 2),
                (TaskStatus::InProgress, 0),
                (TaskStatus::Done, 1),
            ]
        );

        let names: Vec<&str> = stats.by_category.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Errands", "Work", UNCATEGORIZED]);
    }

    #[test]
    fn statistics_with_no_tasks_reports_zeroes() {
        let db = test_db();
        let conn = db.conn().unwrap();

        let stats = TaskRepo::statistics(&conn).unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.by_status.len(), 3);
        assert!(stats.by_status.iter().all(|s| s.count == 0));
        assert!(stats.by_category.is_empty());
    }
}
