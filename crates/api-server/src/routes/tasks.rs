//! Task REST endpoints

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tb_core::task::{
    Page, PageRequest, Task, TaskDraft, TaskFilter, TaskRepo, TaskStatistics, TaskStatus,
    DEFAULT_PAGE_SIZE,
};

use crate::routes::{core_error, csv_download, require_api_session, RouteError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskPayload {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    category_id: Option<i64>,
}

impl From<TaskPayload> for TaskDraft {
    fn from(payload: TaskPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description,
            status: payload.status.unwrap_or_default(),
            due_date: payload.due_date,
            category_id: payload.category_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskResponse {
    id: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    category_id: Option<i64>,
    category_name: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            due_date: task.due_date,
            category_id: task.category_id,
            category_name: task.category_name,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

/// Listing parameters. Unknown status or date values are a type error
/// (400); out-of-range paging and unknown sort fields degrade to
/// defaults instead.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskListQuery {
    #[serde(default)]
    status: Option<TaskStatus>,
    #[serde(default)]
    category_id: Option<i64>,
    #[serde(default)]
    due_date_before: Option<NaiveDate>,
    #[serde(default)]
    due_date_after: Option<NaiveDate>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    page: Option<i64>,
    #[serde(default)]
    size: Option<i64>,
    #[serde(default)]
    sort: Option<String>,
}

impl TaskListQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            category_id: self.category_id,
            due_date_before: self.due_date_before,
            due_date_after: self.due_date_after,
            title: self
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::from_raw(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.sort.as_deref().unwrap_or("createdAt,desc"),
        )
    }
}

async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Page<TaskResponse>>, RouteError> {
    require_api_session(&state, &headers).await?;

    let page = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::search(&conn, &query.filter(), &query.page_request()).map_err(core_error)?
    };
    Ok(Json(page.map(TaskResponse::from)))
}

async fn get_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, RouteError> {
    require_api_session(&state, &headers).await?;

    let task = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::get(&conn, id).map_err(core_error)?
    };
    Ok(Json(task.into()))
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<TaskResponse>), RouteError> {
    require_api_session(&state, &headers).await?;
    tracing::info!("creating task: {}", payload.title);

    let draft = TaskDraft::from(payload);
    let task = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::create(&conn, &draft).map_err(core_error)?
    };
    Ok((StatusCode::CREATED, Json(task.into())))
}

async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<TaskResponse>, RouteError> {
    require_api_session(&state, &headers).await?;
    tracing::info!("updating task {id}");

    let draft = TaskDraft::from(payload);
    let task = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::update(&conn, id, &draft).map_err(core_error)?
    };
    Ok(Json(task.into()))
}

async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, RouteError> {
    require_api_session(&state, &headers).await?;

    {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::delete(&conn, id).map_err(core_error)?;
    }
    tracing::info!("deleted task {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn task_statistics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TaskStatistics>, RouteError> {
    require_api_session(&state, &headers).await?;

    let stats = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::statistics(&conn).map_err(core_error)?
    };
    Ok(Json(stats))
}

async fn export_tasks_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    require_api_session(&state, &headers).await?;

    let tasks = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::list_all(&conn).map_err(core_error)?
    };
    tracing::info!("exporting {} tasks to csv", tasks.len());

    let bytes = state.exporter().tasks(&tasks).map_err(core_error)?;
    let filename = format!("tasks_{}.csv", Utc::now().date_naive());
    Ok(csv_download(bytes, &filename))
}

async fn export_statistics_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, RouteError> {
    require_api_session(&state, &headers).await?;

    let stats = {
        let conn = state.db().conn().map_err(core_error)?;
        TaskRepo::statistics(&conn).map_err(core_error)?
    };
    let bytes = state.exporter().statistics(&stats).map_err(core_error)?;
    let filename = format!("task_statistics_{}.csv", Utc::now().date_naive());
    Ok(csv_download(bytes, &filename))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", get(list_tasks).post(create_task))
        .route("/api/v1/tasks/export/csv", get(export_tasks_csv))
        .route("/api/v1/tasks/statistics", get(task_statistics))
        .route("/api/v1/tasks/statistics/csv", get(export_statistics_csv))
        .route(
            "/api/v1/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
