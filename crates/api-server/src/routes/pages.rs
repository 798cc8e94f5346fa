//! Server-rendered HTML pages.
//!
//! The browser surface mirrors the JSON API: task listing with filters,
//! task and category forms, and CSV downloads. Pages are forgiving where
//! the API is strict: malformed filter input degrades to "no filter"
//! instead of failing the request, and validation failures re-render the
//! form with the submitted values intact.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use chrono::Utc;
use serde::Deserialize;
use tb_core::category::{Category, CategoryDraft, CategoryRepo, DEFAULT_COLOR};
use tb_core::task::{
    Page, PageRequest, Task, TaskDraft, TaskFilter, TaskRepo, TaskStatus, DEFAULT_PAGE_SIZE,
};
use tb_core::{Error, FieldError};

use crate::auth::{current_session, Session};
use crate::routes::csv_download;
use crate::state::AppState;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem auto;max-width:60rem;padding:0 1rem}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #ccc;padding:.4rem;text-align:left}\
.notice{padding:.5rem;background:#eef}.error{background:#fee}\
.actions form{display:inline}label{display:inline-block;margin-right:.75rem}\
.swatch{display:inline-block;width:1rem;height:1rem;border:1px solid #999;vertical-align:middle}";

const NAV: &str = "<p><a href=\"/tasks\">Tasks</a> | <a href=\"/tasks/new\">New task</a> | \
<a href=\"/categories\">Categories</a> | <a href=\"/tasks/download\">Export CSV</a> | \
<a href=\"/tasks/statistics/download\">Statistics CSV</a></p>\n\
<form method=\"post\" action=\"/logout\"><button type=\"submit\">Sign out</button></form>\n";

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub(crate) fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Task Board</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    ))
}

/// Browser requests carry the session in the cookie; anything without a
/// live session is bounced to the login form instead of getting a 401.
async fn require_page_session(state: &AppState, headers: &HeaderMap) -> Result<Session, Response> {
    match current_session(state, headers).await {
        Some(session) => Ok(session),
        None => Err(Redirect::to("/login").into_response()),
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<h1>{status}</h1>\n<p>{}</p>\n<p><a href=\"/tasks\">Back to tasks</a></p>",
        escape_html(message)
    );
    (status, layout("Error", &body)).into_response()
}

fn storage_error(err: Error) -> Response {
    match err {
        Error::TaskNotFound(_) | Error::CategoryNotFound(_) => {
            error_page(StatusCode::NOT_FOUND, &err.to_string())
        }
        other => {
            tracing::error!("page request failed: {other}");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn load_categories(state: &AppState) -> Result<Vec<Category>, Error> {
    let conn = state.db().conn()?;
    CategoryRepo::list(&conn)
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn field_error_list(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut list = String::from("<ul class=\"notice error\">\n");
    for error in errors {
        list.push_str(&format!(
            "<li>{}: {}</li>\n",
            escape_html(&error.field),
            escape_html(&error.message)
        ));
    }
    list.push_str("</ul>\n");
    list
}

/// Raw filter, paging, and sort input from the query string. Everything
/// arrives as text so a stale bookmark never turns into a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskPageQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    due_date_before: Option<String>,
    #[serde(default)]
    due_date_after: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    sort_property: Option<String>,
    #[serde(default)]
    sort_direction: Option<String>,
}

impl TaskPageQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: trimmed(&self.status).and_then(TaskStatus::parse),
            category_id: trimmed(&self.category_id).and_then(|v| v.parse().ok()),
            due_date_before: trimmed(&self.due_date_before).and_then(|v| v.parse().ok()),
            due_date_after: trimmed(&self.due_date_after).and_then(|v| v.parse().ok()),
            title: trimmed(&self.title).map(str::to_string),
        }
    }

    fn page_request(&self) -> PageRequest {
        let page = trimmed(&self.page).and_then(|v| v.parse().ok()).unwrap_or(0);
        let size = trimmed(&self.size)
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let property = trimmed(&self.sort_property).unwrap_or("createdAt");
        let direction = trimmed(&self.sort_direction).unwrap_or("desc");
        PageRequest::from_raw(page, size, &format!("{property},{direction}"))
    }

    /// Query string that reproduces the current filters and sorting. The
    /// page number is left out so pagination links can append their own.
    fn filter_params(&self) -> String {
        let pairs = [
            ("status", &self.status),
            ("categoryId", &self.category_id),
            ("dueDateBefore", &self.due_date_before),
            ("dueDateAfter", &self.due_date_after),
            ("title", &self.title),
            ("size", &self.size),
            ("sortProperty", &self.sort_property),
            ("sortDirection", &self.sort_direction),
        ];
        let mut params = Vec::new();
        for (name, value) in pairs {
            if let Some(value) = trimmed(value) {
                params.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }
        params.join("&")
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskForm {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
}

impl TaskForm {
    fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone().unwrap_or_default(),
            description: trimmed(&self.description).map(str::to_string),
            status: trimmed(&self.status)
                .and_then(TaskStatus::parse)
                .unwrap_or_default(),
            due_date: trimmed(&self.due_date).and_then(|v| v.parse().ok()),
            category_id: trimmed(&self.category_id).and_then(|v| v.parse().ok()),
        }
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: task.description.clone(),
            status: Some(task.status.as_str().to_string()),
            due_date: task.due_date.map(|d| d.to_string()),
            category_id: task.category_id.map(|id| id.to_string()),
        }
    }
}

fn status_options(selected: Option<TaskStatus>) -> String {
    let mut options = String::new();
    for status in TaskStatus::ALL {
        let marker = if selected == Some(status) { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            status.as_str(),
            status.label()
        ));
    }
    options
}

fn category_options(categories: &[Category], selected: Option<i64>) -> String {
    let mut options = String::new();
    for category in categories {
        let marker = if selected == Some(category.id) { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{}\"{marker}>{}</option>\n",
            category.id,
            escape_html(&category.name)
        ));
    }
    options
}

fn task_form_page(
    heading: &str,
    action: &str,
    form: &TaskForm,
    categories: &[Category],
    errors: &[FieldError],
) -> Html<String> {
    let selected_status = trimmed(&form.status).and_then(TaskStatus::parse);
    let selected_category = trimmed(&form.category_id).and_then(|v| v.parse().ok());

    let body = format!(
        "<h1>{heading}</h1>\n{notices}<form method=\"post\" action=\"{action}\">\n\
         <p><label>Title <input type=\"text\" name=\"title\" value=\"{title}\"></label></p>\n\
         <p><label>Description <textarea name=\"description\" rows=\"4\">{description}</textarea></label></p>\n\
         <p><label>Status <select name=\"status\">\n{statuses}</select></label></p>\n\
         <p><label>Due date <input type=\"date\" name=\"dueDate\" value=\"{due_date}\"></label></p>\n\
         <p><label>Category <select name=\"categoryId\">\n<option value=\"\">(none)</option>\n{categories}</select></label></p>\n\
         <p><button type=\"submit\">Save</button> <a href=\"/tasks\">Cancel</a></p>\n</form>",
        heading = escape_html(heading),
        notices = field_error_list(errors),
        title = escape_html(form.title.as_deref().unwrap_or("")),
        description = escape_html(form.description.as_deref().unwrap_or("")),
        statuses = status_options(selected_status.or(Some(TaskStatus::Todo))),
        due_date = escape_html(form.due_date.as_deref().unwrap_or("")),
        categories = category_options(categories, selected_category),
    );
    layout(heading, &body)
}

async fn home() -> Redirect {
    Redirect::to("/tasks")
}

async fn task_list_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskPageQuery>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let filter = query.filter();
    let request = query.page_request();
    let loaded = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        TaskRepo::search(&conn, &filter, &request).and_then(|page| {
            let categories = CategoryRepo::list(&conn)?;
            Ok((page, categories))
        })
    };
    let (page, categories) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => return storage_error(err),
    };
    tracing::debug!(
        "task list page {} of {} ({} total)",
        page.page,
        page.total_pages,
        page.total_elements
    );

    let mut body = String::from("<h1>Tasks</h1>\n");
    body.push_str(NAV);
    body.push_str(&filter_form(&query, &categories));
    body.push_str(&task_table(&page));
    body.push_str(&pagination(&page, &query.filter_params()));
    layout("Tasks", &body).into_response()
}

fn filter_form(query: &TaskPageQuery, categories: &[Category]) -> String {
    let current_status = trimmed(&query.status).and_then(TaskStatus::parse);
    let current_category = trimmed(&query.category_id).and_then(|v| v.parse().ok());

    format!(
        "<form method=\"get\" action=\"/tasks\">\n\
         <label>Status <select name=\"status\">\n<option value=\"\">(any)</option>\n{statuses}</select></label>\n\
         <label>Category <select name=\"categoryId\">\n<option value=\"\">(any)</option>\n{categories}</select></label>\n\
         <label>Due before <input type=\"date\" name=\"dueDateBefore\" value=\"{before}\"></label>\n\
         <label>Due after <input type=\"date\" name=\"dueDateAfter\" value=\"{after}\"></label>\n\
         <label>Title <input type=\"text\" name=\"title\" value=\"{title}\"></label>\n\
         <button type=\"submit\">Filter</button> <a href=\"/tasks\">Reset</a>\n</form>\n",
        statuses = status_options(current_status),
        categories = category_options(categories, current_category),
        before = escape_html(trimmed(&query.due_date_before).unwrap_or("")),
        after = escape_html(trimmed(&query.due_date_after).unwrap_or("")),
        title = escape_html(trimmed(&query.title).unwrap_or("")),
    )
}

fn task_table(page: &Page<Task>) -> String {
    if page.content.is_empty() {
        return String::from("<p>No tasks found.</p>\n");
    }

    let mut table = String::from(
        "<table>\n<tr><th>Title</th><th>Status</th><th>Due date</th><th>Category</th><th>Actions</th></tr>\n",
    );
    for task in &page.content {
        let due = task.due_date.map(|d| d.to_string()).unwrap_or_default();
        let category = task.category_name.as_deref().unwrap_or("-");
        table.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{due}</td><td>{}</td>\
             <td class=\"actions\"><a href=\"/tasks/{id}\">Edit</a> \
             <form method=\"post\" action=\"/tasks/{id}/delete\"><button type=\"submit\">Delete</button></form></td></tr>\n",
            escape_html(&task.title),
            task.status.label(),
            escape_html(category),
            id = task.id,
        ));
    }
    table.push_str("</table>\n");
    table
}

fn pagination(page: &Page<Task>, params: &str) -> String {
    let sep = if params.is_empty() { "" } else { "&" };
    // 1-based display number; also the index of the next page
    let next = page.page.saturating_add(1);
    let mut footer = format!(
        "<p>Page {next} of {} ({} tasks)",
        page.total_pages.max(1),
        page.total_elements
    );
    if page.page > 0 {
        footer.push_str(&format!(
            " <a href=\"/tasks?page={}{sep}{params}\">Previous</a>",
            page.page - 1
        ));
    }
    if next < page.total_pages {
        footer.push_str(&format!(" <a href=\"/tasks?page={next}{sep}{params}\">Next</a>"));
    }
    footer.push_str("</p>\n");
    footer
}

async fn new_task_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }
    let categories = match load_categories(&state) {
        Ok(categories) => categories,
        Err(err) => return storage_error(err),
    };
    task_form_page("New task", "/tasks", &TaskForm::default(), &categories, &[]).into_response()
}

async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<TaskForm>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let draft = form.draft();
    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        TaskRepo::create(&conn, &draft)
    };
    match result {
        Ok(task) => {
            tracing::info!("created task {} from form", task.id);
            Redirect::to("/tasks").into_response()
        }
        Err(Error::Validation(errors)) => {
            tracing::warn!("task form rejected: {} field error(s)", errors.len());
            let categories = match load_categories(&state) {
                Ok(categories) => categories,
                Err(err) => return storage_error(err),
            };
            task_form_page("New task", "/tasks", &form, &categories, &errors).into_response()
        }
        Err(err) => storage_error(err),
    }
}

async fn edit_task_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let loaded = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        TaskRepo::get(&conn, id).and_then(|task| {
            let categories = CategoryRepo::list(&conn)?;
            Ok((task, categories))
        })
    };
    let (task, categories) = match loaded {
        Ok(loaded) => loaded,
        Err(err) => return storage_error(err),
    };

    let form = TaskForm::from(&task);
    task_form_page(
        "Edit task",
        &format!("/tasks/{id}"),
        &form,
        &categories,
        &[],
    )
    .into_response()
}

async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let draft = form.draft();
    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        TaskRepo::update(&conn, id, &draft)
    };
    match result {
        Ok(_) => {
            tracing::info!("updated task {id} from form");
            Redirect::to("/tasks").into_response()
        }
        Err(Error::Validation(errors)) => {
            tracing::warn!("task form rejected: {} field error(s)", errors.len());
            let categories = match load_categories(&state) {
                Ok(categories) => categories,
                Err(err) => return storage_error(err),
            };
            task_form_page(
                "Edit task",
                &format!("/tasks/{id}"),
                &form,
                &categories,
                &errors,
            )
            .into_response()
        }
        Err(err) => storage_error(err),
    }
}

async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        TaskRepo::delete(&conn, id)
    };
    match result {
        Ok(()) => {
            tracing::info!("deleted task {id} from form");
            Redirect::to("/tasks").into_response()
        }
        Err(err) => storage_error(err),
    }
}

async fn download_tasks(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let tasks = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        match TaskRepo::list_all(&conn) {
            Ok(tasks) => tasks,
            Err(err) => return storage_error(err),
        }
    };
    match state.exporter().tasks(&tasks) {
        Ok(bytes) => csv_download(bytes, &format!("tasks_{}.csv", Utc::now().date_naive())),
        Err(err) => storage_error(err),
    }
}

async fn download_statistics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let stats = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        match TaskRepo::statistics(&conn) {
            Ok(stats) => stats,
            Err(err) => return storage_error(err),
        }
    };
    match state.exporter().statistics(&stats) {
        Ok(bytes) => csv_download(
            bytes,
            &format!("task_statistics_{}.csv", Utc::now().date_naive()),
        ),
        Err(err) => storage_error(err),
    }
}

#[derive(Debug, Default, Deserialize)]
struct CategoryForm {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl CategoryForm {
    fn draft(&self) -> CategoryDraft {
        CategoryDraft {
            name: self.name.clone().unwrap_or_default(),
            color: trimmed(&self.color).map(str::to_string),
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: Some(category.name.clone()),
            color: Some(category.color.clone()),
        }
    }
}

fn category_form_page(
    heading: &str,
    action: &str,
    form: &CategoryForm,
    errors: &[FieldError],
) -> Html<String> {
    let body = format!(
        "<h1>{heading}</h1>\n{notices}<form method=\"post\" action=\"{action}\">\n\
         <p><label>Name <input type=\"text\" name=\"name\" value=\"{name}\"></label></p>\n\
         <p><label>Color <input type=\"color\" name=\"color\" value=\"{color}\"></label></p>\n\
         <p><button type=\"submit\">Save</button> <a href=\"/categories\">Cancel</a></p>\n</form>",
        heading = escape_html(heading),
        notices = field_error_list(errors),
        name = escape_html(form.name.as_deref().unwrap_or("")),
        color = escape_html(form.color.as_deref().unwrap_or(DEFAULT_COLOR)),
    );
    layout(heading, &body)
}

async fn category_list_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let categories = match load_categories(&state) {
        Ok(categories) => categories,
        Err(err) => return storage_error(err),
    };

    let mut body = String::from("<h1>Categories</h1>\n");
    body.push_str(NAV);
    body.push_str("<p><a href=\"/categories/new\">New category</a></p>\n");
    if categories.is_empty() {
        body.push_str("<p>No categories yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Name</th><th>Color</th><th>Actions</th></tr>\n");
        for category in &categories {
            let color = escape_html(&category.color);
            body.push_str(&format!(
                "<tr><td>{}</td><td><span class=\"swatch\" style=\"background:{color}\"></span> {color}</td>\
                 <td class=\"actions\"><a href=\"/categories/{id}\">Edit</a> \
                 <form method=\"post\" action=\"/categories/{id}/delete\"><button type=\"submit\">Delete</button></form></td></tr>\n",
                escape_html(&category.name),
                id = category.id,
            ));
        }
        body.push_str("</table>\n");
    }
    layout("Categories", &body).into_response()
}

async fn new_category_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }
    category_form_page("New category", "/categories", &CategoryForm::default(), &[])
        .into_response()
}

async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let draft = form.draft();
    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        CategoryRepo::create(&conn, &draft)
    };
    match result {
        Ok(category) => {
            tracing::info!("created category {} from form", category.id);
            Redirect::to("/categories").into_response()
        }
        Err(Error::Validation(errors)) => {
            tracing::warn!("category form rejected: {} field error(s)", errors.len());
            category_form_page("New category", "/categories", &form, &errors).into_response()
        }
        Err(Error::Conflict(message)) => {
            let errors = vec![FieldError::new("name", message)];
            category_form_page("New category", "/categories", &form, &errors).into_response()
        }
        Err(err) => storage_error(err),
    }
}

async fn edit_category_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let category = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        match CategoryRepo::get(&conn, id) {
            Ok(category) => category,
            Err(err) => return storage_error(err),
        }
    };

    let form = CategoryForm::from(&category);
    category_form_page("Edit category", &format!("/categories/{id}"), &form, &[]).into_response()
}

async fn update_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let draft = form.draft();
    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        CategoryRepo::update(&conn, id, &draft)
    };
    match result {
        Ok(_) => {
            tracing::info!("updated category {id} from form");
            Redirect::to("/categories").into_response()
        }
        Err(Error::Validation(errors)) => {
            category_form_page("Edit category", &format!("/categories/{id}"), &form, &errors)
                .into_response()
        }
        Err(Error::Conflict(message)) => {
            let errors = vec![FieldError::new("name", message)];
            category_form_page("Edit category", &format!("/categories/{id}"), &form, &errors)
                .into_response()
        }
        Err(err) => storage_error(err),
    }
}

async fn delete_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(redirect) = require_page_session(&state, &headers).await {
        return redirect;
    }

    let result = {
        let conn = match state.db().conn() {
            Ok(conn) => conn,
            Err(err) => return storage_error(err),
        };
        CategoryRepo::delete(&conn, id)
    };
    match result {
        Ok(()) => {
            tracing::info!("deleted category {id} from form");
            Redirect::to("/categories").into_response()
        }
        Err(err) => storage_error(err),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/tasks", get(task_list_page).post(create_task))
        .route("/tasks/new", get(new_task_page))
        .route("/tasks/download", get(download_tasks))
        .route("/tasks/statistics/download", get(download_statistics))
        .route("/tasks/{id}", get(edit_task_page).post(update_task))
        .route("/tasks/{id}/delete", post(delete_task))
        .route("/categories", get(category_list_page).post(create_category))
        .route("/categories/new", get(new_category_page))
        .route(
            "/categories/{id}",
            get(edit_category_page).post(update_category),
        )
        .route("/categories/{id}/delete", post(delete_category))
}
