//! Category REST endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tb_core::category::{Category, CategoryDraft, CategoryRepo};

use crate::routes::{core_error, require_api_session, RouteError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct CategoryPayload {
    name: String,
    #[serde(default)]
    color: Option<String>,
}

impl From<CategoryPayload> for CategoryDraft {
    fn from(payload: CategoryPayload) -> Self {
        Self {
            name: payload.name,
            color: payload.color,
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryResponse {
    id: i64,
    name: String,
    color: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            color: category.color,
        }
    }
}

async fn list_categories(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CategoryResponse>>, RouteError> {
    require_api_session(&state, &headers).await?;

    let categories = {
        let conn = state.db().conn().map_err(core_error)?;
        CategoryRepo::list(&conn).map_err(core_error)?
    };
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

async fn get_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, RouteError> {
    require_api_session(&state, &headers).await?;

    let category = {
        let conn = state.db().conn().map_err(core_error)?;
        CategoryRepo::get(&conn, id).map_err(core_error)?
    };
    Ok(Json(category.into()))
}

async fn create_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryResponse>), RouteError> {
    require_api_session(&state, &headers).await?;
    tracing::info!("creating category: {}", payload.name);

    let draft = CategoryDraft::from(payload);
    let category = {
        let conn = state.db().conn().map_err(core_error)?;
        CategoryRepo::create(&conn, &draft).map_err(core_error)?
    };
    Ok((StatusCode::CREATED, Json(category.into())))
}

async fn update_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> Result<Json<CategoryResponse>, RouteError> {
    require_api_session(&state, &headers).await?;
    tracing::info!("updating category {id}");

    let draft = CategoryDraft::from(payload);
    let category = {
        let conn = state.db().conn().map_err(core_error)?;
        CategoryRepo::update(&conn, id, &draft).map_err(core_error)?
    };
    Ok(Json(category.into()))
}

async fn delete_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, RouteError> {
    require_api_session(&state, &headers).await?;

    {
        let conn = state.db().conn().map_err(core_error)?;
        CategoryRepo::delete(&conn, id).map_err(core_error)?;
    }
    tracing::info!("deleted category {id}");
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/categories", get(list_categories).post(create_category))
        .route(
            "/api/v1/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}
