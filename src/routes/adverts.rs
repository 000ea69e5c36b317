use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::adverts::{AdListItem, AdvertDetail, AdvertDraft, AdvertId, PageRequest};
use crate::error::AppResult;
use crate::extractors::BearerToken;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adverts", get(list_recent).post(create))
        .route("/adverts/mine", get(list_mine))
        .route("/adverts/bookmarks", get(list_bookmarked))
        .route("/adverts/moderation", get(list_pending_moderation))
        .route("/adverts/search", get(search))
        .route("/adverts/{id}", get(detail).put(update).delete(delete))
        .route("/adverts/{id}/visibility", post(toggle_shown))
        .route("/adverts/{id}/bookmark", post(toggle_bookmark))
}

#[derive(Deserialize)]
struct SearchText {
    #[serde(default)]
    q: String,
}

async fn list_recent(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<Vec<AdListItem>>> {
    Ok(Json(state.service.list_recent(page).await?))
}

async fn list_mine(
    State(state): State<AppState>,
    token: BearerToken,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<Vec<AdListItem>>> {
    Ok(Json(state.service.list_mine(token.as_deref(), page).await?))
}

async fn list_bookmarked(
    State(state): State<AppState>,
    token: BearerToken,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<Vec<AdListItem>>> {
    Ok(Json(
        state.service.list_bookmarked(token.as_deref(), page).await?,
    ))
}

async fn list_pending_moderation(
    State(state): State<AppState>,
    token: BearerToken,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<Vec<AdListItem>>> {
    Ok(Json(
        state
            .service
            .list_pending_moderation(token.as_deref(), page)
            .await?,
    ))
}

async fn search(
    State(state): State<AppState>,
    Query(text): Query<SearchText>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<Vec<AdListItem>>> {
    Ok(Json(state.service.search(&text.q, page).await?))
}

/// Unknown ids answer with a placeholder that has no `date`.
async fn detail(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<i64>,
) -> AppResult<Json<AdvertDetail>> {
    Ok(Json(
        state
            .service
            .get_detail(token.as_deref(), AdvertId::new(id))
            .await?,
    ))
}

async fn create(
    State(state): State<AppState>,
    token: BearerToken,
    Json(draft): Json<AdvertDraft>,
) -> AppResult<Response> {
    let id = state.service.create(token.as_deref(), draft).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.get() }))).into_response())
}

async fn update(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<i64>,
    Json(draft): Json<AdvertDraft>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .service
        .update(token.as_deref(), AdvertId::new(id), draft)
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn delete(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    state
        .service
        .delete(token.as_deref(), AdvertId::new(id))
        .await?;
    Ok(Json(json!({ "success": true })))
}

async fn toggle_shown(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let shown = state
        .service
        .toggle_shown(token.as_deref(), AdvertId::new(id))
        .await?;
    Ok(Json(json!({ "shown": shown })))
}

async fn toggle_bookmark(
    State(state): State<AppState>,
    token: BearerToken,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let bookmarked = state
        .service
        .toggle_bookmark(token.as_deref(), AdvertId::new(id))
        .await?;
    Ok(Json(json!({ "bookmarked": bookmarked })))
}
