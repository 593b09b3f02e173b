use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use kb_core::responses::{IndexResponse, ListResponse, ThreadResponse};
use kb_core::slug::is_valid_slug;
use serde::Deserialize;

use super::{parse_id, parse_thread_path};
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::state::AppState;
use crate::viewer::CurrentUser;

/// `?q=` and `?limit=` on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

impl ListQuery {
    fn limit(&self) -> Result<Option<u32>, ApiError> {
        match self.limit {
            Some(0) => Err(ApiError::BadRequest("limit must be greater than zero".into())),
            limit => Ok(limit),
        }
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<IndexResponse>, ApiError> {
    Ok(Json(state.service.index(&user.viewer()).await?))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let limit = query.limit()?;
    let listing = state
        .service
        .browse(&user.viewer(), None, query.q.as_deref(), limit)
        .await?;
    Ok(Json(listing))
}

/// `/articles/{segment}/`: digits name a question, anything else matching
/// `[a-z0-9-_]+` names a category.
pub async fn articles_segment(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(segment): ApiPath<String>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Response, ApiError> {
    if let Ok(question_id) = parse_id(&segment) {
        let thread = state
            .service
            .thread(&user.viewer(), question_id, true)
            .await?;
        return Ok(Json(thread).into_response());
    }
    if !is_valid_slug(&segment) {
        return Err(ApiError::not_found());
    }

    let limit = query.limit()?;
    let listing = state
        .service
        .browse(&user.viewer(), Some(&segment), query.q.as_deref(), limit)
        .await?;
    Ok(Json(listing).into_response())
}

/// `/articles/{question_id}/{slug}/`. Any well-formed slug is accepted; the
/// id decides.
pub async fn thread(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath((question_id, slug)): ApiPath<(String, String)>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let question_id = parse_thread_path(&question_id, &slug)?;
    let thread = state
        .service
        .thread(&user.viewer(), question_id, true)
        .await?;
    Ok(Json(thread))
}
