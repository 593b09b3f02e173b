//! Posting endpoints: ask a question, respond to one.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kb_config::GeneralConfig;
use kb_core::entities::{Authorship, User};
use kb_core::responses::{AskFormResponse, QuestionView, ResponseView};
use serde::Deserialize;

use super::{parse_id, parse_thread_path};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use crate::viewer::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Category ids.
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Defaults to `general.alerts`.
    #[serde(default)]
    pub alert: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub alert: Option<bool>,
}

fn present(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// Who a new post is attributed to.
///
/// Signed-in users post as themselves. Anonymous posts need
/// `allow_anonymous` and both a name and an email.
fn authorship_for(
    user: Option<&User>,
    name: Option<&str>,
    email: Option<&str>,
    alert: Option<bool>,
    settings: &GeneralConfig,
) -> Result<Authorship, ApiError> {
    let alert = alert.unwrap_or(settings.alerts);
    if let Some(user) = user {
        return Ok(Authorship::user(user.id, alert));
    }
    if !settings.allow_anonymous {
        return Err(ApiError::Forbidden("anonymous posting is disabled".into()));
    }
    let (Some(name), Some(email)) = (present(name), present(email)) else {
        return Err(ApiError::BadRequest(
            "anonymous posts require a name and an email".into(),
        ));
    };
    Ok(Authorship::anonymous(Some(name), Some(email), alert))
}

pub async fn ask_form(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<AskFormResponse>, ApiError> {
    let anonymous = user.user().is_none();
    Ok(Json(AskFormResponse {
        categories: state.service.list_categories().await?,
        can_ask: !anonymous || state.settings().allow_anonymous,
        requires_contact: anonymous,
    }))
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiJson(req): ApiJson<AskRequest>,
) -> Result<(StatusCode, Json<QuestionView>), ApiError> {
    let authorship = authorship_for(
        user.user(),
        req.name.as_deref(),
        req.email.as_deref(),
        req.alert,
        state.settings(),
    )?;
    let question = state
        .service
        .create_question(&req.title, req.body.as_deref(), &authorship, &req.categories)
        .await?;
    let view = QuestionView::new(question, user.user(), state.settings().slug_urls);
    Ok((StatusCode::CREATED, Json(view)))
}

/// `POST /articles/{question_id}/{slug}/`.
pub async fn respond(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath((question_id, slug)): ApiPath<(String, String)>,
    ApiJson(req): ApiJson<RespondRequest>,
) -> Result<(StatusCode, Json<ResponseView>), ApiError> {
    create_response(&state, &user, parse_thread_path(&question_id, &slug)?, &req).await
}

/// `POST /articles/{question_id}/`.
pub async fn respond_no_slug(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath(question_id): ApiPath<String>,
    ApiJson(req): ApiJson<RespondRequest>,
) -> Result<(StatusCode, Json<ResponseView>), ApiError> {
    create_response(&state, &user, parse_id(&question_id)?, &req).await
}

async fn create_response(
    state: &AppState,
    user: &CurrentUser,
    question_id: i64,
    req: &RespondRequest,
) -> Result<(StatusCode, Json<ResponseView>), ApiError> {
    let question = state.service.get_question(question_id).await?;
    let viewer = user.viewer();
    state.service.check_can_respond(&question, &viewer)?;

    let authorship = authorship_for(
        user.user(),
        req.name.as_deref(),
        req.email.as_deref(),
        req.alert,
        state.settings(),
    )?;
    let response = state
        .service
        .create_response(question_id, req.body.as_deref(), &authorship)
        .await?;
    Ok((StatusCode::CREATED, Json(ResponseView::new(response, user.user()))))
}
