use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use kb_core::responses::ModerateResponse;

use super::parse_id;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::state::AppState;
use crate::viewer::CurrentUser;

/// `POST /moderate/{model}/{lookup_id}/{mod}/`, staff only.
pub async fn moderate(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ApiPath((model, lookup_id, action)): ApiPath<(String, String, String)>,
) -> Result<Json<ModerateResponse>, ApiError> {
    let lookup_id = parse_id(&lookup_id)?;
    let result = state
        .service
        .moderate(&user.viewer(), &model, lookup_id, &action)
        .await?;
    Ok(Json(result))
}
