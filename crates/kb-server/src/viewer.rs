//! Viewer identity.
//!
//! Authentication happens upstream: a trusted proxy passes the user id in
//! `x-knowledge-user`. No header means anonymous; an id that is not a known
//! user is rejected. With `general.login_required`, anonymous requests are
//! rejected too.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kb_core::entities::User;
use kb_core::visibility::Viewer;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the viewer's user id.
pub const USER_HEADER: &str = "x-knowledge-user";

/// The requesting user, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        self.0.as_ref().map_or_else(Viewer::anonymous, Viewer::from)
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(USER_HEADER) else {
            if state.settings().login_required {
                return Err(ApiError::Unauthorized("login required".into()));
            }
            return Ok(Self(None));
        };

        let id = raw
            .to_str()
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| ApiError::Unauthorized(format!("malformed {USER_HEADER} header")))?;

        let user = state
            .service
            .find_user(id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized(format!("unknown user {id}")))?;
        tracing::debug!(user_id = user.id, staff = user.is_staff, "viewer resolved");
        Ok(Self(Some(user)))
    }
}
