//! Request handlers, one module per endpoint family.

mod browse;
mod health;
mod moderate;
mod post;

pub use browse::{ListQuery, articles_segment, index, list, thread};
pub use health::health;
pub use moderate::moderate;
pub use post::{AskRequest, RespondRequest, ask, ask_form, respond, respond_no_slug};

use kb_core::slug::is_valid_slug;

use crate::error::ApiError;

/// Parse a `\d+` path segment; anything else does not match the route.
fn parse_id(segment: &str) -> Result<i64, ApiError> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::not_found());
    }
    segment.parse().map_err(|_| ApiError::not_found())
}

/// `{question_id}/{slug}`: the id must be digits and the slug must match
/// `[a-z0-9-_]+`. Only the id selects the question.
fn parse_thread_path(question_id: &str, slug: &str) -> Result<i64, ApiError> {
    if !is_valid_slug(slug) {
        return Err(ApiError::not_found());
    }
    parse_id(question_id)
}
