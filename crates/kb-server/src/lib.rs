//! # kb-server
//!
//! The knowledge base URL table on axum.
//!
//! | method    | path                                   | handler            |
//! |-----------|----------------------------------------|--------------------|
//! | GET       | `/`                                    | index              |
//! | GET       | `/article_list/`, `/articles/`         | list               |
//! | GET, POST | `/articles/{question_id}/`             | thread / respond   |
//! | GET       | `/articles/{category_slug}/`           | list by category   |
//! | GET, POST | `/articles/{question_id}/{slug}/`      | thread / respond   |
//! | POST      | `/moderate/{model}/{lookup_id}/{mod}/` | moderate           |
//! | GET, POST | `/ask/`                                | ask                |
//! | GET       | `/health`                              | health             |
//!
//! The viewer is identified by the `x-knowledge-user` header (see [`viewer`]).

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;
pub mod viewer;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/article_list/", get(handlers::list))
        .route("/articles/", get(handlers::list))
        .route(
            "/articles/{segment}/",
            get(handlers::articles_segment).post(handlers::respond_no_slug),
        )
        .route(
            "/articles/{question_id}/{slug}/",
            get(handlers::thread).post(handlers::respond),
        )
        .route(
            "/moderate/{model}/{lookup_id}/{action}/",
            post(handlers::moderate),
        )
        .route("/ask/", get(handlers::ask_form).post(handlers::ask))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
