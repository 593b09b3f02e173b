//! JSON payloads returned by the HTTP endpoints and the `kb` CLI.
//!
//! Views pair an entity with the derived fields a client needs to render it
//! (permalink, author display name, mod-bar state).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Category, Question, Response, User};
use crate::enums::{EntityType, ModerationAction};

/// A question with its permalink and display fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: Question,
    pub url: String,
    pub author_name: String,
    pub states: Vec<String>,
}

impl QuestionView {
    /// `author` must be the question's owning user, if any.
    #[must_use]
    pub fn new(question: Question, author: Option<&User>, slug_urls: bool) -> Self {
        Self {
            url: question.url(slug_urls),
            author_name: question.authorship.display_name(author),
            states: question.states().into_iter().map(String::from).collect(),
            question,
        }
    }
}

/// A response with its display fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResponseView {
    #[serde(flatten)]
    pub response: Response,
    pub author_name: String,
    pub states: Vec<String>,
}

impl ResponseView {
    /// `author` must be the response's owning user, if any.
    #[must_use]
    pub fn new(response: Response, author: Option<&User>) -> Self {
        Self {
            author_name: response.authorship.display_name(author),
            states: response.states().into_iter().map(String::from).collect(),
            response,
        }
    }
}

/// Response from `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IndexResponse {
    pub questions: Vec<QuestionView>,
    pub categories: Vec<Category>,
}

/// Response from `GET /articles/` and `GET /articles/{category_slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ListResponse {
    pub category: Option<Category>,
    pub query: Option<String>,
    pub questions: Vec<QuestionView>,
    pub categories: Vec<Category>,
}

/// Response from `GET /articles/{question_id}/{slug}/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ThreadResponse {
    pub question: QuestionView,
    pub responses: Vec<ResponseView>,
    pub answered: bool,
    pub accepted: bool,
    /// Whether the viewer may post a response.
    pub can_respond: bool,
}

/// Response from `POST /moderate/{model}/{lookup_id}/{mod}/`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ModerateResponse {
    pub model: EntityType,
    pub id: i64,
    pub action: ModerationAction,
    /// For `accept`: whether the response was accepted.
    pub applied: bool,
    /// Where the client should go next (the thread, or the list after a delete).
    pub redirect: String,
}

/// Response from `GET /ask/`: what a client needs to render the ask form.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AskFormResponse {
    pub categories: Vec<Category>,
    /// Whether the viewer may post at all.
    pub can_ask: bool,
    /// Anonymous posters must supply a name and email.
    pub requires_contact: bool,
}
