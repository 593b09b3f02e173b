use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Authorship, Question};
use crate::enums::ResponseStatus;
use crate::visibility::{KnowledgePost, Viewer, status_visible};

/// Characters of the body shown by `summary()`.
const SUMMARY_LEN: usize = 100;

/// A response to a question. Defaults to inheriting the question's status.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Response {
    pub id: i64,
    pub question_id: i64,
    pub body: Option<String>,
    pub status: ResponseStatus,
    pub accepted: bool,
    #[serde(flatten)]
    pub authorship: Authorship,
    pub added: DateTime<Utc>,
    pub lastchanged: DateTime<Utc>,
}

impl Response {
    pub const fn switch(&mut self, status: ResponseStatus) {
        self.status = status;
    }

    pub const fn public(&mut self) {
        self.switch(ResponseStatus::Public);
    }

    pub const fn draft(&mut self) {
        self.switch(ResponseStatus::Draft);
    }

    pub const fn review(&mut self) {
        self.switch(ResponseStatus::Review);
    }

    pub const fn rejected(&mut self) {
        self.switch(ResponseStatus::Rejected);
    }

    pub const fn inherit(&mut self) {
        self.switch(ResponseStatus::Inherit);
    }

    /// Accept this response within `question`, which must be its parent.
    ///
    /// `responses` is the question's thread and must contain this response.
    /// See [`Question::accept`].
    pub fn accept(&self, question: &Question, responses: &mut [Self]) -> bool {
        if question.id != self.question_id {
            question.clear_accepted(responses);
            return false;
        }
        question.accept(responses, self.id)
    }

    /// Visibility of this response. `question` must be its parent; a
    /// mismatched question never grants visibility.
    #[must_use]
    pub fn can_view(&self, question: &Question, viewer: &Viewer) -> bool {
        if question.id != self.question_id {
            return false;
        }
        match self.status.own() {
            None => question.can_view(viewer),
            Some(status) => status_visible(
                status,
                &self.authorship,
                Some(&question.authorship),
                viewer,
            ),
        }
    }

    /// Mod-bar button state: the status, plus `"accept"` when accepted.
    #[must_use]
    pub fn states(&self) -> Vec<&'static str> {
        let mut states = vec![self.status.as_str()];
        if self.accepted {
            states.push("accept");
        }
        states
    }

    /// The first 100 characters of the body followed by `...`.
    #[must_use]
    pub fn summary(&self) -> String {
        let body = self.body.as_deref().unwrap_or_default();
        let mut summary: String = body.chars().take(SUMMARY_LEN).collect();
        summary.push_str("...");
        summary
    }
}

impl KnowledgePost for Response {
    fn authorship(&self) -> &Authorship {
        &self.authorship
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
