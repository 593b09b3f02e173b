use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Authorship, Category, Response};
use crate::enums::Status;
use crate::errors::CoreError;
use crate::slug::thread_path;
use crate::visibility::{KnowledgePost, Viewer, status_visible};

/// Longest accepted question (and category) title.
pub const MAX_TITLE_LEN: usize = 255;

/// A question (article) with a moderation status and a thread of responses.
///
/// Status setters mutate the value only; `KbService` persists them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Question {
    pub id: i64,
    pub title: String,
    pub body: Option<String>,
    pub status: Status,
    pub locked: bool,
    pub recommended: bool,
    pub hits: u32,
    #[serde(flatten)]
    pub authorship: Authorship,
    pub categories: Vec<Category>,
    pub added: DateTime<Utc>,
    pub lastchanged: DateTime<Utc>,
}

impl Question {
    /// Check a title before it is written.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an empty or over-long title.
    pub fn validate_title(title: &str) -> Result<(), CoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation("title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "title exceeds {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(())
    }

    pub const fn switch(&mut self, status: Status) {
        self.status = status;
    }

    pub const fn public(&mut self) {
        self.switch(Status::Public);
    }

    pub const fn draft(&mut self) {
        self.switch(Status::Draft);
    }

    pub const fn review(&mut self) {
        self.switch(Status::Review);
    }

    pub const fn rejected(&mut self) {
        self.switch(Status::Rejected);
    }

    /// Toggle the lock flag.
    pub const fn lock(&mut self) {
        self.locked = !self.locked;
    }

    #[must_use]
    pub fn can_view(&self, viewer: &Viewer) -> bool {
        status_visible(self.status, &self.authorship, None, viewer)
    }

    /// The responses of this question the viewer may see.
    #[must_use]
    pub fn visible_responses<'a>(
        &self,
        responses: &'a [Response],
        viewer: &Viewer,
    ) -> Vec<&'a Response> {
        responses
            .iter()
            .filter(|r| r.question_id == self.id && r.can_view(self, viewer))
            .collect()
    }

    /// Whether the viewer can see at least one response.
    #[must_use]
    pub fn answered(&self, responses: &[Response], viewer: &Viewer) -> bool {
        !self.visible_responses(responses, viewer).is_empty()
    }

    /// Whether the viewer can see an accepted response.
    #[must_use]
    pub fn has_accepted(&self, responses: &[Response], viewer: &Viewer) -> bool {
        self.visible_responses(responses, viewer)
            .iter()
            .any(|r| r.accepted)
    }

    /// Clear the accepted flag on every response belonging to this question.
    pub fn clear_accepted(&self, responses: &mut [Response]) {
        for response in responses.iter_mut().filter(|r| r.question_id == self.id) {
            response.accepted = false;
        }
    }

    /// Make `response_id` the one and only accepted response.
    ///
    /// Always clears first. Returns `false`, leaving nothing accepted, when
    /// the response is not among this question's responses.
    pub fn accept(&self, responses: &mut [Response], response_id: i64) -> bool {
        self.clear_accepted(responses);
        match responses
            .iter_mut()
            .find(|r| r.id == response_id && r.question_id == self.id)
        {
            Some(response) => {
                response.accepted = true;
                true
            }
            None => false,
        }
    }

    /// Mod-bar button state: the status, plus `"lock"` when locked.
    #[must_use]
    pub fn states(&self) -> Vec<&'static str> {
        let mut states = vec![self.status.as_str()];
        if self.locked {
            states.push("lock");
        }
        states
    }

    /// Permalink of this question's thread.
    #[must_use]
    pub fn url(&self, slug_urls: bool) -> String {
        thread_path(self.id, &self.title, slug_urls)
    }
}

impl KnowledgePost for Question {
    fn authorship(&self) -> &Authorship {
        &self.authorship
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
