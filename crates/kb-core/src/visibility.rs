//! Visibility rules for moderated posts.
//!
//! Rules are checked in a fixed order:
//!
//! ```text
//! inherit          → ask the parent question
//! review, rejected → staff
//! draft            → owner, staff, or (responses) the question's owner
//! public           → everyone
//! ```
//!
//! Everything here is a pure function of status, ownership, and the viewer.

use serde::{Deserialize, Serialize};

use crate::entities::{Authorship, User};
use crate::enums::Status;

/// The (possibly anonymous) user a visibility check is made for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: Option<i64>,
    pub is_staff: bool,
}

impl Viewer {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            is_staff: false,
        }
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            user_id: Some(user.id),
            is_staff: user.is_staff,
        }
    }
}

/// Something that carries an owner and can be shown or hidden.
pub trait KnowledgePost {
    fn authorship(&self) -> &Authorship;

    /// Whether the viewer owns this post.
    fn is_owned_by(&self, viewer: &Viewer) -> bool {
        self.authorship().is_owned_by(viewer.user_id)
    }
}

/// Apply the non-inherit rules to a concrete status.
///
/// `question_owner` is the parent question's authorship when checking a
/// response, so the asker can see drafts posted to their question.
#[must_use]
pub fn status_visible(
    status: Status,
    owner: &Authorship,
    question_owner: Option<&Authorship>,
    viewer: &Viewer,
) -> bool {
    match status {
        Status::Review | Status::Rejected => viewer.is_staff,
        Status::Draft => {
            owner.is_owned_by(viewer.user_id)
                || viewer.is_staff
                || question_owner.is_some_and(|q| q.is_owned_by(viewer.user_id))
        }
        Status::Public => true,
    }
}
