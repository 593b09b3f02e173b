use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::User;
use crate::errors::CoreError;

/// Longest accepted anonymous display name.
pub const MAX_NAME_LEN: usize = 64;

/// Ownership and contact fields shared by questions and responses.
///
/// A post is owned by `user_id` when set. Anonymous posts carry an optional
/// `name`/`email` pair instead, used for display and for alerts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Authorship {
    pub user_id: Option<i64>,
    /// Alert the author when a new response is added.
    pub alert: bool,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// The resolved author of a post: an account, or an anonymous name/email pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Author {
    User(User),
    Anonymous { name: String, email: Option<String> },
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Authorship {
    /// Authorship for a post made by a signed-in user.
    #[must_use]
    pub const fn user(user_id: i64, alert: bool) -> Self {
        Self {
            user_id: Some(user_id),
            alert,
            name: None,
            email: None,
        }
    }

    /// Authorship for an anonymous post.
    #[must_use]
    pub const fn anonymous(name: Option<String>, email: Option<String>, alert: bool) -> Self {
        Self {
            user_id: None,
            alert,
            name,
            email,
        }
    }

    /// Whether `user_id` owns this post. A post without a user has no owner.
    #[must_use]
    pub fn is_owned_by(&self, user_id: Option<i64>) -> bool {
        matches!((self.user_id, user_id), (Some(owner), Some(viewer)) if owner == viewer)
    }

    /// Whether the post is anonymous but identifies itself by name and email.
    #[must_use]
    pub fn has_anonymous_contact(&self) -> bool {
        self.user_id.is_none()
            && non_empty(self.name.as_deref()).is_some()
            && non_empty(self.email.as_deref()).is_some()
    }

    /// Whether a freshly created post is published immediately.
    ///
    /// Anonymous posts with a name and email are always published; with
    /// `auto_publicize` every new post is.
    #[must_use]
    pub fn publishes_on_create(&self, auto_publicize: bool) -> bool {
        auto_publicize || self.has_anonymous_contact()
    }

    /// Display name: local name, then the user's full name, then the
    /// username; "Anonymous" when all are blank.
    ///
    /// `user` must be the account referenced by `user_id`, if any.
    #[must_use]
    pub fn display_name(&self, user: Option<&User>) -> String {
        let name = non_empty(self.name.as_deref()).map(str::to_string).or_else(|| {
            user.map(|u| {
                let full = u.full_name();
                if full.is_empty() { u.username.clone() } else { full }
            })
        });
        match name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => "Anonymous".to_string(),
        }
    }

    /// Contact email: local email, then the user's email.
    #[must_use]
    pub fn contact_email(&self, user: Option<&User>) -> Option<String> {
        non_empty(self.email.as_deref())
            .map(str::to_string)
            .or_else(|| user.and_then(|u| non_empty(u.email.as_deref()).map(str::to_string)))
    }

    /// `(display_name, contact_email)`.
    #[must_use]
    pub fn pair(&self, user: Option<&User>) -> (String, Option<String>) {
        (self.display_name(user), self.contact_email(user))
    }

    /// The owning user if present, otherwise the anonymous name/email pair.
    #[must_use]
    pub fn user_or_pair(&self, user: Option<User>) -> Author {
        match user {
            Some(user) => Author::User(user),
            None => {
                let (name, email) = self.pair(None);
                Author::Anonymous { name, email }
            }
        }
    }

    /// Check the anonymous contact fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for an over-long name or a malformed email.
    pub fn validate(&self) -> Result<(), CoreError> {
        if non_empty(self.name.as_deref()).is_some_and(|name| name.chars().count() > MAX_NAME_LEN) {
            return Err(CoreError::Validation(format!(
                "name exceeds {MAX_NAME_LEN} characters"
            )));
        }
        if let Some(email) = non_empty(self.email.as_deref()).filter(|e| !looks_like_email(e)) {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }
        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
