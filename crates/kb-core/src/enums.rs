//! Status enums, entity types, moderation actions, and audit actions.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Moderation statuses carry no transition guards: every status may be switched
//! to every other status. The per-model moderation vocabulary lives in
//! [`ModerationAction::allowed_for`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Moderation status of a question.
///
/// ```text
/// draft ⇄ review ⇄ public ⇄ rejected   (any → any)
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Public,
    #[default]
    Draft,
    Review,
    Rejected,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Public, Self::Draft, Self::Review, Self::Rejected];

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Rejected => "rejected",
        }
    }

    /// Parse a storage/URL string into a status.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ResponseStatus
// ---------------------------------------------------------------------------

/// Moderation status of a response. `Inherit` defers to the parent question.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Public,
    Draft,
    Review,
    Rejected,
    #[default]
    Inherit,
}

impl ResponseStatus {
    pub const ALL: [Self; 5] = [
        Self::Public,
        Self::Draft,
        Self::Review,
        Self::Rejected,
        Self::Inherit,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Rejected => "rejected",
            Self::Inherit => "inherit",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// The response's own status, or `None` when it inherits from its question.
    #[must_use]
    pub const fn own(self) -> Option<Status> {
        match self {
            Self::Public => Some(Status::Public),
            Self::Draft => Some(Status::Draft),
            Self::Review => Some(Status::Review),
            Self::Rejected => Some(Status::Rejected),
            Self::Inherit => None,
        }
    }
}

impl From<Status> for ResponseStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Public => Self::Public,
            Status::Draft => Self::Draft,
            Status::Review => Self::Review,
            Status::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity, used in the audit trail and the moderation URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Category,
    Question,
    Response,
    User,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Question => "question",
            Self::Response => "response",
            Self::User => "user",
        }
    }

    /// Resolve the `{model}` segment of a moderation URL.
    ///
    /// Only questions and responses are moderated.
    #[must_use]
    pub fn moderated(model: &str) -> Option<Self> {
        match model {
            "question" => Some(Self::Question),
            "response" => Some(Self::Response),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModerationAction
// ---------------------------------------------------------------------------

/// An action a staff member can apply through the moderation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Public,
    Draft,
    Review,
    Rejected,
    Inherit,
    Lock,
    ClearAccepted,
    Accept,
    Delete,
}

impl ModerationAction {
    const QUESTION: &'static [Self] = &[
        Self::Public,
        Self::Draft,
        Self::Review,
        Self::Rejected,
        Self::Lock,
        Self::ClearAccepted,
        Self::Delete,
    ];

    const RESPONSE: &'static [Self] = &[
        Self::Public,
        Self::Draft,
        Self::Review,
        Self::Rejected,
        Self::Inherit,
        Self::Accept,
        Self::Delete,
    ];

    /// Actions permitted on the given model. Non-moderated models allow none.
    #[must_use]
    pub const fn allowed_for(entity: EntityType) -> &'static [Self] {
        match entity {
            EntityType::Question => Self::QUESTION,
            EntityType::Response => Self::RESPONSE,
            EntityType::Category | EntityType::User => &[],
        }
    }

    /// Parse the `{mod}` URL segment, accepting only actions allowed for `entity`.
    #[must_use]
    pub fn parse_for(entity: EntityType, s: &str) -> Option<Self> {
        Self::allowed_for(entity)
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
    }

    /// The response status this action switches to, if it is a status switch.
    #[must_use]
    pub const fn target_status(self) -> Option<ResponseStatus> {
        match self {
            Self::Public => Some(ResponseStatus::Public),
            Self::Draft => Some(ResponseStatus::Draft),
            Self::Review => Some(ResponseStatus::Review),
            Self::Rejected => Some(ResponseStatus::Rejected),
            Self::Inherit => Some(ResponseStatus::Inherit),
            Self::Lock | Self::ClearAccepted | Self::Accept | Self::Delete => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Rejected => "rejected",
            Self::Inherit => "inherit",
            Self::Lock => "lock",
            Self::ClearAccepted => "clear_accepted",
            Self::Accept => "accept",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    StatusChanged,
    Locked,
    Unlocked,
    Accepted,
    AcceptedCleared,
    Deleted,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::StatusChanged => "status_changed",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Accepted => "accepted",
            Self::AcceptedCleared => "accepted_cleared",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
