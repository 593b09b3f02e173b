//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! provide schema validation for the most common detail shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
}

/// Detail for `AuditAction::Accepted`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AcceptedDetail {
    pub question_id: i64,
    pub response_id: i64,
}

/// Detail for `AuditAction::Created`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedDetail {
    pub status: String,
    /// Set for responses: the question responded to.
    pub question_id: Option<i64>,
}
