use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};

/// An append-only record of a mutation or moderation action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditEntry {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub action: AuditAction,
    /// The acting user, `None` for anonymous submissions and CLI maintenance.
    pub actor_id: Option<i64>,
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
