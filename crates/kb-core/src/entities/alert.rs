use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A queued notification that a question received a new response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Alert {
    pub id: i64,
    pub recipient: String,
    pub question_id: i64,
    pub response_id: i64,
    pub created_at: DateTime<Utc>,
}
