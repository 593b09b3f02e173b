//! Knowledge base behaviour switches.

use serde::{Deserialize, Serialize};

/// Default page size for question lists.
const fn default_limit() -> u32 {
    20
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Require a signed-in viewer for every endpoint.
    #[serde(default)]
    pub login_required: bool,

    /// Allow posting without an account (name and email required).
    #[serde(default)]
    pub allow_anonymous: bool,

    /// Publish every new question and response immediately.
    #[serde(default)]
    pub auto_publicize: bool,

    /// Let any viewer respond. When false only staff and the asker may.
    #[serde(default = "default_true")]
    pub free_response: bool,

    /// Append the slugified title to article permalinks.
    #[serde(default = "default_true")]
    pub slug_urls: bool,

    /// Default value of the per-post alert flag.
    #[serde(default)]
    pub alerts: bool,

    /// Default result limit for list endpoints and commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            login_required: false,
            allow_anonymous: false,
            auto_publicize: false,
            free_response: true,
            slug_urls: true,
            alerts: false,
            default_limit: default_limit(),
        }
    }
}
