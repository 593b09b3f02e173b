//! Cross-cutting error types for the knowledge base.
//!
//! Domain-specific errors (`DatabaseError`, `ConfigError`, `ApiError`) are
//! defined in their respective crates and wrap this one where needed.

use thiserror::Error;

/// Errors that can be raised by any knowledge base crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (length, format, required fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The viewer is not permitted to perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by entity type and id.
    #[must_use]
    pub fn not_found(entity_type: crate::enums::EntityType, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_str().to_string(),
            id: id.to_string(),
        }
    }
}
