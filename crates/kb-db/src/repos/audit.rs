//! Audit trail repository.
//!
//! Append-only entries recording every mutation, with dynamic filtering.

use chrono::Utc;

use kb_core::entities::AuditEntry;
use kb_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::KbService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub actor_id: Option<i64>,
    pub limit: Option<u32>,
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        actor_id: row.get::<Option<i64>>(4)?,
        detail: parse_optional_json(get_opt_string(row, 5)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl KbService {
    /// Append an audit entry. `entry.id` is ignored; the stored id is returned.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn append_audit(&self, entry: &AuditEntry) -> Result<i64, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO audit_trail (entity_type, entity_id, action, actor_id, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id",
                libsql::params![
                    entry.entity_type.as_str(),
                    entry.entity_id,
                    entry.action.as_str(),
                    entry.actor_id,
                    entry.detail.as_ref().map(std::string::ToString::to_string),
                    entry.created_at.to_rfc3339()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// Shorthand used by the repos: record `action` on an entity now.
    pub(crate) async fn audit(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        action: AuditAction,
        actor_id: Option<i64>,
        detail: Option<serde_json::Value>,
    ) -> Result<(), DatabaseError> {
        self.append_audit(&AuditEntry {
            id: 0,
            entity_type,
            entity_id,
            action,
            actor_id,
            detail,
            created_at: Utc::now(),
        })
        .await?;
        Ok(())
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(eid) = filter.entity_id {
            params.push(libsql::Value::Integer(eid));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }
        if let Some(actor) = filter.actor_id {
            params.push(libsql::Value::Integer(actor));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, actor_id, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, id DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}
