//! User repository. Users stand in for the accounts of an upstream identity
//! provider; the server trusts the id it is handed.

use std::collections::HashMap;

use chrono::Utc;

use kb_core::entities::User;
use kb_core::enums::{AuditAction, EntityType};
use kb_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::{get_bool, get_opt_string, parse_datetime};
use crate::service::KbService;

const SELECT_COLS: &str = "id, username, first_name, last_name, email, is_staff, added";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: get_opt_string(row, 4)?,
        is_staff: get_bool(row, 5)?,
        added: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl KbService {
    pub async fn create_user(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        is_staff: bool,
    ) -> Result<User, DatabaseError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::Validation("username is required".into()).into());
        }
        if self.find_user_by_username(username).await?.is_some() {
            return Err(CoreError::Validation(format!("username '{username}' is taken")).into());
        }

        let now = Utc::now();
        let _guard = self.write_guard().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                "INSERT INTO users (username, first_name, last_name, email, is_staff, added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id",
                libsql::params![
                    username,
                    first_name.trim(),
                    last_name.trim(),
                    email.map(str::trim).filter(|e| !e.is_empty()),
                    i64::from(is_staff),
                    now.to_rfc3339()
                ],
            )
            .await?;
        let id: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
        drop(rows);

        self.audit(EntityType::User, id, AuditAction::Created, None, None)
            .await?;
        tracing::info!(user_id = id, username, is_staff, "user created");

        self.get_user(id).await
    }

    pub async fn get_user(&self, id: i64) -> Result<User, DatabaseError> {
        self.find_user(id)
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::User, id).into())
    }

    /// Like [`Self::get_user`] but `None` when the id is unknown.
    pub async fn find_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE username = ?1"),
                [username],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM users ORDER BY username"), ())
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// Load the given users keyed by id. Unknown ids are skipped.
    pub async fn users_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, User>, DatabaseError> {
        let mut users = HashMap::new();
        for &id in ids {
            if users.contains_key(&id) {
                continue;
            }
            if let Some(user) = self.find_user(id).await? {
                users.insert(id, user);
            }
        }
        Ok(users)
    }
}
