//! Response repository: create (with the locked check and alert outbox),
//! status switches, the accept workflow, delete.

use chrono::Utc;

use kb_core::alerts::{Subscriber, alert_recipients};
use kb_core::audit_detail::{AcceptedDetail, CreatedDetail, StatusChangedDetail};
use kb_core::entities::{Authorship, Question, Response};
use kb_core::enums::{AuditAction, EntityType, ResponseStatus};
use kb_core::errors::CoreError;
use kb_core::visibility::{KnowledgePost, Viewer};

use crate::error::DatabaseError;
use crate::helpers::{get_authorship, get_bool, get_opt_string, parse_datetime, parse_enum, to_json};
use crate::service::KbService;

const SELECT_COLS: &str =
    "id, question_id, body, status, accepted, user_id, alert, name, email, added, lastchanged";

fn row_to_response(row: &libsql::Row) -> Result<Response, DatabaseError> {
    Ok(Response {
        id: row.get(0)?,
        question_id: row.get(1)?,
        body: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        accepted: get_bool(row, 4)?,
        authorship: get_authorship(row, 5)?,
        added: parse_datetime(&row.get::<String>(9)?)?,
        lastchanged: parse_datetime(&row.get::<String>(10)?)?,
    })
}

impl KbService {
    /// Whether `viewer` may post a response to `question`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the viewer cannot see the question, `InvalidState` when
    /// it is locked, `Forbidden` when posting rules exclude the viewer.
    pub fn check_can_respond(&self, question: &Question, viewer: &Viewer) -> Result<(), DatabaseError> {
        if !question.can_view(viewer) {
            return Err(CoreError::not_found(EntityType::Question, question.id).into());
        }
        if question.locked {
            return Err(DatabaseError::InvalidState(format!(
                "question {} is locked",
                question.id
            )));
        }
        let settings = self.settings();
        if viewer.is_anonymous() && !settings.allow_anonymous {
            return Err(CoreError::Forbidden("anonymous responses are disabled".into()).into());
        }
        if !settings.free_response && !viewer.is_staff && !question.is_owned_by(viewer) {
            return Err(CoreError::Forbidden(
                "only staff and the question's author may respond".into(),
            )
            .into());
        }
        Ok(())
    }

    /// Create a response and queue alerts for subscribed participants.
    ///
    /// Posting rules are the caller's concern (see [`Self::check_can_respond`]);
    /// only the lock is enforced here.
    pub async fn create_response(
        &self,
        question_id: i64,
        body: Option<&str>,
        authorship: &Authorship,
    ) -> Result<Response, DatabaseError> {
        authorship.validate()?;
        let question = self.get_question(question_id).await?;
        if question.locked {
            return Err(DatabaseError::InvalidState(format!(
                "question {question_id} is locked"
            )));
        }
        let body = body.map(str::trim).filter(|b| !b.is_empty());

        let status = if authorship.publishes_on_create(self.settings().auto_publicize) {
            ResponseStatus::Public
        } else {
            ResponseStatus::default()
        };

        let earlier = self.list_responses(question_id).await?;
        let author_ids: Vec<i64> = question
            .authorship
            .user_id
            .into_iter()
            .chain(earlier.iter().filter_map(|r| r.authorship.user_id))
            .chain(authorship.user_id)
            .collect();
        let users = self.users_by_ids(&author_ids).await?;
        let recipients = {
            let subscriber =
                |a: &Authorship| Subscriber::new(a, a.user_id.and_then(|id| users.get(&id)));
            let responders: Vec<Subscriber> =
                earlier.iter().map(|r| subscriber(&r.authorship)).collect();
            alert_recipients(
                &subscriber(&question.authorship),
                &responders,
                &subscriber(authorship),
            )
        };

        let now = Utc::now();
        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;

        let mut rows = tx
            .query(
                "INSERT INTO responses (question_id, body, status, user_id, alert, name, email, added, lastchanged)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING id",
                libsql::params![
                    question_id,
                    body,
                    status.as_str(),
                    authorship.user_id,
                    i64::from(authorship.alert),
                    authorship.name.as_deref(),
                    authorship.email.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        let id: i64 = rows.next().await?.ok_or(DatabaseError::NoResult)?.get(0)?;
        drop(rows);

        for recipient in &recipients {
            tx.execute(
                "INSERT INTO alerts (recipient, question_id, response_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![recipient.as_str(), question_id, id, now.to_rfc3339()],
            )
            .await?;
        }

        let detail = CreatedDetail {
            status: status.as_str().to_string(),
            question_id: Some(question_id),
        };
        self.audit(
            EntityType::Response,
            id,
            AuditAction::Created,
            authorship.user_id,
            Some(to_json(&detail)?),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(
            response_id = id,
            question_id,
            status = %status,
            alerts = recipients.len(),
            "response created"
        );

        Ok(Response {
            id,
            question_id,
            body: body.map(String::from),
            status,
            accepted: false,
            authorship: authorship.clone(),
            added: now,
            lastchanged: now,
        })
    }

    pub async fn get_response(&self, id: i64) -> Result<Response, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM responses WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Response, id))?;
        row_to_response(&row)
    }

    /// All responses of a question, oldest first. Visibility is not applied.
    pub async fn list_responses(&self, question_id: i64) -> Result<Vec<Response>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM responses WHERE question_id = ?1 ORDER BY added, id"
                ),
                [question_id],
            )
            .await?;
        let mut responses = Vec::new();
        while let Some(row) = rows.next().await? {
            responses.push(row_to_response(&row)?);
        }
        Ok(responses)
    }

    /// Persisting counterpart of `Response::switch`.
    pub async fn switch_response_status(
        &self,
        actor_id: Option<i64>,
        id: i64,
        status: ResponseStatus,
    ) -> Result<Response, DatabaseError> {
        let mut response = self.get_response(id).await?;
        let from = response.status;
        response.switch(status);
        response.lastchanged = Utc::now();

        let _guard = self.write_guard().await;
        self.db()
            .conn()
            .execute(
                "UPDATE responses SET status = ?1, lastchanged = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), response.lastchanged.to_rfc3339(), id],
            )
            .await?;

        let detail = StatusChangedDetail {
            from: from.as_str().to_string(),
            to: status.as_str().to_string(),
        };
        self.audit(
            EntityType::Response,
            id,
            AuditAction::StatusChanged,
            actor_id,
            Some(to_json(&detail)?),
        )
        .await?;
        tracing::info!(response_id = id, %from, to = %status, "response status switched");

        Ok(response)
    }

    /// Persisting counterpart of `Question::accept`.
    ///
    /// Clears every accepted flag on the question, then accepts `response_id`
    /// if it belongs to the question. Returns whether it did; a foreign
    /// response leaves nothing accepted.
    pub async fn accept_response(
        &self,
        actor_id: Option<i64>,
        question_id: i64,
        response_id: i64,
    ) -> Result<bool, DatabaseError> {
        let question = self.get_question(question_id).await?;
        let mut responses = self.list_responses(question_id).await?;
        let applied = question.accept(&mut responses, response_id);
        let now = Utc::now();

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute(
            "UPDATE responses SET accepted = 0 WHERE question_id = ?1 AND accepted = 1",
            [question_id],
        )
        .await?;

        if applied {
            tx.execute(
                "UPDATE responses SET accepted = 1, lastchanged = ?1 WHERE id = ?2 AND question_id = ?3",
                libsql::params![now.to_rfc3339(), response_id, question_id],
            )
            .await?;
            let detail = AcceptedDetail {
                question_id,
                response_id,
            };
            self.audit(
                EntityType::Response,
                response_id,
                AuditAction::Accepted,
                actor_id,
                Some(to_json(&detail)?),
            )
            .await?;
        } else {
            self.audit(
                EntityType::Question,
                question_id,
                AuditAction::AcceptedCleared,
                actor_id,
                None,
            )
            .await?;
        }

        tx.commit().await?;
        tracing::info!(question_id, response_id, applied, "accept");
        Ok(applied)
    }

    /// Persisting counterpart of `Response::accept`: accept within its own
    /// question.
    pub async fn accept_response_by_id(
        &self,
        actor_id: Option<i64>,
        response_id: i64,
    ) -> Result<bool, DatabaseError> {
        let response = self.get_response(response_id).await?;
        self.accept_response(actor_id, response.question_id, response_id)
            .await
    }

    /// Persisting counterpart of `Question::clear_accepted`.
    pub async fn clear_accepted(
        &self,
        actor_id: Option<i64>,
        question_id: i64,
    ) -> Result<(), DatabaseError> {
        self.get_question(question_id).await?;
        let _guard = self.write_guard().await;
        self.db()
            .conn()
            .execute(
                "UPDATE responses SET accepted = 0 WHERE question_id = ?1 AND accepted = 1",
                [question_id],
            )
            .await?;
        self.audit(
            EntityType::Question,
            question_id,
            AuditAction::AcceptedCleared,
            actor_id,
            None,
        )
        .await?;
        tracing::info!(question_id, "accepted response cleared");
        Ok(())
    }

    pub async fn delete_response(&self, actor_id: Option<i64>, id: i64) -> Result<Response, DatabaseError> {
        let response = self.get_response(id).await?;

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM responses WHERE id = ?1", [id]).await?;
        self.audit(EntityType::Response, id, AuditAction::Deleted, actor_id, None)
            .await?;
        tx.commit().await?;

        tracing::info!(response_id = id, question_id = response.question_id, "response deleted");
        Ok(response)
    }
}
