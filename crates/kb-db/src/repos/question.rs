//! Question repository: create with categories, visibility-filtered listing,
//! FTS search, status switches, lock toggle, hits, delete.

use chrono::Utc;

use kb_core::audit_detail::{CreatedDetail, StatusChangedDetail};
use kb_core::entities::{Authorship, Category, Question};
use kb_core::enums::{AuditAction, EntityType, Status};
use kb_core::errors::CoreError;
use kb_core::visibility::Viewer;

use crate::error::DatabaseError;
use crate::helpers::{
    fts_query, get_authorship, get_bool, get_opt_string, parse_datetime, parse_enum, to_json,
};
use crate::service::KbService;

const SELECT_COLS: &str = "q.id, q.title, q.body, q.status, q.locked, q.recommended, q.hits, \
     q.user_id, q.alert, q.name, q.email, q.added, q.lastchanged";

/// Rows the viewer may see, mirroring `Question::can_view`.
/// `?{staff}` binds the staff flag, `?{viewer}` the viewer's user id.
fn visibility_clause(staff: usize, viewer: usize) -> String {
    format!(
        "(q.status = 'public' OR ?{staff} = 1 \
         OR (q.status = 'draft' AND q.user_id IS NOT NULL AND q.user_id = ?{viewer}))"
    )
}

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    let hits = row.get::<i64>(6)?;
    Ok(Question {
        id: row.get(0)?,
        title: row.get(1)?,
        body: get_opt_string(row, 2)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        locked: get_bool(row, 4)?,
        recommended: get_bool(row, 5)?,
        hits: u32::try_from(hits)
            .map_err(|_| DatabaseError::InvalidState(format!("hit counter out of range: {hits}")))?,
        authorship: get_authorship(row, 7)?,
        categories: Vec::new(),
        added: parse_datetime(&row.get::<String>(11)?)?,
        lastchanged: parse_datetime(&row.get::<String>(12)?)?,
    })
}

/// Criteria for question listings.
#[derive(Debug, Default, Clone)]
pub struct QuestionFilter {
    pub category_id: Option<i64>,
    /// Free-text search over title and body.
    pub query: Option<String>,
    /// Falls back to `general.default_limit`.
    pub limit: Option<u32>,
}

impl KbService {
    /// Create a question, assigning its initial status and categories in one
    /// transaction.
    pub async fn create_question(
        &self,
        title: &str,
        body: Option<&str>,
        authorship: &Authorship,
        category_ids: &[i64],
    ) -> Result<Question, DatabaseError> {
        Question::validate_title(title)?;
        authorship.validate()?;
        let title = title.trim();
        let body = body.map(str::trim).filter(|b| !b.is_empty());

        let mut categories: Vec<Category> = Vec::with_capacity(category_ids.len());
        for &category_id in category_ids {
            if categories.iter().any(|c| c.id == category_id) {
                continue;
            }
            match self.get_category(category_id).await {
                Ok(category) => categories.push(category),
                Err(e) if e.is_not_found() => {
                    return Err(
                        CoreError::Validation(format!("unknown category {category_id}")).into(),
                    );
                }
                Err(e) => return Err(e),
            }
        }
        categories.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        let status = if authorship.publishes_on_create(self.settings().auto_publicize) {
            Status::Public
        } else {
            Status::default()
        };
        let now = Utc::now();

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;

        let mut rows = tx
            .query(
                "INSERT INTO questions (title, body, status, user_id, alert, name, email, added, lastchanged)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING id",
                libsql::params![
                    title,
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

        for category in &categories {
            tx.execute(
                "INSERT INTO question_categories (question_id, category_id) VALUES (?1, ?2)",
                libsql::params![id, category.id],
            )
            .await?;
        }

        let detail = CreatedDetail {
            status: status.as_str().to_string(),
            question_id: None,
        };
        self.audit(
            EntityType::Question,
            id,
            AuditAction::Created,
            authorship.user_id,
            Some(to_json(&detail)?),
        )
        .await?;

        tx.commit().await?;
        tracing::info!(question_id = id, status = %status, "question created");

        Ok(Question {
            id,
            title: title.to_string(),
            body: body.map(String::from),
            status,
            locked: false,
            recommended: false,
            hits: 0,
            authorship: authorship.clone(),
            categories,
            added: now,
            lastchanged: now,
        })
    }

    pub async fn get_question(&self, id: i64) -> Result<Question, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM questions q WHERE q.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| CoreError::not_found(EntityType::Question, id))?;
        let mut question = row_to_question(&row)?;
        drop(rows);
        question.categories = self.categories_for_question(id).await?;
        Ok(question)
    }

    /// Questions the viewer can see, newest first (or by relevance when
    /// searching).
    pub async fn list_questions(
        &self,
        viewer: &Viewer,
        filter: &QuestionFilter,
    ) -> Result<Vec<Question>, DatabaseError> {
        let mut params: Vec<libsql::Value> = vec![
            libsql::Value::Integer(i64::from(viewer.is_staff)),
            viewer
                .user_id
                .map_or(libsql::Value::Null, libsql::Value::Integer),
        ];
        let mut conditions = vec![visibility_clause(1, 2)];
        let mut join = "";
        let mut order = "q.added DESC, q.id DESC";

        if let Some(category_id) = filter.category_id {
            params.push(libsql::Value::Integer(category_id));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM question_categories qc \
                 WHERE qc.question_id = q.id AND qc.category_id = ?{})",
                params.len()
            ));
        }
        if let Some(query) = filter.query.as_deref().and_then(fts_query) {
            params.push(libsql::Value::Text(query));
            join = "JOIN questions_fts ON questions_fts.rowid = q.id";
            conditions.push(format!("questions_fts MATCH ?{}", params.len()));
            order = "questions_fts.rank, q.added DESC";
        }

        let limit = filter.limit.unwrap_or(self.settings().default_limit);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM questions q {join} WHERE {} ORDER BY {order} LIMIT {limit}",
            conditions.join(" AND ")
        );
        tracing::debug!(%sql, "listing questions");

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut questions = Vec::new();
        while let Some(row) = rows.next().await? {
            questions.push(row_to_question(&row)?);
        }
        drop(rows);

        questions.retain(|q| q.can_view(viewer));
        for question in &mut questions {
            question.categories = self.categories_for_question(question.id).await?;
        }
        Ok(questions)
    }

    /// Count one view of the thread.
    pub async fn increment_hits(&self, id: i64) -> Result<(), DatabaseError> {
        let _guard = self.write_guard().await;
        let changed = self
            .db()
            .conn()
            .execute("UPDATE questions SET hits = hits + 1 WHERE id = ?1", [id])
            .await?;
        if changed == 0 {
            return Err(CoreError::not_found(EntityType::Question, id).into());
        }
        Ok(())
    }

    /// Persisting counterpart of `Question::switch`.
    pub async fn switch_question_status(
        &self,
        actor_id: Option<i64>,
        id: i64,
        status: Status,
    ) -> Result<Question, DatabaseError> {
        let mut question = self.get_question(id).await?;
        let from = question.status;
        question.switch(status);
        question.lastchanged = Utc::now();

        let _guard = self.write_guard().await;
        self.db()
            .conn()
            .execute(
                "UPDATE questions SET status = ?1, lastchanged = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), question.lastchanged.to_rfc3339(), id],
            )
            .await?;

        let detail = StatusChangedDetail {
            from: from.as_str().to_string(),
            to: status.as_str().to_string(),
        };
        self.audit(
            EntityType::Question,
            id,
            AuditAction::StatusChanged,
            actor_id,
            Some(to_json(&detail)?),
        )
        .await?;
        tracing::info!(question_id = id, %from, to = %status, "question status switched");

        Ok(question)
    }

    /// Persisting counterpart of `Question::lock`: toggles the lock flag.
    pub async fn toggle_question_lock(
        &self,
        actor_id: Option<i64>,
        id: i64,
    ) -> Result<Question, DatabaseError> {
        let mut question = self.get_question(id).await?;
        question.lock();
        question.lastchanged = Utc::now();

        let _guard = self.write_guard().await;
        self.db()
            .conn()
            .execute(
                "UPDATE questions SET locked = ?1, lastchanged = ?2 WHERE id = ?3",
                libsql::params![
                    i64::from(question.locked),
                    question.lastchanged.to_rfc3339(),
                    id
                ],
            )
            .await?;

        let action = if question.locked {
            AuditAction::Locked
        } else {
            AuditAction::Unlocked
        };
        self.audit(EntityType::Question, id, action, actor_id, None)
            .await?;
        tracing::info!(question_id = id, locked = question.locked, "question lock toggled");

        Ok(question)
    }

    /// Delete a question; its responses and queued alerts go with it.
    pub async fn delete_question(&self, actor_id: Option<i64>, id: i64) -> Result<(), DatabaseError> {
        let question = self.get_question(id).await?;

        let _guard = self.write_guard().await;
        let tx = self.db().conn().transaction().await?;
        tx.execute("DELETE FROM questions WHERE id = ?1", [id]).await?;
        self.audit(EntityType::Question, id, AuditAction::Deleted, actor_id, None)
            .await?;
        tx.commit().await?;

        tracing::info!(question_id = id, title = %question.title, "question deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use kb_config::GeneralConfig;

    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        create_test_question, create_test_user, test_service, test_service_with,
    };

    #[tokio::test]
    async fn create_question_roundtrip() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "asker", false).await;
        let cat = svc.create_category("Accounts", None).await.unwrap();

        let question = svc
            .create_question(
                "  How do I reset my password?  ",
                Some("I forgot it."),
                &Authorship::user(owner.id, true),
                &[cat.id, cat.id],
            )
            .await
            .unwrap();

        assert_eq!(question.title, "How do I reset my password?");
        assert_eq!(question.status, Status::Draft);
        assert_eq!(question.categories.len(), 1);
        assert!(question.authorship.alert);

        let fetched = svc.get_question(question.id).await.unwrap();
        assert_eq!(fetched.title, question.title);
        assert_eq!(fetched.body.as_deref(), Some("I forgot it."));
        assert_eq!(fetched.categories, question.categories);
        assert_eq!(fetched.authorship, question.authorship);
    }

    #[tokio::test]
    async fn anonymous_with_contact_publishes_on_create() {
        let svc = test_service().await;
        let anon = Authorship::anonymous(
            Some("Grace".into()),
            Some("grace@example.com".into()),
            false,
        );
        let question = svc
            .create_question("Anonymous question", None, &anon, &[])
            .await
            .unwrap();
        assert_eq!(question.status, Status::Public);

        // Name only is not enough.
        let nameless = Authorship::anonymous(Some("Grace".into()), None, false);
        let question = svc
            .create_question("Half anonymous", None, &nameless, &[])
            .await
            .unwrap();
        assert_eq!(question.status, Status::Draft);
    }

    #[tokio::test]
    async fn auto_publicize_publishes_every_new_question() {
        let svc = test_service_with(GeneralConfig {
            auto_publicize: true,
            ..GeneralConfig::default()
        })
        .await;
        let owner = create_test_user(&svc, "asker", false).await;
        let question = create_test_question(&svc, &owner, "Auto").await;
        assert_eq!(question.status, Status::Public);

        // Only creation is affected.
        let drafted = svc
            .switch_question_status(None, question.id, Status::Draft)
            .await
            .unwrap();
        assert_eq!(drafted.status, Status::Draft);
        assert_eq!(svc.get_question(question.id).await.unwrap().status, Status::Draft);
    }

    #[tokio::test]
    async fn invalid_input_rejected() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "asker", false).await;
        let authorship = Authorship::user(owner.id, false);

        let blank = svc.create_question("   ", None, &authorship, &[]).await;
        assert!(matches!(blank, Err(DatabaseError::Core(CoreError::Validation(_)))));

        let unknown_cat = svc.create_question("Title", None, &authorship, &[77]).await;
        assert!(matches!(unknown_cat, Err(DatabaseError::Core(CoreError::Validation(_)))));

        let bad_email = Authorship::anonymous(Some("x".into()), Some("not-an-email".into()), false);
        let result = svc.create_question("Title", None, &bad_email, &[]).await;
        assert!(matches!(result, Err(DatabaseError::Core(CoreError::Validation(_)))));
    }

    #[tokio::test]
    async fn listing_respects_visibility() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner", false).await;
        let other = create_test_user(&svc, "other", false).await;
        let staff = create_test_user(&svc, "staff", true).await;

        let draft = create_test_question(&svc, &owner, "Draft question").await;
        let public = create_test_question(&svc, &owner, "Public question").await;
        svc.switch_question_status(None, public.id, Status::Public)
            .await
            .unwrap();
        let review = create_test_question(&svc, &owner, "Review question").await;
        svc.switch_question_status(None, review.id, Status::Review)
            .await
            .unwrap();

        let ids = |qs: Vec<Question>| qs.into_iter().map(|q| q.id).collect::<Vec<_>>();
        let filter = QuestionFilter::default();

        let anon = ids(svc.list_questions(&Viewer::anonymous(), &filter).await.unwrap());
        assert_eq!(anon, vec![public.id]);

        let other_ids = ids(svc.list_questions(&Viewer::from(&other), &filter).await.unwrap());
        assert_eq!(other_ids, vec![public.id]);

        let mut owner_ids = ids(svc.list_questions(&Viewer::from(&owner), &filter).await.unwrap());
        owner_ids.sort_unstable();
        assert_eq!(owner_ids, vec![draft.id, public.id]);

        let staff_ids = ids(svc.list_questions(&Viewer::from(&staff), &filter).await.unwrap());
        assert_eq!(staff_ids.len(), 3);
    }

    #[tokio::test]
    async fn listing_by_category_search_and_limit() {
        let svc = test_service().await;
        let staff = create_test_user(&svc, "staff", true).await;
        let viewer = Viewer::from(&staff);
        let billing = svc.create_category("Billing", None).await.unwrap();
        let authorship = Authorship::user(staff.id, false);

        let invoice = svc
            .create_question("Invoice missing", Some("Where is my invoice?"), &authorship, &[billing.id])
            .await
            .unwrap();
        svc.create_question("Password reset", Some("Locked out of login"), &authorship, &[])
            .await
            .unwrap();
        svc.create_question("Refund policy", Some("Money back"), &authorship, &[billing.id])
            .await
            .unwrap();

        let in_billing = svc
            .list_questions(
                &viewer,
                &QuestionFilter {
                    category_id: Some(billing.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(in_billing.len(), 2);

        let found = svc
            .list_questions(
                &viewer,
                &QuestionFilter {
                    query: Some("invoice".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, invoice.id);
        assert_eq!(found[0].categories[0].slug, "billing");

        // Punctuation in a query must not break FTS parsing.
        let odd = svc
            .list_questions(
                &viewer,
                &QuestionFilter {
                    query: Some("\"invoice -(".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(odd.is_ok());

        let limited = svc
            .list_questions(
                &viewer,
                &QuestionFilter {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn hits_lock_and_delete() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner", false).await;
        let staff = create_test_user(&svc, "staff", true).await;
        let question = create_test_question(&svc, &owner, "Counting").await;

        svc.increment_hits(question.id).await.unwrap();
        svc.increment_hits(question.id).await.unwrap();
        assert_eq!(svc.get_question(question.id).await.unwrap().hits, 2);
        assert!(svc.increment_hits(999).await.unwrap_err().is_not_found());

        let locked = svc
            .toggle_question_lock(Some(staff.id), question.id)
            .await
            .unwrap();
        assert!(locked.locked);
        assert_eq!(locked.states(), vec!["draft", "lock"]);
        let unlocked = svc
            .toggle_question_lock(Some(staff.id), question.id)
            .await
            .unwrap();
        assert!(!unlocked.locked);

        svc.delete_question(Some(staff.id), question.id).await.unwrap();
        assert!(svc.get_question(question.id).await.unwrap_err().is_not_found());

        let trail = svc
            .query_audit(&AuditFilter {
                entity_type: Some(EntityType::Question),
                entity_id: Some(question.id),
                ..Default::default()
            })
            .await
            .unwrap();
        let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
        assert!(actions.contains(&AuditAction::Created));
        assert!(actions.contains(&AuditAction::Locked));
        assert!(actions.contains(&AuditAction::Unlocked));
        assert!(actions.contains(&AuditAction::Deleted));
    }

    #[tokio::test]
    async fn status_switch_records_from_and_to() {
        let svc = test_service().await;
        let owner = create_test_user(&svc, "owner", false).await;
        let question = create_test_question(&svc, &owner, "Moderated").await;

        svc.switch_question_status(Some(owner.id), question.id, Status::Rejected)
            .await
            .unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                action: Some(AuditAction::StatusChanged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].detail,
            Some(serde_json::json!({"from": "draft", "to": "rejected"}))
        );
    }
}
