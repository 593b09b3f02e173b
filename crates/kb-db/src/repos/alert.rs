//! Alert outbox. Rows are queued by `create_response`; delivery happens
//! outside this crate.

use kb_core::entities::Alert;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::KbService;

fn row_to_alert(row: &libsql::Row) -> Result<Alert, DatabaseError> {
    Ok(Alert {
        id: row.get(0)?,
        recipient: row.get(1)?,
        question_id: row.get(2)?,
        response_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl KbService {
    /// Pending alerts, oldest first.
    pub async fn list_alerts(&self, limit: u32) -> Result<Vec<Alert>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, recipient, question_id, response_id, created_at
                 FROM alerts ORDER BY created_at, id LIMIT ?1",
                [i64::from(limit)],
            )
            .await?;
        let mut alerts = Vec::new();
        while let Some(row) = rows.next().await? {
            alerts.push(row_to_alert(&row)?);
        }
        Ok(alerts)
    }

    pub async fn alerts_for_question(&self, question_id: i64) -> Result<Vec<Alert>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, recipient, question_id, response_id, created_at
                 FROM alerts WHERE question_id = ?1 ORDER BY created_at, id",
                [question_id],
            )
            .await?;
        let mut alerts = Vec::new();
        while let Some(row) = rows.next().await? {
            alerts.push(row_to_alert(&row)?);
        }
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use kb_core::entities::Authorship;

    use crate::test_support::helpers::{create_test_user, test_service};

    #[tokio::test]
    async fn responses_queue_alerts_for_subscribers() {
        let svc = test_service().await;
        let asker = create_test_user(&svc, "asker", false).await;
        let helper = create_test_user(&svc, "helper", false).await;
        let lurker = create_test_user(&svc, "lurker", false).await;

        let question = svc
            .create_question("Alerts", None, &Authorship::user(asker.id, true), &[])
            .await
            .unwrap();

        // Asker is alerted; the poster is not.
        let first = svc
            .create_response(question.id, Some("one"), &Authorship::user(helper.id, true))
            .await
            .unwrap();
        // Asker and helper are alerted; lurker opted out.
        svc.create_response(question.id, Some("two"), &Authorship::user(lurker.id, false))
            .await
            .unwrap();
        // Asker answering their own question alerts only the helper.
        svc.create_response(question.id, Some("three"), &Authorship::user(asker.id, true))
            .await
            .unwrap();

        let recipients: Vec<(i64, String)> = svc
            .alerts_for_question(question.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| (a.response_id, a.recipient))
            .collect();
        assert_eq!(recipients[0], (first.id, "asker@example.com".to_string()));
        assert_eq!(recipients.len(), 4);
        assert_eq!(
            recipients.iter().filter(|(_, r)| r == "helper@example.com").count(),
            2
        );

        assert_eq!(svc.list_alerts(2).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn anonymous_subscriber_uses_own_email() {
        let svc = test_service().await;
        let helper = create_test_user(&svc, "helper", false).await;
        let anon = Authorship::anonymous(Some("Kim".into()), Some("Kim@Example.com".into()), true);
        let question = svc.create_question("Anon asks", None, &anon, &[]).await.unwrap();

        svc.create_response(question.id, None, &Authorship::user(helper.id, false))
            .await
            .unwrap();

        let alerts = svc.alerts_for_question(question.id).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].recipient, "kim@example.com");
    }

    #[tokio::test]
    async fn deleting_question_drops_its_alerts() {
        let svc = test_service().await;
        let asker = create_test_user(&svc, "asker", false).await;
        let helper = create_test_user(&svc, "helper", false).await;
        let question = svc
            .create_question("Gone", None, &Authorship::user(asker.id, true), &[])
            .await
            .unwrap();
        svc.create_response(question.id, None, &Authorship::user(helper.id, false))
            .await
            .unwrap();

        svc.delete_question(None, question.id).await.unwrap();
        assert!(svc.list_alerts(10).await.unwrap().is_empty());
    }
}
