//! Staff moderation: `/moderate/{model}/{lookup_id}/{mod}/`.
//!
//! Dispatches a model/action pair to the persisting status, lock, accept and
//! delete operations. Every action lands in the audit trail through them.

use kb_core::enums::{EntityType, ModerationAction};
use kb_core::errors::CoreError;
use kb_core::responses::ModerateResponse;
use kb_core::visibility::Viewer;

use crate::error::DatabaseError;
use crate::service::KbService;

/// Where a client lands after deleting a question.
const LIST_PATH: &str = "/articles/";

impl KbService {
    /// Apply moderation action `action` to `model` `id` on behalf of `viewer`.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-staff viewers; `NotFound` for an unknown model, an
    /// action the model does not allow, or a missing row.
    pub async fn moderate(
        &self,
        viewer: &Viewer,
        model: &str,
        id: i64,
        action: &str,
    ) -> Result<ModerateResponse, DatabaseError> {
        if !viewer.is_staff {
            tracing::warn!(user_id = ?viewer.user_id, model, id, action, "moderation refused");
            return Err(CoreError::Forbidden("moderation requires staff".into()).into());
        }
        let entity = EntityType::moderated(model).ok_or_else(|| CoreError::NotFound {
            entity_type: "model".into(),
            id: model.to_string(),
        })?;
        let action = ModerationAction::parse_for(entity, action).ok_or_else(|| {
            CoreError::NotFound {
                entity_type: format!("{entity} action"),
                id: action.to_string(),
            }
        })?;

        match entity {
            EntityType::Question => self.moderate_question(viewer, id, action).await,
            _ => self.moderate_response(viewer, id, action).await,
        }
    }

    async fn moderate_question(
        &self,
        viewer: &Viewer,
        id: i64,
        action: ModerationAction,
    ) -> Result<ModerateResponse, DatabaseError> {
        let slug_urls = self.settings().slug_urls;
        let actor = viewer.user_id;

        let redirect = match action {
            ModerationAction::Lock => self.toggle_question_lock(actor, id).await?.url(slug_urls),
            ModerationAction::ClearAccepted => {
                self.clear_accepted(actor, id).await?;
                self.get_question(id).await?.url(slug_urls)
            }
            ModerationAction::Delete => {
                self.delete_question(actor, id).await?;
                LIST_PATH.to_string()
            }
            other => {
                let status = other.target_status().and_then(|s| s.own()).ok_or_else(|| {
                    DatabaseError::InvalidState(format!("'{other}' is not a question status"))
                })?;
                self.switch_question_status(actor, id, status)
                    .await?
                    .url(slug_urls)
            }
        };

        Ok(ModerateResponse {
            model: EntityType::Question,
            id,
            action,
            applied: true,
            redirect,
        })
    }

    async fn moderate_response(
        &self,
        viewer: &Viewer,
        id: i64,
        action: ModerationAction,
    ) -> Result<ModerateResponse, DatabaseError> {
        let actor = viewer.user_id;
        let response = self.get_response(id).await?;
        let question = self.get_question(response.question_id).await?;
        let redirect = question.url(self.settings().slug_urls);

        let applied = match action {
            ModerationAction::Accept => self.accept_response_by_id(actor, id).await?,
            ModerationAction::Delete => {
                self.delete_response(actor, id).await?;
                true
            }
            other => {
                let status = other.target_status().ok_or_else(|| {
                    DatabaseError::InvalidState(format!("'{other}' is not a response status"))
                })?;
                self.switch_response_status(actor, id, status).await?;
                true
            }
        };

        Ok(ModerateResponse {
            model: EntityType::Response,
            id,
            action,
            applied,
            redirect,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use kb_core::enums::{AuditAction, ResponseStatus, Status};

    use super::*;
    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{
        create_test_question, create_test_response, create_test_user, test_service,
    };

    #[tokio::test]
    async fn non_staff_is_forbidden() {
        let svc = test_service().await;
        let user = create_test_user(&svc, "user", false).await;
        let question = create_test_question(&svc, &user, "Mine").await;

        let err = svc
            .moderate(&Viewer::from(&user), "question", question.id, "public")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Core(CoreError::Forbidden(_))));
        assert_eq!(svc.get_question(question.id).await.unwrap().status, Status::Draft);
    }

    #[tokio::test]
    async fn unknown_model_or_action_is_not_found() {
        let svc = test_service().await;
        let staff = create_test_user(&svc, "staff", true).await;
        let viewer = Viewer::from(&staff);
        let question = create_test_question(&svc, &staff, "Q").await;

        for (model, action) in [
            ("category", "public"),
            ("question", "inherit"),
            ("question", "accept"),
            ("response", "lock"),
            ("question", "explode"),
        ] {
            let err = svc
                .moderate(&viewer, model, question.id, action)
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{model}/{action} should be not found");
        }

        let missing = svc.moderate(&viewer, "question", 999, "public").await.unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn question_actions() {
        let svc = test_service().await;
        let staff = create_test_user(&svc, "staff", true).await;
        let viewer = Viewer::from(&staff);
        let question = create_test_question(&svc, &staff, "Needs review").await;

        let result = svc
            .moderate(&viewer, "question", question.id, "public")
            .await
            .unwrap();
        assert!(result.applied);
        assert_eq!(result.redirect, format!("/articles/{}/needs-review/", question.id));
        assert_eq!(svc.get_question(question.id).await.unwrap().status, Status::Public);

        svc.moderate(&viewer, "question", question.id, "lock")
            .await
            .unwrap();
        assert!(svc.get_question(question.id).await.unwrap().locked);

        let deleted = svc
            .moderate(&viewer, "question", question.id, "delete")
            .await
            .unwrap();
        assert_eq!(deleted.redirect, "/articles/");

        let trail = svc
            .query_audit(&AuditFilter {
                actor_id: Some(staff.id),
                entity_type: Some(EntityType::Question),
                ..Default::default()
            })
            .await
            .unwrap();
        let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
        assert!(actions.contains(&AuditAction::StatusChanged));
        assert!(actions.contains(&AuditAction::Locked));
        assert!(actions.contains(&AuditAction::Deleted));
    }

    #[tokio::test]
    async fn response_actions() {
        let svc = test_service().await;
        let staff = create_test_user(&svc, "staff", true).await;
        let viewer = Viewer::from(&staff);
        let question = create_test_question(&svc, &staff, "Answers").await;
        let response = create_test_response(&svc, question.id, &staff).await;

        let accepted = svc
            .moderate(&viewer, "response", response.id, "accept")
            .await
            .unwrap();
        assert!(accepted.applied);
        assert!(svc.get_response(response.id).await.unwrap().accepted);

        svc.moderate(&viewer, "response", response.id, "rejected")
            .await
            .unwrap();
        svc.moderate(&viewer, "response", response.id, "inherit")
            .await
            .unwrap();
        assert_eq!(
            svc.get_response(response.id).await.unwrap().status,
            ResponseStatus::Inherit
        );

        svc.moderate(&viewer, "question", question.id, "clear_accepted")
            .await
            .unwrap();
        assert!(!svc.get_response(response.id).await.unwrap().accepted);

        svc.moderate(&viewer, "response", response.id, "delete")
            .await
            .unwrap();
        assert!(svc.list_responses(question.id).await.unwrap().is_empty());
    }
}
