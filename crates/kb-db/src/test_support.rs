//! Shared test utilities for kb-db unit tests.

pub(crate) mod helpers {
    use kb_config::GeneralConfig;
    use kb_core::entities::{Authorship, Question, Response, User};

    use crate::KbDb;
    use crate::service::KbService;

    /// In-memory service with default settings.
    pub async fn test_service() -> KbService {
        test_service_with(GeneralConfig::default()).await
    }

    /// In-memory service with custom settings.
    pub async fn test_service_with(settings: GeneralConfig) -> KbService {
        let db = KbDb::open_local(":memory:").await.unwrap();
        KbService::from_db(db, settings)
    }

    pub async fn create_test_user(svc: &KbService, username: &str, is_staff: bool) -> User {
        svc.create_user(
            username,
            "",
            "",
            Some(&format!("{username}@example.com")),
            is_staff,
        )
        .await
        .unwrap()
    }

    pub async fn create_test_question(svc: &KbService, owner: &User, title: &str) -> Question {
        svc.create_question(title, Some("body"), &Authorship::user(owner.id, false), &[])
            .await
            .unwrap()
    }

    pub async fn create_test_response(
        svc: &KbService,
        question_id: i64,
        owner: &User,
    ) -> Response {
        svc.create_response(question_id, Some("answer"), &Authorship::user(owner.id, false))
            .await
            .unwrap()
    }
}
