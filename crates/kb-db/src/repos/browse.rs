//! Read-side aggregates behind the index, list and thread endpoints.

use kb_core::entities::Question;
use kb_core::enums::EntityType;
use kb_core::errors::CoreError;
use kb_core::responses::{IndexResponse, ListResponse, QuestionView, ResponseView, ThreadResponse};
use kb_core::visibility::Viewer;

use crate::error::DatabaseError;
use crate::repos::question::QuestionFilter;
use crate::service::KbService;

impl KbService {
    /// Recent questions the viewer can see, plus every category.
    pub async fn index(&self, viewer: &Viewer) -> Result<IndexResponse, DatabaseError> {
        let questions = self
            .list_questions(viewer, &QuestionFilter::default())
            .await?;
        Ok(IndexResponse {
            questions: self.question_views(questions).await?,
            categories: self.list_categories().await?,
        })
    }

    /// Question list, optionally narrowed to a category slug and a search.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown category slug.
    pub async fn browse(
        &self,
        viewer: &Viewer,
        category_slug: Option<&str>,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListResponse, DatabaseError> {
        let category = match category_slug {
            Some(slug) => Some(self.get_category_by_slug(slug).await?),
            None => None,
        };
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let filter = QuestionFilter {
            category_id: category.as_ref().map(|c| c.id),
            query: query.map(String::from),
            limit,
        };
        let questions = self.list_questions(viewer, &filter).await?;

        Ok(ListResponse {
            category,
            query: filter.query,
            questions: self.question_views(questions).await?,
            categories: self.list_categories().await?,
        })
    }

    /// A question with the responses the viewer can see.
    ///
    /// `count_hit` increments the hit counter (page views, not re-renders
    /// after a post).
    ///
    /// # Errors
    ///
    /// `NotFound` when the question is missing or hidden from the viewer.
    pub async fn thread(
        &self,
        viewer: &Viewer,
        question_id: i64,
        count_hit: bool,
    ) -> Result<ThreadResponse, DatabaseError> {
        let mut question = self.get_question(question_id).await?;
        if !question.can_view(viewer) {
            return Err(CoreError::not_found(EntityType::Question, question_id).into());
        }
        if count_hit {
            self.increment_hits(question_id).await?;
            question.hits = question.hits.saturating_add(1);
        }

        let responses = self.list_responses(question_id).await?;
        let answered = question.answered(&responses, viewer);
        let accepted = question.has_accepted(&responses, viewer);
        let can_respond = self.check_can_respond(&question, viewer).is_ok();
        let visible: Vec<_> = question
            .visible_responses(&responses, viewer)
            .into_iter()
            .cloned()
            .collect();

        let author_ids: Vec<i64> = question
            .authorship
            .user_id
            .into_iter()
            .chain(visible.iter().filter_map(|r| r.authorship.user_id))
            .collect();
        let users = self.users_by_ids(&author_ids).await?;
        let slug_urls = self.settings().slug_urls;
        let asker = question.authorship.user_id.and_then(|id| users.get(&id));

        Ok(ThreadResponse {
            question: QuestionView::new(question, asker, slug_urls),
            responses: visible
                .into_iter()
                .map(|r| {
                    let author = r.authorship.user_id.and_then(|id| users.get(&id));
                    ResponseView::new(r, author)
                })
                .collect(),
            answered,
            accepted,
            can_respond,
        })
    }

    /// Attach permalinks and author names.
    pub async fn question_views(
        &self,
        questions: Vec<Question>,
    ) -> Result<Vec<QuestionView>, DatabaseError> {
        let author_ids: Vec<i64> = questions
            .iter()
            .filter_map(|q| q.authorship.user_id)
            .collect();
        let users = self.users_by_ids(&author_ids).await?;
        let slug_urls = self.settings().slug_urls;
        Ok(questions
            .into_iter()
            .map(|q| {
                let author = q.authorship.user_id.and_then(|id| users.get(&id));
                QuestionView::new(q, author, slug_urls)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use kb_core::entities::Authorship;
    use kb_core::enums::{ResponseStatus, Status};

    use super::*;
    use crate::test_support::helpers::{
        create_test_question, create_test_response, create_test_user, test_service,
    };

    #[tokio::test]
    async fn thread_filters_responses_and_counts_hits() {
        let svc = test_service().await;
        let asker = create_test_user(&svc, "asker", false).await;
        let helper = create_test_user(&svc, "helper", false).await;
        let stranger = create_test_user(&svc, "stranger", false).await;

        let question = create_test_question(&svc, &asker, "Thread").await;
        svc.switch_question_status(None, question.id, Status::Public)
            .await
            .unwrap();
        let inherited = create_test_response(&svc, question.id, &helper).await;
        let drafted = create_test_response(&svc, question.id, &helper).await;
        svc.switch_response_status(None, drafted.id, ResponseStatus::Draft)
            .await
            .unwrap();

        let for_stranger = svc
            .thread(&Viewer::from(&stranger), question.id, true)
            .await
            .unwrap();
        let ids: Vec<i64> = for_stranger.responses.iter().map(|r| r.response.id).collect();
        assert_eq!(ids, vec![inherited.id]);
        assert!(for_stranger.answered);
        assert!(!for_stranger.accepted);
        assert!(for_stranger.can_respond);
        assert_eq!(for_stranger.question.question.hits, 1);
        assert_eq!(for_stranger.question.author_name, "asker");

        // The asker sees drafts posted to their question.
        let for_asker = svc
            .thread(&Viewer::from(&asker), question.id, false)
            .await
            .unwrap();
        assert_eq!(for_asker.responses.len(), 2);
        assert_eq!(svc.get_question(question.id).await.unwrap().hits, 1);
    }

    #[tokio::test]
    async fn hidden_thread_is_not_found() {
        let svc = test_service().await;
        let asker = create_test_user(&svc, "asker", false).await;
        let question = create_test_question(&svc, &asker, "Private draft").await;

        let err = svc
            .thread(&Viewer::anonymous(), question.id, true)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(svc.get_question(question.id).await.unwrap().hits, 0);
    }

    #[tokio::test]
    async fn browse_by_category_and_query() {
        let svc = test_service().await;
        let staff = create_test_user(&svc, "staff", true).await;
        let howto = svc.create_category("How-to", Some("howto")).await.unwrap();
        let question = svc
            .create_question(
                "Install the agent",
                Some("Step by step"),
                &Authorship::user(staff.id, false),
                &[howto.id],
            )
            .await
            .unwrap();
        svc.switch_question_status(None, question.id, Status::Public)
            .await
            .unwrap();

        let listed = svc
            .browse(&Viewer::anonymous(), Some("howto"), Some("  agent "), None)
            .await
            .unwrap();
        assert_eq!(listed.category.map(|c| c.id), Some(howto.id));
        assert_eq!(listed.query.as_deref(), Some("agent"));
        assert_eq!(listed.questions.len(), 1);
        assert_eq!(
            listed.questions[0].url,
            format!("/articles/{}/install-the-agent/", question.id)
        );

        let missing = svc
            .browse(&Viewer::anonymous(), Some("nope"), None, None)
            .await
            .unwrap_err();
        assert!(missing.is_not_found());

        let index = svc.index(&Viewer::anonymous()).await.unwrap();
        assert_eq!(index.questions.len(), 1);
        assert_eq!(index.categories.len(), 1);
    }
}
