//! In-memory accept-answer workflow and derived thread state.

use chrono::Utc;
use pretty_assertions::assert_eq;

use kb_core::entities::{Authorship, Question, Response};
use kb_core::enums::{ResponseStatus, Status};
use kb_core::visibility::Viewer;

fn question(id: i64) -> Question {
    let now = Utc::now();
    Question {
        id,
        title: format!("Question {id}"),
        body: None,
        status: Status::Public,
        locked: false,
        recommended: false,
        hits: 0,
        authorship: Authorship::user(1, false),
        categories: Vec::new(),
        added: now,
        lastchanged: now,
    }
}

fn response(id: i64, question_id: i64, accepted: bool) -> Response {
    let now = Utc::now();
    Response {
        id,
        question_id,
        body: Some(format!("Answer {id}")),
        status: ResponseStatus::Inherit,
        accepted,
        authorship: Authorship::user(2, false),
        added: now,
        lastchanged: now,
    }
}

fn accepted_ids(responses: &[Response]) -> Vec<i64> {
    responses.iter().filter(|r| r.accepted).map(|r| r.id).collect()
}

#[test]
fn accept_leaves_exactly_one_accepted() {
    let q = question(1);
    let mut responses = vec![response(10, 1, true), response(11, 1, false), response(12, 1, true)];

    assert!(q.accept(&mut responses, 11));
    assert_eq!(accepted_ids(&responses), vec![11]);

    assert!(q.accept(&mut responses, 12));
    assert_eq!(accepted_ids(&responses), vec![12]);
}

#[test]
fn accept_foreign_response_fails_and_clears() {
    let q = question(1);
    let mut responses = vec![response(10, 1, true), response(11, 1, false), response(20, 2, false)];

    assert!(!q.accept(&mut responses, 20));
    assert!(accepted_ids(&responses).is_empty());
}

#[test]
fn accept_unknown_response_fails() {
    let q = question(1);
    let mut responses = vec![response(10, 1, true)];
    assert!(!q.accept(&mut responses, 999));
    assert!(accepted_ids(&responses).is_empty());
}

#[test]
fn response_accept_delegates_to_its_question() {
    let q = question(1);
    let mut responses = vec![response(10, 1, true), response(11, 1, false)];
    let chosen = responses[1].clone();

    assert!(chosen.accept(&q, &mut responses));
    assert_eq!(accepted_ids(&responses), vec![11]);

    let stranger = response(30, 3, false);
    assert!(!stranger.accept(&q, &mut responses));
    assert!(accepted_ids(&responses).is_empty());
}

#[test]
fn clear_accepted_only_touches_own_responses() {
    let q = question(1);
    let mut responses = vec![response(10, 1, true), response(20, 2, true)];
    q.clear_accepted(&mut responses);
    assert_eq!(accepted_ids(&responses), vec![20]);
}

#[test]
fn answered_and_accepted_follow_visibility() {
    let q = question(1);
    let mut hidden = response(10, 1, true);
    hidden.status = ResponseStatus::Review;
    let responses = vec![hidden];

    let anonymous = Viewer::anonymous();
    let staff = Viewer { user_id: Some(9), is_staff: true };

    assert!(!q.answered(&responses, &anonymous));
    assert!(!q.has_accepted(&responses, &anonymous));
    assert!(q.answered(&responses, &staff));
    assert!(q.has_accepted(&responses, &staff));
}

#[test]
fn status_setters_overwrite_unconditionally() {
    let mut q = question(1);
    q.rejected();
    assert_eq!(q.status, Status::Rejected);
    q.draft();
    assert_eq!(q.status, Status::Draft);
    q.review();
    q.public();
    assert_eq!(q.status, Status::Public);

    let mut r = response(10, 1, false);
    r.public();
    assert_eq!(r.status, ResponseStatus::Public);
    r.inherit();
    assert_eq!(r.status, ResponseStatus::Inherit);
    r.rejected();
    assert_eq!(r.status, ResponseStatus::Rejected);
}

#[test]
fn lock_toggles_and_states_reflect_flags() {
    let mut q = question(1);
    assert_eq!(q.states(), vec!["public"]);
    q.lock();
    assert!(q.locked);
    assert_eq!(q.states(), vec!["public", "lock"]);
    q.lock();
    assert!(!q.locked);

    let r = response(10, 1, true);
    assert_eq!(r.states(), vec!["inherit", "accept"]);
}

#[test]
fn display_and_summary() {
    let q = question(3);
    assert_eq!(q.to_string(), "Question 3");
    assert_eq!(q.url(true), "/articles/3/question-3/");
    assert_eq!(q.url(false), "/articles/3/");

    let mut r = response(10, 1, false);
    r.body = Some("x".repeat(150));
    assert_eq!(r.summary(), format!("{}...", "x".repeat(100)));
    r.body = None;
    assert_eq!(r.to_string(), "...");
}
