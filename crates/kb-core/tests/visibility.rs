//! Visibility rule tables for questions and responses.

use chrono::Utc;
use rstest::rstest;

use kb_core::entities::{Authorship, Question, Response};
use kb_core::enums::{ResponseStatus, Status};
use kb_core::visibility::{KnowledgePost, Viewer};

const OWNER: i64 = 1;
const ASKER: i64 = 2;
const OTHER: i64 = 3;
const STAFF: i64 = 4;

fn question(status: Status, owner: Option<i64>) -> Question {
    let now = Utc::now();
    Question {
        id: 10,
        title: "How do I rotate my API key?".into(),
        body: Some("<p>Details</p>".into()),
        status,
        locked: false,
        recommended: false,
        hits: 0,
        authorship: Authorship {
            user_id: owner,
            ..Authorship::default()
        },
        categories: Vec::new(),
        added: now,
        lastchanged: now,
    }
}

fn response(status: ResponseStatus, owner: Option<i64>) -> Response {
    let now = Utc::now();
    Response {
        id: 100,
        question_id: 10,
        body: Some("Use the settings page.".into()),
        status,
        accepted: false,
        authorship: Authorship {
            user_id: owner,
            ..Authorship::default()
        },
        added: now,
        lastchanged: now,
    }
}

fn viewer(name: &str) -> Viewer {
    match name {
        "anonymous" => Viewer::anonymous(),
        "owner" => Viewer { user_id: Some(OWNER), is_staff: false },
        "asker" => Viewer { user_id: Some(ASKER), is_staff: false },
        "other" => Viewer { user_id: Some(OTHER), is_staff: false },
        "staff" => Viewer { user_id: Some(STAFF), is_staff: true },
        _ => unreachable!("unknown viewer {name}"),
    }
}

#[rstest]
#[case(Status::Public, "anonymous", true)]
#[case(Status::Public, "other", true)]
#[case(Status::Draft, "owner", true)]
#[case(Status::Draft, "staff", true)]
#[case(Status::Draft, "other", false)]
#[case(Status::Draft, "anonymous", false)]
#[case(Status::Review, "staff", true)]
#[case(Status::Review, "owner", false)]
#[case(Status::Rejected, "staff", true)]
#[case(Status::Rejected, "owner", false)]
#[case(Status::Rejected, "anonymous", false)]
fn question_visibility(#[case] status: Status, #[case] who: &str, #[case] expected: bool) {
    let q = question(status, Some(OWNER));
    assert_eq!(q.can_view(&viewer(who)), expected, "{status} as {who}");
}

#[rstest]
#[case(ResponseStatus::Public, "anonymous", true)]
#[case(ResponseStatus::Draft, "owner", true)]
#[case(ResponseStatus::Draft, "asker", true)]
#[case(ResponseStatus::Draft, "staff", true)]
#[case(ResponseStatus::Draft, "other", false)]
#[case(ResponseStatus::Review, "asker", false)]
#[case(ResponseStatus::Review, "staff", true)]
#[case(ResponseStatus::Rejected, "owner", false)]
#[case(ResponseStatus::Rejected, "staff", true)]
fn response_visibility(
    #[case] status: ResponseStatus,
    #[case] who: &str,
    #[case] expected: bool,
) {
    // The question is a public one asked by ASKER; the response is by OWNER.
    let q = question(Status::Public, Some(ASKER));
    let r = response(status, Some(OWNER));
    assert_eq!(r.can_view(&q, &viewer(who)), expected, "{status} as {who}");
}

#[rstest]
fn inherit_matches_parent_question(
    #[values(Status::Public, Status::Draft, Status::Review, Status::Rejected)] status: Status,
    #[values("anonymous", "owner", "asker", "other", "staff")] who: &str,
) {
    let q = question(status, Some(ASKER));
    let r = response(ResponseStatus::Inherit, Some(OWNER));
    let v = viewer(who);
    assert_eq!(r.can_view(&q, &v), q.can_view(&v), "inherit under {status} as {who}");
}

#[rstest]
fn public_is_visible_to_everyone(
    #[values("anonymous", "owner", "asker", "other", "staff")] who: &str,
) {
    let v = viewer(who);
    assert!(question(Status::Public, None).can_view(&v));
    assert!(question(Status::Public, Some(OWNER)).can_view(&v));
    let q = question(Status::Rejected, Some(ASKER));
    assert!(response(ResponseStatus::Public, None).can_view(&q, &v));
}

#[test]
fn ownerless_draft_is_hidden_from_anonymous() {
    let q = question(Status::Draft, None);
    assert!(!q.can_view(&Viewer::anonymous()));
    assert!(q.can_view(&viewer("staff")));
}

#[test]
fn response_checked_against_foreign_question_is_hidden() {
    let mut q = question(Status::Public, Some(ASKER));
    q.id = 99;
    let r = response(ResponseStatus::Public, Some(OWNER));
    assert!(!r.can_view(&q, &viewer("staff")));
}

#[test]
fn knowledge_post_ownership() {
    let q = question(Status::Draft, Some(OWNER));
    assert!(q.is_owned_by(&viewer("owner")));
    assert!(!q.is_owned_by(&viewer("staff")));
    assert!(!q.is_owned_by(&Viewer::anonymous()));
}
