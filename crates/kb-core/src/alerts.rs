//! Alert recipient resolution for new responses.
//!
//! When a response is posted, the question's author and every earlier
//! responder who opted in (`alert = true`) is notified, except the poster.
//! Delivery happens elsewhere; this module only decides who.

use crate::entities::{Authorship, User};

/// A post author reduced to what alerting needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub user_id: Option<i64>,
    pub alert: bool,
    pub email: Option<String>,
}

impl Subscriber {
    /// Resolve a post's authorship, with its owning user when there is one.
    #[must_use]
    pub fn new(authorship: &Authorship, user: Option<&User>) -> Self {
        Self {
            user_id: authorship.user_id,
            alert: authorship.alert,
            email: authorship.contact_email(user).map(|e| e.to_lowercase()),
        }
    }

    fn is_same_author(&self, other: &Self) -> bool {
        match (self.user_id, other.user_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.email.is_some() && self.email == other.email,
        }
    }
}

/// E-mail addresses to alert about a new response, in first-seen order.
///
/// `question` is the asker, `responders` the authors of earlier responses,
/// `poster` the author of the new response.
#[must_use]
pub fn alert_recipients(
    question: &Subscriber,
    responders: &[Subscriber],
    poster: &Subscriber,
) -> Vec<String> {
    let mut recipients: Vec<String> = Vec::new();

    for subscriber in std::iter::once(question).chain(responders) {
        if !subscriber.alert || subscriber.is_same_author(poster) {
            continue;
        }
        let Some(email) = subscriber.email.as_ref() else {
            continue;
        };
        if poster.email.as_ref() == Some(email) || recipients.contains(email) {
            continue;
        }
        recipients.push(email.clone());
    }

    recipients
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sub(user_id: Option<i64>, alert: bool, email: Option<&str>) -> Subscriber {
        Subscriber {
            user_id,
            alert,
            email: email.map(String::from),
        }
    }

    #[test]
    fn asker_with_alert_is_notified() {
        let asker = sub(Some(1), true, Some("asker@example.com"));
        let poster = sub(Some(2), false, Some("poster@example.com"));
        assert_eq!(
            alert_recipients(&asker, &[], &poster),
            vec!["asker@example.com".to_string()]
        );
    }

    #[test]
    fn opted_out_and_emailless_are_skipped() {
        let asker = sub(Some(1), false, Some("asker@example.com"));
        let responders = [sub(Some(3), true, None), sub(Some(4), false, Some("quiet@example.com"))];
        let poster = sub(Some(2), false, None);
        assert!(alert_recipients(&asker, &responders, &poster).is_empty());
    }

    #[test]
    fn poster_is_never_notified() {
        let asker = sub(Some(1), true, Some("asker@example.com"));
        let responders = [sub(Some(2), true, Some("poster@example.com"))];
        let poster = sub(Some(2), true, Some("poster@example.com"));
        assert_eq!(
            alert_recipients(&asker, &responders, &poster),
            vec!["asker@example.com".to_string()]
        );

        // Asker answering their own question.
        let self_answer = sub(Some(1), true, Some("asker@example.com"));
        assert!(alert_recipients(&asker, &[], &self_answer).is_empty());
    }

    #[test]
    fn recipients_are_deduplicated_in_order() {
        let asker = sub(Some(1), true, Some("asker@example.com"));
        let responders = [
            sub(Some(3), true, Some("carol@example.com")),
            sub(Some(1), true, Some("asker@example.com")),
            sub(None, true, Some("carol@example.com")),
            sub(None, true, Some("dave@example.com")),
        ];
        let poster = sub(None, false, Some("erin@example.com"));
        assert_eq!(
            alert_recipients(&asker, &responders, &poster),
            vec![
                "asker@example.com".to_string(),
                "carol@example.com".to_string(),
                "dave@example.com".to_string(),
            ]
        );
    }

    #[test]
    fn subscriber_email_comes_from_user_when_missing() {
        let user = User {
            id: 9,
            username: "grace".into(),
            first_name: String::new(),
            last_name: String::new(),
            email: Some("Grace@Example.com".into()),
            is_staff: false,
            added: chrono::Utc::now(),
        };
        let subscriber = Subscriber::new(&Authorship::user(9, true), Some(&user));
        assert_eq!(subscriber.email.as_deref(), Some("grace@example.com"));
        assert!(subscriber.alert);
    }
}
