//! Session workflow emails

use mm_core::config::AppConfig;
use mm_models::User;

use crate::email::{EmailAddress, EmailMessage};

/// Renders the emails sent while a session moves through its workflow
#[derive(Debug, Clone)]
pub struct SessionMailer {
    from: EmailAddress,
    login_url: String,
}

impl SessionMailer {
    pub fn new(from: EmailAddress, login_url: impl Into<String>) -> Self {
        Self {
            from,
            login_url: login_url.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            EmailAddress::new(config.email.from_address.clone())
                .with_name(config.email.from_name.clone()),
            config.instance.login_url.clone(),
        )
    }

    fn message(&self, to: &User, subject: &str, body: String) -> EmailMessage {
        EmailMessage::new(self.from.clone(), vec![EmailAddress::from(to)], subject, body)
    }

    /// Sent to the mentor when a mentee asks for a session
    pub fn session_requested(&self, mentor: &User, mentee: &User) -> EmailMessage {
        self.message(
            mentor,
            "New mentorship request!",
            format!(
                "You have received a new request for mentorship from {}! \
                 To view this request log into your account at {}",
                mentee.name, self.login_url
            ),
        )
    }

    /// Sent to the mentee when the mentor accepts
    pub fn session_accepted(&self, mentee: &User, mentor: &User) -> EmailMessage {
        self.message(
            mentee,
            "Your mentorship request has been accepted!",
            format!(
                "Your mentorship request with {} has been accepted! \
                 To review this session log into your account at {}",
                mentor.name, self.login_url
            ),
        )
    }

    /// Sent to the mentee when the mentor rejects
    pub fn session_rejected(&self, mentee: &User, mentor: &User) -> EmailMessage {
        self.message(
            mentee,
            "Your mentorship request has been rejected",
            format!(
                "Your mentorship request with {} has been rejected. \
                 To send a new request log into your account at {}",
                mentor.name, self.login_url
            ),
        )
    }

    /// Sent to the other participant when a session is cancelled
    pub fn session_cancelled(&self, recipient: &User, cancelled_by: &User) -> EmailMessage {
        self.message(
            recipient,
            "Your mentoring session has been cancelled",
            format!(
                "Your mentorship request with {} has been cancelled. \
                 To send a new request log into your account at {}",
                cancelled_by.name, self.login_url
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mm_models::Role;

    fn user(id: &str, name: &str, role: Role) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", id),
            role,
            bio: None,
            photo: None,
            active: true,
            created_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_request_email() {
        let mailer = SessionMailer::from_config(&AppConfig::default());
        let mentor = user("grace", "Grace", Role::Mentor);
        let mentee = user("ada", "Ada", Role::Mentee);

        let message = mailer.session_requested(&mentor, &mentee);
        assert_eq!(message.subject, "New mentorship request!");
        assert_eq!(message.to[0].email, "grace@example.com");
        assert_eq!(
            message.text_body,
            "You have received a new request for mentorship from Ada! \
             To view this request log into your account at www.torontoadvotech.com/login"
        );
    }

    #[test]
    fn test_response_emails_go_to_mentee() {
        let mailer = SessionMailer::new(EmailAddress::new("from@example.com"), "https://mm.test/login");
        let mentor = user("grace", "Grace", Role::Mentor);
        let mentee = user("ada", "Ada", Role::Mentee);

        let accepted = mailer.session_accepted(&mentee, &mentor);
        assert_eq!(accepted.to[0].email, "ada@example.com");
        assert!(accepted.text_body.contains("with Grace has been accepted!"));
        assert!(accepted.text_body.ends_with("https://mm.test/login"));

        let rejected = mailer.session_rejected(&mentee, &mentor);
        assert_eq!(rejected.subject, "Your mentorship request has been rejected");

        let cancelled = mailer.session_cancelled(&mentor, &mentee);
        assert_eq!(cancelled.to[0].email, "grace@example.com");
        assert!(cancelled.text_body.contains("with Ada has been cancelled."));
    }
}
