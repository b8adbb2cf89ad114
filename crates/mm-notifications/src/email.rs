//! Email delivery

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mm_core::config::{EmailConfig, EmailDeliveryMethod};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Email errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

pub type EmailResult<T> = Result<T, EmailError>;

/// Email address with optional name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Format as RFC 5322
    pub fn to_rfc5322(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

impl From<&mm_models::User> for EmailAddress {
    fn from(user: &mm_models::User) -> Self {
        Self::new(user.email.clone()).with_name(user.name.clone())
    }
}

/// Email message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    /// Plain text body
    pub text_body: String,
    pub created_at: DateTime<Utc>,
}

impl EmailMessage {
    pub fn new(
        from: EmailAddress,
        to: Vec<EmailAddress>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            subject: subject.into(),
            text_body: text_body.into(),
            created_at: Utc::now(),
        }
    }

    /// Comma-separated recipient list
    pub fn recipients(&self) -> String {
        self.to
            .iter()
            .map(EmailAddress::to_rfc5322)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn check_recipients(&self) -> EmailResult<()> {
        if self.to.is_empty() {
            return Err(EmailError::InvalidRecipient("no recipients".to_string()));
        }
        if let Some(bad) = self.to.iter().find(|a| !a.email.contains('@')) {
            return Err(EmailError::InvalidRecipient(bad.email.clone()));
        }
        Ok(())
    }
}

/// Email sender trait
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an email, returning the message id
    async fn send(&self, message: &EmailMessage) -> EmailResult<String>;

    /// Check if the sender is configured
    fn is_configured(&self) -> bool;
}

/// Console email sender (for development)
#[derive(Debug, Default)]
pub struct ConsoleEmailSender;

impl ConsoleEmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailSender for ConsoleEmailSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult<String> {
        message.check_recipients()?;
        tracing::info!(
            id = %message.id,
            from = %message.from.to_rfc5322(),
            to = %message.recipients(),
            subject = %message.subject,
            body = %message.text_body,
            "email delivered to console"
        );
        Ok(message.id.clone())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Keeps sent messages in memory
#[derive(Debug, Default)]
pub struct MemoryEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }

    /// Make every following send fail with `reason`
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.fail_with.lock() = Some(reason.into());
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult<String> {
        let failure = self.fail_with.lock().clone();
        if let Some(reason) = failure {
            return Err(EmailError::SendFailed(reason));
        }
        message.check_recipients()?;
        self.sent.lock().push(message.clone());
        Ok(message.id.clone())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Build the sender selected by configuration
pub fn sender_for(config: &EmailConfig) -> Arc<dyn EmailSender> {
    match config.delivery_method {
        EmailDeliveryMethod::Console => Arc::new(ConsoleEmailSender::new()),
        EmailDeliveryMethod::Test => Arc::new(MemoryEmailSender::new()),
    }
}
