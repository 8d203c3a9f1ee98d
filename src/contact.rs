use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a sent/failed status stays up before returning to idle.
pub const STATUS_RESET: Duration = Duration::from_millis(2500);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("Please fill in your {0}.")]
    MissingField(&'static str),
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Contact endpoint not configured")]
    NotConfigured,
    #[error("Contact endpoint rejected the message with status {status}")]
    Rejected { status: u16 },
    #[error("Contact endpoint unreachable: {0}")]
    Transport(String),
}

/// What the visitor typed, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactDraft {
    pub fn validate(&self) -> Result<(), ContactError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        if !looks_like_email(self.email.trim()) {
            return Err(ContactError::InvalidEmail);
        }
        Ok(())
    }

    pub fn into_message(self, source: String, sent_at: DateTime<Utc>) -> ContactMessage {
        ContactMessage {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
            source,
            sent_at: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Body posted to the configured endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub source: String,
    pub sent_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactStatus {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed,
}

impl ContactStatus {
    pub fn is_busy(self) -> bool {
        self == Self::Sending
    }

    /// Sent and Failed are transient and expire after [`STATUS_RESET`].
    pub fn expires(self) -> bool {
        matches!(self, Self::Sent | Self::Failed)
    }

    /// A new submission. `None` while one is already in flight.
    pub fn submit(self) -> Option<Self> {
        (!self.is_busy()).then_some(Self::Sending)
    }

    /// The reset timer firing. Only a finished status returns to idle, so a
    /// stale timer can't unlock a submission that is still in flight.
    pub fn expired(self) -> Self {
        if self.expires() {
            Self::Idle
        } else {
            self
        }
    }

    pub fn finished<E>(result: &Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Sent,
            Err(_) => Self::Failed,
        }
    }
}

#[cfg(feature = "ssr")]
pub async fn deliver(
    config: &crate::config::SiteConfig,
    message: &ContactMessage,
) -> Result<(), ContactError> {
    let endpoint = config
        .contact_endpoint
        .as_deref()
        .ok_or(ContactError::NotConfigured)?;
    let client = reqwest::Client::builder()
        .timeout(config.contact_timeout)
        .build()
        .map_err(|e| ContactError::Transport(e.to_string()))?;
    let res = client
        .post(endpoint)
        .header(http::header::ACCEPT, "application/json")
        .json(message)
        .send()
        .await
        .map_err(|e| ContactError::Transport(e.to_string()))?;

    let status = res.status();
    if status.is_success() {
        tracing::info!(%status, "contact message delivered");
        Ok(())
    } else {
        let body = res.text().await.unwrap_or_default();
        tracing::warn!(%status, %body, "contact endpoint rejected message");
        Err(ContactError::Rejected {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn draft(name: &str, email: &str, message: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_all_fields_are_required() {
        assert_eq!(
            draft("", "a@b.co", "hi").validate(),
            Err(ContactError::MissingField("name"))
        );
        assert_eq!(
            draft("Ann", "  ", "hi").validate(),
            Err(ContactError::MissingField("email"))
        );
        assert_eq!(
            draft("Ann", "a@b.co", "\n").validate(),
            Err(ContactError::MissingField("message"))
        );
        assert_eq!(draft("Ann", "a@b.co", "hi").validate(), Ok(()));
    }

    #[test]
    fn test_email_shape() {
        for bad in ["ann", "@b.co", "ann@localhost", "ann@.co", "ann@b.", "a nn@b.co"] {
            assert_eq!(
                draft("Ann", bad, "hi").validate(),
                Err(ContactError::InvalidEmail),
                "{bad}"
            );
        }
        assert_eq!(draft("Ann", " ann@mail.example.com ", "hi").validate(), Ok(()));
    }

    #[test]
    fn test_message_json_shape() {
        let sent_at = Utc.with_ymd_and_hms(2025, 8, 14, 9, 30, 0).unwrap();
        let msg = draft(" Ann ", "ann@b.co", "Hello")
            .into_message("https://honey.dev/#contact-form".to_string(), sent_at);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ann",
                "email": "ann@b.co",
                "message": "Hello",
                "source": "https://honey.dev/#contact-form",
                "sentAt": "2025-08-14T09:30:00.000Z",
            })
        );
    }

    #[test]
    fn test_status_lifecycle() {
        assert_eq!(ContactStatus::default(), ContactStatus::Idle);
        assert!(ContactStatus::Sending.is_busy());
        assert!(!ContactStatus::Sending.expires());
        assert_eq!(ContactStatus::finished::<ContactError>(&Ok(())), ContactStatus::Sent);
        let failed = ContactStatus::finished(&Err(ContactError::Rejected { status: 422 }));
        assert_eq!(failed, ContactStatus::Failed);
        assert!(failed.expires());
        assert_eq!(STATUS_RESET, Duration::from_millis(2500));
        assert_eq!(failed.expired(), ContactStatus::Idle);
        assert_eq!(ContactStatus::Sent.expired(), ContactStatus::Idle);
    }

    #[test]
    fn test_resubmit_after_failure_survives_old_reset() {
        let failed = ContactStatus::Failed;
        let sending = failed.submit().unwrap();
        assert_eq!(sending, ContactStatus::Sending);
        // reset scheduled for the failure fires while the retry is in flight
        assert_eq!(sending.expired(), ContactStatus::Sending);
        assert_eq!(sending.submit(), None);
        assert_eq!(ContactStatus::Idle.submit(), Some(ContactStatus::Sending));
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            ContactError::MissingField("email").to_string(),
            "Please fill in your email."
        );
    }
}
