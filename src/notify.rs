//! Appointment notifications.
//!
//! A new appointment request is announced on two channels: an SMTP email to the
//! hospital inbox (primary, failures are reported to the caller) and a message through
//! an HTTP messaging API (secondary, failures are only logged).

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::Appointment;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Messaging API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notification rejected: {0}")]
    Rejected(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@hospital.local";
/// Upper bound on a messaging API call, connect included.
const DEFAULT_MESSAGING_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP settings. Absent `SMTP_HOST` disables email.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      |                          |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `noreply@hospital.local` |
    /// | `SMTP_USER`     | no       |                          |
    /// | `SMTP_PASSWORD` | no       |                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Messaging API settings (WhatsApp Cloud API style endpoint).
#[derive(Debug, Clone)]
pub struct MessagingConfig {
    pub api_url: String,
    pub api_token: String,
    pub recipient: String,
}

impl MessagingConfig {
    /// Requires all of `MESSAGING_API_URL`, `MESSAGING_API_TOKEN`, `MESSAGING_RECIPIENT`.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            api_url: std::env::var("MESSAGING_API_URL").ok()?,
            api_token: std::env::var("MESSAGING_API_TOKEN").ok()?,
            recipient: std::env::var("MESSAGING_RECIPIENT").ok()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// A single delivery channel for appointment notifications.
#[async_trait]
pub trait AppointmentNotifier: Send + Sync {
    async fn notify(&self, appointment: &Appointment) -> Result<(), NotifyError>;
}

/// Plain-text summary shared by every channel.
pub fn appointment_summary(appointment: &Appointment) -> String {
    let mut lines = vec![
        format!("Patient: {}", appointment.patient_name),
        format!("Email: {}", appointment.email),
        format!("Phone: {}", appointment.phone),
    ];
    if let Some(date) = appointment.preferred_date {
        lines.push(format!("Preferred date: {}", date.format("%Y-%m-%d")));
    }
    if let Some(message) = appointment.message.as_deref().filter(|m| !m.trim().is_empty()) {
        lines.push(format!("Message: {message}"));
    }
    lines.push(format!("Reference: {}", appointment.id));
    lines.join("\n")
}

/// Sends the appointment summary to the hospital inbox over SMTP.
pub struct SmtpNotifier {
    config: SmtpConfig,
    to_address: String,
}

impl SmtpNotifier {
    pub fn new(config: SmtpConfig, to_address: impl Into<String>) -> Self {
        Self {
            config,
            to_address: to_address.into(),
        }
    }
}

#[async_trait]
impl AppointmentNotifier for SmtpNotifier {
    async fn notify(&self, appointment: &Appointment) -> Result<(), NotifyError> {
        use lettre::{
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
            message::header::ContentType, transport::smtp::authentication::Credentials,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .reply_to(appointment.email.parse()?)
            .to(self.to_address.parse()?)
            .subject(format!("New appointment request: {}", appointment.patient_name))
            .header(ContentType::TEXT_PLAIN)
            .body(appointment_summary(appointment))
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;

        tracing::info!(appointment_id = %appointment.id, "Appointment email sent");
        Ok(())
    }
}

/// Posts the appointment summary to a messaging API with a bearer token.
pub struct MessagingNotifier {
    client: reqwest::Client,
    config: MessagingConfig,
    timeout: Duration,
}

impl MessagingNotifier {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            timeout: DEFAULT_MESSAGING_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AppointmentNotifier for MessagingNotifier {
    async fn notify(&self, appointment: &Appointment) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": self.config.recipient,
            "type": "text",
            "text": { "body": appointment_summary(appointment) },
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(format!(
                "messaging API returned {}",
                response.status()
            )));
        }

        tracing::info!(appointment_id = %appointment.id, "Appointment message sent");
        Ok(())
    }
}

/// MockNotifier
///
/// Records the ids it was asked to announce; optionally fails every call.
#[derive(Default)]
pub struct MockNotifier {
    pub should_fail: bool,
    sent: Mutex<Vec<Uuid>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<Uuid> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl AppointmentNotifier for MockNotifier {
    async fn notify(&self, appointment: &Appointment) -> Result<(), NotifyError> {
        if self.should_fail {
            return Err(NotifyError::Rejected("Mock notifier: simulated failure".to_string()));
        }
        self.sent.lock().await.push(appointment.id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Fans an appointment out to the configured channels.
#[derive(Default, Clone)]
pub struct NotificationDispatcher {
    pub email: Option<Arc<dyn AppointmentNotifier>>,
    pub messaging: Option<Arc<dyn AppointmentNotifier>>,
}

impl NotificationDispatcher {
    pub fn new(
        email: Option<Arc<dyn AppointmentNotifier>>,
        messaging: Option<Arc<dyn AppointmentNotifier>>,
    ) -> Self {
        Self { email, messaging }
    }

    /// Builds the real SMTP and messaging channels from configuration.
    pub fn from_config(config: &crate::AppConfig) -> Self {
        let email = config.smtp.clone().map(|smtp| {
            Arc::new(SmtpNotifier::new(smtp, config.appointment_inbox.clone()))
                as Arc<dyn AppointmentNotifier>
        });
        let messaging = config.messaging.clone().map(|messaging| {
            Arc::new(MessagingNotifier::new(messaging)) as Arc<dyn AppointmentNotifier>
        });
        Self { email, messaging }
    }

    /// Sends on every channel. Only an email failure is returned; the messaging channel
    /// is best-effort.
    pub async fn dispatch(&self, appointment: &Appointment) -> Result<(), NotifyError> {
        let email_result = match &self.email {
            Some(channel) => channel.notify(appointment).await,
            None => {
                tracing::warn!(appointment_id = %appointment.id, "SMTP not configured, skipping appointment email");
                Ok(())
            }
        };

        if let Some(channel) = &self.messaging {
            if let Err(e) = channel.notify(appointment).await {
                tracing::warn!(appointment_id = %appointment.id, error = %e, "Appointment message failed");
            }
        }

        if let Err(e) = &email_result {
            tracing::error!(appointment_id = %appointment.id, error = %e, "Appointment email failed");
        }
        email_result
    }
}

/// The shared handle to the dispatcher stored in `AppState`.
pub type NotifierState = Arc<NotificationDispatcher>;
