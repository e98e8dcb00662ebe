//! Email notification: subject building and SMTP delivery.
//!
//! The orchestrator treats delivery as best-effort: a transport failure is
//! reported through the process log and the run trace, never raised.

pub mod template;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use lettre::message::{MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};
use crate::models::EmailConfig;

/// Fixed prefix identifying the watcher in every subject line.
pub const SUBJECT_PREFIX: &str = "Acompanhamento ALEPE";

/// Subject for a successful run, carrying the change indicator.
pub fn success_subject(label: &str, changed: bool, date: DateTime<Local>) -> String {
    let marker = if changed {
        "🔄 Atualizada"
    } else {
        "✅ Sem alterações"
    };
    format!(
        "{} - {} - {} - {}",
        SUBJECT_PREFIX,
        label,
        date.format("%d/%m/%Y"),
        marker
    )
}

/// Subject for a failed run.
pub fn error_subject(label: &str, date: DateTime<Local>) -> String {
    format!(
        "[ERRO] {} - {} - {}",
        SUBJECT_PREFIX,
        label,
        date.format("%d/%m/%Y")
    )
}

/// Capability to deliver one notification message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the HTML body with the plaintext trace trailer attached.
    async fn send(&self, subject: &str, html_body: &str, log_lines: &[String]) -> Result<()>;
}

/// SMTP-backed notifier.
pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, subject: &str, html_body: &str, log_lines: &[String]) -> Result<Message> {
        let trailer = format!("Logs:\n{}", log_lines.join("\n"));

        Message::builder()
            .from(
                self.config
                    .username
                    .parse()
                    .map_err(AppError::notification)?,
            )
            .to(self
                .config
                .recipient
                .parse()
                .map_err(AppError::notification)?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(trailer),
                    ),
            )
            .map_err(AppError::notification)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, html_body: &str, log_lines: &[String]) -> Result<()> {
        let message = self.build_message(subject, html_body, log_lines)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(AppError::notification)?
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(AppError::notification)?;
        Ok(())
    }
}
