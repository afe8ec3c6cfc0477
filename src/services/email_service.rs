use async_trait::async_trait;
use serde::Serialize;

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

const MAILJET_SEND_URL: &str = "https://api.mailjet.com/v3.1/send";

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

/// Colaborador de envío de emails transaccionales
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MailjetContact<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct MailjetMessage<'a> {
    #[serde(rename = "From")]
    from: MailjetContact<'a>,
    #[serde(rename = "To")]
    to: Vec<MailjetContact<'a>>,
    #[serde(rename = "Subject")]
    subject: &'a str,
    #[serde(rename = "HTMLPart")]
    html_part: &'a str,
}

#[derive(Debug, Serialize)]
struct MailjetSendRequest<'a> {
    #[serde(rename = "Messages")]
    messages: Vec<MailjetMessage<'a>>,
}

/// Cliente de la API de envío de Mailjet (v3.1)
pub struct MailjetEmailService {
    api_key: String,
    api_secret: String,
    sender: String,
    sender_name: String,
    client: reqwest::Client,
}

impl MailjetEmailService {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.http_connect_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.mailjet_api_key.clone(),
            api_secret: config.mailjet_api_secret.clone(),
            sender: config.mail_sender.clone(),
            sender_name: config.mail_sender_name.clone(),
            client,
        })
    }
}

#[async_trait]
impl EmailSender for MailjetEmailService {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        log::info!("📧 Enviando email '{}' a {}", message.subject, message.to);

        let body = MailjetSendRequest {
            messages: vec![MailjetMessage {
                from: MailjetContact {
                    email: &self.sender,
                    name: &self.sender_name,
                },
                to: vec![MailjetContact {
                    email: &message.to,
                    name: &message.to_name,
                }],
                subject: &message.subject,
                html_part: &message.html,
            }],
        };

        let response = self
            .client
            .post(MAILJET_SEND_URL)
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Mailjet unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Mailjet respondió {}: {}", status, error_text);
            return Err(AppError::ExternalApi(format!("Mailjet send failed: {}", status)));
        }

        log::info!("✅ Email enviado a {}", message.to);
        Ok(())
    }
}

/// Sustituto cuando no hay credenciales: sólo deja constancia en el log
pub struct LogOnlyEmailSender;

#[async_trait]
impl EmailSender for LogOnlyEmailSender {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        log::warn!(
            "⚠️ Email deshabilitado, no se envía '{}' a {}",
            message.subject,
            message.to
        );
        Ok(())
    }
}
