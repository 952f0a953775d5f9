//! Outbound transactional email via the Resend HTTP API.

use serde::Serialize;

use crate::config::AppConfig;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery is not configured (RESEND_API_KEY missing)")]
    NotConfigured,
    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("email provider rejected the message: {status}")]
    Rejected { status: u16 },
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    html: &'a str,
}

pub struct Mailer {
    http: reqwest::Client,
    api_key: Option<String>,
    from: String,
    to: String,
}

impl Mailer {
    pub fn from_config(config: &AppConfig) -> Self {
        if config.resend_api_key.is_none() {
            tracing::warn!("RESEND_API_KEY not set; contact form submissions will fail");
        }
        Self {
            http: reqwest::Client::new(),
            api_key: config.resend_api_key.clone(),
            from: config.contact_from.clone(),
            to: config.contact_to.clone(),
        }
    }

    pub async fn send(
        &self,
        subject: &str,
        reply_to: Option<&str>,
        html: &str,
    ) -> Result<(), MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::NotConfigured)?;

        let response = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: vec![self.to.as_str()],
                subject,
                reply_to,
                html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Resend API rejected email");
            return Err(MailError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
