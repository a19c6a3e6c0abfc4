//! Mail delivery client
//!
//! Posts outgoing mail to an HTTP relay service. Delivery failures are
//! reported to the caller; the caller decides whether they matter.

use serde::{Deserialize, Serialize};

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// An outgoing message
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MailAttachment>,
}

/// A file attached by path; the relay reads it from shared storage
#[derive(Debug, Clone, Serialize)]
pub struct MailAttachment {
    pub filename: String,
    pub path: String,
}

/// Capability for delivering fulfillment notifications
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()>;
}

/// Mail relay API client
#[derive(Clone)]
pub struct HttpMailer {
    endpoint: String,
    token: String,
    from_address: String,
    http_client: reqwest::Client,
}

/// Relay request payload
#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    from: String,
    #[serde(flatten)]
    mail: &'a OutgoingMail,
}

/// Relay API error response
#[derive(Debug, Deserialize)]
struct RelayApiResponse {
    #[serde(default)]
    message: Option<String>,
}

impl HttpMailer {
    /// Create a new mailer client
    pub fn new(endpoint: String, token: String, from_address: String) -> Self {
        Self {
            endpoint,
            token,
            from_address,
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from configuration; None when no relay endpoint is set
    pub fn from_config(config: &MailConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        Some(Self::new(
            config.endpoint.clone(),
            config.token.clone(),
            config.from_address.clone(),
        ))
    }

    /// Sender address; also used as the copy recipient on notifications
    pub fn from_address(&self) -> &str {
        &self.from_address
    }
}

#[async_trait::async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mail: &OutgoingMail) -> AppResult<()> {
        let request = RelayRequest {
            from: format!("\"Inventory System\" <{}>", self.from_address),
            mail,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to send mail: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let error: RelayApiResponse = response.json().await.unwrap_or(RelayApiResponse {
                message: Some("Unknown error".to_string()),
            });
            Err(AppError::ExternalService(
                error.message.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
