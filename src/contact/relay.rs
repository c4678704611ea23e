use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use super::message::MailMessage;
use crate::config::MailConfig;

const MSG_AUTH: &str = "Email authentication failed. Please contact support.";
const MSG_CONNECTION: &str = "Connection error. Please check your internet connection.";
const MSG_GENERIC: &str = "Failed to send email. Please try again later.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay rejected credentials: {0}")]
    Authentication(String),

    #[error("could not reach relay: {0}")]
    Connection(String),

    #[error("relay refused message with status {status}")]
    Rejected { status: u16 },

    #[error("mail relay not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("relay failure: {0}")]
    Other(String),
}

impl RelayError {
    /// Short code recorded in logs instead of the message content
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "EAUTH",
            Self::Connection(_) => "ECONNECTION",
            Self::Rejected { .. } => "EREJECTED",
            Self::NotConfigured(_) => "ENOTCONFIGURED",
            Self::Other(_) => "UNKNOWN",
        }
    }

    /// Message returned to the visitor
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Authentication(_) => MSG_AUTH,
            Self::Connection(_) => MSG_CONNECTION,
            _ => MSG_GENERIC,
        }
    }
}

/// Outbound mail capability; one call sends one message, no retries
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), RelayError>;
}

/// Relay speaking a transactional-mail HTTP API (JSON body, basic auth)
pub struct HttpMailRelay {
    client: reqwest::Client,
    config: MailConfig,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: String,
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bcc: Option<&'a str>,
    reply_to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

fn required<'a>(value: Option<&'a String>, name: &'static str) -> Result<&'a str, RelayError> {
    value
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::NotConfigured(name))
}

impl HttpMailRelay {
    pub fn new(config: MailConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailRelay for HttpMailRelay {
    async fn send(&self, message: &MailMessage) -> Result<(), RelayError> {
        let endpoint = required(self.config.endpoint.as_ref(), "endpoint")?;
        let user = required(self.config.user.as_ref(), "user")?;
        let pass = required(self.config.pass.as_ref(), "pass")?;
        let to = required(self.config.recipient.as_ref(), "recipient")?;

        let body = SendRequest {
            from: format!("\"{}\" <{user}>", message.sender_name.replace('"', "'")),
            to,
            bcc: self.config.bcc.as_deref().filter(|b| !b.is_empty()),
            reply_to: &message.reply_to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .client
            .post(endpoint)
            .basic_auth(user, Some(pass))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RelayError::Connection(e.to_string())
                } else {
                    RelayError::Other(e.to_string())
                }
            })?;

        match response.status() {
            s if s.is_success() => Ok(()),
            s @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(RelayError::Authentication(format!("relay answered {s}")))
            }
            s => Err(RelayError::Rejected { status: s.as_u16() }),
        }
    }
}
