use serde_json::Value;
use thiserror::Error;

/// What came back from the webhook, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
  pub status: u16,
  pub content_type: Option<String>,
  pub body: String,
}

impl WebhookReply {
  #[allow(unused)]
  pub fn new(status: u16, content_type: Option<&str>, body: &str) -> Self {
    WebhookReply { status, content_type: content_type.map(String::from), body: body.to_string() }
  }

  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownFailure {
  pub status: u16,
  pub error: String,
  pub details: String,
  pub hint: String,
}

/// Result of classifying one webhook reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Success(Value),
  Known(KnownFailure),
  Upstream(u16),
}

#[derive(Debug, Error)]
pub enum ForwardError {
  #[error("Invalid webhook URL '{url}': {reason}")]
  InvalidUrl { url: String, reason: String },
  #[error("Webhook request failed: {0}")]
  Transport(String),
  #[error("Failed to read webhook response: {0}")]
  Body(String),
}
