use serde_json::Value;

use crate::webhook::models::KnownFailure;

pub const UNUSED_RESPOND_NODE: &str = "Unused Respond to Webhook node";
pub const TEST_WEBHOOK_SEGMENT: &str = "/webhook-test/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
  /// Substring of the `message` field of the normalized body.
  BodyMessageContains(String),
  /// Substring of the URL the request was sent to.
  UrlContains(String),
}

/// Maps a vendor-specific failure to a dedicated error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMatcher {
  pub status: u16,
  pub rule: MatchRule,
  pub error: String,
  pub details: String,
  pub hint: String,
}

impl ErrorMatcher {
  pub fn new(status: u16, rule: MatchRule, error: &str, details: &str, hint: &str) -> Self {
    ErrorMatcher { status, rule, error: error.to_string(), details: details.to_string(), hint: hint.to_string() }
  }

  pub fn matches(&self, status: u16, body: &Value, resolved_url: &str) -> bool {
    if status != self.status {
      return false;
    }

    match &self.rule {
      MatchRule::BodyMessageContains(needle) => body.get("message").and_then(Value::as_str).map_or(false, |message| message.contains(needle.as_str())),
      MatchRule::UrlContains(needle) => resolved_url.contains(needle.as_str()),
    }
  }

  pub fn to_failure(&self) -> KnownFailure {
    KnownFailure {
      status: self.status,
      error: self.error.clone(),
      details: self.details.clone(),
      hint: self.hint.clone(),
    }
  }
}

/// The two n8n conditions worth a dedicated message.
pub fn n8n_defaults() -> Vec<ErrorMatcher> {
  vec![
    ErrorMatcher::new(
      500,
      MatchRule::BodyMessageContains(UNUSED_RESPOND_NODE.to_string()),
      "n8n Configuration Error",
      "Your n8n workflow has an 'Unused Respond to Webhook' node.",
      "In n8n, make sure your 'Respond to Webhook' node is actually connected to the workflow path and is the final node being executed.",
    ),
    ErrorMatcher::new(
      404,
      MatchRule::UrlContains(TEST_WEBHOOK_SEGMENT.to_string()),
      "Webhook Not Active",
      "Your n8n test webhook is not active. Please click 'Execute Workflow' in n8n and try again, or use a Production Webhook URL.",
      "Test webhooks in n8n only stay active for one request after clicking Execute.",
    ),
  ]
}
