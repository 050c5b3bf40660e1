use serde_json::{json, Value};

use crate::webhook::matchers::ErrorMatcher;
use crate::webhook::models::{Outcome, WebhookReply};

pub const EMPTY_NOTICE: &str = "The analysis service returned an empty response. Please try again.";

/// Normalizes a raw body into an `{ "analysis": .. }`-shaped value.
/// A JSON body is passed through as parsed.
pub fn classify_body(content_type: Option<&str>, body: &str) -> Value {
  if body.trim().is_empty() {
    log::warn!("Webhook returned an empty response.");
    return json!({ "analysis": EMPTY_NOTICE });
  }

  let is_json: bool = content_type.map_or(false, |ct| ct.contains("application/json"));
  if !is_json {
    return json!({ "analysis": body });
  }

  match serde_json::from_str::<Value>(body) {
    Ok(value) => value,
    Err(e) => {
      log::error!("Failed to parse JSON response: {}", e);
      json!({ "analysis": body })
    }
  }
}

/// Body first, then status. First matching vendor matcher wins.
pub fn classify(reply: &WebhookReply, resolved_url: &str, matchers: &[ErrorMatcher]) -> Outcome {
  let data: Value = classify_body(reply.content_type.as_deref(), &reply.body);
  log::debug!("Webhook processed data: {}", data);

  if reply.is_success() {
    return Outcome::Success(data);
  }

  match matchers.iter().find(|matcher| matcher.matches(reply.status, &data, resolved_url)) {
    Some(matcher) => Outcome::Known(matcher.to_failure()),
    None => Outcome::Upstream(reply.status),
  }
}
