use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::conversation::backend::{ChatBackend, ChatReply};
use crate::conversation::message::Message;

pub const GREETING: &str = "Hello! Which stock would you like me to analyze today? Just provide the ticker or company name.";
pub const DEFAULT_ANALYSIS: &str = "I've analyzed the stock for you.";
pub const CLIENT_ERROR: &str = "Sorry, I encountered an error analyzing that stock.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
  #[error("Nothing to analyze, the message is empty")]
  Empty,
  #[error("An analysis is already in progress")]
  Busy,
}

/// Append-only message list plus the "request in flight" flag.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
  pub id: String,
  messages: Vec<Message>,
  in_flight: bool,
}

impl Conversation {
  #[allow(unused)]
  pub fn new() -> Self {
    Self::with_id(&Uuid::new_v4().to_string())
  }

  pub fn with_id(id: &str) -> Self {
    Conversation { id: id.to_string(), messages: vec![Message::assistant(GREETING, None)], in_flight: false }
  }

  pub fn messages(&self) -> &[Message] {
    &self.messages
  }

  pub fn in_flight(&self) -> bool {
    self.in_flight
  }

  /// Time of the newest message.
  pub fn last_activity(&self) -> Option<DateTime<Utc>> {
    self.messages.last().map(|message| message.created_at)
  }

  /// Records the user message and marks the conversation busy.
  /// Returns the trimmed query to send.
  pub fn begin(&mut self, input: &str) -> Result<String, SubmitError> {
    let query: &str = input.trim();
    if query.is_empty() {
      return Err(SubmitError::Empty);
    }
    if self.in_flight {
      return Err(SubmitError::Busy);
    }

    self.messages.push(Message::user(query));
    self.in_flight = true;
    return Ok(query.to_string());
  }

  /// Appends exactly one assistant message and clears the busy flag.
  pub fn complete(&mut self, result: Result<ChatReply, String>) {
    let message: Message = match result {
      Ok(reply) => Message::assistant(&reply_text(&reply), reply.stock_data),
      Err(e) => {
        log::error!("Chat Error: {}", e);
        Message::assistant(CLIENT_ERROR, None)
      }
    };

    self.messages.push(message);
    self.in_flight = false;
  }

  /// One full round trip against `backend`.
  #[allow(unused)]
  pub async fn submit(&mut self, input: &str, backend: &dyn ChatBackend) -> Result<(), SubmitError> {
    let query: String = self.begin(input)?;
    let result: Result<ChatReply, String> = backend.send(&query).await;
    self.complete(result);
    Ok(())
  }
}

fn reply_text(reply: &ChatReply) -> String {
  if let Some(analysis) = reply.analysis.as_deref().filter(|text| !text.is_empty()) {
    return analysis.to_string();
  }

  match reply.error.as_deref() {
    Some(error) => {
      let mut text: String = format!("**{}**", error);
      if let Some(details) = reply.details.as_deref() {
        text.push_str(&format!("\n\n{}", details));
      }
      if let Some(hint) = reply.hint.as_deref() {
        text.push_str(&format!("\n\n> {}", hint));
      }
      text
    }
    None => DEFAULT_ANALYSIS.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::conversation::message::Role;
  use async_trait::async_trait;
  use serde_json::json;

  struct FixedBackend(Result<ChatReply, String>);

  #[async_trait]
  impl ChatBackend for FixedBackend {
    async fn send(&self, _query: &str) -> Result<ChatReply, String> {
      self.0.clone()
    }
  }

  #[test]
  fn starts_with_greeting() {
    let conversation = Conversation::new();
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(conversation.messages()[0].role, Role::Assistant);
    assert_eq!(conversation.messages()[0].content, GREETING);
    assert!(!conversation.in_flight());
  }

  #[actix_web::test]
  async fn successful_round_trip_adds_two_messages() {
    let mut conversation = Conversation::new();
    let reply = ChatReply { analysis: Some("## TCS\nSolid".to_string()), stock_data: Some(json!({"ticker": "TCS"})), ..Default::default() };

    conversation.submit("  TCS ", &FixedBackend(Ok(reply))).await.unwrap();

    let messages = conversation.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "TCS");
    assert_eq!(messages[2].content, "## TCS\nSolid");
    assert_eq!(messages[2].data, Some(json!({"ticker": "TCS"})));
    assert!(!conversation.in_flight());
  }

  #[actix_web::test]
  async fn failed_round_trip_still_adds_two_messages() {
    let mut conversation = Conversation::new();
    conversation.submit("AAPL", &FixedBackend(Err("connection reset".to_string()))).await.unwrap();

    assert_eq!(conversation.messages().len(), 3);
    assert_eq!(conversation.messages()[2].content, CLIENT_ERROR);
    assert_eq!(conversation.messages()[2].data, None);
    assert!(!conversation.in_flight());
  }

  #[actix_web::test]
  async fn blank_input_is_refused() {
    let mut conversation = Conversation::new();
    let result = conversation.submit("   ", &FixedBackend(Ok(ChatReply::analysis("x")))).await;
    assert_eq!(result, Err(SubmitError::Empty));
    assert_eq!(conversation.messages().len(), 1);
  }

  #[test]
  fn second_submit_while_busy_is_refused() {
    let mut conversation = Conversation::new();
    assert_eq!(conversation.begin("AAPL"), Ok("AAPL".to_string()));
    assert_eq!(conversation.begin("MSFT"), Err(SubmitError::Busy));
    assert_eq!(conversation.messages().len(), 2);

    conversation.complete(Ok(ChatReply::analysis("done")));
    assert!(!conversation.in_flight());
    assert!(conversation.begin("MSFT").is_ok());
  }

  #[test]
  fn reply_without_analysis_gets_default_text() {
    let mut conversation = Conversation::new();
    conversation.begin("AAPL").unwrap();
    conversation.complete(Ok(ChatReply::default()));
    assert_eq!(conversation.messages()[2].content, DEFAULT_ANALYSIS);
  }

  #[test]
  fn error_reply_is_shown_with_hint() {
    let reply = ChatReply::from_value(&json!({"error": "Webhook Not Active", "details": "Click Execute.", "hint": "Test webhooks expire."}));
    let text: String = reply_text(&reply);
    assert!(text.starts_with("**Webhook Not Active**"));
    assert!(text.contains("Click Execute."));
    assert!(text.contains("> Test webhooks expire."));
  }
}
