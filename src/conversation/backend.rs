use async_trait::async_trait;
use serde_json::Value;

/// What the client reads out of a chat response body. Both the success shape
/// `{ analysis, stockData? }` and the error shape `{ error, details?, hint? }` fit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatReply {
  pub analysis: Option<String>,
  pub stock_data: Option<Value>,
  pub error: Option<String>,
  pub details: Option<String>,
  pub hint: Option<String>,
}

impl ChatReply {
  /// Reads the known keys and ignores the rest; wrong types count as missing.
  pub fn from_value(value: &Value) -> Self {
    let text = |key: &str| -> Option<String> { value.get(key).and_then(Value::as_str).map(String::from) };

    ChatReply {
      analysis: text("analysis"),
      stock_data: value.get("stockData").filter(|data| !data.is_null()).cloned(),
      error: text("error"),
      details: text("details"),
      hint: text("hint"),
    }
  }

  #[allow(unused)]
  pub fn analysis(text: &str) -> Self {
    ChatReply { analysis: Some(text.to_string()), ..Default::default() }
  }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
  /// `Err` means no response body could be read at all.
  async fn send(&self, query: &str) -> Result<ChatReply, String>;
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn reads_success_shape() {
    let reply = ChatReply::from_value(&json!({"analysis": "Buy", "stockData": {"ticker": "TCS"}, "other": 1}));
    assert_eq!(reply.analysis.as_deref(), Some("Buy"));
    assert_eq!(reply.stock_data, Some(json!({"ticker": "TCS"})));
    assert_eq!(reply.error, None);
  }

  #[test]
  fn wrong_types_are_missing() {
    let reply = ChatReply::from_value(&json!({"analysis": 12, "stockData": null}));
    assert_eq!(reply, ChatReply::default());
    assert_eq!(ChatReply::from_value(&json!("just a string")), ChatReply::default());
  }
}
