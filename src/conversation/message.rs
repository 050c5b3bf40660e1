use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub id: String,
  pub role: Role,
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data: Option<Value>, // stock metrics, passed through as received
  pub created_at: DateTime<Utc>,
}

impl Message {
  pub fn user(content: &str) -> Self {
    Message::new(Role::User, content, None)
  }

  pub fn assistant(content: &str, data: Option<Value>) -> Self {
    Message::new(Role::Assistant, content, data)
  }

  fn new(role: Role, content: &str, data: Option<Value>) -> Self {
    Message { id: Uuid::new_v4().to_string(), role, content: content.to_string(), data, created_at: Utc::now() }
  }
}
