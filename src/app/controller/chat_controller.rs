use std::sync::Arc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::error::{settle, ApiError};
use crate::app::services::forwarding_service::ForwardingService;
use crate::app::services::session_service::SessionService;
use crate::conversation::conversation::{Conversation, SubmitError};
use crate::render::templates::TemplateEngine;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
  pub message: String,
}

pub struct ChatController {
  forwarding: Arc<ForwardingService>,
  sessions: Arc<SessionService>,
  templates: Arc<TemplateEngine>,
}

impl ChatController {
  pub fn new(forwarding: Arc<ForwardingService>, sessions: Arc<SessionService>, templates: Arc<TemplateEngine>) -> Self {
    ChatController { forwarding, sessions, templates }
  }

  /// `POST /api/chat`. The raw body is parsed here so a malformed request
  /// lands in the same error shape as every other failure.
  pub async fn chat(&self, body: &[u8]) -> Result<Value, ApiError> {
    let result: Result<Value, ApiError> = match serde_json::from_slice::<ChatRequest>(body) {
      Ok(request) => {
        log::info!("Webhook request started for message: {}", request.message);
        settle(self.forwarding.forward(&request.message).await)
      }
      Err(e) => Err(ApiError::InvalidRequest(e.to_string())),
    };

    if let Err(e) = &result {
      log::error!("API Error details: {}", e);
    }
    return result;
  }

  pub async fn page(&self, session_id: &str) -> anyhow::Result<String> {
    let conversation: Conversation = self.sessions.snapshot(session_id).await;
    self.templates.render_page(&conversation)
  }

  pub async fn submit(&self, session_id: &str, message: &str) {
    match self.sessions.submit(session_id, message).await {
      Ok(()) => {}
      Err(SubmitError::Empty) => log::debug!("Ignoring empty submit from session {}", session_id),
      Err(e) => log::warn!("Session {}: {}", session_id, e),
    }
  }

  pub async fn health(&self) -> Value {
    json!({
      "status": "ok",
      "mode": self.forwarding.mode().as_str(),
      "target": self.forwarding.target().to_string(),
      "sessions": self.sessions.session_count().await,
    })
  }
}
