use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::app::error::{settle, ApiError};
use crate::app::services::forwarding_service::ForwardingService;
use crate::conversation::backend::{ChatBackend, ChatReply};
use crate::conversation::conversation::{Conversation, SubmitError};

pub const MAX_SESSIONS: usize = 10_000;

type SessionMap = Arc<RwLock<HashMap<String, Conversation>>>;

/// Sends chat queries straight into the forwarding service, reading the
/// result exactly as the JSON endpoint would return it. A request that never
/// got an HTTP answer is an `Err`; every webhook answer becomes a reply.
pub struct ForwardingBackend {
  forwarding: Arc<ForwardingService>,
}

impl ForwardingBackend {
  pub fn new(forwarding: Arc<ForwardingService>) -> Self {
    ForwardingBackend { forwarding }
  }
}

#[async_trait]
impl ChatBackend for ForwardingBackend {
  async fn send(&self, query: &str) -> Result<ChatReply, String> {
    let payload: Value = match settle(self.forwarding.forward(query).await) {
      Ok(value) => value,
      Err(ApiError::Forward(e)) => return Err(e.to_string()),
      Err(e) => {
        log::error!("API Error details: {}", e);
        e.payload()
      }
    };
    Ok(ChatReply::from_value(&payload))
  }
}

/// One conversation per browser session. Entries are created by the first
/// submit and the least recently active idle ones are evicted past the limit.
pub struct SessionService {
  sessions: SessionMap,
  backend: Arc<dyn ChatBackend>,
  max_sessions: usize,
}

impl SessionService {
  pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
    Self::with_limit(backend, MAX_SESSIONS)
  }

  pub fn with_limit(backend: Arc<dyn ChatBackend>, max_sessions: usize) -> Self {
    SessionService { sessions: Arc::new(RwLock::new(HashMap::new())), backend, max_sessions }
  }

  /// Unknown sessions get a fresh greeting without being stored.
  pub async fn snapshot(&self, session_id: &str) -> Conversation {
    match self.sessions.read().await.get(session_id) {
      Some(conversation) => conversation.clone(),
      None => Conversation::with_id(session_id),
    }
  }

  /// The reply is awaited in a detached task, so the conversation is completed
  /// even when the caller goes away. The map lock is not held meanwhile.
  pub async fn submit(&self, session_id: &str, input: &str) -> Result<(), SubmitError> {
    let query: String = {
      let mut sessions = self.sessions.write().await;
      match sessions.get_mut(session_id) {
        Some(conversation) => conversation.begin(input)?,
        None => {
          let mut conversation: Conversation = Conversation::with_id(session_id);
          let query: String = conversation.begin(input)?;
          evict_idle(&mut sessions, self.max_sessions);
          sessions.insert(session_id.to_string(), conversation);
          query
        }
      }
    };

    log::info!("Session {} asked about '{}'", session_id, query);

    let sessions: SessionMap = self.sessions.clone();
    let backend: Arc<dyn ChatBackend> = self.backend.clone();
    let id: String = session_id.to_string();
    let reply = actix_web::rt::spawn(async move {
      let result: Result<ChatReply, String> = backend.send(&query).await;
      complete(&sessions, &id, result).await;
    });

    if let Err(e) = reply.await {
      log::error!("Reply task for session {} failed: {}", session_id, e);
      complete(&self.sessions, session_id, Err(e.to_string())).await;
    }
    Ok(())
  }

  pub async fn session_count(&self) -> usize {
    self.sessions.read().await.len()
  }
}

async fn complete(sessions: &RwLock<HashMap<String, Conversation>>, session_id: &str, result: Result<ChatReply, String>) {
  let mut sessions = sessions.write().await;
  match sessions.get_mut(session_id) {
    Some(conversation) if conversation.in_flight() => conversation.complete(result),
    Some(_) => log::warn!("Session {} got a reply it was not waiting for", session_id),
    None => log::warn!("Session {} vanished before its reply arrived", session_id),
  }
}

/// Makes room for one more session. Busy sessions are never evicted.
fn evict_idle(sessions: &mut HashMap<String, Conversation>, limit: usize) {
  while sessions.len() >= limit {
    let oldest: Option<String> = sessions.values()
      .filter(|conversation| !conversation.in_flight())
      .min_by_key(|conversation| conversation.last_activity())
      .map(|conversation| conversation.id.clone());

    match oldest {
      Some(id) => {
        log::debug!("Evicting idle session {}", id);
        sessions.remove(&id);
      }
      None => {
        log::warn!("All {} sessions are busy, none evicted", sessions.len());
        break;
      }
    }
  }
}
