use actix_web::{web, App};
use std::sync::Arc;

use crate::app::config::Config;
use crate::app::routes::routes::Routes;
use crate::conversation::backend::ChatBackend;
use crate::render::templates::TemplateEngine;
use crate::webhook::transport::{ReqwestTransport, WebhookTransport};

use super::controller::chat_controller::ChatController;
use super::services::forwarding_service::ForwardingService;
use super::services::session_service::{ForwardingBackend, SessionService};

/// Built once per process and shared by every worker.
#[derive(Clone)]
pub struct AppState {
  pub chat_controller: Arc<ChatController>
}

impl AppState {

  pub fn new(app_config: &Config) -> anyhow::Result<Self> {
    Self::with_transport(app_config.clone(), Arc::new(ReqwestTransport::new()))
  }

  pub fn with_transport(app_config: Config, transport: Arc<dyn WebhookTransport>) -> anyhow::Result<Self> {
    let forwarding: Arc<ForwardingService> = Arc::new(ForwardingService::new(app_config, transport));
    let backend: Arc<dyn ChatBackend> = Arc::new(ForwardingBackend::new(forwarding.clone()));
    let sessions: Arc<SessionService> = Arc::new(SessionService::new(backend));
    let templates: Arc<TemplateEngine> = Arc::new(TemplateEngine::new()?);
    let chat_controller: Arc<ChatController> = Arc::new(ChatController::new(forwarding, sessions, templates));
    Ok(AppState { chat_controller })
  }
}

pub struct CreateApp {
  app_state: AppState,
}

impl CreateApp {
  pub fn with_state(app_state: AppState) -> Self {
    CreateApp { app_state }
  }

  pub fn build_app(&self,) -> App<impl actix_web::dev::ServiceFactory<actix_web::dev::ServiceRequest,Config = (),Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,Error = actix_web::Error,InitError = (),>,> {
    App::new()
    .app_data(web::Data::new(self.app_state.chat_controller.clone()))
    .configure(Routes::configure)
  }
}
