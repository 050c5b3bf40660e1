use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use std::sync::Arc;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::controller::chat_controller::ChatController;
use crate::app::error::ApiError;

pub const SESSION_COOKIE: &str = "stock_chat_session";

#[derive(Deserialize)]
pub struct ChatForm {
  message: String,
}

pub struct Routes;

impl Routes {

  pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(Self::index)));
    cfg.service(web::resource("/chat").route(web::post().to(Self::submit)));
    cfg.service(web::resource("/api/chat").route(web::post().to(Self::chat)));
    cfg.service(web::resource("/health").route(web::get().to(Self::health)));
  }

  async fn health(controller: web::Data<Arc<ChatController>>) -> impl Responder {
    HttpResponse::Ok().json(controller.health().await)
  }

  async fn chat(controller: web::Data<Arc<ChatController>>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let payload = controller.chat(&body).await?;
    Ok(HttpResponse::Ok().json(payload))
  }

  async fn index(req: HttpRequest, controller: web::Data<Arc<ChatController>>) -> impl Responder {
    let (session_id, is_new) = Self::session_id(&req);

    match controller.page(&session_id).await {
      Ok(html) => {
        let mut response = HttpResponse::Ok();
        response.content_type("text/html; charset=utf-8");
        if is_new {
          response.cookie(Self::session_cookie(&session_id));
        }
        response.body(html)
      }
      Err(e) => {
        log::error!("Failed to render chat page: {}", e);
        HttpResponse::InternalServerError().content_type("text/plain; charset=utf-8").body("Failed to render chat page")
      }
    }
  }

  async fn submit(req: HttpRequest, controller: web::Data<Arc<ChatController>>, form: web::Form<ChatForm>) -> impl Responder {
    let (session_id, is_new) = Self::session_id(&req);
    controller.submit(&session_id, &form.message).await;

    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, "/"));
    if is_new {
      response.cookie(Self::session_cookie(&session_id));
    }
    response.finish()
  }

  /// Only ids this server could have issued are accepted; anything else gets a new one.
  fn session_id(req: &HttpRequest) -> (String, bool) {
    match req.cookie(SESSION_COOKIE).and_then(|cookie| Uuid::parse_str(cookie.value()).ok()) {
      Some(id) => (id.to_string(), false),
      None => (Uuid::new_v4().to_string(), true),
    }
  }

  fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_id.to_string()).path("/").http_only(true).finish()
  }
}
