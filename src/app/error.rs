use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

use crate::webhook::models::{ForwardError, KnownFailure, Outcome};

pub const GENERIC_ERROR: &str = "Failed to process request";

/// Every way `/api/chat` can fail. Each variant renders as `{ error, details, hint? }`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  InvalidRequest(String),
  #[error(transparent)]
  Forward(#[from] ForwardError),
  #[error("{}", .0.error)]
  Known(KnownFailure),
  #[error("Webhook responded with status: {0}")]
  Upstream(u16),
}

impl ApiError {
  pub fn payload(&self) -> Value {
    match self {
      ApiError::Known(failure) => json!({ "error": failure.error, "details": failure.details, "hint": failure.hint }),
      other => json!({ "error": GENERIC_ERROR, "details": other.to_string() }),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Known(failure) => StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code()).json(self.payload())
  }
}

/// Turns a forwarding result into the success body or the error to send back.
pub fn settle(result: Result<Outcome, ForwardError>) -> Result<Value, ApiError> {
  match result? {
    Outcome::Success(value) => Ok(value),
    Outcome::Known(failure) => Err(ApiError::Known(failure)),
    Outcome::Upstream(status) => Err(ApiError::Upstream(status)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::webhook::matchers::n8n_defaults;

  #[test]
  fn upstream_is_generic_500() {
    let error: ApiError = settle(Ok(Outcome::Upstream(502))).unwrap_err();
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.payload(), json!({ "error": GENERIC_ERROR, "details": "Webhook responded with status: 502" }));
  }

  #[test]
  fn known_failure_keeps_its_status_and_hint() {
    let failure: KnownFailure = n8n_defaults()[1].to_failure();
    let error: ApiError = settle(Ok(Outcome::Known(failure))).unwrap_err();
    assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(error.payload()["error"], "Webhook Not Active");
    assert!(error.payload()["hint"].is_string());
  }

  #[test]
  fn forward_error_details_carry_message() {
    let error: ApiError = settle(Err(ForwardError::Transport("dns error".to_string()))).unwrap_err();
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.payload()["details"], "Webhook request failed: dns error");
  }

  #[test]
  fn success_passes_value() {
    let value: Value = json!({"analysis": "fine"});
    assert_eq!(settle(Ok(Outcome::Success(value.clone()))).unwrap(), value);
  }
}
