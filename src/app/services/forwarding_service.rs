use std::sync::Arc;
use reqwest::Url;

use crate::app::config::{Config, RunMode, WebhookTarget};
use crate::webhook::classify::classify;
use crate::webhook::mock::mock_payload;
use crate::webhook::models::{ForwardError, Outcome, WebhookReply};
use crate::webhook::transport::WebhookTransport;

pub const STOCK_PARAM: &str = "stock";

pub struct ForwardingService {
  config: Config,
  transport: Arc<dyn WebhookTransport>,
}

impl ForwardingService {
  pub fn new(config: Config, transport: Arc<dyn WebhookTransport>) -> Self {
    ForwardingService { config, transport }
  }

  pub fn target(&self) -> WebhookTarget {
    self.config.resolve_target()
  }

  pub fn mode(&self) -> RunMode {
    self.config.mode
  }

  /// One message, at most one outbound request.
  pub async fn forward(&self, message: &str) -> Result<Outcome, ForwardError> {
    let base: String = match self.config.resolve_target() {
      WebhookTarget::Url(url) => url,
      WebhookTarget::Mock => {
        log::info!("Mock mode, answering '{}' locally", message);
        return Ok(Outcome::Success(mock_payload(message)));
      }
    };

    log::info!("Using webhook URL: {}", base);
    let url: Url = build_request_url(&base, message)?;

    let reply: WebhookReply = self.transport.get(&url).await?;
    let outcome: Outcome = classify(&reply, url.path(), &self.config.error_matchers);

    match &outcome {
      Outcome::Success(_) => log::info!("Webhook answered '{}' with status {}", message, reply.status),
      Outcome::Known(failure) => log::error!("Webhook failed with a known condition: {}", failure.error),
      Outcome::Upstream(status) => log::error!("Webhook responded with status: {}", status),
    }

    return Ok(outcome);
  }
}

/// Appends the message as the `stock` query parameter, keeping any existing ones.
pub fn build_request_url(base: &str, message: &str) -> Result<Url, ForwardError> {
  let mut url: Url = Url::parse(base).map_err(|e| ForwardError::InvalidUrl { url: base.to_string(), reason: e.to_string() })?;
  url.query_pairs_mut().append_pair(STOCK_PARAM, message);
  Ok(url)
}
