use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};

use crate::webhook::models::{ForwardError, WebhookReply};

#[async_trait]
pub trait WebhookTransport: Send + Sync {
  async fn get(&self, url: &Url) -> Result<WebhookReply, ForwardError>;
}

pub struct ReqwestTransport {
  client: Client,
}

impl ReqwestTransport {
  pub fn new() -> Self {
    ReqwestTransport { client: Client::new() }
  }

  fn headers() -> HeaderMap {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    return headers;
  }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
  async fn get(&self, url: &Url) -> Result<WebhookReply, ForwardError> {
    let response: Response = self.client.get(url.clone()).headers(Self::headers()).send().await
      .map_err(|e| ForwardError::Transport(e.to_string()))?;

    let status: u16 = response.status().as_u16();
    log::info!("Webhook response status: {}", status);

    let content_type: Option<String> = response.headers().get(CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .map(String::from);
    let body: String = response.text().await.map_err(|e| ForwardError::Body(e.to_string()))?;
    log::debug!("Webhook raw response: {}", body);

    Ok(WebhookReply { status, content_type, body })
  }
}
