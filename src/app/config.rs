use std::env;
use std::fmt;
use std::str::FromStr;

use log;

use crate::webhook::matchers::{n8n_defaults, ErrorMatcher};

pub const DEV_FALLBACK_URL: &str = "https://n8n.srv1031893.hstgr.cloud/webhook-test/61743c7f-648d-493d-ba76-708860eddd12";
pub const PROD_FALLBACK_URL: &str = "https://n8n.srv1031893.hstgr.cloud/webhook/61743c7f-648d-493d-ba76-708860eddd12";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
  Development,
  Production,
  Mock,
}

impl RunMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      RunMode::Development => "development",
      RunMode::Production => "production",
      RunMode::Mock => "mock",
    }
  }
}

impl fmt::Display for RunMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for RunMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "development" | "dev" => Ok(RunMode::Development),
      "production" | "prod" => Ok(RunMode::Production),
      "mock" => Ok(RunMode::Mock),
      _ => Err(format!("Unknown run mode: {}", s)),
    }
  }
}

/// Where a chat message ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookTarget {
  Url(String),
  Mock,
}

impl fmt::Display for WebhookTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      WebhookTarget::Url(url) => write!(f, "{}", url),
      WebhookTarget::Mock => write!(f, "mock"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub webhook_url: Option<String>,
  pub mode: RunMode,
  pub host: String,
  pub port: u16,
  pub error_matchers: Vec<ErrorMatcher>,
}

impl Config {
  #[allow(unused)]
  pub fn new(webhook_url: Option<&str>, mode: RunMode) -> Self {
    Config {
      webhook_url: webhook_url.map(String::from),
      mode,
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
      error_matchers: n8n_defaults(),
    }
  }

  pub fn load() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup; `load` passes the process environment.
  pub fn from_lookup<F>(lookup: F) -> Self where F: Fn(&str) -> Option<String> {
    let webhook_url: Option<String> = lookup("N8N_WEBHOOK_URL").filter(|url| !url.trim().is_empty());

    let mode: RunMode = match lookup("APP_ENV") {
      Some(raw) => raw.parse().unwrap_or_else(|e: String| {
        log::error!("{}, using production", e);
        RunMode::Production
      }),
      None => RunMode::Production,
    };

    let host: String = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port: u16 = match lookup("PORT") {
      Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
        log::error!("Invalid PORT '{}', using default {}", raw, DEFAULT_PORT);
        DEFAULT_PORT
      }),
      None => DEFAULT_PORT,
    };

    return Config { webhook_url, mode, host, port, error_matchers: n8n_defaults() };
  }

  pub fn resolve_target(&self) -> WebhookTarget {
    if let Some(url) = self.webhook_url.as_deref().map(str::trim).filter(|url| !url.is_empty()) {
      return WebhookTarget::Url(url.to_string());
    }

    match self.mode {
      RunMode::Mock => WebhookTarget::Mock,
      RunMode::Development => {
        log::warn!("N8N_WEBHOOK_URL not set. Using dev fallback: {}", DEV_FALLBACK_URL);
        WebhookTarget::Url(DEV_FALLBACK_URL.to_string())
      }
      RunMode::Production => {
        log::warn!("N8N_WEBHOOK_URL not set in production. Using default production URL.");
        WebhookTarget::Url(PROD_FALLBACK_URL.to_string())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn from_pairs(pairs: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Config::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn explicit_url_wins_over_mode() {
    let config = Config::new(Some("https://hooks.example.com/webhook/1"), RunMode::Mock);
    assert_eq!(config.resolve_target(), WebhookTarget::Url("https://hooks.example.com/webhook/1".to_string()));
  }

  #[test]
  fn fallbacks_follow_mode() {
    assert_eq!(Config::new(None, RunMode::Development).resolve_target(), WebhookTarget::Url(DEV_FALLBACK_URL.to_string()));
    assert_eq!(Config::new(None, RunMode::Production).resolve_target(), WebhookTarget::Url(PROD_FALLBACK_URL.to_string()));
    assert_eq!(Config::new(None, RunMode::Mock).resolve_target(), WebhookTarget::Mock);
  }

  #[test]
  fn blank_url_counts_as_unset() {
    assert_eq!(Config::new(Some("   "), RunMode::Mock).resolve_target(), WebhookTarget::Mock);
  }

  #[test]
  fn dev_fallback_is_the_test_webhook() {
    assert!(DEV_FALLBACK_URL.contains("/webhook-test/"));
    assert!(!PROD_FALLBACK_URL.contains("/webhook-test/"));
  }

  #[test]
  fn loads_from_lookup() {
    let config = from_pairs(&[("N8N_WEBHOOK_URL", "https://h.example.com/webhook/2"), ("APP_ENV", "Development"), ("HOST", "0.0.0.0"), ("PORT", "3000")]);
    assert_eq!(config.webhook_url.as_deref(), Some("https://h.example.com/webhook/2"));
    assert_eq!(config.mode, RunMode::Development);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 3000);
    assert_eq!(config.error_matchers.len(), 2);
  }

  #[test]
  fn bad_values_fall_back_to_defaults() {
    let config = from_pairs(&[("APP_ENV", "staging"), ("PORT", "eighty")]);
    assert_eq!(config.webhook_url, None);
    assert_eq!(config.mode, RunMode::Production);
    assert_eq!(config.port, 8080);
    assert_eq!(config.host, "127.0.0.1");
  }
}
