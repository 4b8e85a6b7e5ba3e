//! Client for the Gemini `generateContent` endpoint.
//!
//! One request per call. Failures are classified (timeout, transport,
//! authentication, HTTP status, malformed body, empty completion) and
//! returned as-is; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ApiKey, Settings};

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum ApiError {
  #[error("Gemini API request timed out after {0} seconds")]
  Timeout(u64),

  #[error("Network error while contacting the Gemini API: {0}")]
  Network(#[source] reqwest::Error),

  #[error("Gemini API authentication failed (HTTP {status}): {message}. Please check your GEMINI_API_KEY")]
  Unauthorized { status: u16, message: String },

  #[error("Gemini API returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("Failed to parse Gemini API response: {0}")]
  Decode(#[source] serde_json::Error),

  #[error("Gemini API returned no completion text")]
  EmptyCompletion
}

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Anything that turns a prompt into a completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
  async fn complete(&self, prompt: &str) -> Result<String>;
}

mod request {
  use super::*;

  #[derive(Debug, Serialize)]
  pub struct Generate<'a> {
    pub contents: Vec<Content<'a>>,

    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>
  }

  #[derive(Debug, Serialize)]
  pub struct Content<'a> {
    pub parts: Vec<Part<'a>>
  }

  #[derive(Debug, Serialize)]
  pub struct Part<'a> {
    pub text: &'a str
  }

  #[derive(Debug, Serialize)]
  pub struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32
  }
}

mod response {
  use super::*;

  #[derive(Debug, Deserialize)]
  pub struct Generate {
    #[serde(default)]
    pub candidates: Vec<Candidate>
  }

  #[derive(Debug, Deserialize)]
  pub struct Candidate {
    pub content: Option<Content>
  }

  #[derive(Debug, Deserialize)]
  pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>
  }

  #[derive(Debug, Deserialize)]
  pub struct Part {
    pub text: Option<String>
  }

  #[derive(Debug, Deserialize)]
  pub struct Error {
    pub error: ErrorDetail
  }

  #[derive(Debug, Deserialize)]
  pub struct ErrorDetail {
    #[serde(default)]
    pub message: String
  }
}

pub struct Client {
  http:              reqwest::Client,
  endpoint:          String,
  api_key:           ApiKey,
  timeout:           Duration,
  max_output_tokens: Option<u32>
}

impl Client {
  pub fn new(settings: &Settings) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(settings.timeout)
      .build()
      .map_err(ApiError::Network)?;

    Ok(Self {
      http,
      endpoint: endpoint(settings),
      api_key: settings.api_key.clone(),
      timeout: settings.timeout,
      max_output_tokens: settings.max_output_tokens
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  pub async fn generate(&self, prompt: &str) -> Result<String> {
    let payload = request::Generate {
      contents:          vec![request::Content { parts: vec![request::Part { text: prompt }] }],
      generation_config: self
        .max_output_tokens
        .map(|max_output_tokens| request::GenerationConfig { max_output_tokens })
    };

    log::debug!("[gemini] POST {} ({} prompt bytes)", self.endpoint, prompt.len());

    let response = self
      .http
      .post(&self.endpoint)
      .header(API_KEY_HEADER, self.api_key.expose())
      .json(&payload)
      .send()
      .await
      .map_err(|err| self.transport_error(err))?;

    let status = response.status();
    let body = response.text().await.map_err(|err| self.transport_error(err))?;
    log::debug!("[gemini] HTTP {} ({} body bytes)", status, body.len());

    if !status.is_success() {
      return Err(status_error(status, &body));
    }

    let parsed: response::Generate = serde_json::from_str(&body).map_err(ApiError::Decode)?;
    let text = parsed
      .candidates
      .into_iter()
      .next()
      .and_then(|candidate| candidate.content)
      .map(|content| {
        content
          .parts
          .into_iter()
          .filter_map(|part| part.text)
          .collect::<String>()
      })
      .unwrap_or_default();

    if text.trim().is_empty() {
      return Err(ApiError::EmptyCompletion);
    }

    Ok(text)
  }

  fn transport_error(&self, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
      ApiError::Timeout(self.timeout.as_secs())
    } else {
      ApiError::Network(err)
    }
  }
}

#[async_trait]
impl CompletionProvider for Client {
  async fn complete(&self, prompt: &str) -> Result<String> {
    self.generate(prompt).await
  }
}

fn endpoint(settings: &Settings) -> String {
  let model = settings.model.trim_start_matches("models/");
  format!("{}/models/{}:generateContent", settings.base_url.as_str().trim_end_matches('/'), model)
}

fn status_error(status: StatusCode, body: &str) -> ApiError {
  let message = match serde_json::from_str::<response::Error>(body) {
    Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
    _ if body.trim().is_empty() => status.canonical_reason().unwrap_or("unknown status").to_string(),
    _ => body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
  };

  // Gemini answers an invalid key with 400 INVALID_ARGUMENT
  let invalid_key = body.contains("API_KEY_INVALID") || message.to_lowercase().contains("api key not valid");

  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized { status: status.as_u16(), message },
    StatusCode::BAD_REQUEST if invalid_key => ApiError::Unauthorized { status: status.as_u16(), message },
    _ => ApiError::Status { status: status.as_u16(), message }
  }
}
