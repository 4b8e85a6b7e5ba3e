use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use config::{Config, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// Constants
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
const ENV_PREFIX: &str = "AICOMMIT";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: i64 = 30;
const DEFAULT_MAX_DIFF_CHARS: i64 = 100_000;

#[derive(Error, Debug)]
pub enum SettingsError {
  #[error("GEMINI_API_KEY environment variable is not set")]
  MissingApiKey,

  #[error("Invalid base_url {value:?}: {source}")]
  InvalidBaseUrl {
    value:  String,
    #[source]
    source: url::ParseError
  },

  #[error("Configuration option model must not be empty")]
  BlankModel,

  #[error("Configuration option {0} must be greater than zero")]
  Zero(&'static str),

  #[error("Failed to load configuration: {0}")]
  Load(#[from] config::ConfigError)
}

pub type Result<T, E = SettingsError> = std::result::Result<T, E>;

/// The Gemini API key. Never printed, not even by `{:?}`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
  pub fn new(value: impl Into<String>) -> Result<Self> {
    let value = value.into().trim().to_string();
    if value.is_empty() {
      return Err(SettingsError::MissingApiKey);
    }
    Ok(Self(value))
  }

  pub fn from_env() -> Result<Self> {
    std::env::var(API_KEY_VAR)
      .map_err(|_| SettingsError::MissingApiKey)
      .and_then(Self::new)
  }

  pub fn expose(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for ApiKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ApiKey(***)")
  }
}

/// Raw values as they come out of the layered config sources.
#[derive(Debug, Deserialize, PartialEq, Eq)]
struct App {
  model:             String,
  base_url:          String,
  timeout:           u64,
  max_diff_chars:    usize,
  max_output_tokens: Option<u32>
}

#[derive(Debug, Clone)]
pub struct Settings {
  pub api_key:           ApiKey,
  pub model:             String,
  pub base_url:          Url,
  pub timeout:           Duration,
  pub max_diff_chars:    usize,
  pub max_output_tokens: Option<u32>
}

impl Settings {
  /// Reads the API key from the environment, then layers defaults, the
  /// optional `~/.config/git-ai-commit/config.ini` and `AICOMMIT_*` variables.
  pub fn load() -> Result<Self> {
    Self::load_with_model(None)
  }

  /// Same as [`Settings::load`], with `model` taking precedence over every
  /// configured source.
  pub fn load_with_model(model: Option<String>) -> Result<Self> {
    let api_key = ApiKey::from_env()?;

    let mut builder = Config::builder()
      .set_default("model", DEFAULT_MODEL)?
      .set_default("base_url", DEFAULT_BASE_URL)?
      .set_default("timeout", DEFAULT_TIMEOUT)?
      .set_default("max_diff_chars", DEFAULT_MAX_DIFF_CHARS)?;

    if let Some(file) = config_file() {
      log::debug!("Reading config from {}", file.display());
      builder = builder.add_source(config::File::new(file.to_string_lossy().as_ref(), FileFormat::Ini).required(false));
    }

    let mut app: App = builder
      .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
      .build()?
      .try_deserialize()?;

    if let Some(model) = model {
      app.model = model;
    }

    Self::from_app(api_key, app)
  }

  /// Built-in defaults with the given key, ignoring files and environment.
  pub fn with_api_key(api_key: ApiKey) -> Result<Self> {
    Self::from_app(api_key, App {
      model:             DEFAULT_MODEL.to_string(),
      base_url:          DEFAULT_BASE_URL.to_string(),
      timeout:           DEFAULT_TIMEOUT as u64,
      max_diff_chars:    DEFAULT_MAX_DIFF_CHARS as usize,
      max_output_tokens: None
    })
  }

  fn from_app(api_key: ApiKey, app: App) -> Result<Self> {
    if app.model.trim().is_empty() {
      return Err(SettingsError::BlankModel);
    }

    if app.timeout == 0 {
      return Err(SettingsError::Zero("timeout"));
    }

    if app.max_diff_chars == 0 {
      return Err(SettingsError::Zero("max_diff_chars"));
    }

    let base_url = Url::parse(&app.base_url).map_err(|source| SettingsError::InvalidBaseUrl { value: app.base_url.clone(), source })?;

    Ok(Self {
      api_key,
      model: app.model.trim().to_string(),
      base_url,
      timeout: Duration::from_secs(app.timeout),
      max_diff_chars: app.max_diff_chars,
      max_output_tokens: app.max_output_tokens
    })
  }
}

fn config_file() -> Option<PathBuf> {
  home::home_dir().map(|home| home.join(".config/git-ai-commit/config.ini"))
}
