//! Top-level error for the commit pipeline.
//!
//! Each variant wraps the error of the stage that failed, so callers can tell
//! a configuration problem from a git problem from an API problem and exit
//! with a matching status code.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::config::SettingsError;
use crate::gemini::ApiError;
use crate::git::GitError;

#[derive(Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Settings(#[from] SettingsError),

  #[error(transparent)]
  Git(#[from] GitError),

  #[error(transparent)]
  Api(#[from] ApiError),

  #[error("Failed to write output: {0}")]
  Output(#[from] std::io::Error)
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Where in the pipeline an error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Configuration,
  Collector,
  Api,
  Output
}

impl Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::Configuration => "configuration",
      Stage::Collector => "git",
      Stage::Api => "gemini",
      Stage::Output => "output"
    };
    write!(f, "{}", name)
  }
}

impl Error {
  pub fn stage(&self) -> Stage {
    match self {
      Error::Settings(_) => Stage::Configuration,
      Error::Git(_) => Stage::Collector,
      Error::Api(_) => Stage::Api,
      Error::Output(_) => Stage::Output
    }
  }

  /// 2 configuration, 3 git, 4 API, 1 otherwise.
  pub fn exit_code(&self) -> u8 {
    match self.stage() {
      Stage::Configuration => 2,
      Stage::Collector => 3,
      Stage::Api => 4,
      Stage::Output => 1
    }
  }

  pub fn is_auth_error(&self) -> bool {
    matches!(self, Error::Api(ApiError::Unauthorized { .. }) | Error::Settings(SettingsError::MissingApiKey))
  }
}
