use std::time::{Duration, Instant};

use colored::Colorize;

/// Logs how long it lived, at debug level, when dropped.
pub struct Profile {
  start: Instant,
  name:  String
}

impl Profile {
  pub fn new(name: impl Into<String>) -> Self {
    Self { start: Instant::now(), name: name.into() }
  }

  pub fn elapsed(&self) -> Duration {
    self.start.elapsed()
  }
}

impl Drop for Profile {
  fn drop(&mut self) {
    if log::log_enabled!(log::Level::Debug) {
      log::debug!("{}: {:.2?}", self.name.blue(), self.elapsed());
    }
  }
}

#[macro_export]
macro_rules! profile {
  ($name:expr) => {
    let _profile = $crate::profiling::Profile::new($name);
  };
}
