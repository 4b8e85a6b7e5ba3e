use std::time::Duration;

use aicommit::config::{Settings, SettingsError};
use tempfile::TempDir;

fn write_config(home: &TempDir, contents: &str) {
  let dir = home.path().join(".config/git-ai-commit");
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(dir.join("config.ini"), contents).unwrap();
}

#[test]
fn missing_api_key_is_fatal() {
  let home = TempDir::new().unwrap();
  temp_env::with_vars(
    [("HOME", Some(home.path().to_str().unwrap())), ("GEMINI_API_KEY", None)],
    || {
      assert!(matches!(Settings::load(), Err(SettingsError::MissingApiKey)));
    }
  );
}

#[test]
fn empty_api_key_is_fatal() {
  let home = TempDir::new().unwrap();
  temp_env::with_vars(
    [("HOME", Some(home.path().to_str().unwrap())), ("GEMINI_API_KEY", Some("  "))],
    || {
      assert!(matches!(Settings::load(), Err(SettingsError::MissingApiKey)));
    }
  );
}

#[test]
fn defaults_without_config_file() {
  let home = TempDir::new().unwrap();
  temp_env::with_vars(
    [
      ("HOME", Some(home.path().to_str().unwrap())),
      ("GEMINI_API_KEY", Some("abc")),
      ("AICOMMIT_MODEL", None),
      ("AICOMMIT_TIMEOUT", None)
    ],
    || {
      let settings = Settings::load().unwrap();
      assert_eq!(settings.api_key.expose(), "abc");
      assert_eq!(settings.model, "gemini-2.0-flash");
      assert_eq!(settings.timeout, Duration::from_secs(30));
    }
  );
}

#[test]
fn config_file_and_environment_are_layered() {
  let home = TempDir::new().unwrap();
  write_config(&home, "model = gemini-1.5-pro\ntimeout = 10\nmax_output_tokens = 200\n");

  temp_env::with_vars(
    [
      ("HOME", Some(home.path().to_str().unwrap())),
      ("GEMINI_API_KEY", Some("abc")),
      ("AICOMMIT_MODEL", None),
      ("AICOMMIT_TIMEOUT", Some("15"))
    ],
    || {
      let settings = Settings::load().unwrap();
      assert_eq!(settings.model, "gemini-1.5-pro");
      assert_eq!(settings.timeout, Duration::from_secs(15));
      assert_eq!(settings.max_output_tokens, Some(200));
    }
  );
}

#[test]
fn zero_timeout_is_rejected() {
  let home = TempDir::new().unwrap();
  temp_env::with_vars(
    [
      ("HOME", Some(home.path().to_str().unwrap())),
      ("GEMINI_API_KEY", Some("abc")),
      ("AICOMMIT_TIMEOUT", Some("0"))
    ],
    || {
      assert!(matches!(Settings::load(), Err(SettingsError::Zero("timeout"))));
    }
  );
}

#[test]
fn blank_model_in_config_file_is_rejected() {
  let home = TempDir::new().unwrap();
  write_config(&home, "model =\n");

  temp_env::with_vars(
    [
      ("HOME", Some(home.path().to_str().unwrap())),
      ("GEMINI_API_KEY", Some("abc")),
      ("AICOMMIT_MODEL", None)
    ],
    || {
      assert!(matches!(Settings::load(), Err(SettingsError::BlankModel)));
    }
  );
}

#[test]
fn model_override_wins_and_is_validated() {
  let home = TempDir::new().unwrap();
  write_config(&home, "model = gemini-1.5-pro\n");

  temp_env::with_vars(
    [
      ("HOME", Some(home.path().to_str().unwrap())),
      ("GEMINI_API_KEY", Some("abc")),
      ("AICOMMIT_MODEL", Some("gemini-1.5-flash"))
    ],
    || {
      let settings = Settings::load_with_model(Some("gemini-2.5-pro".to_string())).unwrap();
      assert_eq!(settings.model, "gemini-2.5-pro");

      assert!(matches!(Settings::load_with_model(Some(String::new())), Err(SettingsError::BlankModel)));
    }
  );
}
