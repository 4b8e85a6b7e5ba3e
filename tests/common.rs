#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};

use aicommit::gemini::{self, CompletionProvider};
use aicommit::git::Repo;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tempfile::TempDir;

pub struct GitHelpers {
  dir: TempDir
}

impl GitHelpers {
  pub fn new() -> (Self, Repo) {
    let helper = Self::init();
    let repo = Repo::new_with_path(helper.path()).expect("Could not open repo");
    (helper, repo)
  }

  pub fn init() -> Self {
    let helper = GitHelpers { dir: TempDir::new().expect("Could not create temp dir") };

    helper.git(&["init", "--quiet"]).expect("git init failed");
    helper.git(&["config", "user.name", "Test User"]).expect("git config failed");
    helper.git(&["config", "user.email", "test@example.com"]).expect("git config failed");
    helper.git(&["config", "commit.gpgsign", "false"]).expect("git config failed");

    helper
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn write_file(&self, file_name: &str, content: &str) {
    let file_path = self.path().join(file_name);
    let mut file = File::create(&file_path).expect("Could not create file");
    file.write_all(content.as_bytes()).expect("Could not write to file");
  }

  pub fn stage_file(&self, file_name: &str) -> Result<String> {
    self.git(&["add", file_name])
  }

  pub fn commit(&self, message: &str) -> Result<String> {
    self.git(&["commit", "--quiet", "-m", message])
  }

  pub fn head_message(&self) -> Result<String> {
    self.git(&["log", "-1", "--format=%B"]).map(|message| message.trim_end().to_string())
  }

  pub fn head_id(&self) -> Result<String> {
    self.git(&["rev-parse", "HEAD"]).map(|id| id.trim().to_string())
  }

  pub fn git(&self, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
      .args(args)
      .env("OVERCOMMIT_DISABLE", "1")
      .current_dir(self.path())
      .output()
      .context("Could not run git command")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      bail!("Git command failed: {}", stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
  }
}

pub const FOO_DIFF_LINE: &str = "add foo()";

/// A repository with one commit and `foo.txt` staged.
pub fn repo_with_staged_foo() -> (GitHelpers, Repo) {
  let (helpers, repo) = GitHelpers::new();
  helpers.write_file("README.md", "hello\n");
  helpers.stage_file("README.md").unwrap();
  helpers.commit("Initial commit").unwrap();

  helpers.write_file("foo.txt", &format!("{}\n", FOO_DIFF_LINE));
  helpers.stage_file("foo.txt").unwrap();
  (helpers, repo)
}

pub fn setup() {
  _ = env_logger::builder().is_test(true).try_init();
}

/// Answers every prompt with the same text and counts the calls.
pub struct StubProvider {
  reply: String,
  calls: AtomicUsize
}

impl StubProvider {
  pub fn new(reply: &str) -> Self {
    Self { reply: reply.to_string(), calls: AtomicUsize::new(0) }
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CompletionProvider for StubProvider {
  async fn complete(&self, _prompt: &str) -> gemini::Result<String> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.reply.clone())
  }
}
