use std::io::{self, Write};
use std::time::Duration;

use git2::Oid;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use crate::error::Result;
use crate::gemini::CompletionProvider;
use crate::git::Repo;
use crate::{commit, output, profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  /// Stage every change before diffing
  pub all:            bool,
  /// Commit with the generated message
  pub commit:         bool,
  /// Let the user edit the message before committing
  pub edit:           bool,
  pub max_diff_chars: usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
  pub message:   String,
  pub files:     Vec<String>,
  pub commit:    Option<Oid>,
  pub truncated: bool
}

/// Collects the staged diff, asks the provider for a message once and prints
/// it to `out`. Commits when asked to. Any git failure happens before the
/// provider is called.
pub async fn run(repo: &Repo, provider: &dyn CompletionProvider, options: &Options, out: &mut impl Write) -> Result<Outcome> {
  info!("Current repo path: {}", repo.workdir().display());

  if options.all {
    repo.add_all()?;
  }

  let diff = repo.diff(options.max_diff_chars)?;
  if diff.truncated {
    warn!("Staged diff was truncated to {} characters", options.max_diff_chars);
  }

  let prompt = commit::prompt(&diff.text);
  debug!("Prompt is {} bytes", prompt.len());

  let raw = {
    profile!("Gemini request");
    let pb = spinner();
    let result = provider.complete(&prompt).await;
    pb.finish_and_clear();
    result?
  };

  let message = commit::clean_message(&raw);
  output::print_message(out, &message)?;

  let commit = if options.commit || options.edit {
    let oid = repo.commit(&message, options.edit)?;
    output::print_commit(&mut io::stderr().lock(), oid, &diff.files)?;
    Some(oid)
  } else {
    None
  };

  Ok(Outcome { message, files: diff.files, commit, truncated: diff.truncated })
}

fn spinner() -> ProgressBar {
  let pb = ProgressBar::new_spinner();
  match ProgressStyle::default_spinner()
    .tick_strings(&["-", "\\", "|", "/", "-"])
    .template("{spinner:.blue} {msg}")
  {
    Ok(style) => pb.set_style(style),
    Err(err) => debug!("Falling back to default spinner style: {}", err)
  }
  pb.set_message("Generating commit message...");
  pb.enable_steady_tick(Duration::from_millis(150));
  pb
}
