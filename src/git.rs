use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use git2::{DiffOptions, Oid, Repository, RepositoryOpenFlags as Flag};
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
  #[error("Not a git repository: {path}")]
  NotARepository {
    path:   String,
    #[source]
    source: git2::Error
  },

  #[error("Bare repositories have no working tree")]
  BareRepository,

  #[error("git executable not found. Install git and make sure it is in your PATH")]
  GitNotInstalled,

  #[error("No staged changes to commit. Stage files with `git add` or pass --all")]
  NoStagedChanges,

  #[error("`git {command}` failed: {stderr}")]
  Command { command: String, stderr: String },

  #[error("Failed to run git: {0}")]
  Io(#[from] std::io::Error),

  #[error("Git error: {0}")]
  Git(#[from] git2::Error)
}

pub type Result<T, E = GitError> = std::result::Result<T, E>;

/// The staged changes, as produced by `git diff --cached`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
  pub text:      String,
  pub files:     Vec<String>,
  pub truncated: bool
}

pub struct Repo {
  repo:    Repository,
  workdir: PathBuf
}

trait Utf8String {
  fn to_utf8(&self) -> String;
}

impl Utf8String for [u8] {
  fn to_utf8(&self) -> String {
    String::from_utf8_lossy(self).into_owned()
  }
}

impl Repo {
  pub fn new() -> Result<Self> {
    Self::new_with_path(".")
  }

  pub fn new_with_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let repo = Repository::open_ext(path, Flag::empty(), Vec::<&Path>::new())
      .map_err(|source| GitError::NotARepository { path: path.display().to_string(), source })?;
    let workdir = repo.workdir().ok_or(GitError::BareRepository)?.to_path_buf();

    debug!("[repo] Working tree: {}", workdir.display());
    Ok(Repo { repo, workdir })
  }

  pub fn workdir(&self) -> &Path {
    &self.workdir
  }

  pub fn add_all(&self) -> Result<()> {
    debug!("[add_all] Adding all files to index (--all)");
    self.git(&["add", "--all"]).map(|_| ())
  }

  /// Paths in the index that differ from `HEAD`. An unborn branch compares
  /// against the empty tree.
  pub fn staged_files(&self) -> Result<Vec<String>> {
    let tree = self.repo.head().ok().and_then(|head| head.peel_to_tree().ok());
    let mut opts = DiffOptions::new();
    opts.ignore_submodules(true);
    let diff = self.repo.diff_tree_to_index(tree.as_ref(), None, Some(&mut opts))?;

    let mut files = Vec::new();
    for delta in diff.deltas() {
      match delta.new_file().path().or_else(|| delta.old_file().path()) {
        Some(path) => files.push(path.to_string_lossy().into_owned()),
        None => warn!("[staged_files] Could not get file path")
      }
    }

    Ok(files)
  }

  /// Raw `git diff --cached` text, cut to at most `max_chars` characters.
  pub fn diff(&self, max_chars: usize) -> Result<Diff> {
    let mut text = self.git(&["diff", "--cached", "--no-color", "--no-ext-diff"])?;

    if text.trim().is_empty() {
      return Err(GitError::NoStagedChanges);
    }

    let truncated = match text.char_indices().nth(max_chars) {
      Some((index, _)) => {
        warn!("[diff] Diff exceeds {} characters, truncating", max_chars);
        text.truncate(index);
        true
      },
      None => false
    };

    let files = self.staged_files()?;
    debug!("[diff] {} staged file(s), {} bytes", files.len(), text.len());

    Ok(Diff { text, files, truncated })
  }

  /// Commits the index with `message`. With `edit`, git opens the user's
  /// editor on the message first.
  pub fn commit(&self, message: &str, edit: bool) -> Result<Oid> {
    debug!("[commit] Committing with message (edit: {})", edit);

    if edit {
      let status = self
        .command(&["commit", "--edit", "--message", message])
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(spawn_error)?;

      if !status.success() {
        return Err(GitError::Command {
          command: "commit --edit".to_string(),
          stderr:  format!("exited with {}", status)
        });
      }
    } else {
      self.git(&["commit", "--quiet", "--message", message])?;
    }

    Ok(self.repo.head()?.peel_to_commit()?.id())
  }

  fn command(&self, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command.args(args).current_dir(&self.workdir);
    command
  }

  fn git(&self, args: &[&str]) -> Result<String> {
    let Output { status, stdout, stderr } = self.command(args).output().map_err(spawn_error)?;

    if !status.success() {
      return Err(GitError::Command {
        command: args.first().copied().unwrap_or_default().to_string(),
        stderr:  stderr.to_utf8().trim().to_string()
      });
    }

    Ok(stdout.to_utf8())
  }
}

fn spawn_error(err: std::io::Error) -> GitError {
  if err.kind() == ErrorKind::NotFound {
    GitError::GitNotInstalled
  } else {
    GitError::Io(err)
  }
}
