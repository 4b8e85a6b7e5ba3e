use std::io;
use std::process::ExitCode;

use aicommit::app::{self, Options, Outcome};
use aicommit::config::Settings;
use aicommit::gemini::Client;
use aicommit::git::Repo;
use aicommit::Result;
use clap::Parser;
use colored::*;
use dotenv::dotenv;
use log::LevelFilter;

/// Generate a commit message for the staged changes using Gemini.
#[derive(Parser, Debug)]
#[command(name = "git-ai-commit", version, about)]
struct Cli {
  /// Stage all changes before generating (git add --all)
  #[arg(short, long)]
  all: bool,

  /// Commit with the generated message
  #[arg(short, long)]
  commit: bool,

  /// Open the generated message in your editor before committing (implies --commit)
  #[arg(short, long)]
  edit: bool,

  /// Gemini model to use, overrides the configured one
  #[arg(short, long)]
  model: Option<String>,

  /// Enables verbose logging
  #[arg(short, long)]
  verbose: bool
}

fn init_logger(verbose: bool) {
  let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
  if verbose {
    builder.filter_level(LevelFilter::Debug);
  }
  builder.format_target(false).init();
}

async fn generate(cli: Cli) -> Result<Outcome> {
  let settings = Settings::load_with_model(cli.model)?;
  log::debug!("Settings: {:?}", settings);

  let repo = Repo::new()?;
  let client = Client::new(&settings)?;
  let options = Options {
    all:            cli.all,
    commit:         cli.commit || cli.edit,
    edit:           cli.edit,
    max_diff_chars: settings.max_diff_chars
  };

  app::run(&repo, &client, &options, &mut io::stdout().lock()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  dotenv().ok();

  let cli = Cli::parse();
  init_logger(cli.verbose);

  match generate(cli).await {
    Ok(_) => ExitCode::SUCCESS,
    Err(err) => {
      log::debug!("Failed in {} stage: {:?}", err.stage(), err);
      eprintln!("{} {}", "ERROR:".bold().bright_red(), err);
      if err.is_auth_error() {
        eprintln!("    Run: {}", "export GEMINI_API_KEY=<your-key>".yellow());
      }
      ExitCode::from(err.exit_code())
    }
  }
}
