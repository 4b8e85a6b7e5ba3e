use std::io::{self, Write};

use colored::*;
use console::Emoji;
use git2::Oid;

/// Writes the message and a trailing newline, nothing more.
pub fn print_message(out: &mut impl Write, message: &str) -> io::Result<()> {
  writeln!(out, "{}", message)?;
  out.flush()
}

pub fn print_commit(out: &mut impl Write, oid: Oid, files: &[String]) -> io::Result<()> {
  let id = oid.to_string();
  let short = &id[..7.min(id.len())];
  writeln!(out, "{} [{}] committed", Emoji("🤖", ">"), short.yellow())?;
  for file in files {
    writeln!(out, "   {}", file.white())?;
  }
  out.flush()
}
