const INSTRUCTION: &str = "You are an assistant that writes git commit messages from staged diffs. \
Write a conventional commit message for the diff below.

Guidelines:
- Summary line format: <type>(<optional scope>): <description>
- Allowed types: feat, fix, docs, style, refactor, perf, test, build, ci, chore, revert.
- Summary line at most 50 characters, present tense, imperative mood, no trailing period.
- If the change needs explaining, add a blank line and a short body of '-' bullet points, wrapped at 72 characters.
- Do not repeat the diff, do not wrap the message in code fences, no emojis.

Output only the commit message and nothing else.

Diff:
";

/// Embeds the diff into the fixed instruction. Same diff, same prompt.
pub fn prompt(diff: &str) -> String {
  format!("{}{}", INSTRUCTION, diff)
}

/// Trims the completion and drops a surrounding Markdown code fence.
pub fn clean_message(raw: &str) -> String {
  let trimmed = raw.trim();

  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed.to_string();
  };

  let Some(body) = rest.strip_suffix("```") else {
    return trimmed.to_string();
  };

  // Opening fence may carry a language tag, e.g. ```text
  match body.split_once('\n') {
    Some((_, message)) => message.trim().to_string(),
    None => body.trim().to_string()
  }
}
