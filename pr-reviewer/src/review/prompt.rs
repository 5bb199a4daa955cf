//! Prompt builder for the pull-request review.
//!
//! One prompt per pull request: metadata, the changed-file summary, the code
//! of every embedded file, then the instruction block.

use std::fmt::Write as _;

use git_providers::{ChangeKind, FileChange, PullRequestRef};

use crate::lang;

/// System message sent with every review request.
pub const SYSTEM_PROMPT: &str = "You are an experienced software engineer reviewing a pull request. \
Give precise, actionable feedback grounded in the code you are shown.";

/// Instruction block used unless the deployment configures its own.
pub const DEFAULT_INSTRUCTIONS: &str = "\
Review the changes above and reply with a review that contains:
1. **Overall assessment** of the pull request.
2. **Code quality**: readability, structure, naming, duplication.
3. **Potential issues**: bugs, edge cases, error handling, performance.
4. **Security concerns**: injection, secrets, unsafe input handling, permissions.
5. **Specific recommendations**, referencing files (and lines where possible).

Write in the natural language used by the pull request and its code comments.
Format the reply as Markdown suitable for a pull-request comment.
End on a brief, encouraging note.";

const CONTENT_UNAVAILABLE: &str = "_Content unavailable._";

/// Prompt knobs derived from the reviewer configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptOptions<'a> {
    /// Replaces [`DEFAULT_INSTRUCTIONS`] when set.
    pub instructions: Option<&'a str>,
    /// Cut embedded content after this many characters (0 = no limit).
    pub max_file_chars: usize,
}

/// Builds the user prompt for `pr` and its `changes`.
///
/// Every file in `changes` is listed under "Files changed"; the code section
/// embeds every file not marked [`FileChange::summary_only`].
pub fn build_review_prompt(
    pr: &PullRequestRef,
    changes: &[FileChange],
    opts: &PromptOptions<'_>,
) -> String {
    let mut s = String::new();

    s.push_str("# Pull request\n\n");
    let _ = writeln!(s, "**Title:** {}", pr.title.trim());
    match pr.description.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => {
            let _ = writeln!(s, "**Description:**\n\n{d}\n");
        }
        _ => s.push_str("**Description:** _none_\n"),
    }
    let _ = writeln!(
        s,
        "**Branches:** `{}` → `{}`",
        pr.source_branch, pr.target_branch
    );

    let _ = writeln!(s, "\n## Files changed ({})\n", changes.len());
    for f in changes {
        let _ = write!(s, "- `{}` ({}, {}", f.path, language_of(f), f.kind);
        if let Some(orig) = &f.original_path {
            let _ = write!(s, ", renamed from `{orig}`");
        }
        s.push_str(")\n");
    }

    s.push_str("\n## Code changes\n");
    let mut embedded = 0usize;
    for f in changes
        .iter()
        .filter(|f| !f.summary_only)
    {
        embedded += 1;
        push_file_section(&mut s, f, opts.max_file_chars);
    }
    if embedded == 0 {
        s.push_str("\n_No source files to show; review the change summary above._\n");
    }

    s.push_str("\n## Review instructions\n\n");
    s.push_str(opts.instructions.unwrap_or(DEFAULT_INSTRUCTIONS).trim());
    s.push('\n');
    s
}

fn push_file_section(s: &mut String, f: &FileChange, max_chars: usize) {
    let language = language_of(f);
    let _ = writeln!(s, "\n### `{}`\n", f.path);
    let _ = writeln!(s, "Language: {language} · Change: {}\n", f.kind);

    if f.kind == ChangeKind::Deleted {
        s.push_str("_File deleted._\n");
        return;
    }

    let Some(content) = f.content.as_deref() else {
        s.push_str(CONTENT_UNAVAILABLE);
        s.push('\n');
        return;
    };

    let (body, truncated) = truncate_chars(content, max_chars);
    let fence = fence_for(body);
    let _ = writeln!(s, "{fence}{language}");
    s.push_str(body);
    if !body.ends_with('\n') {
        s.push('\n');
    }
    let _ = writeln!(s, "{fence}");
    if truncated {
        let _ = writeln!(s, "_Truncated to the first {max_chars} characters._");
    }
}

fn language_of(f: &FileChange) -> &str {
    f.language
        .as_deref()
        .or_else(|| lang::detect(&f.path).map(|l| l.tag))
        .unwrap_or("text")
}

/// Fence longer than any backtick run inside `body`.
fn fence_for(body: &str) -> String {
    let mut longest = 0usize;
    let mut run = 0usize;
    for ch in body.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

fn truncate_chars(s: &str, max_chars: usize) -> (&str, bool) {
    if max_chars == 0 {
        return (s, false);
    }
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}
