//! Provider-agnostic data model for pull requests, changed files and comment threads.
//!
//! Everything here is created fresh for one webhook delivery and dropped when
//! the run ends; nothing is cached between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a pull request as announced by the webhook.
///
/// * `repository_id` – repository GUID (or name) inside the project.
/// * `project_id`    – project GUID (or name) inside the organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLocator {
    pub pull_request_id: u64,
    pub repository_id: String,
    pub project_id: String,
}

/// Pull request metadata as fetched from the provider.
///
/// A value of this type always has a non-zero id and a non-empty repository
/// id; responses lacking either are rejected while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub id: u64,
    pub repository_id: String,
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Short branch name (without `refs/heads/`).
    pub source_branch: String,
    /// Short branch name (without `refs/heads/`).
    pub target_branch: String,
}

/// How a file was touched by the pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Edited,
    Deleted,
    Renamed,
}

impl ChangeKind {
    /// Parses a provider change type such as `"edit"` or `"edit, rename"`.
    ///
    /// Change types are flag lists; precedence is delete → rename → add → edit.
    /// Returns `None` for entries that do not change file content in a
    /// reviewable way (e.g. `"none"`, `"lock"`, or the old side of a rename).
    pub fn from_flags(raw: &str) -> Option<Self> {
        let flags: Vec<String> = raw
            .split(',')
            .map(|f| f.trim().to_ascii_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        let has = |name: &str| flags.iter().any(|f| f == name);

        if has("delete") {
            Some(ChangeKind::Deleted)
        } else if has("rename") || has("targetrename") {
            Some(ChangeKind::Renamed)
        } else if has("add") || has("branch") || has("undelete") {
            Some(ChangeKind::Added)
        } else if has("edit") || has("merge") || has("encoding") || has("rollback") {
            Some(ChangeKind::Edited)
        } else {
            None
        }
    }

    /// Lowercase label used in prompts and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Edited => "edited",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One modified file of the pull request's latest iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Repository path without the leading `/`.
    pub path: String,
    pub kind: ChangeKind,
    /// Text after the change; `None` for deletions and failed fetches.
    pub content: Option<String>,
    /// Previous path for renames.
    pub original_path: Option<String>,
    /// Language tag (filled by the reviewer's extension table).
    pub language: Option<String>,
    /// Reason the content could not be fetched.
    pub fetch_error: Option<String>,
    /// Listed in the change summary but its content is not shown to the
    /// reviewer (set by the reviewer's non-code policy).
    #[serde(default)]
    pub summary_only: bool,
}

impl FileChange {
    /// Change with its content fetched successfully.
    pub fn with_content(
        path: impl Into<String>,
        kind: ChangeKind,
        content: impl Into<String>,
    ) -> Self {
        if kind == ChangeKind::Deleted {
            return Self::deleted(path);
        }
        Self {
            path: path.into(),
            kind,
            content: Some(content.into()),
            original_path: None,
            language: None,
            fetch_error: None,
            summary_only: false,
        }
    }

    /// Deleted file: never carries content.
    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Deleted,
            content: None,
            original_path: None,
            language: None,
            fetch_error: None,
            summary_only: false,
        }
    }

    /// Change whose content fetch failed; kept in the batch with a marker.
    pub fn failed(path: impl Into<String>, kind: ChangeKind, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            content: None,
            original_path: None,
            language: None,
            fetch_error: Some(error.into()),
            summary_only: false,
        }
    }

    pub fn renamed_from(mut self, original_path: Option<String>) -> Self {
        self.original_path = original_path;
        self
    }
}

/// Lifecycle state of a discussion thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadStatus {
    Active,
    Fixed,
    WontFix,
    Closed,
    ByDesign,
    Pending,
    Unknown,
}

impl ThreadStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("active") => ThreadStatus::Active,
            Some("fixed") => ThreadStatus::Fixed,
            Some("wontfix") => ThreadStatus::WontFix,
            Some("closed") => ThreadStatus::Closed,
            Some("bydesign") => ThreadStatus::ByDesign,
            Some("pending") => ThreadStatus::Pending,
            _ => ThreadStatus::Unknown,
        }
    }
}

/// Who produced a comment, as tagged by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    /// Human-authored text.
    Text,
    /// Generated status notice (votes, pushes, policy updates).
    System,
    /// Generated when code changes (e.g. iteration summary).
    CodeChange,
    Unknown,
}

impl CommentKind {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("text") => CommentKind::Text,
            Some("system") => CommentKind::System,
            Some("codechange") => CommentKind::CodeChange,
            _ => CommentKind::Unknown,
        }
    }
}

/// A single comment inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub kind: CommentKind,
    pub is_deleted: bool,
}

impl Comment {
    /// Live human comment: tagged as text and not deleted.
    pub fn is_human(&self) -> bool {
        self.kind == CommentKind::Text && !self.is_deleted
    }
}

/// A discussion unit with its ordered comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    pub id: u64,
    pub status: ThreadStatus,
    /// File anchor, when the thread is attached to code.
    pub file_path: Option<String>,
    pub line: Option<u32>,
    pub comments: Vec<Comment>,
    pub is_deleted: bool,
}
