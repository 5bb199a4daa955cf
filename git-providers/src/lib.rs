//! Azure DevOps client used by the pull-request reviewer.
//!
//! The crate exposes a small, provider-neutral data model ([`types`]) and one
//! concrete client ([`AzureDevOpsClient`]) that reads pull request metadata,
//! comment threads and changed files, and creates new comment threads.

pub mod azure_devops;
pub mod config;
pub mod errors;
pub mod types;

pub use azure_devops::{AzureDevOpsClient, ChangeEntry, IterationRef};
pub use config::AzureDevOpsConfig;
pub use errors::{ConfigError, ProviderError, ProviderResult};
pub use types::{
    ChangeKind, Comment, CommentKind, CommentThread, FileChange, PullRequestLocator,
    PullRequestRef, ThreadStatus,
};
