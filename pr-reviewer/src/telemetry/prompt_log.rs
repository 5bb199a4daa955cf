//! Prompt telemetry: safe logging of the exact LLM prompt.
//!
//! ## What it does
//! - Emits a concise DEBUG line (length, token estimate) per review prompt.
//! - Echoes the full prompt when it is short enough, with secrets redacted
//!   (Bearer tokens, PATs, `token=`/`password=` assignments).
//!
//! Driven by `PR_REVIEWER_LOG_PROMPTS` and `PR_REVIEWER_PROMPT_ECHO_THRESHOLD`
//! through [`crate::config::ReviewerConfig`].

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

const SECRET_PATTERNS: &[&str] = &[
    r"(?i)Authorization:\s*(Basic|Bearer)\s+[A-Za-z0-9\-_\.=+/]{8,}",
    r"(?i)\bBearer\s+[A-Za-z0-9\-_\.=]{16,}",
    r"(?i)\b(token|pat|password|secret|api[_-]?key)\s*[:=]\s*\S{8,}",
    r"\bsk-[A-Za-z0-9\-_]{16,}",
];

lazy_static! {
    static ref SECRET_RES: Vec<Regex> = SECRET_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();
}

/// Prompt logging switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptTelemetry {
    pub enabled: bool,
    /// Echo full prompts up to this many characters (0 = never).
    pub echo_threshold: usize,
}

impl PromptTelemetry {
    /// Logs `prompt` for pull request `pr_id` when enabled.
    pub fn record(&self, pr_id: u64, prompt: &str) {
        if !self.enabled {
            return;
        }

        let len = prompt.chars().count();
        debug!(
            pr_id,
            len,
            tokens_approx = approx_tokens(prompt),
            "review prompt built"
        );

        if self.echo_threshold > 0 && len <= self.echo_threshold {
            debug!(pr_id, ">>>\n{}\n<<<", redact_secrets(prompt));
        }
    }
}

/// Rough token count (about four characters per token).
pub fn approx_tokens(s: &str) -> usize {
    s.chars().count().div_ceil(4)
}

/// Redacts obvious secrets (best-effort; keep it conservative).
pub fn redact_secrets(s: &str) -> String {
    SECRET_RES.iter().fold(s.to_string(), |acc, re| {
        re.replace_all(&acc, "[REDACTED]").into_owned()
    })
}
