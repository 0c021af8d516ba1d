//! Maps raw `op` stderr text to categorized errors.
//!
//! The CLI has no structured error protocol, so classification is an ordered
//! substring table evaluated first-match-wins. The `"file"` signature for a
//! missing CLI is broad and also catches unrelated messages that mention a
//! file.

use crate::OplaunchError;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Error category selected by a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No route to the 1Password servers.
    Connection,
    /// Item lookup failed.
    NotFound,
    /// The `op` binary is absent.
    CliMissing,
    /// The item lacks the requested field.
    MissingField,
}

/// One row of the decision table.
#[derive(Debug)]
pub struct Rule {
    /// Any of these substrings selects the rule.
    pub signatures: &'static [&'static str],
    /// Category produced on a match.
    pub kind: ErrorKind,
}

/// Ordered decision table. Earlier rows win.
pub const RULES: &[Rule] = &[
    Rule {
        signatures: &["no such host"],
        kind: ErrorKind::Connection,
    },
    Rule {
        signatures: &["could not get item", "isn't an item"],
        kind: ErrorKind::NotFound,
    },
    Rule {
        signatures: &["ENOENT", "file", "enoent"],
        kind: ErrorKind::CliMissing,
    },
    Rule {
        signatures: &["does not have a field"],
        kind: ErrorKind::MissingField,
    },
];

const MISSING_FIELD_MARKER: &str = "does not have a field ";

fn log_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)\[\w+\]\s+\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2}:\d{2}\s+(.*)$")
            .expect("static regex is valid")
    })
}

/// Returns the first rule whose signatures appear in `stderr`.
pub fn matching_rule(stderr: &str) -> Option<&'static Rule> {
    RULES
        .iter()
        .find(|rule| rule.signatures.iter().any(|sig| stderr.contains(sig)))
}

/// Classifies raw error text into an [`OplaunchError`].
///
/// # Example
///
/// ```
/// use oplaunch::classify::classify;
/// use oplaunch::OplaunchError;
///
/// let err = classify("dial tcp: lookup my.1password.com: no such host; could not get item");
/// assert!(matches!(err, OplaunchError::Connection));
///
/// let err = classify("something else went wrong");
/// assert_eq!(err.to_string(), "something else went wrong");
/// ```
pub fn classify(stderr: &str) -> OplaunchError {
    let Some(rule) = matching_rule(stderr) else {
        return OplaunchError::Extension(stderr.to_string());
    };
    debug!(kind = ?rule.kind, "classified op error");

    match rule.kind {
        ErrorKind::Connection => OplaunchError::Connection,
        ErrorKind::NotFound => OplaunchError::NotFound,
        ErrorKind::CliMissing => {
            OplaunchError::CliMissing("1Password CLI not found.".to_string())
        }
        ErrorKind::MissingField => {
            let field = stderr
                .split(MISSING_FIELD_MARKER)
                .nth(1)
                .map(|rest| rest.lines().next().unwrap_or(rest).trim())
                .unwrap_or_default();
            OplaunchError::MissingField(field.to_string())
        }
    }
}

/// Extracts the human message from the CLI's log-formatted stderr.
///
/// `op` prints errors as `[ERROR] 2024/01/02 03:04:05 message`. Returns the
/// trimmed input when no such line is present.
pub fn extract_cli_message(stderr: &str) -> String {
    log_line_regex()
        .captures(stderr)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| stderr.trim().to_string())
}
