//! Signed-in identity and configured accounts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The current user, as printed by `op whoami --format=json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Sign-in address (e.g. `my.1password.com`)
    pub url: String,
    /// Account email
    pub email: String,
    /// User id
    pub user_uuid: String,
    /// Account id
    pub account_uuid: String,
    /// HUMAN or SERVICE_ACCOUNT
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An account known to the CLI, as printed by `op account list --format=json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Sign-in address
    pub url: String,
    /// Account email
    pub email: String,
    /// User id
    pub user_uuid: String,
    /// Account id
    pub account_uuid: String,
    /// Shorthand accepted by `op signin --account` (older CLI versions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Account {
    /// Identifier to pass to `op signin`: shorthand when known, else the URL.
    pub fn sign_in_target(&self) -> &str {
        self.shorthand.as_deref().unwrap_or(&self.url)
    }
}
