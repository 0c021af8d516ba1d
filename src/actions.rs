//! Launcher actions offered for an item.

use crate::item::{Category, Item};
use crate::{OplaunchError, Preferences, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action the launcher can perform on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionId {
    #[serde(rename = "open-in-1password")]
    OpenIn1Password,
    #[serde(rename = "open-in-browser")]
    OpenInBrowser,
    #[serde(rename = "copy-username")]
    CopyUsername,
    #[serde(rename = "copy-password")]
    CopyPassword,
    #[serde(rename = "copy-one-time-password")]
    CopyOneTimePassword,
    #[serde(rename = "share-item")]
    ShareItem,
    #[serde(rename = "switch-account")]
    SwitchAccount,
}

impl ActionId {
    /// All actions in their default order.
    pub const DEFAULT_ORDER: [ActionId; 7] = [
        ActionId::OpenIn1Password,
        ActionId::OpenInBrowser,
        ActionId::CopyUsername,
        ActionId::CopyPassword,
        ActionId::CopyOneTimePassword,
        ActionId::ShareItem,
        ActionId::SwitchAccount,
    ];

    /// Stable identifier used in preferences.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenIn1Password => "open-in-1password",
            Self::OpenInBrowser => "open-in-browser",
            Self::CopyUsername => "copy-username",
            Self::CopyPassword => "copy-password",
            Self::CopyOneTimePassword => "copy-one-time-password",
            Self::ShareItem => "share-item",
            Self::SwitchAccount => "switch-account",
        }
    }

    /// Field fetched with `op item get --fields` by copy actions.
    ///
    /// One-time passwords are read with `--otp` instead and return `None`.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::CopyUsername => Some("username"),
            Self::CopyPassword => Some("password"),
            _ => None,
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = OplaunchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::DEFAULT_ORDER
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| OplaunchError::InvalidInput(format!("unknown action: {}", s)))
    }
}

/// Actions for `item`, preferred ones first, without duplicates.
///
/// Logins get every action, passwords everything except copying a username,
/// other categories can only be opened in 1Password.
pub fn actions_for_item(item: &Item, prefs: &Preferences) -> Vec<ActionId> {
    let mut ordered = Vec::with_capacity(ActionId::DEFAULT_ORDER.len());
    let preferred = [prefs.primary_action, prefs.secondary_action];
    for action in preferred.into_iter().chain(ActionId::DEFAULT_ORDER) {
        if !ordered.contains(&action) {
            ordered.push(action);
        }
    }

    match item.category {
        Category::Login => ordered,
        Category::Password => ordered
            .into_iter()
            .filter(|a| *a != ActionId::CopyUsername)
            .collect(),
        _ => vec![ActionId::OpenIn1Password],
    }
}

/// Primary URL to open in a browser; only logins have one.
pub fn href_to_open_in_browser(item: &Item) -> Option<&str> {
    match item.category {
        Category::Login => item.primary_url(),
        _ => None,
    }
}

/// Upper-cases the first character of every word.
pub fn capitalize_words(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_word = false;
    for c in s.chars() {
        let word = c.is_ascii_alphanumeric() || c == '_';
        if word && !prev_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_word = word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(category: &str) -> Item {
        serde_json::from_value(json!({
            "id": "1",
            "title": "t",
            "category": category,
            "urls": [{"primary": true, "href": "https://example.com"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_default_login_actions() {
        let actions = actions_for_item(&item("LOGIN"), &Preferences::default());
        assert_eq!(actions, ActionId::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_preferred_actions_first() {
        let prefs = Preferences {
            primary_action: ActionId::CopyPassword,
            secondary_action: ActionId::CopyUsername,
            ..Default::default()
        };
        let actions = actions_for_item(&item("LOGIN"), &prefs);
        assert_eq!(actions[0], ActionId::CopyPassword);
        assert_eq!(actions[1], ActionId::CopyUsername);
        assert_eq!(actions[2], ActionId::OpenIn1Password);
        assert_eq!(actions.len(), 7);
    }

    #[test]
    fn test_same_primary_and_secondary() {
        let prefs = Preferences {
            primary_action: ActionId::ShareItem,
            secondary_action: ActionId::ShareItem,
            ..Default::default()
        };
        let actions = actions_for_item(&item("LOGIN"), &prefs);
        assert_eq!(actions.len(), 7);
        assert_eq!(actions[0], ActionId::ShareItem);
    }

    #[test]
    fn test_password_actions() {
        let actions = actions_for_item(&item("PASSWORD"), &Preferences::default());
        assert!(!actions.contains(&ActionId::CopyUsername));
        assert_eq!(actions.len(), 6);
    }

    #[test]
    fn test_other_category_actions() {
        let actions = actions_for_item(&item("CREDIT_CARD"), &Preferences::default());
        assert_eq!(actions, vec![ActionId::OpenIn1Password]);
    }

    #[test]
    fn test_href() {
        assert_eq!(href_to_open_in_browser(&item("LOGIN")), Some("https://example.com"));
        assert_eq!(href_to_open_in_browser(&item("PASSWORD")), None);
    }

    #[test]
    fn test_action_ids() {
        assert_eq!(
            serde_json::to_value(ActionId::OpenIn1Password).unwrap(),
            json!("open-in-1password")
        );
        assert_eq!(
            "copy-one-time-password".parse::<ActionId>().unwrap(),
            ActionId::CopyOneTimePassword
        );
        assert!("fly".parse::<ActionId>().is_err());
        assert_eq!(ActionId::CopyPassword.field(), Some("password"));
        assert_eq!(ActionId::CopyOneTimePassword.field(), None);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("credit card"), "Credit Card");
        assert_eq!(capitalize_words("one-time password"), "One-Time Password");
        assert_eq!(capitalize_words(""), "");
    }
}
