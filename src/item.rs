//! Item data structures mirroring the CLI's JSON output.
//!
//! These types are pass-through: an optional field is `Some` exactly when
//! `op` emitted it, and unknown keys survive in `extra` so that a value can
//! be re-serialized without loss.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An item stored in a vault, as printed by `op item list --long` or
/// `op item get --format=json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Item category
    pub category: Category,

    /// Item revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Vault holding the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault: Option<ItemVault>,

    /// Last editor's user id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,

    /// When the item was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the item was last modified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Subtitle shown under the title (usually the username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_information: Option<String>,

    /// Website URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<ItemUrl>>,

    /// Structured fields (only present for `item get`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ItemField>>,

    /// Tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Favorite flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,

    /// Keys this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Returns the primary URL, if any.
    pub fn primary_url(&self) -> Option<&str> {
        self.urls
            .as_ref()?
            .iter()
            .find(|u| u.primary.unwrap_or(false))
            .map(|u| u.href.as_str())
    }

    /// Finds a field by id, label or purpose (case-insensitive).
    pub fn field(&self, name: &str) -> Option<&ItemField> {
        self.fields.as_ref()?.iter().find(|f| f.matches(name))
    }

    /// Whether the title, any URL or any tag contains `query` (case-insensitive).
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if self.title.to_lowercase().contains(&query) {
            return true;
        }
        let in_urls = self
            .urls
            .iter()
            .flatten()
            .any(|u| u.href.to_lowercase().contains(&query));
        in_urls
            || self
                .tags
                .iter()
                .flatten()
                .any(|t| t.to_lowercase().contains(&query))
    }
}

/// Vault reference embedded in an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemVault {
    /// Vault id
    pub id: String,
    /// Vault name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// URL attached to an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemUrl {
    /// Label such as "website"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether this is the primary URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    /// Target
    pub href: String,
}

/// A structured field of an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemField {
    /// Field id
    pub id: String,
    /// Field type (STRING, CONCEALED, OTP, ...)
    #[serde(rename = "type")]
    pub field_type: String,
    /// Purpose (USERNAME, PASSWORD, NOTES)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Value, present when revealed or not concealed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Secret reference (`op://vault/item/field`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Keys this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemField {
    fn matches(&self, name: &str) -> bool {
        let eq = |s: &Option<String>| s.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(name));
        self.id.eq_ignore_ascii_case(name) || eq(&self.label) || eq(&self.purpose)
    }
}

/// A vault, as printed by `op vault list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vault {
    /// Vault id
    pub id: String,
    /// Vault name
    pub name: String,
    /// Content version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_version: Option<u64>,
    /// Keys this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An item template, as printed by `op item template list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemTemplate {
    /// Template uuid
    pub uuid: String,
    /// Category display name ("Login", "Credit Card", ...)
    pub name: String,
}

/// Item category.
///
/// Serialized as the CLI's SCREAMING_SNAKE string. Categories added by newer
/// CLI versions are preserved in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    ApiCredential,
    BankAccount,
    CreditCard,
    CryptoWallet,
    Custom,
    Database,
    Document,
    DriverLicense,
    EmailAccount,
    Identity,
    Login,
    MedicalRecord,
    Membership,
    OutdoorLicense,
    Passport,
    Password,
    RewardProgram,
    SecureNote,
    Server,
    SocialSecurityNumber,
    SoftwareLicense,
    SshKey,
    WirelessRouter,
    /// Category unknown to this crate
    Other(String),
}

const CATEGORY_NAMES: &[(Category, &str)] = &[
    (Category::ApiCredential, "API_CREDENTIAL"),
    (Category::BankAccount, "BANK_ACCOUNT"),
    (Category::CreditCard, "CREDIT_CARD"),
    (Category::CryptoWallet, "CRYPTO_WALLET"),
    (Category::Custom, "CUSTOM"),
    (Category::Database, "DATABASE"),
    (Category::Document, "DOCUMENT"),
    (Category::DriverLicense, "DRIVER_LICENSE"),
    (Category::EmailAccount, "EMAIL_ACCOUNT"),
    (Category::Identity, "IDENTITY"),
    (Category::Login, "LOGIN"),
    (Category::MedicalRecord, "MEDICAL_RECORD"),
    (Category::Membership, "MEMBERSHIP"),
    (Category::OutdoorLicense, "OUTDOOR_LICENSE"),
    (Category::Passport, "PASSPORT"),
    (Category::Password, "PASSWORD"),
    (Category::RewardProgram, "REWARD_PROGRAM"),
    (Category::SecureNote, "SECURE_NOTE"),
    (Category::Server, "SERVER"),
    (Category::SocialSecurityNumber, "SOCIAL_SECURITY_NUMBER"),
    (Category::SoftwareLicense, "SOFTWARE_LICENSE"),
    (Category::SshKey, "SSH_KEY"),
    (Category::WirelessRouter, "WIRELESS_ROUTER"),
];

impl Category {
    /// The CLI's name for this category.
    pub fn as_str(&self) -> &str {
        if let Self::Other(name) = self {
            return name;
        }
        CATEGORY_NAMES
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, name)| *name)
            .unwrap_or_default()
    }

    /// Icon name used by the launcher list.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::ApiCredential => "code",
            Self::CreditCard => "credit-card",
            Self::CryptoWallet => "bitcoin",
            Self::BankAccount | Self::Custom => "wallet",
            Self::Database => "database",
            Self::Document => "file-text",
            Self::DriverLicense => "car",
            Self::EmailAccount => "mail",
            Self::Identity => "user",
            Self::Login => "key",
            Self::MedicalRecord => "activity",
            Self::Membership => "star",
            Self::OutdoorLicense => "tree",
            Self::Passport => "globe",
            Self::Password => "lock",
            Self::RewardProgram => "gift",
            Self::SecureNote => "file",
            Self::SocialSecurityNumber => "shield",
            Self::SoftwareLicense => "award",
            Self::SshKey => "terminal",
            Self::WirelessRouter => "wifi",
            Self::Server | Self::Other(_) => "file",
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(CATEGORY_NAMES
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(c, _)| c.clone())
            .unwrap_or_else(|| Self::Other(s.to_string())))
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(category) => category,
            Err(never) => match never {},
        }
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login_json() -> Value {
        json!({
            "id": "abc123",
            "title": "GitHub",
            "version": 4,
            "vault": {"id": "v1", "name": "Private"},
            "category": "LOGIN",
            "last_edited_by": "U1",
            "created_at": "2023-05-01T10:00:00Z",
            "updated_at": "2024-01-02T03:04:05Z",
            "additional_information": "octocat",
            "urls": [
                {"label": "website", "href": "https://example.org"},
                {"primary": true, "href": "https://github.com/login"}
            ],
            "state": "ARCHIVED"
        })
    }

    #[test]
    fn test_item_deserialize() {
        let item: Item = serde_json::from_value(login_json()).unwrap();
        assert_eq!(item.id, "abc123");
        assert_eq!(item.category, Category::Login);
        assert_eq!(item.vault.as_ref().unwrap().name.as_deref(), Some("Private"));
        assert_eq!(item.primary_url(), Some("https://github.com/login"));
        assert!(item.fields.is_none());
        assert_eq!(item.extra.get("state"), Some(&json!("ARCHIVED")));
    }

    #[test]
    fn test_item_passthrough() {
        let item: Item = serde_json::from_value(login_json()).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["state"], "ARCHIVED");
        assert!(value.get("fields").is_none());
        assert!(value.get("tags").is_none());
    }

    #[test]
    fn test_minimal_item() {
        let item: Item =
            serde_json::from_value(json!({"id": "1", "title": "x", "category": "SECURE_NOTE"}))
                .unwrap();
        assert_eq!(item.category, Category::SecureNote);
        assert!(item.urls.is_none());
        assert_eq!(item.primary_url(), None);
    }

    #[test]
    fn test_field_lookup() {
        let item: Item = serde_json::from_value(json!({
            "id": "1",
            "title": "x",
            "category": "LOGIN",
            "fields": [
                {"id": "username", "type": "STRING", "purpose": "USERNAME", "label": "username", "value": "me"},
                {"id": "password", "type": "CONCEALED", "purpose": "PASSWORD", "label": "password", "value": "s3cret"},
                {"id": "TOTP_x", "type": "OTP", "label": "one-time password", "totp": "123456"}
            ]
        }))
        .unwrap();

        assert_eq!(item.field("Password").unwrap().value.as_deref(), Some("s3cret"));
        assert_eq!(item.field("one-time password").unwrap().field_type, "OTP");
        assert_eq!(
            item.field("one-time password").unwrap().extra.get("totp"),
            Some(&json!("123456"))
        );
        assert!(item.field("email").is_none());
    }

    #[test]
    fn test_matches_query() {
        let item: Item = serde_json::from_value(login_json()).unwrap();
        assert!(item.matches_query("git"));
        assert!(item.matches_query("EXAMPLE.ORG"));
        assert!(!item.matches_query("gitlab"));
    }

    #[test]
    fn test_matches_query_tags() {
        let item: Item = serde_json::from_value(json!({
            "id": "t1",
            "title": "Router",
            "category": "PASSWORD",
            "tags": ["Home-Network", "hardware"]
        }))
        .unwrap();
        assert!(item.matches_query("home-net"));
        assert!(item.matches_query("HARDWARE"));
        assert!(!item.matches_query("office"));
    }

    #[test]
    fn test_category_names() {
        assert_eq!("CREDIT_CARD".parse::<Category>().unwrap(), Category::CreditCard);
        assert_eq!(Category::SshKey.to_string(), "SSH_KEY");

        let other: Category = serde_json::from_value(json!("NEW_THING")).unwrap();
        assert_eq!(other, Category::Other("NEW_THING".to_string()));
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("NEW_THING"));
    }

    #[test]
    fn test_category_icons() {
        assert_eq!(Category::Login.icon(), "key");
        assert_eq!(Category::BankAccount.icon(), "wallet");
        assert_eq!(Category::Custom.icon(), "wallet");
        assert_eq!(Category::Other("X".into()).icon(), "file");
        for (category, _) in CATEGORY_NAMES {
            assert!(!category.icon().is_empty());
        }
    }

    #[test]
    fn test_vault_and_template() {
        let vault: Vault =
            serde_json::from_value(json!({"id": "v", "name": "Work", "content_version": 12}))
                .unwrap();
        assert_eq!(vault.content_version, Some(12));

        let template: ItemTemplate =
            serde_json::from_value(json!({"uuid": "001", "name": "Login"})).unwrap();
        assert_eq!(template.name, "Login");
    }
}
