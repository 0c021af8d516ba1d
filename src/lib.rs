//! Oplaunch - launcher front-end over the 1Password CLI.
//!
//! Oplaunch turns the `op` command-line tool into a typed, async API for quick
//! launchers: list and search items, copy fields, read one-time passwords, and
//! open items, with preferences persisted locally. All secret handling is
//! delegated to `op`; nothing is cached between calls.
//!
//! # Features
//!
//! - **Process Bridge**: One child process per operation, failures folded into
//!   a uniform outcome
//! - **Path Resolution**: User-configured CLI path with well-known fallbacks
//! - **Error Classification**: Raw `op` stderr mapped to actionable errors
//! - **Preferences**: Versioned record in a local key-value file
//! - **Reactive Fetch**: Loading/error/data state published on a watch channel
//! - **Testability**: Swap the process runner for [`bridge::mock::MockRunner`]
//!
//! # Quick Start
//!
//! ```no_run
//! use oplaunch::{actions_for_item, Config, OpClient, PreferenceStore};
//!
//! #[tokio::main]
//! async fn main() -> oplaunch::Result<()> {
//!     // Load preferences (written with defaults on first run)
//!     let store = PreferenceStore::open_default().await?;
//!     let prefs = store.load().await?;
//!
//!     // Build a client from preferences and environment
//!     let client = OpClient::new(Config::from_preferences(&prefs).with_env_overrides());
//!
//!     // List items, sorted by title
//!     for item in client.list_items(&[]).await? {
//!         let actions = actions_for_item(&item, &prefs);
//!         println!("{} -> {:?}", item.title, actions);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Default | Provides |
//! |------|---------|----------|
//! | `mock` | yes | [`bridge::mock::MockRunner`] scripted runner |

pub mod account;
pub mod actions;
pub mod bridge;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generator;
pub mod item;
pub mod preferences;
pub mod resolver;
pub mod routing;
pub mod validation;

pub use account::{Account, User};
pub use actions::{actions_for_item, href_to_open_in_browser, ActionId};
pub use bridge::{CommandRunner, ExecOptions, ExecOutcome, ProcessRunner};
pub use client::OpClient;
pub use config::Config;
pub use error::{OplaunchError, Result};
pub use fetch::{FetchState, Resource};
pub use generator::PasswordOptions;
pub use item::{Category, Item, ItemField, ItemTemplate, Vault};
pub use preferences::{PreferenceStore, Preferences};
pub use resolver::PathResolver;
pub use routing::{AppState, EnterAction, Route};
