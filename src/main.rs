//! oplaunch - command-line front-end over the 1Password CLI.
//!
//! Every subcommand prints JSON on stdout. Failures print `title: message`
//! on stderr (or the CLI's own message for unrecognized failures) and exit
//! non-zero.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oplaunch::classify::extract_cli_message;
use oplaunch::generator::{self, PasswordOptions};
use oplaunch::{
    actions_for_item, href_to_open_in_browser, ActionId, AppState, Config, EnterAction, OpClient,
    OplaunchError, PreferenceStore, Preferences, Result, Route,
};

#[derive(Parser)]
#[command(name = "oplaunch")]
#[command(version)]
#[command(about = "Launcher front-end for the 1Password CLI")]
#[command(after_help = "EXAMPLES:
  oplaunch status                         Check the CLI and sign-in state
  oplaunch items --vault Private          List items in a vault
  oplaunch get <id> --field password      Print one field
  oplaunch prefs set primary-action copy-password

ENVIRONMENT:
  OPLAUNCH_CLI_PATH   Overrides the op location
  OPLAUNCH_SHELL      Overrides the sign-in shell
  RUST_LOG            Log filter (default: warn)")]
struct Cli {
    /// Preference file (defaults to the platform config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show CLI location, version and sign-in state
    Status,

    /// Show the signed-in user
    Whoami,

    /// List configured accounts
    Accounts,

    /// List items, sorted by title
    Items {
        /// Only items in this vault
        #[arg(long)]
        vault: Option<String>,
        /// Comma-separated categories (e.g. Login,Password)
        #[arg(long)]
        categories: Option<String>,
        /// Case-insensitive filter on title, URL and tags
        #[arg(short, long)]
        query: Option<String>,
    },

    /// List vaults
    Vaults,

    /// List item categories
    Categories,

    /// Fetch one item
    Get {
        /// Item ID or title
        id: String,
        /// Print only this field
        #[arg(long, conflicts_with = "otp")]
        field: Option<String>,
        /// Print the current one-time password
        #[arg(long)]
        otp: bool,
        /// Include concealed values
        #[arg(long)]
        reveal: bool,
    },

    /// Sign in through the configured shell
    Signin {
        /// Account shorthand, URL or ID
        account: Option<String>,
    },

    /// Generate a random password locally
    Generate {
        /// Password length (8-64)
        #[arg(short, long, default_value_t = 20)]
        length: usize,
        /// Leave out digits
        #[arg(long)]
        no_numbers: bool,
        /// Leave out symbols
        #[arg(long)]
        no_symbols: bool,
    },

    /// Manage preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsCommands,
    },

    /// List actions available for an item
    Actions {
        /// Item ID or title
        id: String,
    },

    /// Resolve a plugin feature code to a view
    Route {
        /// Feature code (item-list, vault-list, generate-password)
        code: String,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Print current preferences
    Show,
    /// Change one preference
    #[command(after_help = "KEYS:
  primary-action, secondary-action      action id (e.g. copy-password)
  close-window-after-copying            true | false
  cli-path, zsh-path                    path, empty to unset")]
    Set {
        /// Preference key
        key: String,
        /// New value
        value: String,
    },
    /// Restore defaults
    Reset,
}

/// Initialize logging on stderr; stdout carries command output.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            match e.root() {
                OplaunchError::Extension(text) => eprintln!("{}", extract_cli_message(text)),
                _ => eprintln!("{}: {}", e.title(), e.message()),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let store = match cli.store {
        Some(path) => PreferenceStore::open(path).await?,
        None => PreferenceStore::open_default().await?,
    };
    debug!(path = %store.path().display(), "using preference store");
    let prefs = store.load().await?;
    let client = OpClient::new(Config::from_preferences(&prefs).with_env_overrides());

    match cli.command {
        Commands::Status => {
            let cli_path = client.cli_path().ok();
            let version = match cli_path {
                Some(_) => client.cli_version().await.ok(),
                None => None,
            };
            let signed_in = cli_path.is_some() && client.is_signed_in().await;
            print_json(&json!({
                "cliPath": cli_path,
                "version": version,
                "signedIn": signed_in,
            }))
        }
        Commands::Whoami => print_json(&client.whoami().await?),
        Commands::Accounts => print_json(&client.list_accounts().await?),
        Commands::Items {
            vault,
            categories,
            query,
        } => {
            let mut flags = Vec::new();
            if let Some(vault) = vault {
                flags.push(format!("--vault={}", vault));
            }
            if let Some(categories) = categories {
                flags.push(format!("--categories={}", categories));
            }
            let items = match query {
                Some(q) => client.search_items(&q, &flags).await?,
                None => client.list_items(&flags).await?,
            };
            print_json(&items)
        }
        Commands::Vaults => print_json(&client.list_vaults().await?),
        Commands::Categories => print_json(&client.list_categories().await?),
        Commands::Get {
            id,
            field,
            otp,
            reveal,
        } => {
            if otp {
                print_json(&json!({ "otp": client.get_otp(&id).await? }))
            } else if let Some(field) = field {
                let value = client.get_field(&id, &field).await?;
                print_json(&json!({ "field": field, "value": value }))
            } else {
                print_json(&client.get_item(&id, reveal).await?)
            }
        }
        Commands::Signin { account } => {
            let output = client.sign_in(account.as_deref()).await?;
            print_json(&json!({ "signedIn": true, "output": output.trim() }))
        }
        Commands::Generate {
            length,
            no_numbers,
            no_symbols,
        } => {
            let options = PasswordOptions {
                length,
                include_numbers: !no_numbers,
                include_symbols: !no_symbols,
            };
            print_json(&json!({ "password": generator::generate(&options)? }))
        }
        Commands::Prefs { action } => match action {
            PrefsCommands::Show => print_json(&prefs),
            PrefsCommands::Set { key, value } => {
                let mut prefs = prefs;
                set_preference(&mut prefs, &key, &value)?;
                store.save(&prefs).await?;
                print_json(&prefs)
            }
            PrefsCommands::Reset => print_json(&store.reset().await?),
        },
        Commands::Actions { id } => {
            let item = client.get_item(&id, false).await?;
            print_json(&json!({
                "id": item.id,
                "title": item.title,
                "icon": item.category.icon(),
                "href": href_to_open_in_browser(&item),
                "actions": actions_for_item(&item, &prefs),
            }))
        }
        Commands::Route { code } => {
            let mut state = AppState::new();
            state.on_plugin_enter(EnterAction {
                code,
                kind: "text".to_string(),
                payload: None,
            });
            let route = state.resolve("/").unwrap_or(Route::Home);
            print_json(&json!({ "route": route, "path": route.path() }))
        }
    }
}

fn set_preference(prefs: &mut Preferences, key: &str, value: &str) -> Result<()> {
    match key {
        "primary-action" => prefs.primary_action = value.parse::<ActionId>()?,
        "secondary-action" => prefs.secondary_action = value.parse::<ActionId>()?,
        "close-window-after-copying" => {
            prefs.close_window_after_copying = value.parse().map_err(|_| {
                OplaunchError::InvalidInput(format!("expected true or false, got {}", value))
            })?
        }
        "cli-path" => prefs.cli_path = value.to_string(),
        "zsh-path" => prefs.zsh_path = value.to_string(),
        other => {
            return Err(OplaunchError::InvalidInput(format!(
                "unknown preference: {}",
                other
            )))
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_set_preference() {
        let mut prefs = Preferences::default();
        set_preference(&mut prefs, "primary-action", "copy-password").unwrap();
        set_preference(&mut prefs, "close-window-after-copying", "false").unwrap();
        set_preference(&mut prefs, "cli-path", "/opt/op").unwrap();
        assert_eq!(prefs.primary_action, ActionId::CopyPassword);
        assert!(!prefs.close_window_after_copying);
        assert_eq!(prefs.cli_path, "/opt/op");

        assert!(set_preference(&mut prefs, "colour", "blue").is_err());
        assert!(set_preference(&mut prefs, "secondary-action", "fly").is_err());
        assert!(set_preference(&mut prefs, "close-window-after-copying", "maybe").is_err());
    }

    #[test]
    fn test_parse_items_flags() {
        let cli = Cli::parse_from(["oplaunch", "--store", "/tmp/p.json", "items", "--vault", "Private"]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/p.json")));
        match cli.command {
            Commands::Items { vault, .. } => assert_eq!(vault.as_deref(), Some("Private")),
            _ => panic!("expected items"),
        }
    }
}
