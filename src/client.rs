//! Typed wrappers over `op` subcommands.
//!
//! Each operation resolves the CLI path, runs exactly one subcommand through
//! the bridge, and either parses stdout or classifies the failure. Nothing is
//! cached; calling an operation again spawns a fresh process.

use crate::account::{Account, User};
use crate::bridge::{CommandRunner, ProcessRunner};
use crate::classify::classify;
use crate::item::{Item, ItemTemplate, Vault};
use crate::resolver::PathResolver;
use crate::validation::{validate_account, validate_item_ref};
use crate::{Config, OplaunchError, Result};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

const JSON_FLAG: &str = "--format=json";

/// Message shown when no sign-in shell exists.
pub const SHELL_MISSING_MESSAGE: &str =
    "Shell not found. Please set the shell path in the extension preferences.";

/// Client for the 1Password CLI.
///
/// Cheap to clone; clones share the runner.
///
/// # Example
///
/// ```no_run
/// use oplaunch::{Config, OpClient};
///
/// #[tokio::main]
/// async fn main() -> oplaunch::Result<()> {
///     let client = OpClient::new(Config::default().with_env_overrides());
///
///     if !client.is_signed_in().await {
///         client.sign_in(None).await?;
///     }
///
///     for item in client.list_items(&[]).await? {
///         println!("{} ({})", item.title, item.category);
///     }
///     Ok(())
/// }
/// ```
pub struct OpClient<R: CommandRunner = ProcessRunner> {
    config: Config,
    resolver: PathResolver,
    runner: Arc<R>,
}

impl<R: CommandRunner> Clone for OpClient<R> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            resolver: self.resolver.clone(),
            runner: Arc::clone(&self.runner),
        }
    }
}

impl OpClient<ProcessRunner> {
    /// Creates a client that spawns real processes.
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, ProcessRunner::new())
    }
}

impl<R: CommandRunner> OpClient<R> {
    /// Creates a client over a custom runner.
    pub fn with_runner(config: Config, runner: R) -> Self {
        Self::with_shared_runner(config, Arc::new(runner))
    }

    /// Creates a client sharing an existing runner.
    pub fn with_shared_runner(config: Config, runner: Arc<R>) -> Self {
        let resolver = PathResolver::new(&config);
        Self {
            config,
            resolver,
            runner,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path resolver in use.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Resolves the `op` binary.
    ///
    /// # Errors
    ///
    /// Returns [`OplaunchError::CliMissing`] when no candidate exists.
    pub fn cli_path(&self) -> Result<PathBuf> {
        self.resolver.resolve_cli()
    }

    /// Runs `op <args>` and returns stdout.
    ///
    /// The CLI path is resolved first; when it is missing no process is
    /// spawned. Failures are classified and tagged with `operation`.
    pub async fn run(&self, operation: &str, args: Vec<String>) -> Result<String> {
        let cli = self
            .cli_path()
            .map_err(|e| OplaunchError::op_failed(operation, e))?;
        let program = cli.to_string_lossy();

        let outcome = self
            .runner
            .execute(&program, &args, &self.config.exec_options())
            .await;

        outcome.into_result().map_err(|stderr| {
            debug!(operation, "op invocation failed");
            OplaunchError::op_failed(operation, classify(&stderr))
        })
    }

    /// Runs `op <args> --format=json` and parses stdout.
    pub async fn run_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        mut args: Vec<String>,
    ) -> Result<T> {
        args.push(JSON_FLAG.to_string());
        let stdout = self.run(operation, args).await?;
        serde_json::from_str(&stdout).map_err(|e| OplaunchError::op_failed(operation, e.into()))
    }

    /// Runs an arbitrary subcommand in JSON mode.
    pub async fn op_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let operation = args.join(" ");
        self.run_json(&operation, to_args(args)).await
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Whether the CLI is present and answers `op --version`.
    pub async fn check_cli(&self) -> bool {
        self.cli_version().await.is_ok()
    }

    /// Output of `op --version`, trimmed.
    pub async fn cli_version(&self) -> Result<String> {
        let out = self.run("version", to_args(&["--version"])).await?;
        Ok(out.trim().to_string())
    }

    /// Whether `op whoami` succeeds. Any failure counts as signed out.
    pub async fn is_signed_in(&self) -> bool {
        match self.run("whoami", to_args(&["whoami"])).await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "not signed in");
                false
            }
        }
    }

    /// Current user.
    pub async fn whoami(&self) -> Result<User> {
        self.run_json("whoami", to_args(&["whoami"])).await
    }

    /// Runs `op signin [account]` through the configured shell.
    ///
    /// The shell is needed so the CLI can reach the desktop app or prompt for
    /// the account password.
    ///
    /// # Errors
    ///
    /// - [`OplaunchError::InvalidInput`]: account contains shell metacharacters
    /// - [`OplaunchError::CliMissing`] / [`OplaunchError::ShellMissing`]
    /// - classified CLI errors
    pub async fn sign_in(&self, account: Option<&str>) -> Result<String> {
        let account = account.filter(|a| !a.is_empty());
        if let Some(account) = account {
            validate_account(account)?;
        }

        let cli = self
            .cli_path()
            .map_err(|e| OplaunchError::op_failed("signin", e))?;
        let shell = self.resolver.resolve_shell().ok_or_else(|| {
            OplaunchError::op_failed(
                "signin",
                OplaunchError::ShellMissing(SHELL_MISSING_MESSAGE.to_string()),
            )
        })?;

        let mut command = format!("{} signin", shell_quote(&cli.to_string_lossy()));
        if let Some(account) = account {
            command.push(' ');
            command.push_str(account);
        }

        info!(shell = %shell.display(), "signing in to 1Password");
        let shell = shell.to_string_lossy();
        let outcome = self
            .runner
            .execute_shell(&command, Some(shell.as_ref()), &self.config.exec_options())
            .await;

        outcome
            .into_result()
            .map_err(|stderr| OplaunchError::op_failed("signin", classify(&stderr)))
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// `op items list --long [flags]`, sorted by title.
    pub async fn list_items(&self, flags: &[String]) -> Result<Vec<Item>> {
        let mut args = to_args(&["items", "list", "--long"]);
        args.extend(flags.iter().cloned());

        let mut items: Vec<Item> = self.run_json("item list", args).await?;
        sort_case_insensitive(&mut items, |i| i.title.as_str());
        debug!(count = items.len(), "listed items");
        Ok(items)
    }

    /// Items whose title, URL or tags contain `query`; all items when empty.
    pub async fn search_items(&self, query: &str, flags: &[String]) -> Result<Vec<Item>> {
        let items = self.list_items(flags).await?;
        if query.is_empty() {
            return Ok(items);
        }
        Ok(items.into_iter().filter(|i| i.matches_query(query)).collect())
    }

    /// `op vault list`, sorted by name.
    pub async fn list_vaults(&self) -> Result<Vec<Vault>> {
        let mut vaults: Vec<Vault> = self
            .run_json("vault list", to_args(&["vault", "list"]))
            .await?;
        sort_case_insensitive(&mut vaults, |v| v.name.as_str());
        Ok(vaults)
    }

    /// `op item template list`, sorted by name.
    pub async fn list_categories(&self) -> Result<Vec<ItemTemplate>> {
        let mut templates: Vec<ItemTemplate> = self
            .run_json("item template list", to_args(&["item", "template", "list"]))
            .await?;
        sort_case_insensitive(&mut templates, |t| t.name.as_str());
        Ok(templates)
    }

    /// `op account list`, in CLI order.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.run_json("account list", to_args(&["account", "list"]))
            .await
    }

    // ========================================================================
    // Item retrieval
    // ========================================================================

    /// `op item get <id> [--reveal]`.
    pub async fn get_item(&self, id: &str, reveal: bool) -> Result<Item> {
        validate_item_ref(id)?;

        let mut args = to_args(&["item", "get", id]);
        if reveal {
            args.push("--reveal".to_string());
        }
        self.run_json("item get", args).await
    }

    /// `op item get <id> --fields <field> --reveal`, trimmed.
    pub async fn get_field(&self, id: &str, field: &str) -> Result<String> {
        validate_item_ref(id)?;
        validate_item_ref(field)?;

        let out = self
            .run(
                "item get",
                to_args(&["item", "get", id, "--fields", field, "--reveal"]),
            )
            .await?;
        Ok(out.trim().to_string())
    }

    /// `op item get <id> --otp`, the current one-time password.
    pub async fn get_otp(&self, id: &str) -> Result<String> {
        validate_item_ref(id)?;

        let out = self
            .run("item get", to_args(&["item", "get", id, "--otp"]))
            .await?;
        Ok(out.trim().to_string())
    }
}

/// Stable, case-insensitive sort by a string key.
///
/// ```
/// use oplaunch::client::sort_case_insensitive;
///
/// let mut fruit = vec!["banana", "Apple", "cherry"];
/// sort_case_insensitive(&mut fruit, |s| *s);
/// assert_eq!(fruit, ["Apple", "banana", "cherry"]);
/// ```
pub fn sort_case_insensitive<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| key(item).to_lowercase());
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn shell_quote(value: &str) -> String {
    let safe = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-+:@".contains(c));
    if safe && !value.is_empty() {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}
