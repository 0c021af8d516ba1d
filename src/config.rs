//! Runtime configuration injected into the client at startup.

use crate::bridge::{ExecOptions, DEFAULT_MAX_OUTPUT};
use crate::resolver::{CLI_FALLBACKS, SHELL_FALLBACKS};
use crate::Preferences;
use std::collections::HashMap;

/// Environment variable overriding the CLI path preference.
pub const ENV_CLI_PATH: &str = "OPLAUNCH_CLI_PATH";

/// Environment variable overriding the shell path preference.
pub const ENV_SHELL: &str = "OPLAUNCH_SHELL";

/// Configuration for an [`OpClient`](crate::OpClient).
///
/// Use the builder pattern for ergonomic configuration:
///
/// ```
/// use oplaunch::Config;
///
/// let config = Config::default()
///     .with_cli_path("/usr/local/bin/op")
///     .with_shell_path("/bin/bash")
///     .with_env("OP_ACCOUNT", "my.1password.com");
///
/// assert_eq!(config.cli_path.as_deref(), Some("/usr/local/bin/op"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Preferred `op` location, checked before the fallbacks.
    pub cli_path: Option<String>,

    /// Install locations tried after `cli_path`.
    pub cli_fallbacks: Vec<String>,

    /// Preferred shell for interactive sign-in.
    pub shell_path: Option<String>,

    /// Shells tried after `shell_path`.
    pub shell_fallbacks: Vec<String>,

    /// Maximum bytes of stdout captured per invocation.
    pub max_output: usize,

    /// Extra environment for child processes.
    pub env: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cli_path: None,
            cli_fallbacks: CLI_FALLBACKS.iter().map(|s| s.to_string()).collect(),
            shell_path: None,
            shell_fallbacks: SHELL_FALLBACKS.iter().map(|s| s.to_string()).collect(),
            max_output: DEFAULT_MAX_OUTPUT,
            env: HashMap::new(),
        }
    }
}

impl Config {
    /// Derives configuration from persisted preferences.
    ///
    /// Empty preference strings mean "not set".
    pub fn from_preferences(prefs: &Preferences) -> Self {
        let mut config = Self::default();
        if !prefs.cli_path.is_empty() {
            config.cli_path = Some(prefs.cli_path.clone());
        }
        if !prefs.zsh_path.is_empty() {
            config.shell_path = Some(prefs.zsh_path.clone());
        }
        config
    }

    /// Applies `OPLAUNCH_CLI_PATH` / `OPLAUNCH_SHELL` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary lookup. Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(path) = non_empty(ENV_CLI_PATH) {
            self.cli_path = Some(path);
        }
        if let Some(shell) = non_empty(ENV_SHELL) {
            self.shell_path = Some(shell);
        }
        self
    }

    /// Sets the preferred `op` location.
    pub fn with_cli_path(mut self, path: impl Into<String>) -> Self {
        self.cli_path = Some(path.into());
        self
    }

    /// Replaces the CLI fallback list.
    pub fn with_cli_fallbacks(mut self, fallbacks: Vec<String>) -> Self {
        self.cli_fallbacks = fallbacks;
        self
    }

    /// Sets the preferred sign-in shell.
    pub fn with_shell_path(mut self, path: impl Into<String>) -> Self {
        self.shell_path = Some(path.into());
        self
    }

    /// Replaces the shell fallback list.
    pub fn with_shell_fallbacks(mut self, fallbacks: Vec<String>) -> Self {
        self.shell_fallbacks = fallbacks;
        self
    }

    /// Sets the stdout capture limit.
    pub fn with_max_output(mut self, bytes: usize) -> Self {
        self.max_output = bytes;
        self
    }

    /// Adds an environment variable for child processes.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Options handed to the bridge on every call.
    pub fn exec_options(&self) -> ExecOptions {
        let mut env: Vec<(String, String)> =
            self.env.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        env.sort();
        ExecOptions {
            max_output: self.max_output,
            env,
        }
    }
}
