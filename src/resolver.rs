//! Locates the `op` binary and the sign-in shell on disk.

use crate::{Config, OplaunchError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Install locations checked after the configured path.
pub const CLI_FALLBACKS: &[&str] = &["/usr/local/bin/op", "/opt/homebrew/bin/op"];

/// Shells checked after the configured shell path.
pub const SHELL_FALLBACKS: &[&str] = &["/bin/zsh"];

/// Message shown when no candidate exists.
pub const CLI_MISSING_MESSAGE: &str =
    "1Password CLI is not found. Please set the path in the extension preferences.";

/// Returns the first candidate that exists on disk.
///
/// Empty candidates are skipped. Order is preserved, so an explicit
/// preference always beats a fallback.
///
/// # Example
///
/// ```
/// use oplaunch::resolver::first_existing;
///
/// let found = first_existing(["", "/definitely/not/here", "/"]);
/// assert_eq!(found, Some(std::path::PathBuf::from("/")));
/// ```
pub fn first_existing<I, P>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    candidates
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .filter(|p| !p.as_os_str().is_empty())
        .find(|p| p.exists())
}

/// Resolves CLI and shell paths from a [`Config`].
#[derive(Debug, Clone)]
pub struct PathResolver {
    cli_path: Option<String>,
    cli_fallbacks: Vec<String>,
    shell_path: Option<String>,
    shell_fallbacks: Vec<String>,
}

impl PathResolver {
    /// Builds a resolver from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            cli_path: config.cli_path.clone(),
            cli_fallbacks: config.cli_fallbacks.clone(),
            shell_path: config.shell_path.clone(),
            shell_fallbacks: config.shell_fallbacks.clone(),
        }
    }

    /// CLI candidates in priority order.
    pub fn cli_candidates(&self) -> Vec<String> {
        self.cli_path
            .iter()
            .chain(self.cli_fallbacks.iter())
            .cloned()
            .collect()
    }

    /// Shell candidates in priority order.
    pub fn shell_candidates(&self) -> Vec<String> {
        self.shell_path
            .iter()
            .chain(self.shell_fallbacks.iter())
            .cloned()
            .collect()
    }

    /// Returns the first existing CLI path.
    ///
    /// # Errors
    ///
    /// Returns [`OplaunchError::CliMissing`] when no candidate exists.
    pub fn resolve_cli(&self) -> Result<PathBuf> {
        let candidates = self.cli_candidates();
        match first_existing(&candidates) {
            Some(path) => {
                debug!(path = %path.display(), "resolved op CLI");
                Ok(path)
            }
            None => {
                debug!(?candidates, "op CLI not found");
                Err(OplaunchError::CliMissing(CLI_MISSING_MESSAGE.to_string()))
            }
        }
    }

    /// Returns the first existing shell path, if any.
    pub fn resolve_shell(&self) -> Option<PathBuf> {
        first_existing(self.shell_candidates())
    }
}
