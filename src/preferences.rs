//! Persisted user preferences.
//!
//! Preferences live in a small local key-value file: a JSON object mapping
//! keys to values. The record is stored as JSON text under a fixed key; other
//! keys in the same file are carried through untouched, whatever their type.

use crate::actions::ActionId;
use crate::{OplaunchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Key under which the preference record is stored.
pub const PREFERENCES_KEY: &str = "1password-preferences";

/// Current record version.
pub const PREFERENCES_VERSION: &str = "v8";

/// User-chosen settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Record version (UI-version flag)
    pub version: String,
    /// Action run on Enter
    pub primary_action: ActionId,
    /// Action run on the modifier shortcut
    pub secondary_action: ActionId,
    /// Hide the launcher after copying a value
    pub close_window_after_copying: bool,
    /// `op` location override; empty means "use fallbacks"
    pub cli_path: String,
    /// Shell used for interactive sign-in; empty means "use fallbacks"
    pub zsh_path: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION.to_string(),
            primary_action: ActionId::OpenIn1Password,
            secondary_action: ActionId::OpenInBrowser,
            close_window_after_copying: true,
            cli_path: String::new(),
            zsh_path: "/bin/zsh".to_string(),
        }
    }
}

/// File-backed store for [`Preferences`].
///
/// # Security
///
/// The file is written with mode 0600 on Unix; it holds paths rather than
/// secrets, but lives next to other launcher state.
///
/// # Example
///
/// ```no_run
/// use oplaunch::preferences::PreferenceStore;
/// use oplaunch::ActionId;
///
/// #[tokio::main]
/// async fn main() -> oplaunch::Result<()> {
///     let store = PreferenceStore::open("/tmp/oplaunch/preferences.json").await?;
///
///     let mut prefs = store.load().await?;
///     prefs.primary_action = ActionId::CopyPassword;
///     store.save(&prefs).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Opens a store at `path`, creating the parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        Ok(Self { path })
    }

    /// Opens the store in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub async fn open_default() -> Result<Self> {
        Self::open(default_path()?).await
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads preferences, writing defaults on first run.
    ///
    /// Missing fields take their default one at a time. A record that cannot
    /// be parsed is replaced by defaults in memory only; the file is not
    /// rewritten. The record may be JSON text or a plain JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or when the file is not a JSON object.
    pub async fn load(&self) -> Result<Preferences> {
        let entries = self.read_entries().await?;

        let parsed: serde_json::Result<Preferences> = match entries.get(PREFERENCES_KEY) {
            None => {
                info!(path = %self.path.display(), "no stored preferences, writing defaults");
                let prefs = Preferences::default();
                self.save(&prefs).await?;
                return Ok(prefs);
            }
            Some(Value::String(text)) => serde_json::from_str(text),
            Some(record) => serde_json::from_value(record.clone()),
        };

        match parsed {
            Ok(prefs) => Ok(prefs),
            Err(e) => {
                warn!(error = %e, "stored preferences are invalid, using defaults");
                Ok(Preferences::default())
            }
        }
    }

    /// Persists preferences. Other keys in the file are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails or the existing file is not a JSON
    /// object.
    pub async fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut entries = self.read_entries().await?;
        entries.insert(
            PREFERENCES_KEY.to_string(),
            Value::String(serde_json::to_string(prefs)?),
        );
        self.write_entries(&entries).await?;
        debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }

    /// Restores default preferences.
    pub async fn reset(&self) -> Result<Preferences> {
        let prefs = Preferences::default();
        self.save(&prefs).await?;
        Ok(prefs)
    }

    async fn read_entries(&self) -> Result<Map<String, Value>> {
        let data = match fs::read(&self.path).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        serde_json::from_slice(&data).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "storage file is not a key-value object");
            OplaunchError::InvalidInput(format!(
                "{} is not a JSON object: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries)?;

        let mut file = fs::File::create(&self.path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata().await?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).await?;
        }

        file.write_all(&json).await?;
        file.flush().await?;

        Ok(())
    }
}

/// Default preference file location in the platform config directory.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "oplaunch").ok_or_else(|| {
        OplaunchError::Other(anyhow::anyhow!("unable to resolve config directory"))
    })?;
    Ok(dirs.config_dir().join("preferences.json"))
}
