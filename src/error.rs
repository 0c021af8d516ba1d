//! Error types for oplaunch operations.

use thiserror::Error;

/// Result type alias using [`OplaunchError`].
pub type Result<T> = std::result::Result<T, OplaunchError>;

/// Errors that can occur while talking to the 1Password CLI.
///
/// The first five variants are the user-facing categories produced by
/// [`classify`](crate::classify::classify). Every variant has a short
/// [`title`](OplaunchError::title) and a longer [`message`](OplaunchError::message)
/// suitable for a toast or list placeholder.
#[derive(Debug, Error)]
pub enum OplaunchError {
    /// The CLI could not reach 1Password ("no such host").
    #[error("No connection to 1Password.")]
    Connection,

    /// The requested item does not exist.
    #[error("Item not found on 1Password.")]
    NotFound,

    /// The `op` binary is missing or could not be spawned.
    #[error("{0}")]
    CliMissing(String),

    /// No usable shell for interactive sign-in.
    #[error("{0}")]
    ShellMissing(String),

    /// The item exists but lacks the requested field.
    #[error("Item does not contain the field {0}.")]
    MissingField(String),

    /// Catch-all carrying the CLI's own error text.
    #[error("{0}")]
    Extension(String),

    /// Input rejected before reaching the CLI.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An `op` operation failed with context.
    #[error("op {operation}: {source}")]
    OpFailed {
        /// Operation name (item list, vault list, whoami, ...)
        operation: String,
        /// Underlying error
        #[source]
        source: Box<OplaunchError>,
    },

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OplaunchError {
    /// Wraps an error with the `op` operation that produced it.
    ///
    /// # Example
    ///
    /// ```
    /// use oplaunch::OplaunchError;
    ///
    /// let err = OplaunchError::op_failed("vault list", OplaunchError::Connection);
    /// assert_eq!(err.to_string(), "op vault list: No connection to 1Password.");
    /// assert_eq!(err.title(), "No connection to 1Password.");
    /// ```
    pub fn op_failed(operation: impl Into<String>, err: OplaunchError) -> Self {
        Self::OpFailed {
            operation: operation.into(),
            source: Box::new(err),
        }
    }

    /// Returns the innermost error, skipping operation context.
    pub fn root(&self) -> &OplaunchError {
        match self {
            Self::OpFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Short headline for display.
    pub fn title(&self) -> String {
        match self.root() {
            Self::Connection => "No connection to 1Password.".to_string(),
            Self::NotFound => "Item not found on 1Password.".to_string(),
            Self::CliMissing(_) => "1Password CLI not found.".to_string(),
            Self::ShellMissing(_) => "Shell not found.".to_string(),
            Self::MissingField(field) => format!("Item does not contain the field {}.", field),
            Self::Extension(text) => text.clone(),
            other => other.to_string(),
        }
    }

    /// Longer, actionable description for display.
    pub fn message(&self) -> String {
        match self.root() {
            Self::Connection => "Verify Your Internet Connection.".to_string(),
            Self::NotFound => "Check it on your 1Password app.".to_string(),
            Self::CliMissing(msg) | Self::ShellMissing(msg) => msg.clone(),
            other => other.title(),
        }
    }

    /// True for the categories a user can fix by changing preferences.
    pub fn is_setup_error(&self) -> bool {
        matches!(self.root(), Self::CliMissing(_) | Self::ShellMissing(_))
    }
}
