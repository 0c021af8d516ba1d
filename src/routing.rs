//! Maps launcher entry codes to views.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A view of the launcher front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// Landing view
    Home,
    /// Searchable item list
    ItemList,
    /// Vault list
    VaultList,
    /// Password generator
    GeneratePassword,
}

impl Route {
    /// Routes reachable from a feature code.
    pub const FEATURES: [Route; 3] = [Route::ItemList, Route::VaultList, Route::GeneratePassword];

    /// Feature code registered with the host launcher; empty for `Home`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Home => "",
            Self::ItemList => "item-list",
            Self::VaultList => "vault-list",
            Self::GeneratePassword => "generate-password",
        }
    }

    /// URL path of the view.
    pub fn path(&self) -> String {
        format!("/{}", self.code())
    }

    /// Route for a feature code, if it is one.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::FEATURES.into_iter().find(|r| r.code() == code)
    }

    /// Route for a URL path.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.strip_prefix('/')? {
            "" => Some(Self::Home),
            code => Self::from_code(code),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = crate::OplaunchError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_code(s)
            .or_else(|| Self::from_path(s))
            .ok_or_else(|| crate::OplaunchError::InvalidInput(format!("unknown route: {}", s)))
    }
}

/// Event delivered by the host when the plugin is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterAction {
    /// Feature code the user triggered
    pub code: String,
    /// Trigger type (text, regex, files, ...)
    #[serde(rename = "type")]
    pub kind: String,
    /// Text or data the user entered with the trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Explicit front-end state, passed to views instead of a global.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    route: Option<String>,
    enter_action: Option<EnterAction>,
}

impl AppState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the feature code the plugin was entered with.
    pub fn on_plugin_enter(&mut self, action: EnterAction) {
        debug!(code = %action.code, "plugin entered");
        self.route = Some(action.code.clone());
        self.enter_action = Some(action);
    }

    /// Clears the pending route when the plugin is hidden or killed.
    pub fn on_plugin_out(&mut self) {
        self.route = None;
    }

    /// Feature code from the last enter event, while the plugin is open.
    pub fn pending_route(&self) -> Option<&str> {
        self.route.as_deref().filter(|r| !r.is_empty())
    }

    /// Last enter event.
    pub fn enter_action(&self) -> Option<&EnterAction> {
        self.enter_action.as_ref()
    }

    /// Navigation guard: a visit to `/` is redirected to the pending feature
    /// route. Returns the path to navigate to instead, if any.
    pub fn redirect(&self, to_path: &str) -> Option<String> {
        match self.pending_route() {
            Some(code) if to_path == "/" => Some(format!("/{}", code)),
            _ => None,
        }
    }

    /// View to render for a navigation to `to_path`, after redirection.
    pub fn resolve(&self, to_path: &str) -> Option<Route> {
        let path = self.redirect(to_path);
        Route::from_path(path.as_deref().unwrap_or(to_path))
    }
}
