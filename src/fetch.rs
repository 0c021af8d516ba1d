//! Reactive fetch state for presentation layers.
//!
//! A [`Resource`] wraps one client operation and publishes its
//! loading/error/data lifecycle on a `watch` channel. Views subscribe and
//! re-render on change; calling [`Resource::refresh`] again re-runs the
//! operation from scratch.

use crate::account::{Account, User};
use crate::bridge::CommandRunner;
use crate::item::{Item, ItemTemplate, Vault};
use crate::{OpClient, OplaunchError, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

/// Snapshot of a resource.
#[derive(Debug)]
pub struct FetchState<T> {
    /// Last successfully fetched value.
    pub data: Option<T>,
    /// Error from the last fetch, cleared when a new fetch starts.
    pub error: Option<Arc<OplaunchError>>,
    /// True while a fetch is in flight.
    pub is_loading: bool,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
        }
    }
}

impl<T: Clone> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
        }
    }
}

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

/// A refreshable value backed by one `op` operation.
///
/// # Example
///
/// ```no_run
/// use oplaunch::{fetch, Config, OpClient};
///
/// #[tokio::main]
/// async fn main() {
///     let client = OpClient::new(Config::default());
///     let vaults = fetch::vaults(client);
///
///     let mut updates = vaults.subscribe();
///     tokio::spawn(async move {
///         while updates.changed().await.is_ok() {
///             let state = updates.borrow().clone();
///             println!("loading={} vaults={:?}", state.is_loading, state.data.map(|v| v.len()));
///         }
///     });
///
///     vaults.refresh().await;
/// }
/// ```
pub struct Resource<T> {
    fetcher: Fetcher<T>,
    state: watch::Sender<FetchState<T>>,
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an idle resource. Nothing runs until [`refresh`](Self::refresh).
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            fetcher: Arc::new(move || fetch().boxed()),
            state,
        }
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Runs the operation once and publishes the outcome.
    ///
    /// On failure the previous data is kept and the error is recorded; the
    /// loading flag is reset either way.
    pub async fn refresh(&self) -> FetchState<T> {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = (self.fetcher)().await;

        self.state.send_modify(move |s| {
            match result {
                Ok(data) => s.data = Some(data),
                Err(e) => {
                    warn!(error = %e, "fetch failed");
                    s.error = Some(Arc::new(e));
                }
            }
            s.is_loading = false;
        });

        self.state()
    }
}

/// Items from `op items list --long [flags]`.
pub fn items<R>(client: OpClient<R>, flags: Vec<String>) -> Resource<Vec<Item>>
where
    R: CommandRunner + 'static,
{
    Resource::new(move || {
        let client = client.clone();
        let flags = flags.clone();
        async move { client.list_items(&flags).await }
    })
}

/// Vaults from `op vault list`.
pub fn vaults<R>(client: OpClient<R>) -> Resource<Vec<Vault>>
where
    R: CommandRunner + 'static,
{
    Resource::new(move || {
        let client = client.clone();
        async move { client.list_vaults().await }
    })
}

/// Categories from `op item template list`.
pub fn categories<R>(client: OpClient<R>) -> Resource<Vec<ItemTemplate>>
where
    R: CommandRunner + 'static,
{
    Resource::new(move || {
        let client = client.clone();
        async move { client.list_categories().await }
    })
}

/// Current user from `op whoami`.
pub fn account<R>(client: OpClient<R>) -> Resource<User>
where
    R: CommandRunner + 'static,
{
    Resource::new(move || {
        let client = client.clone();
        async move { client.whoami().await }
    })
}

/// Accounts from `op account list`.
pub fn accounts<R>(client: OpClient<R>) -> Resource<Vec<Account>>
where
    R: CommandRunner + 'static,
{
    Resource::new(move || {
        let client = client.clone();
        async move { client.list_accounts().await }
    })
}

/// Any JSON subcommand, post-processed by `transform`.
pub fn op<R, T, F>(client: OpClient<R>, args: Vec<String>, transform: F) -> Resource<T>
where
    R: CommandRunner + 'static,
    T: DeserializeOwned + Clone + Send + Sync + 'static,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    let transform = Arc::new(transform);
    Resource::new(move || {
        let client = client.clone();
        let args = args.clone();
        let transform = Arc::clone(&transform);
        async move {
            let operation = args.join(" ");
            let value: T = client.run_json(&operation, args).await?;
            Ok::<T, OplaunchError>((*transform)(value))
        }
    })
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::bridge::mock::MockRunner;
    use crate::Config;
    use serde_json::json;
    use std::fs::File;
    use tempfile::{tempdir, TempDir};

    fn client() -> (TempDir, Arc<MockRunner>, OpClient<MockRunner>) {
        let dir = tempdir().unwrap();
        let cli = dir.path().join("op");
        File::create(&cli).unwrap();
        let runner = Arc::new(MockRunner::new());
        let config = Config::default()
            .with_cli_path(cli.to_string_lossy())
            .with_cli_fallbacks(Vec::new());
        let client = OpClient::with_shared_runner(config, Arc::clone(&runner));
        (dir, runner, client)
    }

    #[tokio::test]
    async fn test_initial_state_is_loading() {
        let (_dir, _runner, client) = client();
        let resource = vaults(client);
        let state = resource.state();
        assert!(state.is_loading);
        assert!(state.data.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_refresh_success() {
        let (_dir, runner, client) = client();
        runner
            .respond_json(
                &["vault", "list", "--format=json"],
                json!([{"id": "2", "name": "work"}, {"id": "1", "name": "Private"}]),
            )
            .await;

        let resource = vaults(client);
        let mut rx = resource.subscribe();
        let state = resource.refresh().await;

        assert!(!state.is_loading);
        assert!(state.error.is_none());
        let names: Vec<_> = state.data.unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["Private", "work"]);
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_loading);
    }

    #[tokio::test]
    async fn test_error_keeps_data_and_clears_on_retry() {
        let (_dir, runner, client) = client();
        runner
            .respond_json(&["account", "list", "--format=json"], json!([]))
            .await;

        let resource = accounts(client);
        resource.refresh().await;

        runner.fail_all(Some("no such host".to_string())).await;
        let state = resource.refresh().await;
        assert!(!state.is_loading);
        assert!(state.data.is_some());
        let error = state.error.unwrap();
        assert!(matches!(error.root(), OplaunchError::Connection));

        runner.fail_all(None).await;
        let state = resource.refresh().await;
        assert!(state.error.is_none());
        assert_eq!(runner.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_items_resource_with_flags() {
        let (_dir, runner, client) = client();
        runner
            .respond_json(
                &["items", "list", "--long", "--categories=Login", "--format=json"],
                json!([{"id": "1", "title": "b", "category": "LOGIN"},
                       {"id": "2", "title": "A", "category": "LOGIN"}]),
            )
            .await;

        let resource = items(client, vec!["--categories=Login".to_string()]);
        let data = resource.refresh().await.data.unwrap();
        assert_eq!(data[0].title, "A");
    }

    #[tokio::test]
    async fn test_generic_op_resource() {
        let (_dir, runner, client) = client();
        runner
            .respond_json(
                &["item", "template", "list", "--format=json"],
                json!([{"uuid": "1", "name": "Login"}, {"uuid": "2", "name": "API Credential"}]),
            )
            .await;

        let resource = op(
            client,
            vec!["item".into(), "template".into(), "list".into()],
            |mut templates: Vec<ItemTemplate>| {
                templates.retain(|t| t.name != "Login");
                templates
            },
        );
        let data = resource.refresh().await.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].name, "API Credential");
    }

    #[tokio::test]
    async fn test_missing_cli_surfaces_error() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(MockRunner::new());
        let config = Config::default()
            .with_cli_path(dir.path().join("op").to_string_lossy())
            .with_cli_fallbacks(Vec::new());
        let resource = account(OpClient::with_shared_runner(config, Arc::clone(&runner)));

        let state = resource.refresh().await;
        assert!(!state.is_loading);
        assert!(matches!(
            state.error.unwrap().root(),
            OplaunchError::CliMissing(_)
        ));
        assert_eq!(runner.call_count().await, 0);
    }
}
