//! Scripted runner for testing.
//!
//! Records every invocation and answers from a table of canned outcomes,
//! with an error-injection switch to simulate a failing CLI.

use super::{CommandRunner, ExecOptions, ExecOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program path (or shell) that would have been spawned.
    pub program: String,
    /// Arguments; for shell calls this is the single command string.
    pub args: Vec<String>,
    /// Whether the call went through `execute_shell`.
    pub via_shell: bool,
}

/// Mock runner for testing.
///
/// Responses are keyed by the space-joined argument list (or the command
/// string for shell calls).
///
/// # Example
///
/// ```
/// use oplaunch::bridge::mock::MockRunner;
/// use oplaunch::bridge::{CommandRunner, ExecOptions};
///
/// #[tokio::main]
/// async fn main() {
///     let runner = MockRunner::new();
///     runner.respond_ok(&["--version"], "2.30.0\n").await;
///
///     let outcome = runner
///         .execute("/usr/local/bin/op", &["--version".to_string()], &ExecOptions::default())
///         .await;
///     assert_eq!(outcome.data.as_deref(), Some("2.30.0\n"));
///     assert_eq!(runner.call_count().await, 1);
/// }
/// ```
#[derive(Clone, Default)]
pub struct MockRunner {
    responses: Arc<RwLock<HashMap<String, ExecOutcome>>>,
    calls: Arc<RwLock<Vec<Invocation>>>,
    fail_all: Arc<RwLock<Option<String>>>,
}

impl MockRunner {
    /// Creates a runner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome for an argument list.
    pub async fn respond(&self, args: &[&str], outcome: ExecOutcome) {
        self.responses.write().await.insert(args.join(" "), outcome);
    }

    /// Scripts a successful stdout for an argument list.
    pub async fn respond_ok(&self, args: &[&str], stdout: impl Into<String>) {
        self.respond(args, ExecOutcome::ok(stdout)).await;
    }

    /// Scripts a JSON stdout for an argument list.
    pub async fn respond_json(&self, args: &[&str], value: serde_json::Value) {
        self.respond(args, ExecOutcome::ok(value.to_string())).await;
    }

    /// Scripts a failure for an argument list.
    pub async fn respond_err(&self, args: &[&str], error: impl Into<String>) {
        self.respond(args, ExecOutcome::failed(error)).await;
    }

    /// Makes every subsequent call fail with `error`, or clears that with `None`.
    pub async fn fail_all(&self, error: Option<String>) {
        *self.fail_all.write().await = error;
    }

    /// All calls seen so far.
    pub async fn invocations(&self) -> Vec<Invocation> {
        self.calls.read().await.clone()
    }

    /// Number of calls seen so far.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn answer(&self, key: &str, invocation: Invocation) -> ExecOutcome {
        self.calls.write().await.push(invocation);

        if let Some(error) = self.fail_all.read().await.clone() {
            return ExecOutcome::failed(error);
        }

        self.responses
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_else(|| ExecOutcome::failed(format!("unscripted invocation: {}", key)))
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn execute(&self, program: &str, args: &[String], _options: &ExecOptions) -> ExecOutcome {
        let key = args.join(" ");
        let invocation = Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            via_shell: false,
        };
        self.answer(&key, invocation).await
    }

    async fn execute_shell(
        &self,
        command: &str,
        shell: Option<&str>,
        _options: &ExecOptions,
    ) -> ExecOutcome {
        let invocation = Invocation {
            program: shell.unwrap_or_default().to_string(),
            args: vec![command.to_string()],
            via_shell: true,
        };
        self.answer(command, invocation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_fails() {
        let runner = MockRunner::new();
        let outcome = runner
            .execute("op", &["whoami".to_string()], &ExecOptions::default())
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("whoami"));
    }

    #[tokio::test]
    async fn test_error_injection() {
        let runner = MockRunner::new();
        runner.respond_ok(&["whoami"], "{}").await;
        runner.fail_all(Some("no such host".to_string())).await;

        let outcome = runner
            .execute("op", &["whoami".to_string()], &ExecOptions::default())
            .await;
        assert_eq!(outcome.error.as_deref(), Some("no such host"));

        runner.fail_all(None).await;
        let outcome = runner
            .execute("op", &["whoami".to_string()], &ExecOptions::default())
            .await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_shell_invocations_recorded() {
        let runner = MockRunner::new();
        runner.respond_ok(&["/bin/op signin"], "ok").await;

        let outcome = runner
            .execute_shell("/bin/op signin", Some("/bin/zsh"), &ExecOptions::default())
            .await;
        assert!(outcome.success);

        let calls = runner.invocations().await;
        assert_eq!(calls.len(), 1);
        assert!(calls[0].via_shell);
        assert_eq!(calls[0].program, "/bin/zsh");
    }
}
