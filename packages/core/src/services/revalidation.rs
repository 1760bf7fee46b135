//! Revalidation Notifier
//!
//! Tells the public site that a path is stale so its renderer drops the cached
//! page. This is a cache hint, not part of any write's correctness:
//!
//! - `notify()` spawns a detached task and returns immediately
//! - the task sends exactly one request; no retry, queue or backoff
//! - non-2xx responses and network errors are logged and dropped
//!
//! Callers get a [`Dispatched`] handle they are free to drop. Its only use is
//! observing the outcome in diagnostics and tests; there is no error type on
//! this path, so a failed revalidation cannot change the result of the flow
//! that triggered it.

use crate::config::ConsoleConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Path appended to the configured base URL
pub const REVALIDATE_ENDPOINT: &str = "/api/revalidate";

/// Transport that delivers one revalidation request
#[async_trait]
pub trait RevalidationSink: Send + Sync {
    async fn send(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct RevalidateRequest<'a> {
    path: &'a str,
}

/// POSTs `{ "path": ... }` as JSON to `{base_url}/api/revalidate`
pub struct HttpRevalidationSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRevalidationSink {
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .context("Failed to build revalidation HTTP client")?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), REVALIDATE_ENDPOINT),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RevalidationSink for HttpRevalidationSink {
    async fn send(&self, path: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RevalidateRequest { path })
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("revalidation endpoint returned {}", status);
        }
        Ok(())
    }
}

/// What happened to one revalidation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevalidationOutcome {
    /// The site acknowledged the request with a 2xx
    Delivered,
    /// No endpoint configured, nothing sent
    Skipped,
    /// Sending failed; logged and dropped
    Ignored(String),
}

/// Handle to a revalidation request running in the background
#[must_use = "drop the handle to detach, or await `outcome()` to observe the result"]
pub struct Dispatched {
    handle: Option<JoinHandle<RevalidationOutcome>>,
}

impl Dispatched {
    fn from_handle(handle: Option<JoinHandle<RevalidationOutcome>>) -> Self {
        Self { handle }
    }

    /// Detach explicitly; the request keeps running
    pub fn detach(self) {}

    /// Wait for the background request and report its outcome
    pub async fn outcome(self) -> RevalidationOutcome {
        match self.handle {
            Some(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => RevalidationOutcome::Ignored(format!("revalidation task aborted: {}", e)),
            },
            None => RevalidationOutcome::Skipped,
        }
    }
}

/// Fire-and-forget cache invalidation for public site paths
#[derive(Clone)]
pub struct RevalidationNotifier {
    sink: Option<Arc<dyn RevalidationSink>>,
}

impl RevalidationNotifier {
    pub fn new(sink: Arc<dyn RevalidationSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// Notifier that never sends anything
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// HTTP notifier when a base URL is configured, disabled otherwise
    pub fn from_config(config: &ConsoleConfig) -> Result<Self> {
        match &config.revalidate_base_url {
            Some(base_url) => {
                let sink = HttpRevalidationSink::new(base_url, config.revalidate_timeout)?;
                tracing::info!("Revalidation enabled: {}", sink.endpoint());
                Ok(Self::new(Arc::new(sink)))
            }
            None => {
                tracing::info!("Revalidation disabled (no base URL configured)");
                Ok(Self::disabled())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Dispatch a revalidation for `path` on a detached task
    pub fn notify(&self, path: impl Into<String>) -> Dispatched {
        let path = path.into();

        let Some(sink) = self.sink.clone() else {
            tracing::debug!("Revalidation skipped for {} (disabled)", path);
            return Dispatched::from_handle(None);
        };

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                tracing::warn!("Revalidation skipped for {}: no async runtime", path);
                return Dispatched::from_handle(None);
            }
        };

        let handle = runtime.spawn(async move {
            match sink.send(&path).await {
                Ok(()) => {
                    tracing::debug!("Revalidated {}", path);
                    RevalidationOutcome::Delivered
                }
                Err(e) => {
                    tracing::warn!("Revalidation of {} ignored: {:#}", path, e);
                    RevalidationOutcome::Ignored(format!("{:#}", e))
                }
            }
        });

        Dispatched::from_handle(Some(handle))
    }
}
