//! Webhook notifier
//!
//! Posts check-in payloads as JSON to the configured endpoint. Each post runs
//! as its own task on a tokio runtime owned by the caller; `notify` returns as
//! soon as the task is spawned. Delivery results are logged and nothing else:
//! the response body is never read, and failures never reach the ledger.
//!
//! When no endpoint is configured, [`DisabledNotifier`] stands in and the tool
//! runs in local-only mode.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Client, Url};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{ConfigError, WebhookConfig};
use crate::core::models::CheckInPayload;
use crate::core::ports::{Delivery, Notifier};

/// How many times a failed post is attempted
///
/// The default is a single attempt: a failed delivery is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one (at least 1)
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Fire-and-forget JSON POST to a webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Url,
    retry: RetryPolicy,
    runtime: Handle,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl WebhookNotifier {
    /// Notifier posting to `url`, spawning deliveries on `runtime`.
    ///
    /// `timeout` bounds each request so a slow endpoint cannot pile up work.
    pub fn new(
        url: Url,
        timeout: Duration,
        retry: RetryPolicy,
        runtime: Handle,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url,
            retry: RetryPolicy {
                max_attempts: retry.max_attempts.max(1),
                ..retry
            },
            runtime,
            in_flight: Arc::default(),
        })
    }

    /// The endpoint payloads are posted to
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, payload: CheckInPayload) -> Delivery {
        log::debug!("Dispatching {payload:?} to {}", self.url);
        let client = self.client.clone();
        let url = self.url.clone();
        let retry = self.retry;
        let task = self.runtime.spawn(deliver(client, url, payload, retry));

        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(task);
        Delivery::Dispatched
    }

    fn is_enabled(&self) -> bool {
        true
    }

    /// Must not be called from inside the runtime the notifier spawns on.
    fn flush(&self, grace: Duration) {
        let pending: Vec<_> = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *in_flight)
        };
        let pending: Vec<_> = pending.into_iter().filter(|t| !t.is_finished()).collect();
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        log::debug!("Waiting up to {grace:?} for {count} webhook delivery(ies)");
        let drained = self.runtime.block_on(async {
            tokio::time::timeout(grace, async {
                for task in pending {
                    let _ = task.await;
                }
            })
            .await
        });
        if drained.is_err() {
            log::warn!("Gave up waiting for webhook deliveries after {grace:?}");
        }
    }
}

async fn deliver(client: Client, url: Url, payload: CheckInPayload, retry: RetryPolicy) {
    for attempt in 1..=retry.max_attempts {
        match client.post(url.clone()).json(&payload).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    log::debug!("Webhook accepted check-in for {} ({status})", payload.username);
                } else {
                    log::warn!("Webhook answered {status} for {}", payload.username);
                }
                return;
            },
            Err(err) => {
                log::warn!(
                    "Webhook post for {} failed (attempt {attempt}/{}): {err}",
                    payload.username,
                    retry.max_attempts
                );
                if attempt < retry.max_attempts {
                    tokio::time::sleep(retry.backoff).await;
                }
            },
        }
    }
}

/// Local-only mode: nothing leaves the process
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledNotifier;

impl DisabledNotifier {
    /// Announce degraded mode and build the notifier
    #[must_use]
    pub fn new() -> Self {
        log::warn!("No webhook URL configured, check-ins will only be recorded locally");
        Self
    }
}

impl Notifier for DisabledNotifier {
    fn notify(&self, payload: CheckInPayload) -> Delivery {
        log::debug!("Webhook disabled, not sending {payload:?}");
        Delivery::Disabled
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Build the notifier the configuration asks for
pub fn from_config(
    config: &WebhookConfig,
    runtime: Handle,
) -> Result<Box<dyn Notifier>, ConfigError> {
    match config.endpoint()? {
        Some(url) => {
            let notifier =
                WebhookNotifier::new(url, config.timeout(), config.retry_policy(), runtime)
                    .map_err(|e| ConfigError::Client(e.to_string()))?;
            log::info!("Posting check-ins to {}", notifier.url());
            Ok(Box::new(notifier))
        },
        None => Ok(Box::new(DisabledNotifier::new())),
    }
}
