//! Periodic backend liveness checks.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::VideoApi;

/// Backend reachability as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Checking => write!(f, "checking"),
            HealthStatus::Online => write!(f, "online"),
            HealthStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Checks the backend once immediately, then every `interval`.
///
/// Runs independently of any generation session. Dropping the monitor stops it.
pub struct HealthMonitor {
    status: watch::Receiver<HealthStatus>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    pub fn start<A: VideoApi + 'static>(api: Arc<A>, interval: Duration) -> Self {
        let (tx, status) = watch::channel(HealthStatus::Checking);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let next = if api.check_health().await {
                    HealthStatus::Online
                } else {
                    HealthStatus::Offline
                };
                let changed = tx.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    *current = next;
                    true
                });
                if changed {
                    tracing::info!(status = %next, "backend health changed");
                }
                if tx.is_closed() {
                    break;
                }
            }
        });
        Self { status, task }
    }

    /// Last observed status.
    pub fn status(&self) -> HealthStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<HealthStatus> {
        self.status.clone()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
