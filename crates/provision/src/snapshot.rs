//! Snapshot lifecycle helpers: status polling with exponential backoff
//! and idempotent create/delete wrappers.
//!
//! Snapshot operations are asynchronous on the share-manager side.
//! [`wait_for_snapshot_status`] polls until the resource reaches the
//! desired state, the attempt budget runs out, or the caller's
//! [`CancellationToken`] fires. A snapshot stuck in the error state is
//! reported together with its classified failure cause.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{ClientError, CreateSnapshotRequest, ShareClient, Snapshot, SnapshotStatus};
use crate::messages::{last_resource_error, ErrorCode, ResourceError};

/// Description tag applied to snapshots created by this library, so
/// operators can tell them apart from user-created ones.
pub const SNAPSHOT_DESCRIPTION: &str = "snapshotted-by=sharekit";

/// Tunable parameters for the status polling strategy.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Delay between the first and second poll.
    pub initial_delay: Duration,
    /// Upper bound on the delay between polls.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each poll.
    pub multiplier: f64,
    /// Total number of polls before giving up.
    pub max_attempts: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(3),
            max_delay: Duration::from_secs(30),
            multiplier: 1.2,
            max_attempts: 10,
        }
    }
}

impl Backoff {
    /// Calculate the delay following `current`, clamped to
    /// [`Backoff::max_delay`].
    pub fn next_delay(&self, current: Duration) -> Duration {
        let next_ms = (current.as_millis() as f64 * self.multiplier) as u64;
        Duration::from_millis(next_ms).min(self.max_delay)
    }
}

/// Why a status wait ended without reaching the desired state.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// The snapshot entered the error state; `code` and `message` carry
    /// the classified failure report.
    #[error("Snapshot {snapshot_id} is in error state: {message}")]
    Terminal {
        snapshot_id: String,
        code: ErrorCode,
        message: String,
    },

    /// The snapshot entered the error state and the failure report
    /// itself could not be retrieved.
    #[error("Snapshot {snapshot_id} is in error state, failure report unavailable: {source}")]
    TerminalUndiagnosed {
        snapshot_id: String,
        source: ClientError,
    },

    /// The snapshot reported a state the transition cannot pass
    /// through.
    #[error("Snapshot {snapshot_id} is in an unexpected state: wanted {wanted}, got {got}")]
    UnexpectedStatus {
        snapshot_id: String,
        wanted: String,
        got: SnapshotStatus,
    },

    /// The attempt budget ran out before the desired state was seen.
    #[error("Timed out waiting for snapshot {snapshot_id}")]
    Timeout { snapshot_id: String },

    /// The caller's cancellation token fired.
    #[error("Interrupted while waiting for snapshot {snapshot_id}")]
    Interrupted { snapshot_id: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Poll until the snapshot moves from `current` to `desired`.
///
/// The first poll happens immediately; subsequent polls back off
/// exponentially per `backoff`. Pass `desired = None` when waiting for
/// the resource to disappear, together with `success_on_not_found`.
///
/// Returns `Ok(Some(snapshot))` once `desired` is reached, or
/// `Ok(None)` when the snapshot is gone and `success_on_not_found` is
/// set. Cancellation surfaces as [`WaitError::Interrupted`], distinct
/// from [`WaitError::Timeout`] and from true failures.
pub async fn wait_for_snapshot_status<C: ShareClient>(
    client: &C,
    snapshot_id: &str,
    current: SnapshotStatus,
    desired: Option<SnapshotStatus>,
    success_on_not_found: bool,
    backoff: &Backoff,
    cancel: &CancellationToken,
) -> Result<Option<Snapshot>, WaitError> {
    let mut delay = backoff.initial_delay;

    for attempt in 1..=backoff.max_attempts {
        if cancel.is_cancelled() {
            return Err(WaitError::Interrupted {
                snapshot_id: snapshot_id.to_string(),
            });
        }

        match client.get_snapshot(snapshot_id).await {
            Err(err) if err.is_not_found() && success_on_not_found => return Ok(None),
            Err(err) => return Err(WaitError::Client(err)),
            Ok(snapshot) => {
                if desired == Some(snapshot.status) {
                    return Ok(Some(snapshot));
                }
                if snapshot.status == SnapshotStatus::Error {
                    return Err(classify_error_state(client, snapshot_id).await);
                }
                if snapshot.status != current {
                    return Err(WaitError::UnexpectedStatus {
                        snapshot_id: snapshot_id.to_string(),
                        wanted: wanted_statuses(current, desired),
                        got: snapshot.status,
                    });
                }
                // Still transitioning, keep polling.
            }
        }

        if attempt < backoff.max_attempts {
            tracing::debug!(
                snapshot_id,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Snapshot not ready, waiting",
            );
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(WaitError::Interrupted {
                        snapshot_id: snapshot_id.to_string(),
                    });
                }
                _ = tokio::time::sleep(delay) => {}
            }
            delay = backoff.next_delay(delay);
        }
    }

    Err(WaitError::Timeout {
        snapshot_id: snapshot_id.to_string(),
    })
}

async fn classify_error_state<C: ShareClient>(client: &C, snapshot_id: &str) -> WaitError {
    match last_resource_error(client, snapshot_id).await {
        Ok(ResourceError { code, message }) => WaitError::Terminal {
            snapshot_id: snapshot_id.to_string(),
            code,
            message,
        },
        Err(source) => WaitError::TerminalUndiagnosed {
            snapshot_id: snapshot_id.to_string(),
            source,
        },
    }
}

fn wanted_statuses(current: SnapshotStatus, desired: Option<SnapshotStatus>) -> String {
    match desired {
        Some(d) => format!("either {current} or {d}"),
        None => current.to_string(),
    }
}

/// Errors from the snapshot lifecycle helpers.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to probe for a snapshot named {name}: {source}")]
    Probe { name: String, source: ClientError },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Fetch the snapshot named `name`, creating it from `share_id` when it
/// does not exist yet.
///
/// The caller is expected to follow up with
/// [`wait_for_snapshot_status`]; a freshly created snapshot is returned
/// while still in the creating state.
pub async fn get_or_create_snapshot<C: ShareClient>(
    client: &C,
    name: &str,
    share_id: &str,
) -> Result<Snapshot, SnapshotError> {
    match client.find_snapshot(name).await {
        Ok(snapshot) => {
            tracing::debug!(name, snapshot_id = %snapshot.id, "Snapshot already exists");
            Ok(snapshot)
        }
        Err(err) if err.is_not_found() => {
            let request = CreateSnapshotRequest {
                share_id: share_id.to_string(),
                name: name.to_string(),
                description: Some(SNAPSHOT_DESCRIPTION.to_string()),
            };
            Ok(client.create_snapshot(request).await?)
        }
        Err(err) => Err(SnapshotError::Probe {
            name: name.to_string(),
            source: err,
        }),
    }
}

/// Delete a snapshot, treating an already-missing resource as success.
pub async fn delete_snapshot<C: ShareClient>(
    client: &C,
    snapshot_id: &str,
) -> Result<(), ClientError> {
    match client.delete_snapshot(snapshot_id).await {
        Err(err) if err.is_not_found() => {
            tracing::debug!(snapshot_id, "Snapshot not found, assuming it is already deleted");
            Ok(())
        }
        other => other,
    }
}

/// Best-effort rollback deletion of a partially created snapshot.
///
/// Failures are logged and swallowed so the caller's own error is the
/// one that propagates. An interrupted or timed-out deletion wait is
/// not reported either; the resource will be retried or reconciled by
/// a later request.
pub async fn try_delete_snapshot<C: ShareClient>(
    client: &C,
    snapshot: Option<&Snapshot>,
    backoff: &Backoff,
    cancel: &CancellationToken,
) {
    let snapshot = match snapshot {
        Some(s) => s,
        None => return,
    };

    if let Err(err) = delete_snapshot(client, &snapshot.id).await {
        tracing::error!(
            snapshot_id = %snapshot.id,
            error = %err,
            "Could not delete snapshot during rollback",
        );
        return;
    }

    match wait_for_snapshot_status(
        client,
        &snapshot.id,
        SnapshotStatus::Deleting,
        None,
        true,
        backoff,
        cancel,
    )
    .await
    {
        Ok(_) => {}
        Err(WaitError::Timeout { .. } | WaitError::Interrupted { .. }) => {}
        Err(err) => {
            tracing::error!(
                snapshot_id = %snapshot.id,
                error = %err,
                "Could not confirm snapshot deletion during rollback",
            );
        }
    }
}
