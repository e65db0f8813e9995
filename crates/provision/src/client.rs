//! Typed client boundary for the share-manager API.
//!
//! [`ShareClient`] abstracts the slice of the share-manager API the
//! provisioning helpers depend on: snapshot CRUD plus asynchronous user
//! messages. Production implementations translate these calls onto
//! their wire protocol; tests substitute scripted fakes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::messages::{MessageQuery, UserMessage};

/// Lifecycle states reported for a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Creating,
    Available,
    Deleting,
    Error,
    /// Any status string this crate does not recognize.
    #[serde(other)]
    Unknown,
}

impl SnapshotStatus {
    /// Return the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Available => "available",
            Self::Deleting => "deleting",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire status string. Unrecognized values map to
    /// [`SnapshotStatus::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s {
            "creating" => Self::Creating,
            "available" => Self::Available,
            "deleting" => Self::Deleting,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point-in-time copy of a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    pub share_id: String,
    pub status: SnapshotStatus,
    pub size_gb: i64,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Parameters for creating a snapshot of an existing share.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSnapshotRequest {
    pub share_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Errors surfaced by a [`ShareClient`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// True when the error reports a missing resource rather than a
    /// failed call.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// The share-manager operations the provisioning helpers call.
///
/// Methods return futures directly so implementations stay object-free
/// and callers can be generic over the client.
pub trait ShareClient: Send + Sync {
    /// Fetch a snapshot by ID.
    fn get_snapshot(
        &self,
        snapshot_id: &str,
    ) -> impl std::future::Future<Output = Result<Snapshot, ClientError>> + Send;

    /// Fetch a snapshot by its unique name.
    fn find_snapshot(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Snapshot, ClientError>> + Send;

    /// Create a snapshot of an existing share.
    fn create_snapshot(
        &self,
        request: CreateSnapshotRequest,
    ) -> impl std::future::Future<Output = Result<Snapshot, ClientError>> + Send;

    /// Delete a snapshot by ID.
    fn delete_snapshot(
        &self,
        snapshot_id: &str,
    ) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// List asynchronous user messages matching `query`.
    fn list_user_messages(
        &self,
        query: &MessageQuery,
    ) -> impl std::future::Future<Output = Result<Vec<UserMessage>, ClientError>> + Send;
}
