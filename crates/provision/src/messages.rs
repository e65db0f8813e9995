//! Asynchronous user messages and failure classification.
//!
//! The share manager reports why an operation failed through user
//! messages attached to the resource. [`last_resource_error`] fetches
//! the most recent message for a resource and maps its detail ID to an
//! [`ErrorCode`] callers can act on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ClientError, ShareClient};

/// An asynchronous failure report attached to a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMessage {
    pub id: String,
    pub resource_id: String,
    /// Numeric detail code identifying the failure class, e.g. `"002"`.
    pub detail_id: String,
    pub message: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Filters for listing user messages.
#[derive(Debug, Clone, Serialize)]
pub struct MessageQuery {
    pub resource_id: String,
    /// Sort newest first.
    pub newest_first: bool,
    /// Maximum number of messages to return.
    pub limit: Option<u32>,
}

/// Classified failure cause derived from a user message detail ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NoValidHost,
    NetworkUnreachable,
    QuotaExceeded,
    CapabilitiesMismatch,
    Unknown,
}

impl ErrorCode {
    /// Map a user-message detail ID to a classified code.
    pub fn from_detail_id(detail_id: &str) -> Self {
        match detail_id {
            "002" => Self::NoValidHost,
            "003" => Self::NetworkUnreachable,
            "007" => Self::QuotaExceeded,
            "009" => Self::CapabilitiesMismatch,
            _ => Self::Unknown,
        }
    }
}

/// A classified failure: the code plus the human-readable description
/// reported by the share manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceError {
    pub code: ErrorCode,
    pub message: String,
}

/// Fetch and classify the most recent failure report for a resource.
///
/// A resource with no messages classifies as [`ErrorCode::Unknown`]
/// with a generic description, so callers always get a code and
/// message pair for a resource stuck in an error state.
pub async fn last_resource_error<C: ShareClient>(
    client: &C,
    resource_id: &str,
) -> Result<ResourceError, ClientError> {
    let messages = client
        .list_user_messages(&MessageQuery {
            resource_id: resource_id.to_string(),
            newest_first: true,
            limit: Some(1),
        })
        .await?;

    Ok(match messages.first() {
        Some(msg) => ResourceError {
            code: ErrorCode::from_detail_id(&msg.detail_id),
            message: msg.message.clone(),
        },
        None => ResourceError {
            code: ErrorCode::Unknown,
            message: format!("resource {resource_id} failed for an unknown reason"),
        },
    })
}
