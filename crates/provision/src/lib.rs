//! Share provisioning support: validated request parameters and
//! snapshot lifecycle plumbing.
//!
//! - [`options`] — typed create/attach parameter records backed by the
//!   rule engine in `sharekit-params`
//! - [`client`] — the [`ShareClient`] boundary trait and its wire types
//! - [`messages`] — asynchronous failure reports and their
//!   classification into [`ErrorCode`] values
//! - [`snapshot`] — status polling with exponential backoff and
//!   idempotent create/delete helpers

pub mod client;
pub mod messages;
pub mod options;
pub mod snapshot;

pub use client::{ClientError, CreateSnapshotRequest, ShareClient, Snapshot, SnapshotStatus};
pub use messages::{last_resource_error, ErrorCode, MessageQuery, ResourceError, UserMessage};
pub use options::{AttachShareContext, CreateShareContext, Zone};
pub use snapshot::{
    delete_snapshot, get_or_create_snapshot, try_delete_snapshot, wait_for_snapshot_status,
    Backoff, SnapshotError, WaitError, SNAPSHOT_DESCRIPTION,
};
