//! Token issuance client for the share-manager identity service.
//!
//! - [`config`] — environment-driven credential and TLS configuration
//! - [`token`] — the one-shot [`fetch_token`] operation
//!
//! TLS material is PEM on disk; a client certificate and key together
//! enable mutual TLS, and an extra CA bundle covers private authorities.

pub mod config;
pub mod error;
pub mod token;

pub use config::{AuthConfig, TlsConfig};
pub use error::IdentityError;
pub use token::{fetch_token, Token};
