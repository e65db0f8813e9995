//! Environment-driven configuration for the identity client.
//!
//! | Variable            | Required | Default   | Description                                |
//! |---------------------|----------|-----------|--------------------------------------------|
//! | `AUTH_URL`          | yes      | --        | Identity endpoint, e.g. `https://keystone:5000/v3` |
//! | `AUTH_USERNAME`     | yes      | --        | User to authenticate as                    |
//! | `AUTH_PASSWORD`     | yes      | --        | Password credential                        |
//! | `AUTH_USER_DOMAIN`  | no       | `Default` | Domain the user belongs to                 |
//! | `AUTH_PROJECT_NAME` | no       | --        | Project to scope the token to              |
//! | `TLS_CLIENT_CERT`   | no       | --        | PEM client certificate path (mutual TLS)   |
//! | `TLS_CLIENT_KEY`    | no       | --        | PEM client key path (mutual TLS)           |
//! | `TLS_CA_CERT`       | no       | --        | Extra PEM CA bundle path                   |

use std::path::PathBuf;

use crate::error::IdentityError;

/// Password credentials and endpoint of the identity service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub user_domain: String,
    pub project_name: Option<String>,
}

impl AuthConfig {
    /// Load credentials from the environment.
    pub fn from_env() -> Result<Self, IdentityError> {
        Ok(Self {
            auth_url: require("AUTH_URL")?,
            username: require("AUTH_USERNAME")?,
            password: require("AUTH_PASSWORD")?,
            user_domain: std::env::var("AUTH_USER_DOMAIN").unwrap_or_else(|_| "Default".into()),
            project_name: std::env::var("AUTH_PROJECT_NAME").ok(),
        })
    }
}

/// TLS material for mutual-TLS endpoints and private CAs.
///
/// A client identity is sent only when both the certificate and the key
/// path are set.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub ca_cert: Option<PathBuf>,
}

impl TlsConfig {
    /// Load TLS paths from the environment; every entry is optional.
    pub fn from_env() -> Self {
        Self {
            client_cert: std::env::var("TLS_CLIENT_CERT").ok().map(PathBuf::from),
            client_key: std::env::var("TLS_CLIENT_KEY").ok().map(PathBuf::from),
            ca_cert: std::env::var("TLS_CA_CERT").ok().map(PathBuf::from),
        }
    }
}

fn require(name: &'static str) -> Result<String, IdentityError> {
    std::env::var(name).map_err(|_| IdentityError::MissingEnv { name })
}
