//! One-shot token issuance against the identity service.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::{AuthConfig, TlsConfig};
use crate::error::IdentityError;

const TOKEN_HEADER: &str = "X-Subject-Token";

const USER_AGENT: &str = concat!("sharekit-identity/", env!("CARGO_PKG_VERSION"));

/// Bearer token issued by the identity service.
#[derive(Debug, Clone)]
pub struct Token {
    /// Opaque token value, sent as `X-Auth-Token` on later requests.
    pub value: String,
    /// Expiry reported by the service, when present.
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<TokenBody>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    expires_at: Option<String>,
}

/// Request one token using password credentials.
///
/// Builds a TLS-capable client per call; token issuance is a one-shot
/// operation with no retry at this layer. The token value travels in
/// the `X-Subject-Token` response header, the expiry in the JSON body.
pub async fn fetch_token(auth: &AuthConfig, tls: &TlsConfig) -> Result<Token, IdentityError> {
    let client = build_client(tls)?;
    let url = token_url(&auth.auth_url);

    tracing::debug!(url = %url, username = %auth.username, "Requesting token");

    let response = client
        .post(&url)
        .json(&token_request(auth))
        .send()
        .await
        .map_err(IdentityError::Transport)?;

    let status = response.status().as_u16();
    if status != 201 {
        let body = response.text().await.unwrap_or_default();
        return Err(IdentityError::AuthFailed { status, body });
    }

    let value = response
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or(IdentityError::MissingTokenHeader)?;

    let body: TokenResponse = response.json().await.map_err(IdentityError::Transport)?;
    let expires_at = match body.token.and_then(|t| t.expires_at) {
        Some(raw) => Some(parse_expiry(&raw)?),
        None => None,
    };

    tracing::info!(expires_at = ?expires_at, "Token issued");

    Ok(Token { value, expires_at })
}

fn token_url(auth_url: &str) -> String {
    format!("{}/auth/tokens", auth_url.trim_end_matches('/'))
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, IdentityError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(IdentityError::MalformedExpiry)
}

fn token_request(auth: &AuthConfig) -> serde_json::Value {
    let mut request = serde_json::json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": auth.username,
                        "password": auth.password,
                        "domain": { "name": auth.user_domain },
                    }
                }
            }
        }
    });

    if let Some(project) = &auth.project_name {
        request["auth"]["scope"] = serde_json::json!({
            "project": {
                "name": project,
                "domain": { "name": auth.user_domain },
            }
        });
    }

    request
}

fn build_client(tls: &TlsConfig) -> Result<reqwest::Client, IdentityError> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(USER_AGENT);

    if let (Some(cert), Some(key)) = (&tls.client_cert, &tls.client_key) {
        // reqwest expects the key and certificate chain in one PEM bundle.
        let mut pem = read_pem(key)?;
        pem.extend_from_slice(&read_pem(cert)?);
        let identity = reqwest::Identity::from_pem(&pem).map_err(IdentityError::ClientBuild)?;
        builder = builder.identity(identity);
    }

    if let Some(ca) = &tls.ca_cert {
        let cert =
            reqwest::Certificate::from_pem(&read_pem(ca)?).map_err(IdentityError::ClientBuild)?;
        builder = builder.add_root_certificate(cert);
    }

    builder.build().map_err(IdentityError::ClientBuild)
}

fn read_pem(path: &Path) -> Result<Vec<u8>, IdentityError> {
    std::fs::read(path).map_err(|source| IdentityError::TlsMaterial {
        path: path.to_path_buf(),
        source,
    })
}
