use std::path::PathBuf;

/// Errors raised while configuring or performing token issuance.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{name} environment variable is required")]
    MissingEnv { name: &'static str },

    #[error("Failed to read TLS material from {path}: {source}")]
    TlsMaterial {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("Token request failed: {0}")]
    Transport(reqwest::Error),

    #[error("Authentication failed with status {status}: {body}")]
    AuthFailed { status: u16, body: String },

    #[error("Token response is missing the X-Subject-Token header")]
    MissingTokenHeader,

    #[error("Token response carries a malformed expiry timestamp: {0}")]
    MalformedExpiry(chrono::ParseError),
}
