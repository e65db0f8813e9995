//! `sharekit-identity` -- one-shot token issuance tool.
//!
//! Authenticates against the identity service with password credentials
//! and prints the issued token value to stdout, for use as
//! `X-Auth-Token` by other tooling. Configuration is environment-driven
//! (a `.env` file is honored); see the variable table in
//! `sharekit_identity::config`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sharekit_identity::{fetch_token, AuthConfig, TlsConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharekit_identity=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth = AuthConfig::from_env().unwrap_or_else(|err| {
        tracing::error!(error = %err, "Incomplete credentials");
        std::process::exit(1);
    });
    let tls = TlsConfig::from_env();

    match fetch_token(&auth, &tls).await {
        Ok(token) => {
            if let Some(expires_at) = token.expires_at {
                tracing::info!(%expires_at, "Token issued");
            }
            println!("{}", token.value);
        }
        Err(err) => {
            tracing::error!(error = %err, "Token issuance failed");
            std::process::exit(1);
        }
    }
}
