//! Key-manager boundary for share encryption secrets.
//!
//! Provisioning code asks a [`SecretSource`] for the key material named
//! by a request's `keyRef` parameter. Production deployments implement
//! the trait against a real key manager; [`StaticSecretSource`] serves
//! development and tests with fixed in-memory material.

/// Resolver from a key reference to raw secret material.
pub trait SecretSource: Send + Sync {
    /// Fetch the secret bytes behind `key_ref`.
    fn get_secret(
        &self,
        key_ref: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, KmsError>> + Send;
}

/// Errors raised by secret resolution.
#[derive(Debug, thiserror::Error)]
pub enum KmsError {
    #[error("No secret found for key reference {key_ref}")]
    NotFound { key_ref: String },

    #[error("Key manager failure: {0}")]
    Backend(String),
}

/// Passphrase served by the default [`StaticSecretSource`].
const DEVELOPMENT_PASSPHRASE: &[u8; 16] = b"change this pass";

/// In-memory secret source with one fixed piece of material.
///
/// Every key reference resolves to the same bytes; nothing ever fails.
/// Not for production use.
#[derive(Debug, Clone)]
pub struct StaticSecretSource {
    material: Vec<u8>,
}

impl StaticSecretSource {
    pub fn new(material: Vec<u8>) -> Self {
        Self { material }
    }
}

impl Default for StaticSecretSource {
    fn default() -> Self {
        Self::new(DEVELOPMENT_PASSPHRASE.to_vec())
    }
}

impl SecretSource for StaticSecretSource {
    async fn get_secret(&self, _key_ref: &str) -> Result<Vec<u8>, KmsError> {
        Ok(self.material.clone())
    }
}
