//! Signing key retrieval
//!
//! The key set is fetched on every verification; nothing is cached.

use super::AuthError;
use jsonwebtoken::{jwk::JwkSet, DecodingKey};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct JwksClient {
    http: reqwest::Client,
    url: String,
}

impl JwksClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the issuer's current key set
    pub async fn fetch(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching signing keys from {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| lookup_failed(&self.url, e))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| lookup_failed(&self.url, e))
    }

    /// Decoding key for the signing key named `kid`
    pub async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let keys = self.fetch().await?;
        let jwk = keys.find(kid).ok_or_else(|| {
            debug!("No signing key with kid {}", kid);
            AuthError::KeyNotFound
        })?;

        DecodingKey::from_jwk(jwk).map_err(|e| {
            debug!("Unusable signing key {}: {}", kid, e);
            AuthError::KeyNotFound
        })
    }
}

fn lookup_failed(url: &str, err: reqwest::Error) -> AuthError {
    warn!("Key set lookup at {} failed: {}", url, err);
    AuthError::KeyLookup(err.to_string())
}
