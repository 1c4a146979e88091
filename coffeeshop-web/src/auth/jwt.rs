//! JWT verification against the issuer's published key set

use super::{Claims, JwksClient, TokenVerifier};
use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use coffeeshop_core::AuthConfig;
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};
use tracing::debug;

use crate::handlers::types::ErrorResponse;

/// Authentication and authorization failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingAuthHeader,

    #[error("{0}")]
    InvalidHeader(String),

    #[error("Unable to parse authentication token.")]
    MalformedToken,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Token signature could not be verified.")]
    InvalidSignature,

    #[error("Unable to find the appropriate key.")]
    KeyNotFound,

    /// The key set could not be fetched or decoded; carries the cause
    #[error("Unable to fetch the signing keys.")]
    KeyLookup(String),

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found: {0}.")]
    InsufficientPermission(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermission(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "authorization_header_missing",
            AuthError::InvalidHeader(_)
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::KeyNotFound => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::KeyLookup(_) => "key_lookup_failed",
            AuthError::InsufficientPermission(_) => "unauthorized",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
            code: Some(self.code().to_string()),
        };
        (status, Json(body)).into_response()
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        debug!("Token rejected: {}", err);
        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidKeyFormat => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        }
    }
}

/// Verifies RS256 tokens using keys looked up by `kid`
#[derive(Debug, Clone)]
pub struct JwksVerifier {
    keys: JwksClient,
    issuer: String,
    audience: String,
}

impl JwksVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_client(JwksClient::new(&config.jwks_url), config)
    }

    pub fn with_client(keys: JwksClient, config: &AuthConfig) -> Self {
        Self {
            keys,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("Unreadable token header: {}", e);
            AuthError::MalformedToken
        })?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidHeader("Authorization malformed.".into()))?;

        let key = self.keys.decoding_key(&kid).await?;
        let data = decode::<Claims>(token, &key, &self.validation())?;

        Ok(data.claims)
    }
}
