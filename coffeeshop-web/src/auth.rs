//! Bearer token authentication and permission gating
//!
//! Tokens are RS256 JWTs issued by an external identity provider. A route
//! is gated by wrapping it in [`require_permission`] with a
//! [`PermissionGate`] naming the permission string the token must carry.

pub mod jwks;
pub mod jwt;


pub use jwks::JwksClient;
pub use jwt::{AuthError, JwksVerifier};

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Permission strings issued by the identity provider
pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}

/// Verified token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub iss: Option<String>,
    /// Either a single audience or a list of them
    pub aud: Option<serde_json::Value>,
    pub exp: Option<i64>,
    pub permissions: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Claims {
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("anonymous")
    }

    /// Fail unless the token lists `permission`
    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        let granted = self
            .permissions
            .as_ref()
            .ok_or(AuthError::PermissionsMissing)?;

        if granted.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermission(permission.to_string()))
        }
    }
}

/// Turns a raw bearer token into verified claims
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// Pull the token out of an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader("Authorization header must be bearer token.".into()))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::InvalidHeader("Authorization header must start with \"Bearer\".".into()),
        ),
        (Some(_), Some(token), None) => Ok(token),
        (Some(_), None, _) => Err(AuthError::InvalidHeader("Token not found.".into())),
        (None, _, _) => Err(AuthError::InvalidHeader(
            "Authorization header must start with \"Bearer\".".into(),
        )),
        _ => Err(AuthError::InvalidHeader(
            "Authorization header must be bearer token.".into(),
        )),
    }
}

/// A verifier paired with the permission one route requires
#[derive(Clone)]
pub struct PermissionGate {
    verifier: Arc<dyn TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(verifier: Arc<dyn TokenVerifier>, permission: &'static str) -> Self {
        Self {
            verifier,
            permission,
        }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }

    /// Extract, verify and check the request's token
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verifier.verify(token).await?;
        claims.require(self.permission)?;
        Ok(claims)
    }
}

/// Middleware that rejects requests lacking the gate's permission and hands
/// the verified [`Claims`] to the handler as a request extension.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = request.into_parts();

    let claims = match gate.authorize(&parts.headers).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!(
                permission = gate.permission(),
                code = e.code(),
                "Rejected request to {}: {}",
                parts.uri.path(),
                e
            );
            return Err(e);
        }
    };

    debug!(
        permission = gate.permission(),
        subject = claims.subject(),
        "Request authorized"
    );
    parts.extensions.insert(claims);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
