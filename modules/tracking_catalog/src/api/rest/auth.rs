//! Bearer token authentication for the catalog routes
//!
//! Requests must carry `Authorization: Bearer <HS256 JWT>` and a `client-id`
//! header naming an allowed client. The verified identity is attached to the
//! request as a [`Principal`] extension.

use super::error::ApiError;
use crate::config::AuthConfig;
use crate::contract::Principal;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const CLIENT_ID_HEADER: &str = "client-id";

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

/// Verifies tokens and client ids
#[derive(Clone)]
pub struct Authenticator {
    inner: Arc<Inner>,
}

struct Inner {
    key: DecodingKey,
    validation: Validation,
    allowed_client_ids: HashSet<String>,
}

impl Authenticator {
    /// Build an authenticator, or `None` when authentication is disabled
    pub fn from_config(config: &AuthConfig) -> Option<Self> {
        let secret = config.jwt_secret.as_deref().filter(|s| !s.is_empty())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256];
        // exp is checked when present but not demanded
        validation.set_required_spec_claims::<&str>(&[]);

        Some(Self {
            inner: Arc::new(Inner {
                key: DecodingKey::from_secret(secret.as_bytes()),
                validation,
                allowed_client_ids: config.allowed_client_ids.iter().cloned().collect(),
            }),
        })
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal, ApiError> {
        let client_id = headers
            .get(CLIENT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                tracing::debug!("missing client-id header");
                ApiError::unauthorized()
            })?;

        if !self.inner.allowed_client_ids.contains(client_id) {
            tracing::warn!(client_id, "client id not allowed");
            return Err(ApiError::unauthorized());
        }

        let token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!(client_id, "missing bearer token");
                ApiError::unauthorized()
            })?;

        let claims = decode::<Claims>(token, &self.inner.key, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::warn!(client_id, error = %err, "token rejected");
                ApiError::unauthorized()
            })?;

        if claims.user_id.is_empty() {
            tracing::warn!(client_id, "token has no user_id claim");
            return Err(ApiError::unauthorized());
        }

        Ok(Principal {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            client_id: client_id.to_string(),
        })
    }
}

/// Middleware rejecting unauthenticated requests with 401
pub async fn require_auth(
    State(auth): State<Authenticator>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = auth.authenticate(request.headers())?;
    tracing::debug!(user_id = %principal.user_id, client_id = %principal.client_id, "request authenticated");
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
