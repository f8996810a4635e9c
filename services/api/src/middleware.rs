//! Caller authentication and request logging
//!
//! Sessions are issued by an external auth provider as RS256 JWTs. The API
//! only verifies them: a token is accepted when the signature and expiry are
//! valid and the e-mail claim belongs to the configured campus domain.

use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// E-mail the session was issued for
    pub email: String,
    /// Display name from the identity provider
    #[serde(default)]
    pub name: Option<String>,
    /// Expiration time
    pub exp: u64,
}

/// Authenticated user information
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl AuthUser {
    /// Name used when the user row is created on first sight
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self
                .email
                .split_once('@')
                .map_or(self.email.as_str(), |(local, _)| local),
        }
    }
}

/// Read a PEM key given inline or as a file path relative to the working directory
pub fn load_public_key(value: &str) -> anyhow::Result<String> {
    if value.starts_with("-----BEGIN") {
        return Ok(value.to_string());
    }

    let key = std::fs::read_to_string(value)
        .map_err(|e| anyhow::anyhow!("Failed to read public key file: {}", e))?;

    Ok(key.trim().to_string())
}

/// Whether `email` belongs to `domain` (case-insensitive)
pub fn email_in_domain(email: &str, domain: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(local, host)| !local.is_empty() && host.eq_ignore_ascii_case(domain))
}

/// Verifies bearer tokens issued by the auth provider
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    allowed_email_domain: String,
}

impl JwtVerifier {
    /// Create a verifier from a PEM-encoded RSA public key
    pub fn new(public_key_pem: &str, allowed_email_domain: &str) -> anyhow::Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;
        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;

        Ok(Self {
            decoding_key,
            validation,
            allowed_email_domain: allowed_email_domain.to_string(),
        })
    }

    /// Resolve a bearer token into the caller identity
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, ApiError> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
                |e| {
                    warn!("Rejected token: {}", e);
                    ApiError::Unauthorized
                },
            )?;

        let claims = token_data.claims;
        if !email_in_domain(&claims.email, &self.allowed_email_domain) {
            warn!("Rejected token for {} outside allowed domain", claims.email);
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::Unauthorized)?;

        state.jwt_verifier.authenticate(bearer.token())
    }
}

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/health" | "/health/")
}

/// Log one line per request with its outcome and latency
pub async fn request_logger(req: Request, next: Next) -> Response {
    if should_ignore_path(req.uri().path()) {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else if status.is_client_error() {
        warn!(%method, %path, status = status.as_u16(), elapsed_ms, "request rejected");
    } else {
        info!(%method, %path, status = status.as_u16(), elapsed_ms, "request completed");
    }

    response
}
