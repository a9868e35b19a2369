//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs issued by the identity service that shares
//! `CELLAR_JWT_SECRET`. The `sub` claim is the caller's user id.

use crate::errors::AppError;
use anyhow::Result;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Legacy header used by the browser client.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: u64,    // Expiration timestamp
    pub iat: u64,    // Issued at timestamp
}

/// Signs and verifies caller tokens with a shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Mint a token for `user` that expires after `ttl`.
    pub fn issue(&self, user: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.to_string(),
            exp: (now + ttl).timestamp().max(0) as u64,
            iat: now.timestamp().max(0) as u64,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

/// The authenticated caller, resolved from the request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("No token, authorization denied"))?;

        let verifier = Arc::<TokenVerifier>::from_ref(state);
        match verifier.verify(token) {
            Ok(claims) => Ok(AuthUser(claims.sub)),
            Err(err) => {
                debug!("rejected token: {}", err);
                Err(AppError::unauthorized("Token is not valid"))
            }
        }
    }
}

/// Token from `Authorization: Bearer ...`, falling back to `x-auth-token`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let from_authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    from_authorization
        .or_else(|| {
            parts
                .headers
                .get(AUTH_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn issued_token_round_trips_subject() {
        let verifier = TokenVerifier::new(b"secret");
        let token = verifier.issue("alice", Duration::hours(1)).unwrap();
        assert_eq!(verifier.verify(&token).unwrap().sub, "alice");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenVerifier::new(b"other")
            .issue("alice", Duration::hours(1))
            .unwrap();
        assert!(TokenVerifier::new(b"secret").verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = TokenVerifier::new(b"secret");
        let token = verifier.issue("alice", Duration::hours(-2)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn reads_bearer_and_legacy_headers() {
        let bearer = parts_with("authorization", "Bearer abc.def.ghi");
        let legacy = parts_with(AUTH_TOKEN_HEADER, "abc.def.ghi");
        let basic = parts_with("authorization", "Basic Zm9vOmJhcg==");

        assert_eq!(bearer_token(&bearer), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&legacy), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&basic), None);
    }
}
