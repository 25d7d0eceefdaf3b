//! Session verification for authenticated members.
//!
//! Sessions are HS256 JWTs issued by the identity service. The token is read
//! from `Authorization: Bearer <token>` or, failing that, the session cookie.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::AppError;
use crate::routes::AppState;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
    ttl_secs: i64,
}

impl SessionVerifier {
    pub fn new(secret: &str, cookie_name: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            cookie_name: cookie_name.into(),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.jwt_secret, settings.session_cookie.clone(), settings.token_ttl_secs)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Sign a session token for a member
    pub fn issue(&self, member_id: Uuid) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: member_id,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign session token: {}", e)))
    }

    /// Verify a token and return the member it belongs to
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| {
                tracing::debug!("Rejected session token: {}", e);
                unauthenticated()
            })
    }

    fn token_from_request(&self, req: &HttpRequest) -> Option<String> {
        let bearer = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        bearer.or_else(|| req.cookie(&self.cookie_name).map(|c| c.value().to_string()))
    }
}

/// Extractor yielding the id of the signed-in member, or 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember(pub Uuid);

impl AuthenticatedMember {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl FromRequest for AuthenticatedMember {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedMember, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;

    let token = state
        .sessions
        .token_from_request(req)
        .ok_or_else(unauthenticated)?;

    state.sessions.verify(&token).map(AuthenticatedMember)
}

fn unauthenticated() -> AppError {
    AppError::Authentication("You must be signed in to continue.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

    #[test]
    fn test_issue_and_verify() {
        let sessions = SessionVerifier::new(SECRET, "common-sense.session", 3600);
        let member = Uuid::new_v4();
        let token = sessions.issue(member).unwrap();
        assert_eq!(sessions.verify(&token).unwrap(), member);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = SessionVerifier::new(SECRET, "common-sense.session", 3600);
        let other = SessionVerifier::new("another-secret-that-is-also-long-enough", "common-sense.session", 3600);
        let token = issuer.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(other.verify(&token), Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let sessions = SessionVerifier::new(SECRET, "common-sense.session", 0);
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(sessions.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let sessions = SessionVerifier::new(SECRET, "common-sense.session", 3600);
        assert!(sessions.verify("not-a-token").is_err());
    }
}
