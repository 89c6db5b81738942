//! Bearer-token authentication.
//!
//! Identity is derived fresh on every request from the token's claims; there
//! is no server-side session. A request with a missing or invalid token is
//! not rejected here — it proceeds as anonymous and the policy layer decides
//! whether anonymous access is acceptable for the attempted action.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod policy;

pub const ROLE_USER: &str = "USER";
pub const ROLE_SUPERVISOR: &str = "SUPERVISOR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

/// Caller identity established from a verified token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject_id: i64,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

/// HS256 key pair shared by all services; only the secret is shared, never
/// any session state.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, subject_id: i64, roles: Vec<String>, ttl: Duration) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Internal(format!("system clock error: {e}")))?;
        let claims = Claims {
            sub: subject_id.to_string(),
            roles,
            exp: (now + ttl).as_secs() as usize,
        };
        self.encode(&claims)
    }

    fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
    }

    /// Returns `None` on any decode failure: malformed token, bad signature,
    /// expired claims, or a subject that is not a user id.
    pub fn decode_identity(&self, token: &str) -> Option<Identity> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).ok()?;
        let subject_id = data.claims.sub.parse().ok()?;
        Some(Identity {
            subject_id,
            roles: data.claims.roles,
        })
    }
}

/// Per-request authentication outcome, inserted into request extensions by
/// [`authenticate`] and threaded to orchestrators as a plain value.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    identity: Option<Identity>,
    bearer: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity, bearer: String) -> Self {
        Self {
            identity: Some(identity),
            bearer: Some(bearer),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn require(&self) -> Result<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| Error::Unauthenticated("Authentication required".to_string()))
    }

    /// The verified caller's raw bearer token, forwarded unchanged on
    /// inter-service calls so the downstream service sees the original
    /// caller.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }
}

pub async fn authenticate(State(keys): State<JwtKeys>, mut req: Request, next: Next) -> Response {
    let ctx = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| {
            keys.decode_identity(token)
                .map(|identity| AuthContext::authenticated(identity, token.to_string()))
        })
        .unwrap_or_else(AuthContext::anonymous);

    req.extensions_mut().insert(ctx);
    next.run(req).await
}
