use std::sync::Arc;
use std::time::Duration;

use jobboard_core::auth::{JwtKeys, ROLE_SUPERVISOR, ROLE_USER};
use jobboard_core::error::{Error, Result};

use crate::dto::auth_dto::{LoginPayload, TokenResponse};
use crate::store::{NewUser, UserStore};
use crate::utils::crypto;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    jwt: JwtKeys,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, jwt: JwtKeys, token_ttl: Duration) -> Self {
        Self {
            store,
            jwt,
            token_ttl,
        }
    }

    /// Email + password exchange for a bearer token carrying the user's id
    /// and roles. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, payload: LoginPayload) -> Result<TokenResponse> {
        let user = self
            .store
            .find_by_email(&payload.email)
            .await?
            .ok_or_else(|| Error::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;

        let verified = crypto::verify_password(&payload.password, &user.password_hash)
            .map_err(|_| Error::Unauthenticated(INVALID_CREDENTIALS.to_string()))?;
        if !verified {
            return Err(Error::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.jwt.issue(user.id, user.roles, self.token_ttl)?;
        Ok(TokenResponse { token })
    }

    /// Idempotent bootstrap of the supervisor account from configuration,
    /// run once at startup.
    pub async fn ensure_supervisor(&self, email: &str, password: &str) -> Result<()> {
        match self.store.find_by_email(email).await? {
            Some(user) => self.store.ensure_role(user.id, ROLE_SUPERVISOR).await,
            None => {
                let password_hash = crypto::hash_password(password)
                    .map_err(|e| Error::Internal(format!("failed to hash password: {e}")))?;
                self.store
                    .insert(NewUser {
                        nickname: "Root".to_string(),
                        email: email.to_string(),
                        cv_link: None,
                        password_hash,
                        roles: vec![ROLE_USER.to_string(), ROLE_SUPERVISOR.to_string()],
                    })
                    .await?;
                Ok(())
            }
        }
    }
}
