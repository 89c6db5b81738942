//! Authorization policies.
//!
//! Each check is an explicit call composed at the start of an operation,
//! taking the resolved identity and the resource's ownership data as
//! arguments. Failure is `Forbidden`, distinct from `Unauthenticated`
//! (no valid token) and `NotFound` (resource absent).

use super::Identity;
use crate::error::{Error, Result};

/// Role-gated operations, e.g. user creation requires `SUPERVISOR`.
pub fn require_role(identity: &Identity, role: &str) -> Result<()> {
    if identity.has_role(role) {
        Ok(())
    } else {
        Err(Error::Forbidden(format!("Requires the {role} role")))
    }
}

/// Self-only operations: the caller may only act on resources it owns.
pub fn require_self(identity: &Identity, owner_user_id: i64) -> Result<()> {
    if identity.subject_id == owner_user_id {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Cannot act on another user's resources".to_string(),
        ))
    }
}

pub fn require_self_or_role(identity: &Identity, owner_user_id: i64, role: &str) -> Result<()> {
    if identity.subject_id == owner_user_id || identity.has_role(role) {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Cannot act on another user's resources".to_string(),
        ))
    }
}

/// Director-only operations on an organization's vacancies. `director` is
/// the ownership datum resolved either locally or through the organization
/// reference client; `None` means it could not be established, which denies.
pub fn require_director(identity: &Identity, director: Option<i64>) -> Result<()> {
    if director == Some(identity.subject_id) {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "Only the organization director may do this".to_string(),
        ))
    }
}
