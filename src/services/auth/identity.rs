//! Normalizes verified claims into the canonical `Identity`.

use thiserror::Error;

use super::claims::Claims;

/// The single privileged role. Compared by exact string equality.
pub const ADMIN_ROLE: &str = "admin";

/// Verified caller identity. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject_id: String,
    role: String,
}

impl Identity {
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("claims lack a subject id or role")]
pub struct InvalidClaims;

/// Requires both a subject id and a role; either missing or empty is `InvalidClaims`.
/// Values must be printable ASCII so they can be forwarded as header values.
pub fn resolve(claims: Claims) -> Result<Identity, InvalidClaims> {
    match claims {
        Claims::Valid { subject_id, role } if forwardable(&subject_id) && forwardable(&role) => {
            Ok(Identity { subject_id, role })
        }
        _ => Err(InvalidClaims),
    }
}

fn forwardable(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_graphic())
}
