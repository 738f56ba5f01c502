//! Forwarded identity headers.
//!
//! Handlers trust these headers without re-verifying, so the gateway strips any
//! copy sent by the caller before deciding.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header::InvalidHeaderValue};

use super::identity::Identity;

pub const SUBJECT_HEADER: HeaderName = HeaderName::from_static("x-user-id");
pub const ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");

/// Removes every inbound copy of the identity headers.
pub fn strip_identity_headers(headers: &mut HeaderMap) {
    headers.remove(SUBJECT_HEADER);
    headers.remove(ROLE_HEADER);
}

/// Sets subject id and role. Either value failing header encoding leaves the map untouched.
pub fn propagate(identity: &Identity, headers: &mut HeaderMap) -> Result<(), InvalidHeaderValue> {
    let subject = HeaderValue::from_str(identity.subject_id())?;
    let role = HeaderValue::from_str(identity.role())?;

    headers.insert(SUBJECT_HEADER, subject);
    headers.insert(ROLE_HEADER, role);
    Ok(())
}
