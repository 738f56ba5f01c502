//! Credential extraction: finds the one candidate credential a request carries.
//!
//! Nothing is verified here.

use axum::http::{HeaderMap, header};
use cookie::Cookie;

const BEARER_PREFIX: &str = "Bearer ";

/// Candidate credential pulled from a request.
///
/// Debug output redacts the raw values so a candidate can sit in a tracing span.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
    Session(String),
    None,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::Session(_) => f.write_str("Session(..)"),
            Self::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialExtractor {
    session_cookies: Vec<String>,
}

impl CredentialExtractor {
    /// `session_cookies` are tried in order; the first non-empty one wins.
    pub fn new(session_cookies: Vec<String>) -> Self {
        Self { session_cookies }
    }

    /// A bearer `Authorization` header always takes priority. The session cookie is
    /// only looked at when there is none, so the two are never both verified.
    pub fn extract(&self, headers: &HeaderMap) -> Credential {
        if let Some(token) = bearer_token(headers) {
            return Credential::Bearer(token.to_string());
        }

        match self.session_handle(headers) {
            Some(handle) => Credential::Session(handle),
            None => Credential::None,
        }
    }

    fn session_handle(&self, headers: &HeaderMap) -> Option<String> {
        let jar: Vec<Cookie<'_>> = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok)
            .collect();

        self.session_cookies.iter().find_map(|name| {
            jar.iter()
                .find(|c| c.name() == name && !c.value().is_empty())
                .map(|c| c.value().to_string())
        })
    }
}

/// Token after `Bearer `. An empty remainder is still a bearer candidate
/// (and fails verification), so a broken header never falls through to the session.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
}
