use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::config::BearerConfig;

use super::claims::{Claims, SubjectClaims};

/// Hard bearer failure. Never followed by another strategy.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("malformed credential")]
    Malformed,
    #[error("expired credential")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for CredentialError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Bearer token (JWT) claims. `exp` is required by `Validation`.
#[derive(Debug, Clone, Deserialize)]
struct BearerClaims {
    #[serde(flatten)]
    subject: SubjectClaims,
    #[allow(dead_code)]
    exp: u64,
}

/// HS256 verifier against a shared secret.
///
/// Purely computational: no I/O, safe to run on every request.
/// Key material is not printable via Debug.
#[derive(Clone)]
pub struct BearerVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for BearerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("BearerVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl BearerVerifier {
    pub fn new(config: &BearerConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Signature, `exp` (and `iss`/`aud` when configured) are checked by `jsonwebtoken`.
    /// A signed payload without a subject id comes back as `Claims::Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, CredentialError> {
        if token.is_empty() {
            return Err(CredentialError::Malformed);
        }

        let data = jsonwebtoken::decode::<BearerClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims.subject.into_claims())
    }
}
