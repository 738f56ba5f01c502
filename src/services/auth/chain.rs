//! Ordered verifier chain.
//!
//! Each strategy answers `Success`, `Fail` or `NotApplicable` for the extracted
//! credential. The chain stops at the first answer that is not `NotApplicable`,
//! so a rejected bearer token never reaches the session strategy.

use std::sync::Arc;

use async_trait::async_trait;

use super::bearer::{BearerVerifier, CredentialError};
use super::claims::Claims;
use super::credential::Credential;
use super::identity::{self, Identity};
use super::session::SessionVerifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    /// Terminal for the request on every route.
    Credential(CredentialError),
    /// The strategy ran but found nothing; the caller is anonymous.
    NoIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Success(Claims),
    Fail(VerifyFailure),
    NotApplicable,
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn verify(&self, credential: &Credential) -> VerifyOutcome;
}

#[async_trait]
impl CredentialVerifier for BearerVerifier {
    fn name(&self) -> &'static str {
        "bearer"
    }

    async fn verify(&self, credential: &Credential) -> VerifyOutcome {
        let Credential::Bearer(token) = credential else {
            return VerifyOutcome::NotApplicable;
        };

        match BearerVerifier::verify(self, token) {
            Ok(claims) => VerifyOutcome::Success(claims),
            Err(err) => VerifyOutcome::Fail(VerifyFailure::Credential(err)),
        }
    }
}

#[async_trait]
impl CredentialVerifier for SessionVerifier {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn verify(&self, credential: &Credential) -> VerifyOutcome {
        let Credential::Session(handle) = credential else {
            return VerifyOutcome::NotApplicable;
        };

        match SessionVerifier::verify(self, handle).await {
            Some(claims) => VerifyOutcome::Success(claims),
            None => VerifyOutcome::Fail(VerifyFailure::NoIdentity),
        }
    }
}

/// Result of running the chain and normalizing its claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Anonymous,
    Authenticated(Identity),
    Failed(CredentialError),
}

impl Authentication {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

#[derive(Clone, Default)]
pub struct VerifierChain {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
}

impl std::fmt::Debug for VerifierChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.verifiers.iter().map(|v| v.name()))
            .finish()
    }
}

impl VerifierChain {
    /// Strategies run in the order given.
    pub fn new(verifiers: Vec<Arc<dyn CredentialVerifier>>) -> Self {
        Self { verifiers }
    }

    pub async fn run(&self, credential: &Credential) -> VerifyOutcome {
        for verifier in &self.verifiers {
            match verifier.verify(credential).await {
                VerifyOutcome::NotApplicable => continue,
                outcome => {
                    tracing::trace!(strategy = verifier.name(), "verifier answered");
                    return outcome;
                }
            }
        }
        VerifyOutcome::NotApplicable
    }

    /// Runs the chain and resolves the winning claims into an `Identity`.
    /// Claims lacking a subject or role count as no identity.
    pub async fn authenticate(&self, credential: &Credential) -> Authentication {
        match self.run(credential).await {
            VerifyOutcome::Success(claims) => match identity::resolve(claims) {
                Ok(identity) => Authentication::Authenticated(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "verified credential carried unusable claims");
                    Authentication::Anonymous
                }
            },
            VerifyOutcome::Fail(VerifyFailure::Credential(err)) => Authentication::Failed(err),
            VerifyOutcome::Fail(VerifyFailure::NoIdentity) | VerifyOutcome::NotApplicable => {
                Authentication::Anonymous
            }
        }
    }
}
