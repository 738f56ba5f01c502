use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use crate::services::auth::claims::Claims;
use crate::services::cache::CacheError;

/// External session-resolution collaborator.
///
/// - `Ok(Some(_))`: session found, claims decoded
/// - `Ok(None)`: no such session, or it has expired
/// - `Err(_)`: backend failure (caller must fail closed)
pub trait SessionResolver: Send + Sync {
    fn resolve<'a>(
        &'a self,
        handle: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Claims>, SessionError>> + Send + 'a>>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(#[from] CacheError),

    #[error("session lookup timed out")]
    Timeout,

    #[error("invalid session record: {0}")]
    InvalidRecord(String),
}

/// Session strategy: a bounded lookup through the injected resolver.
///
/// Every failure, including a timeout, is logged and comes back as `None`.
/// Dropping the returned future (request aborted) drops the in-flight lookup.
#[derive(Clone)]
pub struct SessionVerifier {
    resolver: Arc<dyn SessionResolver>,
    timeout: Duration,
}

impl std::fmt::Debug for SessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionVerifier")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SessionVerifier {
    pub fn new(resolver: Arc<dyn SessionResolver>, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    pub async fn verify(&self, handle: &str) -> Option<Claims> {
        let result = match tokio::time::timeout(self.timeout, self.resolver.resolve(handle)).await
        {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout),
        };

        match result {
            Ok(claims) => claims,
            Err(SessionError::InvalidRecord(reason)) => {
                tracing::warn!(%reason, "discarding undecodable session record");
                None
            }
            Err(err) => {
                tracing::error!(error = %err, "session resolver unavailable, treating as no credential");
                None
            }
        }
    }
}
