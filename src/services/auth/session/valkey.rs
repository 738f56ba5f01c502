use std::{future::Future, pin::Pin, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{SessionError, SessionResolver};
use crate::services::{
    auth::claims::{Claims, SubjectClaims},
    cache::{CacheClient, ValkeyClient},
};

/// Session record as written by the login service.
#[derive(Debug, Deserialize)]
struct SessionRecord {
    #[serde(flatten)]
    subject: SubjectClaims,
    #[serde(default, rename = "expiresAt")]
    expires_at: Option<DateTime<Utc>>,
}

/// Valkey-backed session resolver (Redis protocol).
///
/// Reads `<prefix>:<handle>`; a missing key or an expired record means "no session".
/// Backend errors are returned as `Err` so the caller fails closed.
#[derive(Clone)]
pub struct ValkeySessionResolver<C: CacheClient> {
    cache: Arc<C>,
    // Key prefix to avoid collisions with other data in the same store
    prefix: String,
}

impl ValkeySessionResolver<ValkeyClient> {
    pub async fn new_with_prefix(
        redis_url: &str,
        prefix: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self::new_with_cache(Arc::new(client), prefix))
    }
}

impl<C: CacheClient> ValkeySessionResolver<C> {
    pub fn new_with_cache(cache: Arc<C>, prefix: impl Into<String>) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, handle: &str) -> String {
        format!("{}:{}", self.prefix, handle)
    }

    fn decode(raw: &str, now: DateTime<Utc>) -> Result<Option<Claims>, SessionError> {
        let record: SessionRecord =
            serde_json::from_str(raw).map_err(|e| SessionError::InvalidRecord(e.to_string()))?;

        if record.expires_at.is_some_and(|at| at <= now) {
            return Ok(None);
        }

        Ok(Some(record.subject.into_claims()))
    }
}

impl<C: CacheClient> SessionResolver for ValkeySessionResolver<C> {
    fn resolve<'a>(
        &'a self,
        handle: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Claims>, SessionError>> + Send + 'a>> {
        Box::pin(async move {
            let key = self.key(handle);

            let Some(raw) = self.cache.get_string(&key).await? else {
                return Ok(None);
            };

            tracing::trace!(backend = self.cache.backend_name(), "session record found");

            Self::decode(&raw, Utc::now())
        })
    }
}
