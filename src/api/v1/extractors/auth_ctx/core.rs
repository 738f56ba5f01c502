use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderName, request::Parts};

use crate::services::auth::identity::Identity;
use crate::services::auth::propagate::{ROLE_HEADER, SUBJECT_HEADER};
use crate::state::AppState;

use super::{AuthCtx, types::ForwardedUser};

/// Handler で AuthCtx を受け取るための extractor
/// 同一プロセスの gateway が入れた `Identity` extension を優先し、無ければ転送ヘッダを読む。
/// どちらかのヘッダが欠けていれば匿名として扱う
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor
where
    AppState: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(AuthCtxExtractor(from_parts(parts)))
    }
}

fn from_parts(parts: &Parts) -> AuthCtx {
    match parts.extensions.get::<Identity>() {
        Some(identity) => AuthCtx::from(identity),
        None => from_headers(&parts.headers),
    }
}

fn from_headers(headers: &HeaderMap) -> AuthCtx {
    let read = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    match (read(SUBJECT_HEADER), read(ROLE_HEADER)) {
        (Some(subject_id), Some(role)) => AuthCtx {
            user: Some(ForwardedUser { subject_id, role }),
        },
        _ => AuthCtx::anonymous(),
    }
}
