//! Edge admission control: every inbound request passes through here before any handler.
//!
//! - inbound identity headers are stripped (only the gateway may set them)
//! - `AuthGateway::evaluate` classifies the path, verifies the credential and decides
//! - on admission the identity is forwarded as `x-user-id` / `x-user-role` and as an
//!   `Identity` extension
//! - rejections become a `{success: false, message}` JSON with 401/403; a UI path
//!   with no credential is redirected to the login location instead

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::GateError;
use crate::services::auth::decision::AccessDecision;
use crate::services::auth::propagate;
use crate::state::AppState;

/// Wrap the whole application router (routes and fallback) with the gateway.
///
/// Must be called after every route is registered; routes added later are not covered.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    propagate::strip_identity_headers(req.headers_mut());

    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let path = req.uri().path().to_owned();
    let evaluation = state.gateway.evaluate(&path, req.headers()).await;

    match evaluation.decision {
        AccessDecision::Admit => {
            if let Some(identity) = evaluation.identity {
                if let Err(err) = propagate::propagate(&identity, req.headers_mut()) {
                    // Claims that cannot be forwarded are unusable claims.
                    tracing::warn!(error = %err, "identity not encodable as header");
                    return GateError::NoCredential.into_response();
                }
                // middleware → extractor への受け渡し
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
        AccessDecision::RedirectToLogin => {
            Redirect::temporary(state.gateway.login_redirect()).into_response()
        }
        AccessDecision::Reject(err) => err.into_response(),
    }
}

/// Preflight requests are OPTIONS requests with both `Origin` and
/// `Access-Control-Request-Method`.
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(header::ORIGIN)
        && headers.contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}
