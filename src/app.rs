/*
 * Responsibility
 * - Config読み込み → ゲートウェイ生成 → Router 組み立て
 * - Middleware の適用順: http(最外) → cors → security headers → gateway → handlers
 * - axum::serve() で起動
 */
use anyhow::Result;
use axum::Router;
use std::{panic, process};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::build_gateway;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,edge_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        addr = %config.addr,
        admin_prefixes = ?config.routes.admin_prefixes,
        protected_prefixes = ?config.routes.protected_prefixes,
        "starting edge gateway"
    );

    let gateway = build_gateway(&config).await?;
    let state = AppState::new(gateway);

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let app = gated_routes(state);
    let app = middleware::security_headers::apply(app);
    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app, &config.http)
}

/// Handlers + fallback, all behind the gateway.
fn gated_routes(state: AppState) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .fallback(not_found);

    middleware::auth::access::apply(router, state.clone()).with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::BearerConfig;
    use crate::services::auth::{
        AuthGateway,
        bearer::{BearerVerifier, test_support::{SECRET, token}},
        chain::{CredentialVerifier, VerifierChain},
        credential::CredentialExtractor,
        routes::RouteTable,
    };

    fn app() -> Router {
        let gateway = AuthGateway::new(
            RouteTable::new(vec!["/general".into()], vec!["/api/v1/me".into()], "/api"),
            CredentialExtractor::new(vec!["session-token".into()]),
            VerifierChain::new(vec![Arc::new(BearerVerifier::new(&BearerConfig {
                secret: SECRET.into(),
                issuer: None,
                audience: None,
                leeway_seconds: 0,
            })) as Arc<dyn CredentialVerifier>]),
            "/",
        );
        let app = gated_routes(AppState::new(Arc::new(gateway)));
        middleware::security_headers::apply(app)
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn me_returns_forwarded_identity() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token("u1", "customer")))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"success": true, "data": {"subjectId": "u1", "role": "customer"}})
        );
    }

    #[tokio::test]
    async fn me_without_credential_is_401() {
        let res = app()
            .oneshot(Request::builder().uri("/api/v1/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers().get("x-content-type-options").unwrap(), "nosniff");
    }

    #[tokio::test]
    async fn health_is_public() {
        let res = app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fallback_is_gated_too() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/general/unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

        let res = app()
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"success": false, "message": "Not found."})
        );
    }
}
