/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認可はここでは行わない (全体をゲートウェイが包む)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
}
