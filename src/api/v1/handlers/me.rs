/*
 * Responsibility
 * - GET /api/v1/me
 * - ゲートウェイが転送した identity をそのまま返す (匿名なら data: null)
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::{AuthCtxExtractor, ForwardedUser};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub data: Option<ForwardedUser>,
}

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        data: ctx.user,
    })
}
