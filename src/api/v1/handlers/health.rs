/*
 * Responsibility
 * - GET /api/v1/health (疎通用、既定のテーブルでは public)
 */
pub async fn health() -> &'static str {
    "ok"
}
