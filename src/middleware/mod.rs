/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 全リクエストの入口となるゲートウェイ
 * - http / cors / security_headers: ゲートウェイの外側に掛ける横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
