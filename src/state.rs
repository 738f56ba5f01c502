/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gateway: 起動時に一度だけ組み立てた AuthGateway (リクエスト中は不変)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::auth::AuthGateway;

#[derive(Clone, Debug)]
pub struct AppState {
    pub gateway: Arc<AuthGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<AuthGateway>) -> Self {
        Self { gateway }
    }
}
