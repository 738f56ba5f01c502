/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - ゲートウェイが付与した x-user-id / x-user-role から組み立てる (再検証はしない)
 *
 * Notes
 * - ヘッダが無い場合は匿名 (エラーではない)
 */
use serde::Serialize;

use crate::services::auth::identity::Identity;

/// Caller identity as forwarded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardedUser {
    pub subject_id: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthCtx {
    pub user: Option<ForwardedUser>,
}

impl AuthCtx {
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl From<&Identity> for AuthCtx {
    fn from(identity: &Identity) -> Self {
        Self {
            user: Some(ForwardedUser {
                subject_id: identity.subject_id().to_string(),
                role: identity.role().to_string(),
            }),
        }
    }
}
