/// Factory: build `AuthGateway` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AuthGateway,
    bearer::BearerVerifier,
    chain::{CredentialVerifier, VerifierChain},
    credential::CredentialExtractor,
    routes::RouteTable,
    session::{SessionError, SessionVerifier, ValkeySessionResolver},
};

/// Bearer first, then session. Without `SESSION_STORE_URL` the session strategy is
/// left out and session cookies are ignored.
pub async fn build_gateway(config: &Config) -> Result<Arc<AuthGateway>, SessionError> {
    let mut verifiers: Vec<Arc<dyn CredentialVerifier>> =
        vec![Arc::new(BearerVerifier::new(&config.bearer))];

    match &config.session.store_url {
        Some(url) => {
            let resolver =
                ValkeySessionResolver::new_with_prefix(url, config.session.key_prefix.clone())
                    .await?;
            verifiers.push(Arc::new(SessionVerifier::new(
                Arc::new(resolver),
                config.session.resolve_timeout,
            )));
        }
        None => tracing::warn!("SESSION_STORE_URL not set, session cookies will be ignored"),
    }

    let gateway = AuthGateway::new(
        RouteTable::from_config(&config.routes),
        CredentialExtractor::new(config.session.cookie_names.clone()),
        VerifierChain::new(verifiers),
        config.routes.login_redirect_path.clone(),
    );

    Ok(Arc::new(gateway))
}
