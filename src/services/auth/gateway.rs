//! Admission control for a single request.
//!
//! classify path → extract credential → verifier chain → decide → shape.

use axum::http::HeaderMap;

use super::chain::{Authentication, VerifierChain};
use super::credential::CredentialExtractor;
use super::decision::{self, AccessDecision};
use super::identity::Identity;
use super::routes::RouteTable;

/// What the gateway decided, plus the identity to forward on admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: AccessDecision,
    pub identity: Option<Identity>,
}

#[derive(Debug, Clone)]
pub struct AuthGateway {
    routes: RouteTable,
    extractor: CredentialExtractor,
    chain: VerifierChain,
    login_redirect: String,
}

impl AuthGateway {
    pub fn new(
        routes: RouteTable,
        extractor: CredentialExtractor,
        chain: VerifierChain,
        login_redirect: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            extractor,
            chain,
            login_redirect: login_redirect.into(),
        }
    }

    pub fn login_redirect(&self) -> &str {
        &self.login_redirect
    }

    /// `path` must not carry a query string. Stateless: nothing is cached between calls.
    pub async fn evaluate(&self, path: &str, headers: &HeaderMap) -> Evaluation {
        let class = self.routes.classify(path);
        let credential = self.extractor.extract(headers);

        let auth = self.chain.authenticate(&credential).await;
        if let Authentication::Failed(err) = &auth {
            tracing::warn!(path, error = %err, "credential rejected");
        }

        let verdict = decision::decide(class, &auth);
        let decision = AccessDecision::shaped(verdict, self.routes.shape(path));

        tracing::debug!(
            path,
            ?class,
            ?credential,
            ?verdict,
            subject = auth.identity().map(Identity::subject_id),
            "access decision"
        );

        let identity = match (decision, auth) {
            (AccessDecision::Admit, Authentication::Authenticated(identity)) => Some(identity),
            _ => None,
        };

        Evaluation { decision, identity }
    }
}
