//! Access decision: a pure function of route class and authentication outcome.
//!
//! Presentation (redirect vs JSON) is applied afterwards from `ResponseShape`
//! and never changes whether a request is admitted.

use crate::error::GateError;

use super::bearer::CredentialError;
use super::chain::Authentication;
use super::routes::{ResponseShape, RouteClass};

/// Admit/reject outcome before response shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject(GateError),
}

/// Terminal decision for a request. One per request, consumed by the response writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Admit,
    RedirectToLogin,
    /// 401 or 403, per `GateError::status`.
    Reject(GateError),
}

impl From<CredentialError> for GateError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Malformed => GateError::MalformedCredential,
            CredentialError::Expired => GateError::ExpiredCredential,
        }
    }
}

/// | class      | anonymous    | non-admin        | admin |
/// |------------|--------------|------------------|-------|
/// | Public     | Admit        | Admit            | Admit |
/// | Protected  | NoCredential | Admit            | Admit |
/// | AdminOnly  | NoCredential | InsufficientRole | Admit |
///
/// A bearer token that failed verification is rejected on every route.
pub fn decide(class: RouteClass, auth: &Authentication) -> Verdict {
    let identity = match auth {
        Authentication::Failed(err) => return Verdict::Reject((*err).into()),
        Authentication::Anonymous => None,
        Authentication::Authenticated(identity) => Some(identity),
    };

    match (class, identity) {
        (RouteClass::Public, _) => Verdict::Admit,
        (_, None) => Verdict::Reject(GateError::NoCredential),
        (RouteClass::Protected, Some(_)) => Verdict::Admit,
        (RouteClass::AdminOnly, Some(identity)) if identity.is_admin() => Verdict::Admit,
        (RouteClass::AdminOnly, Some(_)) => Verdict::Reject(GateError::InsufficientRole),
    }
}

impl AccessDecision {
    /// Only a missing credential on a UI path redirects. Every other rejection keeps
    /// its 401/403 status and JSON body.
    pub fn shaped(verdict: Verdict, shape: ResponseShape) -> Self {
        match (verdict, shape) {
            (Verdict::Admit, _) => AccessDecision::Admit,
            (Verdict::Reject(GateError::NoCredential), ResponseShape::Ui) => {
                AccessDecision::RedirectToLogin
            }
            (Verdict::Reject(err), _) => AccessDecision::Reject(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::claims::Claims;
    use crate::services::auth::identity;

    fn who(role: &str) -> Authentication {
        Authentication::Authenticated(
            identity::resolve(Claims::Valid {
                subject_id: "u1".into(),
                role: role.into(),
            })
            .unwrap(),
        )
    }

    const CLASSES: [RouteClass; 3] = [RouteClass::Public, RouteClass::Protected, RouteClass::AdminOnly];

    #[test]
    fn public_always_admits_valid_or_missing_identity() {
        for auth in [Authentication::Anonymous, who("customer"), who("admin")] {
            assert_eq!(decide(RouteClass::Public, &auth), Verdict::Admit);
        }
    }

    #[test]
    fn protected_requires_identity() {
        assert_eq!(
            decide(RouteClass::Protected, &Authentication::Anonymous),
            Verdict::Reject(GateError::NoCredential)
        );
        assert_eq!(decide(RouteClass::Protected, &who("customer")), Verdict::Admit);
        assert_eq!(decide(RouteClass::Protected, &who("admin")), Verdict::Admit);
    }

    #[test]
    fn admin_only_requires_admin_role() {
        assert_eq!(
            decide(RouteClass::AdminOnly, &Authentication::Anonymous),
            Verdict::Reject(GateError::NoCredential)
        );
        assert_eq!(
            decide(RouteClass::AdminOnly, &who("customer")),
            Verdict::Reject(GateError::InsufficientRole)
        );
        assert_eq!(decide(RouteClass::AdminOnly, &who("admin")), Verdict::Admit);
    }

    #[test]
    fn failed_credential_never_admits() {
        for class in CLASSES {
            for err in [CredentialError::Malformed, CredentialError::Expired] {
                let verdict = decide(class, &Authentication::Failed(err));
                assert_eq!(verdict, Verdict::Reject(err.into()));
                assert_eq!(verdict.status_code(), Some(401));
            }
        }
    }

    #[test]
    fn decide_is_deterministic() {
        for class in CLASSES {
            for auth in [Authentication::Anonymous, who("customer"), who("admin")] {
                assert_eq!(decide(class, &auth), decide(class, &auth));
            }
        }
    }

    #[test]
    fn only_missing_credential_redirects_on_ui() {
        let missing = Verdict::Reject(GateError::NoCredential);
        assert_eq!(
            AccessDecision::shaped(missing, ResponseShape::Ui),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            AccessDecision::shaped(missing, ResponseShape::Api),
            AccessDecision::Reject(GateError::NoCredential)
        );

        for err in [
            GateError::MalformedCredential,
            GateError::ExpiredCredential,
            GateError::InsufficientRole,
        ] {
            for shape in [ResponseShape::Api, ResponseShape::Ui] {
                assert_eq!(
                    AccessDecision::shaped(Verdict::Reject(err), shape),
                    AccessDecision::Reject(err)
                );
            }
        }

        for shape in [ResponseShape::Api, ResponseShape::Ui] {
            assert_eq!(AccessDecision::shaped(Verdict::Admit, shape), AccessDecision::Admit);
        }
    }

    #[test]
    fn customer_on_admin_ui_is_forbidden_not_redirected() {
        let verdict = decide(RouteClass::AdminOnly, &who("customer"));
        assert_eq!(
            AccessDecision::shaped(verdict, ResponseShape::Ui),
            AccessDecision::Reject(GateError::InsufficientRole)
        );
    }

    impl Verdict {
        fn status_code(&self) -> Option<u16> {
            match self {
                Verdict::Admit => None,
                Verdict::Reject(err) => Some(err.status().as_u16()),
            }
        }
    }
}
