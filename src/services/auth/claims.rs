use serde::Deserialize;

/// Outcome of decoding a verified payload.
///
/// A payload without a usable subject id is `Invalid`, never an anonymous identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claims {
    Valid { subject_id: String, role: String },
    Invalid,
}

/// Subject/role fields as they appear on the wire (bearer payloads and session records).
///
/// Issuers disagree on the subject field name, so `sub`, `id` and `userId` are all
/// accepted; the first non-empty one wins. Values are taken verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubjectClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SubjectClaims {
    fn subject(&self) -> Option<&str> {
        [&self.sub, &self.id, &self.user_id]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.is_empty())
    }

    pub fn into_claims(self) -> Claims {
        let Some(subject_id) = self.subject().map(str::to_string) else {
            return Claims::Invalid;
        };

        Claims::Valid {
            subject_id,
            role: self.role.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::identity::{self, InvalidClaims};

    fn parse(json: &str) -> Claims {
        serde_json::from_str::<SubjectClaims>(json)
            .unwrap()
            .into_claims()
    }

    #[test]
    fn sub_is_preferred() {
        assert_eq!(
            parse(r#"{"sub":"u1","id":"u2","role":"admin"}"#),
            Claims::Valid {
                subject_id: "u1".into(),
                role: "admin".into()
            }
        );
    }

    #[test]
    fn empty_sub_falls_back_to_other_fields() {
        assert_eq!(
            parse(r#"{"sub":"","userId":"u3","role":"customer"}"#),
            Claims::Valid {
                subject_id: "u3".into(),
                role: "customer".into()
            }
        );
    }

    #[test]
    fn whitespace_is_not_stripped() {
        assert_eq!(
            parse(r#"{"sub":"  ","userId":"u3","role":" admin "}"#),
            Claims::Valid {
                subject_id: "  ".into(),
                role: " admin ".into()
            }
        );
    }

    #[test]
    fn padded_admin_role_is_never_admin() {
        let claims = parse(r#"{"sub":"u1","role":" admin "}"#);
        match identity::resolve(claims) {
            Ok(id) => assert!(!id.is_admin()),
            Err(InvalidClaims) => {}
        }
        assert_eq!(
            identity::resolve(parse(r#"{"sub":"u1","role":"Admin"}"#)).map(|id| id.is_admin()),
            Ok(false)
        );
    }

    #[test]
    fn missing_subject_is_invalid() {
        assert_eq!(parse(r#"{"role":"admin"}"#), Claims::Invalid);
        assert_eq!(parse(r#"{"sub":"","role":"admin"}"#), Claims::Invalid);
    }

    #[test]
    fn missing_role_stays_empty() {
        assert_eq!(
            parse(r#"{"id":"u4"}"#),
            Claims::Valid {
                subject_id: "u4".into(),
                role: String::new()
            }
        );
    }
}
