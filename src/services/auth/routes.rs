//! Route classification: which access level a request path requires.
//!
//! The tables are built once from `Config` and never mutated afterwards.

use crate::config::RouteConfig;

/// Access-level bucket for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Protected,
    AdminOnly,
}

/// Which kind of rejection response a path gets. Only the response writer looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Browser navigation: rejections redirect to the login location.
    Ui,
    /// JSON consumers: rejections get a `{success, message}` body.
    Api,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    admin_prefixes: Vec<String>,
    protected_prefixes: Vec<String>,
    api_prefix: String,
}

impl RouteTable {
    pub fn new(
        admin_prefixes: Vec<String>,
        protected_prefixes: Vec<String>,
        api_prefix: impl Into<String>,
    ) -> Self {
        Self {
            admin_prefixes,
            protected_prefixes,
            api_prefix: api_prefix.into(),
        }
    }

    pub fn from_config(config: &RouteConfig) -> Self {
        Self::new(
            config.admin_prefixes.clone(),
            config.protected_prefixes.clone(),
            config.api_prefix.clone(),
        )
    }

    /// Admin prefixes are checked first and win when both tables match.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.admin_prefixes.iter().any(|p| matches_prefix(path, p)) {
            RouteClass::AdminOnly
        } else if self.protected_prefixes.iter().any(|p| matches_prefix(path, p)) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }

    pub fn shape(&self, path: &str) -> ResponseShape {
        if matches_prefix(path, &self.api_prefix) {
            ResponseShape::Api
        } else {
            ResponseShape::Ui
        }
    }
}

/// Case-sensitive prefix match anchored on a segment boundary:
/// `/general` matches `/general` and `/general/x`, never `/generalization`.
pub fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}
