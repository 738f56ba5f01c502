/*
 * Responsibility
 * - 環境変数の読み込み (JWT secret, ルートテーブル, セッションストアなど)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - ルートテーブルはここで一度だけ組み立て、以降は不変
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_ADMIN_PREFIXES: &str = "/general,/api/v1/users";
const DEFAULT_PROTECTED_PREFIXES: &str = "/api/v1/wishlist,/api/v1/cart,/api/v1/orders,/account";
const DEFAULT_SESSION_COOKIES: &str = "__Secure-session-token,session-token";

/// Bearer verification settings. The secret is kept out of `Debug`.
#[derive(Clone)]
pub struct BearerConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

impl fmt::Debug for BearerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_names: Vec<String>,
    pub store_url: Option<String>,
    pub key_prefix: String,
    pub resolve_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub admin_prefixes: Vec<String>,
    pub protected_prefixes: Vec<String>,
    pub api_prefix: String,
    pub login_redirect_path: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub http: HttpConfig,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub bearer: BearerConfig,
    pub session: SessionConfig,
    pub routes: RouteConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Unset keys take their default; a set key
    /// that does not parse is `ConfigError::Invalid`.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_var(&var, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let http = HttpConfig {
            request_timeout: Duration::from_secs(positive_var(&var, "REQUEST_TIMEOUT_SECONDS", 30)?),
            body_limit_bytes: parse_var(&var, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?,
        };

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = split_list(&var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let secret = var("AUTH_JWT_SECRET").ok_or(ConfigError::Missing("AUTH_JWT_SECRET"))?;
        if secret.trim().is_empty() {
            return Err(ConfigError::Invalid("AUTH_JWT_SECRET"));
        }

        let bearer = BearerConfig {
            secret,
            issuer: non_empty_var(&var, "AUTH_JWT_ISSUER"),
            audience: non_empty_var(&var, "AUTH_JWT_AUDIENCE"),
            leeway_seconds: parse_var(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?,
        };

        let routes = RouteConfig {
            admin_prefixes: parse_prefixes(
                &var("ADMIN_ROUTE_PREFIXES").unwrap_or_else(|| DEFAULT_ADMIN_PREFIXES.to_string()),
            )
            .map_err(|_| ConfigError::Invalid("ADMIN_ROUTE_PREFIXES"))?,
            protected_prefixes: parse_prefixes(
                &var("PROTECTED_ROUTE_PREFIXES")
                    .unwrap_or_else(|| DEFAULT_PROTECTED_PREFIXES.to_string()),
            )
            .map_err(|_| ConfigError::Invalid("PROTECTED_ROUTE_PREFIXES"))?,
            api_prefix: parse_path(&var("API_PATH_PREFIX").unwrap_or_else(|| "/api".to_string()))
                .ok_or(ConfigError::Invalid("API_PATH_PREFIX"))?,
            login_redirect_path: parse_path(
                &var("LOGIN_REDIRECT_PATH").unwrap_or_else(|| "/".to_string()),
            )
            .ok_or(ConfigError::Invalid("LOGIN_REDIRECT_PATH"))?,
        };

        let session = SessionConfig {
            cookie_names: split_list(
                &var("SESSION_COOKIE_NAMES").unwrap_or_else(|| DEFAULT_SESSION_COOKIES.to_string()),
            ),
            store_url: non_empty_var(&var, "SESSION_STORE_URL"),
            key_prefix: non_empty_var(&var, "SESSION_KEY_PREFIX")
                .unwrap_or_else(|| "session".to_string()),
            resolve_timeout: Duration::from_millis(positive_var(
                &var,
                "SESSION_RESOLVE_TIMEOUT_MS",
                500,
            )?),
        };

        Ok(Self {
            addr,
            http,
            app_env,
            cors_allowed_origins,
            bearer,
            session,
            routes,
        })
    }
}

fn parse_var<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn positive_var(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match parse_var(var, key, default)? {
        0 => Err(ConfigError::Invalid(key)),
        n => Ok(n),
    }
}

fn non_empty_var(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize a single configured path: must be absolute, trailing `/` trimmed
/// (the bare root stays `/`). `//host` is refused since it is a valid redirect target
/// off-site.
fn parse_path(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.starts_with('/') {
        return None;
    }
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        Some("/".to_string())
    } else if trimmed.starts_with("//") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an ordered, comma separated prefix list. Order is preserved.
pub fn parse_prefixes(raw: &str) -> Result<Vec<String>, String> {
    split_list(raw)
        .into_iter()
        .map(|s| parse_path(&s).ok_or(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn missing_secret_is_reported() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("AUTH_JWT_SECRET"));
        assert_eq!(
            load(&[("AUTH_JWT_SECRET", "  ")]).unwrap_err(),
            ConfigError::Invalid("AUTH_JWT_SECRET")
        );
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = load(&[("AUTH_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(cfg.addr.port(), 3000);
        assert_eq!(cfg.http.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.http.body_limit_bytes, 1024 * 1024);
        assert_eq!(cfg.bearer.leeway_seconds, 60);
        assert_eq!(cfg.session.resolve_timeout, Duration::from_millis(500));
        assert_eq!(cfg.session.store_url, None);
        assert_eq!(cfg.routes.admin_prefixes, vec!["/general", "/api/v1/users"]);
        assert_eq!(cfg.routes.login_redirect_path, "/");
        assert!(!cfg.app_env.is_production());
    }

    #[test]
    fn unparsable_numbers_fail_fast() {
        for (key, value) in [
            ("PORT", "http"),
            ("PORT", "70000"),
            ("REQUEST_TIMEOUT_SECONDS", "0"),
            ("REQUEST_TIMEOUT_SECONDS", "soon"),
            ("REQUEST_BODY_LIMIT_BYTES", "1MB"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "-5"),
            ("SESSION_RESOLVE_TIMEOUT_MS", "0"),
        ] {
            assert_eq!(
                load(&[("AUTH_JWT_SECRET", "s3cret"), (key, value)]).unwrap_err(),
                ConfigError::Invalid(key),
                "{key}={value}"
            );
        }
    }

    #[test]
    fn explicit_values_are_used() {
        let cfg = load(&[
            ("AUTH_JWT_SECRET", "s3cret"),
            ("PORT", " 8080 "),
            ("APP_ENV", "PROD"),
            ("SESSION_STORE_URL", "redis://127.0.0.1:6379"),
            ("LOGIN_REDIRECT_PATH", "/login/"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.port(), 8080);
        assert!(cfg.app_env.is_production());
        assert_eq!(cfg.session.store_url.as_deref(), Some("redis://127.0.0.1:6379"));
        assert_eq!(cfg.routes.login_redirect_path, "/login");
    }

    #[test]
    fn protocol_relative_login_path_is_invalid() {
        assert_eq!(
            load(&[("AUTH_JWT_SECRET", "s3cret"), ("LOGIN_REDIRECT_PATH", "//evil.example")])
                .unwrap_err(),
            ConfigError::Invalid("LOGIN_REDIRECT_PATH")
        );
    }

    #[test]
    fn prefixes_keep_order_and_drop_blanks() {
        let parsed = parse_prefixes(" /general , ,/api/v1/users/ ").unwrap();
        assert_eq!(parsed, vec!["/general", "/api/v1/users"]);
    }

    #[test]
    fn relative_prefix_is_rejected() {
        assert_eq!(parse_prefixes("/ok,general"), Err("general".to_string()));
    }

    #[test]
    fn root_prefix_survives_trimming() {
        assert_eq!(parse_prefixes("/").unwrap(), vec!["/"]);
        assert_eq!(parse_path("///"), Some("/".to_string()));
    }

    #[test]
    fn protocol_relative_path_is_rejected() {
        assert_eq!(parse_path("//evil.example/login"), None);
        assert_eq!(parse_path("/login/"), Some("/login".to_string()));
    }

    #[test]
    fn bearer_config_debug_hides_secret() {
        let cfg = BearerConfig {
            secret: "super-secret".into(),
            issuer: None,
            audience: None,
            leeway_seconds: 0,
        };
        assert!(!format!("{cfg:?}").contains("super-secret"));
    }
}
