//! Service configuration.
//!
//! Loaded once at startup from the process environment. Credentials for the
//! remote document service come from a Cloud Foundry `VCAP_SERVICES` binding
//! when one matches, otherwise from the `CLOUDANT_*` variables.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default bind address (all interfaces).
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 4001;

/// Service instance looked up in `VCAP_SERVICES` when none is configured.
pub const DEFAULT_BINDING_NAME: &str = "cloudant";

/// Default timeout for calls to the remote document service.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("VCAP_SERVICES is not a valid service binding document: {0}")]
    InvalidServiceBindings(#[from] serde_json::Error),

    #[error("no credentials for the remote document service (set VCAP_SERVICES or CLOUDANT_URL)")]
    MissingCredentials,

    #[error("invalid remote service url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Top-level configuration of a service process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name used in logs and health responses.
    pub service_name: String,
    /// Address to bind the HTTP listener to.
    pub host: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
    /// Remote document service connection.
    pub couch: CouchConfig,
}

/// Connection settings for the remote CouchDB-compatible service.
#[derive(Clone, Deserialize)]
pub struct CouchConfig {
    /// Endpoint URL, possibly with embedded credentials.
    pub url: String,
    /// Account name.
    #[serde(default, alias = "user")]
    pub username: Option<String>,
    /// Account password.
    #[serde(default)]
    pub password: Option<String>,
    /// Timeout applied to every outbound call.
    #[serde(skip, default = "default_timeout")]
    pub timeout: Duration,
}

impl fmt::Debug for CouchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CouchConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// One entry of a `VCAP_SERVICES` service list.
#[derive(Deserialize)]
struct ServiceBinding {
    name: String,
    #[serde(default)]
    credentials: serde_json::Value,
}

impl CouchConfig {
    /// Creates a configuration for `url` without explicit credentials.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            timeout: default_timeout(),
        }
    }

    /// Looks up the credentials of the service instance called `binding`
    /// in a raw `VCAP_SERVICES` document.
    ///
    /// Returns `Ok(None)` when no instance has that name.
    pub fn from_service_bindings(raw: &str, binding: &str) -> Result<Option<Self>, ConfigError> {
        let services: HashMap<String, Vec<ServiceBinding>> = serde_json::from_str(raw)?;
        services
            .into_values()
            .flatten()
            .find(|entry| entry.name == binding)
            .map(|entry| serde_json::from_value::<CouchConfig>(entry.credentials))
            .transpose()
            .map_err(ConfigError::from)
    }

    fn from_variables<F>(lookup: &F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("CLOUDANT_URL")?;
        Some(Self {
            username: lookup("CLOUDANT_USERNAME"),
            password: lookup("CLOUDANT_PASSWORD"),
            ..Self::new(url)
        })
    }
}

impl AppConfig {
    /// Loads configuration for `service_name` from the process environment.
    pub fn load_with_service(service_name: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_or(&lookup, "CLOUDANT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let binding =
            lookup("CLOUDANT_SERVICE_NAME").unwrap_or_else(|| DEFAULT_BINDING_NAME.to_string());

        let bound = match lookup("VCAP_SERVICES") {
            Some(raw) => CouchConfig::from_service_bindings(&raw, &binding)?,
            None => None,
        };
        let mut couch = bound
            .or_else(|| CouchConfig::from_variables(&lookup))
            .ok_or(ConfigError::MissingCredentials)?;
        couch.timeout = Duration::from_secs(timeout_secs);

        Ok(Self {
            service_name: service_name.to_string(),
            host,
            port,
            couch,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BINDINGS: &str = r#"{
        "cloudantNoSQLDB": [
            {
                "name": "docs-db",
                "credentials": {
                    "url": "https://acct.cloudant.com",
                    "username": "acct",
                    "password": "secret"
                }
            }
        ],
        "redis": [
            { "name": "cache", "credentials": { "uri": "redis://cache" } }
        ]
    }"#;

    #[test]
    fn test_defaults_with_plain_variables() {
        let config = AppConfig::from_lookup(
            "gateway",
            vars(&[("CLOUDANT_URL", "http://localhost:5984")]),
        )
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:4001");
        assert_eq!(config.service_name, "gateway");
        assert_eq!(config.couch.url, "http://localhost:5984");
        assert_eq!(config.couch.username, None);
        assert_eq!(config.couch.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_port_and_credentials_from_variables() {
        let config = AppConfig::from_lookup(
            "gateway",
            vars(&[
                ("PORT", "8080"),
                ("CLOUDANT_URL", "http://localhost:5984"),
                ("CLOUDANT_USERNAME", "admin"),
                ("CLOUDANT_PASSWORD", "pw"),
                ("CLOUDANT_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.couch.username.as_deref(), Some("admin"));
        assert_eq!(config.couch.password.as_deref(), Some("pw"));
        assert_eq!(config.couch.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_service_binding_wins_over_variables() {
        let config = AppConfig::from_lookup(
            "gateway",
            vars(&[
                ("VCAP_SERVICES", BINDINGS),
                ("CLOUDANT_SERVICE_NAME", "docs-db"),
                ("CLOUDANT_URL", "http://ignored:5984"),
            ]),
        )
        .unwrap();

        assert_eq!(config.couch.url, "https://acct.cloudant.com");
        assert_eq!(config.couch.username.as_deref(), Some("acct"));
        assert_eq!(config.couch.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_unknown_binding_falls_back_to_variables() {
        let config = AppConfig::from_lookup(
            "gateway",
            vars(&[
                ("VCAP_SERVICES", BINDINGS),
                ("CLOUDANT_URL", "http://fallback:5984"),
            ]),
        )
        .unwrap();

        assert_eq!(config.couch.url, "http://fallback:5984");
    }

    #[test]
    fn test_user_alias_in_binding() {
        let raw = r#"{"cloudantNoSQLDB":[{"name":"cloudant","credentials":{"url":"https://x","user":"u"}}]}"#;
        let couch = CouchConfig::from_service_bindings(raw, "cloudant")
            .unwrap()
            .unwrap();
        assert_eq!(couch.username.as_deref(), Some("u"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = AppConfig::from_lookup("gateway", vars(&[("CLOUDANT_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn test_invalid_port() {
        let err = AppConfig::from_lookup(
            "gateway",
            vars(&[("PORT", "http"), ("CLOUDANT_URL", "http://localhost:5984")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn test_invalid_service_bindings() {
        let err = AppConfig::from_lookup("gateway", vars(&[("VCAP_SERVICES", "{nope")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidServiceBindings(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let couch = CouchConfig {
            password: Some("secret".into()),
            ..CouchConfig::new("http://localhost:5984")
        };
        assert!(!format!("{couch:?}").contains("secret"));
    }
}
