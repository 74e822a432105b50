//! Provider configuration.
//!
//! The provider block carries a single `host` attribute, the base URL of the
//! shop backend. When it is not set the `EXAMPLE_HOST` environment variable
//! is used instead.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::ProviderError;
use crate::schema::Diagnostic;

/// Environment variable consulted when `host` is not configured.
pub const HOST_ENV_VAR: &str = "EXAMPLE_HOST";

/// The provider block as written by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the shop backend.
    #[serde(default)]
    pub host: Option<String>,
}

/// Configuration after defaults are applied and the host URL is checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base URL of the shop backend, without trailing slash.
    pub host: String,
}

impl ProviderConfig {
    /// Parse the JSON configuration sent by the host. `null` means an empty block.
    pub fn from_value(value: &Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Resolve the effective settings, reading `EXAMPLE_HOST` through `env`
    /// when `host` is unset or blank.
    pub fn resolve<F>(&self, env: F) -> Result<ProviderSettings, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = self
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .or_else(|| env(HOST_ENV_VAR).filter(|h| !h.trim().is_empty()));

        let Some(host) = host else {
            return Err(vec![Diagnostic::error("Unknown Example backend Host")
                .with_detail(format!(
                    "The \"host\" parameter in the provider config must not be empty. \
                     It can also be provided via the {} environment variable.",
                    HOST_ENV_VAR
                ))
                .with_attribute("host")]);
        };

        let host = host.trim();
        if !is_valid_host_url(host) {
            return Err(vec![Diagnostic::error("Invalid Host URL")
                .with_detail(format!(
                    "The configured example host [{}] is not a valid URL",
                    host
                ))
                .with_attribute("host")]);
        }

        Ok(ProviderSettings {
            host: host.trim_end_matches('/').to_string(),
        })
    }
}

fn is_valid_host_url(host: &str) -> bool {
    match Url::parse(host) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.has_host(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_from_value() {
        let config = ProviderConfig::from_value(&json!({"host": "http://localhost:8080"})).unwrap();
        assert_eq!(config.host.as_deref(), Some("http://localhost:8080"));

        let config = ProviderConfig::from_value(&Value::Null).unwrap();
        assert_eq!(config, ProviderConfig::default());

        let config = ProviderConfig::from_value(&json!({})).unwrap();
        assert!(config.host.is_none());

        assert!(ProviderConfig::from_value(&json!({"host": 5})).is_err());
    }

    #[test]
    fn test_resolve_explicit_host() {
        let config = ProviderConfig {
            host: Some("http://localhost:8080/".to_string()),
        };
        let settings = config
            .resolve(|_| Some("http://ignored".to_string()))
            .unwrap();
        assert_eq!(settings.host, "http://localhost:8080");
    }

    #[test]
    fn test_resolve_env_fallback() {
        let config = ProviderConfig::default();
        let settings = config
            .resolve(|name| {
                assert_eq!(name, HOST_ENV_VAR);
                Some("https://shop.example.com".to_string())
            })
            .unwrap();
        assert_eq!(settings.host, "https://shop.example.com");
    }

    #[test]
    fn test_resolve_blank_host_uses_env() {
        let config = ProviderConfig {
            host: Some("  ".to_string()),
        };
        let settings = config
            .resolve(|_| Some("http://from-env:9000".to_string()))
            .unwrap();
        assert_eq!(settings.host, "http://from-env:9000");
    }

    #[test]
    fn test_resolve_missing_host() {
        let diagnostics = ProviderConfig::default().resolve(no_env).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Unknown Example backend Host");
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("host"));
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains(HOST_ENV_VAR));
    }

    #[test]
    fn test_resolve_invalid_url() {
        for host in ["not a url", "localhost:8080", "ftp://files.example.com", "/articles"] {
            let config = ProviderConfig {
                host: Some(host.to_string()),
            };
            let diagnostics = config.resolve(no_env).unwrap_err();
            assert_eq!(diagnostics[0].summary, "Invalid Host URL", "host: {}", host);
            assert_eq!(
                diagnostics[0].detail.as_deref(),
                Some(format!("The configured example host [{}] is not a valid URL", host).as_str())
            );
        }
    }
}
