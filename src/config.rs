//! Provider configuration.
//!
//! Values come from the provider block first and fall back to the
//! `PINGFEDERATE_PROVIDER_*` environment variables.

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::schema::{Attribute, Diagnostic, Schema};

/// Default base path of the administrative API.
pub const DEFAULT_ADMIN_API_PATH: &str = "/pf-admin-api/v1";

/// Environment variable holding the HTTPS host.
pub const ENV_HTTPS_HOST: &str = "PINGFEDERATE_PROVIDER_HTTPS_HOST";
/// Environment variable holding the admin username.
pub const ENV_USERNAME: &str = "PINGFEDERATE_PROVIDER_USERNAME";
/// Environment variable holding the admin password.
pub const ENV_PASSWORD: &str = "PINGFEDERATE_PROVIDER_PASSWORD";
/// Environment variable overriding the admin API path.
pub const ENV_ADMIN_API_PATH: &str = "PINGFEDERATE_PROVIDER_ADMIN_API_PATH";
/// Environment variable toggling certificate verification.
pub const ENV_INSECURE_TRUST_ALL_TLS: &str = "PINGFEDERATE_PROVIDER_INSECURE_TRUST_ALL_TLS";
/// Environment variable toggling the `X-BypassExternalValidation` header.
pub const ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER: &str =
    "PINGFEDERATE_PROVIDER_X_BYPASS_EXTERNAL_VALIDATION_HEADER";

/// Raw provider block as sent by the host.
#[derive(Debug, Default, Deserialize)]
struct ProviderConfigModel {
    https_host: Option<String>,
    username: Option<String>,
    password: Option<String>,
    admin_api_path: Option<String>,
    insecure_trust_all_tls: Option<bool>,
    x_bypass_external_validation_header: Option<bool>,
}

/// Resolved settings used to build a [`crate::client::PingFederateClient`].
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Scheme, host and port of the PingFederate admin listener.
    pub https_host: Url,
    /// Admin username used for basic authentication.
    pub username: String,
    /// Admin password used for basic authentication.
    pub password: String,
    /// Base path of the admin API.
    pub admin_api_path: String,
    /// Skip TLS certificate verification.
    pub insecure_trust_all_tls: bool,
    /// Send `X-BypassExternalValidation: true` on every request.
    pub x_bypass_external_validation_header: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("https_host", &self.https_host.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("admin_api_path", &self.admin_api_path)
            .field("insecure_trust_all_tls", &self.insecure_trust_all_tls)
            .field(
                "x_bypass_external_validation_header",
                &self.x_bypass_external_validation_header,
            )
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the configuration from the provider block and the process environment.
    pub fn from_value(config: &Value) -> Result<Self, Vec<Diagnostic>> {
        Self::from_value_with_env(config, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration with a custom environment lookup.
    pub fn from_value_with_env<F>(config: &Value, env: F) -> Result<Self, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model: ProviderConfigModel = if config.is_null() {
            ProviderConfigModel::default()
        } else {
            serde_json::from_value(config.clone()).map_err(|err| {
                vec![Diagnostic::error("Unable to read provider configuration")
                    .with_detail(err.to_string())]
            })?
        };

        let mut diagnostics = Vec::new();

        let https_host = resolve_string(model.https_host, &env, ENV_HTTPS_HOST);
        let username = resolve_string(model.username, &env, ENV_USERNAME);
        let password = resolve_string(model.password, &env, ENV_PASSWORD);

        for (name, value, var) in [
            ("https_host", &https_host, ENV_HTTPS_HOST),
            ("username", &username, ENV_USERNAME),
            ("password", &password, ENV_PASSWORD),
        ] {
            if value.is_none() {
                diagnostics.push(
                    Diagnostic::error(format!("Unable to find {}", name))
                        .with_detail(format!(
                            "{} cannot be an empty string. Either set it in the configuration or \
                             use the {} environment variable.",
                            name, var
                        ))
                        .with_attribute(name),
                );
            }
        }

        let https_host = https_host.and_then(|host| match parse_host(&host) {
            Ok(url) => Some(url),
            Err(detail) => {
                diagnostics.push(
                    Diagnostic::error("Invalid https_host")
                        .with_detail(detail)
                        .with_attribute("https_host"),
                );
                None
            },
        });

        let admin_api_path = resolve_string(model.admin_api_path, &env, ENV_ADMIN_API_PATH)
            .unwrap_or_else(|| DEFAULT_ADMIN_API_PATH.to_string());

        let insecure_trust_all_tls = resolve_bool(
            model.insecure_trust_all_tls,
            &env,
            ENV_INSECURE_TRUST_ALL_TLS,
            "insecure_trust_all_tls",
            &mut diagnostics,
        );
        let x_bypass_external_validation_header = resolve_bool(
            model.x_bypass_external_validation_header,
            &env,
            ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER,
            "x_bypass_external_validation_header",
            &mut diagnostics,
        );

        match (https_host, username, password) {
            (Some(https_host), Some(username), Some(password)) if diagnostics.is_empty() => {
                Ok(Self {
                    https_host,
                    username,
                    password,
                    admin_api_path,
                    insecure_trust_all_tls,
                    x_bypass_external_validation_header,
                })
            },
            _ => Err(diagnostics),
        }
    }

    /// Full base URL of the admin API, e.g. `https://localhost:9999/pf-admin-api/v1`.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let path = format!("/{}", self.admin_api_path.trim_matches('/'));
        self.https_host.join(&path)
    }
}

fn resolve_string<F>(value: Option<String>, env: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    value
        .filter(|v| !v.is_empty())
        .or_else(|| env(var).filter(|v| !v.is_empty()))
}

fn resolve_bool<F>(
    value: Option<bool>,
    env: &F,
    var: &str,
    name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = value {
        return value;
    }
    match env(var).filter(|v| !v.is_empty()) {
        None => false,
        Some(raw) => raw.parse::<bool>().unwrap_or_else(|_| {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for {}", name))
                    .with_detail(format!(
                        "Failed to parse value {:?} of {} as a boolean",
                        raw, var
                    ))
                    .with_attribute(name),
            );
            false
        }),
    }
}

fn parse_host(host: &str) -> Result<Url, String> {
    let url = Url::parse(host).map_err(|err| format!("{}: {}", host, err))?;
    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(format!(
            "{}: unsupported scheme {:?}, expected https",
            host, other
        )),
    }
}

/// Schema of the provider block.
pub fn provider_schema() -> Schema {
    Schema::v0()
        .with_description("Configuration for the PingFederate administrative API connection.")
        .with_attribute(
            "https_host",
            Attribute::optional_string().with_description(format!(
                "URI for PingFederate HTTPS port. Default value can be set with the `{}` \
                 environment variable.",
                ENV_HTTPS_HOST
            )),
        )
        .with_attribute(
            "username",
            Attribute::optional_string().with_description(format!(
                "Username for PingFederate Admin user. Default value can be set with the `{}` \
                 environment variable.",
                ENV_USERNAME
            )),
        )
        .with_attribute(
            "password",
            Attribute::optional_string().sensitive().with_description(format!(
                "Password for PingFederate Admin user. Default value can be set with the `{}` \
                 environment variable.",
                ENV_PASSWORD
            )),
        )
        .with_attribute(
            "admin_api_path",
            Attribute::optional_string().with_description(format!(
                "Path for PingFederate Admin API. Default value can be set with the `{}` \
                 environment variable. If no value is supplied, the value used will be `{}`.",
                ENV_ADMIN_API_PATH, DEFAULT_ADMIN_API_PATH
            )),
        )
        .with_attribute(
            "insecure_trust_all_tls",
            Attribute::optional_bool().with_description(format!(
                "Set to true to trust any certificate when connecting to the PingFederate server. \
                 This is insecure and should not be enabled outside of testing. Default value can \
                 be set with the `{}` environment variable.",
                ENV_INSECURE_TRUST_ALL_TLS
            )),
        )
        .with_attribute(
            "x_bypass_external_validation_header",
            Attribute::optional_bool().with_description(format!(
                "Header value in request for PingFederate. The connection test will be bypassed \
                 when set to true. Default value can be set with the `{}` environment variable.",
                ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER
            )),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_values_take_precedence() {
        let config = ProviderConfig::from_value_with_env(
            &json!({
                "https_host": "https://pf.example.com:9999",
                "username": "administrator",
                "password": "2FederateM0re",
                "insecure_trust_all_tls": true
            }),
            env_from(&[(ENV_USERNAME, "someone-else")]),
        )
        .unwrap();

        assert_eq!(config.username, "administrator");
        assert_eq!(config.admin_api_path, DEFAULT_ADMIN_API_PATH);
        assert!(config.insecure_trust_all_tls);
        assert!(!config.x_bypass_external_validation_header);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://pf.example.com:9999/pf-admin-api/v1"
        );
    }

    #[test]
    fn test_env_fallback() {
        let config = ProviderConfig::from_value_with_env(
            &Value::Null,
            env_from(&[
                (ENV_HTTPS_HOST, "https://localhost:9999"),
                (ENV_USERNAME, "administrator"),
                (ENV_PASSWORD, "secret"),
                (ENV_ADMIN_API_PATH, "/custom/api/"),
                (ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER, "true"),
            ]),
        )
        .unwrap();

        assert!(config.x_bypass_external_validation_header);
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://localhost:9999/custom/api"
        );
    }

    #[test]
    fn test_missing_values_report_each_attribute() {
        let diagnostics =
            ProviderConfig::from_value_with_env(&json!({"username": "admin"}), env_from(&[]))
                .unwrap_err();

        let summaries: Vec<_> = diagnostics.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(
            summaries,
            vec!["Unable to find https_host", "Unable to find password"]
        );
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .is_some_and(|d| d.contains(ENV_HTTPS_HOST)));
    }

    #[test]
    fn test_invalid_host_and_bool() {
        let diagnostics = ProviderConfig::from_value_with_env(
            &json!({"https_host": "ftp://pf", "username": "u", "password": "p"}),
            env_from(&[(ENV_INSECURE_TRUST_ALL_TLS, "maybe")]),
        )
        .unwrap_err();

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].summary, "Invalid https_host");
        assert_eq!(diagnostics[1].summary, "Invalid value for insecure_trust_all_tls");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig::from_value_with_env(
            &json!({"https_host": "https://pf", "username": "u", "password": "hunter2"}),
            env_from(&[]),
        )
        .unwrap();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[test]
    fn test_provider_schema_marks_password_sensitive() {
        let schema = provider_schema();
        assert!(schema.block.attributes["password"].flags.sensitive);
        assert_eq!(schema.block.attributes.len(), 6);
    }
}
