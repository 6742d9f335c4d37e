use serde::{Deserialize, Serialize};

use super::ResourceLink;

/// `/virtualHostNames`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHostNames {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_host_names: Option<Vec<String>>,
}

/// `/protocolMetadata/lifetimeSettings`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolMetadataLifetimeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_delay: Option<i64>,
}

/// `/authenticationApi/settings`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_api_descriptions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_access_to_redirectless_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_request_context: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_application_ref: Option<ResourceLink>,
}

/// `/serverSettings/wsTrustStsSettings`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsTrustStsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_authn_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_authn_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_by_subject_dn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_by_issuer_cert: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_dns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UsernamePasswordCredentials>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer_certs: Option<Vec<ResourceLink>>,
}

/// Basic authentication credentials. The API never returns `password`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernamePasswordCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_password: Option<String>,
}
