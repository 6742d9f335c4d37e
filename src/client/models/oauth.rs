use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ResourceLink;

/// An exclusive scope under `/oauth/authServerSettings/scopes/exclusiveScopes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeEntry {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic: Option<bool>,
}

/// `/oauth/clients/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub grant_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_access_token_manager_ref: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_to_default_access_token_manager: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_using_all_eligible_atms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_rolling: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_expiration_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_expiration_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_expiration_time_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_idle_timeout_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_idle_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_idle_timeout_time_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_reuse_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_grant_reuse_grant_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_rolling_interval_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_rolling_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_rolling_grace_period_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_rolling_grace_period: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_approval_page: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrict_scopes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_response_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_detail_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_pushed_authorization_requests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_signed_requests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_object_signing_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_jwt_secured_authorization_response_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secured_authorization_response_mode_signing_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secured_authorization_response_mode_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwt_secured_authorization_response_mode_content_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_introspection_signing_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_introspection_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_introspection_content_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_authentication_api_init: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_proof_key_for_code_exchange: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_flow_setting_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_authorization_url_override: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_authorization_timeout_override: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_polling_interval_override: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bypass_activation_code_confirmation_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_delivery_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_notification_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_polling_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_require_signed_requests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_request_object_signing_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciba_user_code_supported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_policy_ref: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_exchange_processor_policy_ref: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_retention_period_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_retention_period: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret_changed_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_auth: Option<ClientAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oidc_policy: Option<ClientOidcPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_settings: Option<JwksSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_parameters: Option<BTreeMap<String, ParameterValues>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
}

/// Client authentication. The API never returns `secret`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAuth {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_secrets: Option<Vec<SecondarySecret>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_issuer_dn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert_subject_dn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_replay_prevention: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint_auth_signing_algorithm: Option<String>,
}

/// A retired client secret kept valid until `expiry_time`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondarySecret {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_secret: Option<String>,
    pub expiry_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOidcPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token_signing_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token_content_encryption_algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_group: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_access_session_revocation_api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_access_session_session_management_api: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_access_logout_capable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logout_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pairwise_identifier_user_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_identifier_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwksSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterValues {
    #[serde(default)]
    pub values: Vec<String>,
}
