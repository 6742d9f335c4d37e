use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ResourceLink;

/// `/localIdentity/identityProfiles/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub apc_id: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_sources: Option<Vec<LocalIdentityAuthSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_source_update_policy: Option<LocalIdentityAuthSourceUpdatePolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_config: Option<RegistrationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_config: Option<ProfileConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_config: Option<FieldConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_config: Option<EmailVerificationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_store_config: Option<LdapDataStoreConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_enabled: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityAuthSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityAuthSourceUpdatePolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_attributes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain_attributes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_attributes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_interval: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captcha_provider_ref: Option<ResourceLink>,
    pub template_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_authn_session_after_registration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_is_my_device_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_workflow: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_workflow: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_identity_enabled: Option<bool>,
    pub template_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<LocalIdentityField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_space_from_unique_field: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalIdentityField {
    #[serde(rename = "type")]
    pub field_type: String,
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_page_field: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_page_field: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_email_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_sent_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_success_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_error_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_retry_attempts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_otp_character_set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otp_time_to_live: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verification_otp_template_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otl_time_to_live: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_for_email_to_verify: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_storing_verification_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_publisher_ref: Option<ResourceLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_verified_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_verified_email_template_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapDataStoreConfig {
    #[serde(rename = "type")]
    pub store_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,
    pub data_store_ref: ResourceLink,
    #[serde(default)]
    pub data_store_mapping: BTreeMap<String, DataStoreAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_object_classes: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStoreAttribute {
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, String>>,
}
