use serde::{Deserialize, Serialize};

use super::{PluginConfiguration, ResourceLink};

/// `/dataStores/{id}`, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DataStore {
    #[serde(rename = "CUSTOM")]
    Custom(CustomDataStore),
    #[serde(rename = "PING_ONE_LDAP_GATEWAY")]
    PingOneLdapGateway(PingOneLdapGatewayDataStore),
}

impl DataStore {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Custom(store) => store.id.as_deref(),
            Self::PingOneLdapGateway(store) => store.id.as_deref(),
        }
    }

    pub fn mask_attribute_values(&self) -> Option<bool> {
        match self {
            Self::Custom(store) => store.mask_attribute_values,
            Self::PingOneLdapGateway(store) => store.mask_attribute_values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDataStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_attribute_values: Option<bool>,
    pub name: String,
    pub plugin_descriptor_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<ResourceLink>,
    pub configuration: PluginConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingOneLdapGatewayDataStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_attribute_values: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub ldap_type: String,
    pub ping_one_connection_ref: ResourceLink,
    pub ping_one_environment_id: String,
    pub ping_one_ldap_gateway_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_ssl: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_attributes: Option<Vec<String>>,
}
