use serde::{Deserialize, Serialize};

use super::{PluginConfiguration, ResourceLink};

/// `/notificationPublishers/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPublisher {
    pub id: String,
    pub name: String,
    pub plugin_descriptor_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<ResourceLink>,
    pub configuration: PluginConfiguration,
}

/// `/oauth/clientRegistrationPolicies/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRegistrationPolicy {
    pub id: String,
    pub name: String,
    pub plugin_descriptor_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<ResourceLink>,
    pub configuration: PluginConfiguration,
}
