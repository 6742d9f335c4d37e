use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    AttributeFulfillmentValue, AttributeSource, IssuanceCriteria, PluginConfiguration,
    ResourceLink,
};

/// `/idp/adapters/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpAdapter {
    pub id: String,
    pub name: String,
    pub plugin_descriptor_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<ResourceLink>,
    pub configuration: PluginConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authn_ctx_class_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_mapping: Option<IdpAdapterContractMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_contract: Option<IdpAdapterAttributeContract>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpAdapterAttributeContract {
    #[serde(default)]
    pub core_attributes: Vec<IdpAdapterAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_attributes: Option<Vec<IdpAdapterAttribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_user_key_attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask_ognl_values: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpAdapterAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudonym: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdpAdapterContractMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_sources: Option<Vec<AttributeSource>>,
    #[serde(default)]
    pub attribute_contract_fulfillment: BTreeMap<String, AttributeFulfillmentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_criteria: Option<IssuanceCriteria>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}
