use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference to another configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ResourceLink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: None,
        }
    }
}

/// Plugin instance configuration made of loose fields and tables of rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfiguration {
    #[serde(default)]
    pub tables: Vec<ConfigTable>,
    #[serde(default)]
    pub fields: Vec<ConfigField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigTable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<ConfigRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_row: Option<bool>,
    #[serde(default)]
    pub fields: Vec<ConfigField>,
}

/// A single configuration field. Encrypted fields come back without `value`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

/// Where an attribute value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceTypeIdKey {
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeFulfillmentValue {
    pub source: SourceTypeIdKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_criteria: Option<Vec<ConditionalIssuanceCriteriaEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression_criteria: Option<Vec<ExpressionIssuanceCriteriaEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalIssuanceCriteriaEntry {
    pub source: SourceTypeIdKey,
    pub attribute_name: String,
    pub condition: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionIssuanceCriteriaEntry {
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result: Option<String>,
}

/// An attribute source, discriminated by the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttributeSource {
    #[serde(rename = "CUSTOM")]
    Custom(CustomAttributeSource),
    #[serde(rename = "JDBC")]
    Jdbc(JdbcAttributeSource),
    #[serde(rename = "LDAP")]
    Ldap(LdapAttributeSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomAttributeSource {
    pub data_store_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<BTreeMap<String, AttributeFulfillmentValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_fields: Option<Vec<FieldEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JdbcAttributeSource {
    pub data_store_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<BTreeMap<String, AttributeFulfillmentValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub table: String,
    pub filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LdapAttributeSource {
    pub data_store_ref: ResourceLink,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_contract_fulfillment: Option<BTreeMap<String, AttributeFulfillmentValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dn: Option<String>,
    pub search_scope: String,
    pub search_filter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_attribute_settings: Option<BTreeMap<String, BinaryLdapAttributeSettings>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_of_nested_group: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryLdapAttributeSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_encoding: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_source_is_tagged_by_type() {
        let source: AttributeSource = serde_json::from_value(json!({
            "type": "JDBC",
            "dataStoreRef": {"id": "ProvisionerDS"},
            "id": "jdbc",
            "table": "users",
            "filter": "uid = '${username}'",
            "columnNames": ["GRANTEE"]
        }))
        .unwrap();

        match &source {
            AttributeSource::Jdbc(jdbc) => {
                assert_eq!(jdbc.data_store_ref.id, "ProvisionerDS");
                assert_eq!(jdbc.column_names.as_deref(), Some(&["GRANTEE".to_string()][..]));
            },
            other => panic!("unexpected source: {other:?}"),
        }

        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value["type"], "JDBC");
        assert!(value.get("schema").is_none());
    }

    #[test]
    fn test_config_field_omits_unset_values() {
        let field = ConfigField {
            name: "Password".to_string(),
            encrypted_value: Some("OBF:JWE:abc".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({"name": "Password", "encryptedValue": "OBF:JWE:abc"})
        );
    }
}
