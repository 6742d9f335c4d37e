//! Data stores an attribute mapping looks attributes up from.
//!
//! In state each list element carries exactly one of `custom_attribute_source`,
//! `jdbc_attribute_source` or `ldap_attribute_source`. On the wire the element
//! is a single object discriminated by `type`.

use serde_json::{Map, Value};

use super::{json, resource_link, source_type_id_key, values::is_defined};
use crate::client::models::AttributeSource;
use crate::schema::{Attribute, AttributeFlags, Block, Diagnostic, NestedBlock, Validator};

const CUSTOM: &str = "custom_attribute_source";
const JDBC: &str = "jdbc_attribute_source";
const LDAP: &str = "ldap_attribute_source";

/// Map of attribute name to `{source, value}`.
pub fn attribute_contract_fulfillment() -> NestedBlock {
    NestedBlock::map(
        Block::new()
            .with_block("source", source_type_id_key::source())
            .with_attribute(
                "value",
                Attribute::required_string().with_description("The value for this attribute."),
            ),
    )
    .with_description("A list of mappings from attribute names to their fulfillment values.")
}

fn common_block() -> Block {
    Block::new()
        .with_block(
            "data_store_ref",
            resource_link::required("Reference to the associated data store."),
        )
        .with_attribute(
            "id",
            Attribute::optional_string()
                .with_description(
                    "The ID that defines this attribute source. Only alphanumeric characters \
                     allowed.",
                ),
        )
        .with_attribute(
            "description",
            Attribute::optional_string()
                .with_description("The description of this attribute source."),
        )
        .with_block("attribute_contract_fulfillment", attribute_contract_fulfillment())
}

fn custom_block() -> Block {
    common_block().with_block(
        "filter_fields",
        NestedBlock::list(
            Block::new()
                .with_attribute(
                    "name",
                    Attribute::required_string().with_description("The name of this field."),
                )
                .with_attribute(
                    "value",
                    Attribute::optional_string().with_description("The value of this field."),
                ),
        )
        .with_description(
            "The list of fields that can be used to filter a request to the custom data store.",
        ),
    )
}

fn jdbc_block() -> Block {
    common_block()
        .with_attribute(
            "schema",
            Attribute::optional_string()
                .with_description(
                    "Lists the table structure that stores information within a database.",
                ),
        )
        .with_attribute(
            "table",
            Attribute::required_string().with_description("The name of the database table."),
        )
        .with_attribute(
            "filter",
            Attribute::required_string()
                .with_description(
                    "The JDBC WHERE clause used to query your data store to locate a user record.",
                ),
        )
        .with_attribute(
            "column_names",
            Attribute::string_set(AttributeFlags::optional())
                .with_description("A list of column names used to construct the SQL query."),
        )
}

fn ldap_block() -> Block {
    common_block()
        .with_attribute(
            "base_dn",
            Attribute::optional_string().with_description("The base DN to search from."),
        )
        .with_attribute(
            "search_scope",
            Attribute::required_string()
                .with_description("Determines the node depth of the query.")
                .with_validator(Validator::one_of(&["OBJECT", "ONE_LEVEL", "SUBTREE"])),
        )
        .with_attribute(
            "search_filter",
            Attribute::required_string()
                .with_description(
                    "The LDAP filter that will be used to lookup the objects from the directory.",
                ),
        )
        .with_attribute(
            "search_attributes",
            Attribute::string_set(AttributeFlags::optional())
                .with_description(
                    "A list of LDAP attributes returned from search and available for mapping.",
                ),
        )
        .with_attribute(
            "member_of_nested_group",
            Attribute::optional_bool()
                .with_description(
                    "Return transitive group memberships for the 'memberOf' attribute.",
                ),
        )
        .with_block(
            "binary_attribute_settings",
            NestedBlock::map(Block::new().with_attribute(
                "binary_encoding",
                Attribute::optional_string()
                    .with_validator(Validator::one_of(&["BASE64", "HEX", "SID"])),
            ))
            .with_description(
                "The advanced settings for binary LDAP attributes, keyed by attribute name.",
            ),
        )
}

fn variants() -> [(&'static str, &'static str, Block); 3] {
    [
        (CUSTOM, "CUSTOM", custom_block()),
        (JDBC, "JDBC", jdbc_block()),
        (LDAP, "LDAP", ldap_block()),
    ]
}

/// The `attribute_sources` list.
pub fn nested_block() -> NestedBlock {
    NestedBlock::list(
        Block::new()
            .with_block(
                CUSTOM,
                NestedBlock::single(custom_block()).with_description(
                    "The configured settings used to look up attributes from a custom data store.",
                ),
            )
            .with_block(
                JDBC,
                NestedBlock::single(jdbc_block()).with_description(
                    "The configured settings used to look up attributes from a JDBC data store.",
                ),
            )
            .with_block(
                LDAP,
                NestedBlock::single(ldap_block()).with_description(
                    "The configured settings used to look up attributes from a LDAP data store.",
                ),
            ),
    )
    .with_description("A list of configured data stores to look up attributes from.")
}

/// Every element must configure one of the source kinds.
pub fn validate(sources: Option<&Value>, path: &str) -> Vec<Diagnostic> {
    let Some(Value::Array(items)) = sources else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| ![CUSTOM, JDBC, LDAP].iter().any(|kind| is_defined(item.get(*kind))))
        .map(|(i, _)| {
            Diagnostic::error("Missing Attribute Configuration")
                .with_detail(format!(
                    "At least one of {}, {} or {} must be configured.",
                    CUSTOM, JDBC, LDAP
                ))
                .with_attribute(format!("{}.{}", path, i))
        })
        .collect()
}

/// Request structs for the sources in state. `None` when the list is unset.
pub fn client_struct(
    sources: Option<&Value>,
) -> Result<Option<Vec<AttributeSource>>, serde_json::Error> {
    let Some(Value::Array(items)) = sources else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        for (name, type_name, block) in variants() {
            let Some(source) = item.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let mut body = json::to_api_value(&block, source);
            if let Value::Object(fields) = &mut body {
                fields.insert("type".to_string(), Value::String(type_name.to_string()));
            }
            out.push(serde_json::from_value(body)?);
            break;
        }
    }
    Ok(Some(out))
}

/// State value for sources returned by the API.
pub fn to_state(sources: Option<&[AttributeSource]>) -> Result<Value, serde_json::Error> {
    let Some(sources) = sources else {
        return Ok(Value::Null);
    };
    let mut out = Vec::with_capacity(sources.len());
    for source in sources {
        let kind = match source {
            AttributeSource::Custom(_) => CUSTOM,
            AttributeSource::Jdbc(_) => JDBC,
            AttributeSource::Ldap(_) => LDAP,
        };
        let body = serde_json::to_value(source)?;
        let mut element = Map::new();
        for (name, _, block) in variants() {
            let value = if name == kind {
                json::to_state_value(&block, &body)
            } else {
                Value::Null
            };
            element.insert(name.to_string(), value);
        }
        out.push(Value::Object(element));
    }
    Ok(Value::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jdbc_state() -> Value {
        json!({
            "custom_attribute_source": null,
            "jdbc_attribute_source": {
                "data_store_ref": {"id": "ProvisionerDS", "location": null},
                "id": "jdbcguy",
                "description": "JDBC",
                "schema": "INFORMATION_SCHEMA",
                "table": "ADMINISTRABLE_ROLE_AUTHORIZATIONS",
                "filter": "CONDITION",
                "column_names": ["GRANTEE"],
                "attribute_contract_fulfillment": null
            },
            "ldap_attribute_source": null
        })
    }

    #[test]
    fn test_client_struct_tags_type() {
        let sources = client_struct(Some(&json!([jdbc_state()]))).unwrap().unwrap();
        assert_eq!(sources.len(), 1);
        match &sources[0] {
            AttributeSource::Jdbc(jdbc) => {
                assert_eq!(jdbc.table, "ADMINISTRABLE_ROLE_AUTHORIZATIONS");
                assert_eq!(jdbc.data_store_ref.id, "ProvisionerDS");
                assert_eq!(jdbc.attribute_contract_fulfillment, None);
            },
            other => panic!("unexpected source: {other:?}"),
        }
        assert_eq!(client_struct(None).unwrap(), None);
    }

    #[test]
    fn test_to_state_fills_one_kind() {
        let response: Vec<AttributeSource> = serde_json::from_value(json!([{
            "type": "LDAP",
            "dataStoreRef": {"id": "LDAP-1", "location": "https://localhost/dataStores/LDAP-1"},
            "id": "ldap",
            "searchScope": "SUBTREE",
            "searchFilter": "(uid=${username})",
            "binaryAttributeSettings": {"objectGUID": {"binaryEncoding": "BASE64"}},
            "attributeContractFulfillment": {
                "mail": {"source": {"type": "LDAP_DATA_STORE", "id": "ldap"}, "value": "mail"}
            }
        }]))
        .unwrap();

        let state = to_state(Some(&response)).unwrap();
        let element = &state[0];
        assert!(element[CUSTOM].is_null());
        assert!(element[JDBC].is_null());

        let ldap = &element[LDAP];
        assert_eq!(ldap["search_scope"], "SUBTREE");
        assert_eq!(ldap["base_dn"], Value::Null);
        assert_eq!(ldap["binary_attribute_settings"]["objectGUID"]["binary_encoding"], "BASE64");
        assert_eq!(
            ldap["attribute_contract_fulfillment"]["mail"]["source"]["type"],
            "LDAP_DATA_STORE"
        );
        assert_eq!(ldap["data_store_ref"]["location"], "https://localhost/dataStores/LDAP-1");
    }

    #[test]
    fn test_validate_requires_a_kind() {
        let sources = json!([jdbc_state(), {"custom_attribute_source": null}]);
        let diagnostics = validate(Some(&sources), "attribute_mapping.attribute_sources");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("attribute_mapping.attribute_sources.1")
        );
        assert!(validate(None, "attribute_sources").is_empty());
    }
}
