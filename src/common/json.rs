//! Schema-aware conversion between state trees and API JSON.
//!
//! State uses snake_case attribute names, the API uses camelCase. Keys of
//! map-typed attributes and map blocks are user data and pass through
//! unchanged. Only names declared in the schema block are converted; `null`
//! values are dropped from API bodies.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{Block, BlockNestingMode, NestedBlock};

/// `attribute_contract_fulfillment` -> `attributeContractFulfillment`.
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a state object into an API JSON object.
pub fn to_api_value(block: &Block, state: &Value) -> Value {
    let Some(state) = state.as_object() else {
        return Value::Null;
    };
    let mut out = Map::new();

    for name in block.attributes.keys() {
        if let Some(value) = state.get(name).filter(|v| !v.is_null()) {
            out.insert(snake_to_camel(name), value.clone());
        }
    }
    for (name, nested) in &block.blocks {
        if let Some(value) = state.get(name).filter(|v| !v.is_null()) {
            out.insert(snake_to_camel(name), nested_to_api(nested, value));
        }
    }

    Value::Object(out)
}

fn nested_to_api(nested: &NestedBlock, value: &Value) -> Value {
    match (nested.nesting_mode, value) {
        (BlockNestingMode::Single, _) => to_api_value(&nested.block, value),
        (BlockNestingMode::List | BlockNestingMode::Set, Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|item| to_api_value(&nested.block, item))
                .collect(),
        ),
        (BlockNestingMode::Map, Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), to_api_value(&nested.block, item)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Convert an API JSON object into a state object holding every name in the block.
pub fn to_state_value(block: &Block, api: &Value) -> Value {
    let Some(api) = api.as_object() else {
        return Value::Null;
    };
    let mut out = Map::new();

    for (name, attr) in &block.attributes {
        let value = match api.get(&snake_to_camel(name)) {
            Some(value) if !value.is_null() => value.clone(),
            _ => empty_default(attr.default.as_ref()),
        };
        out.insert(name.clone(), value);
    }
    for (name, nested) in &block.blocks {
        let value = match api.get(&snake_to_camel(name)) {
            Some(value) if !value.is_null() => nested_to_state(nested, value),
            _ => empty_default(nested.default.as_ref()),
        };
        out.insert(name.clone(), value);
    }

    Value::Object(out)
}

fn nested_to_state(nested: &NestedBlock, value: &Value) -> Value {
    match (nested.nesting_mode, value) {
        (BlockNestingMode::Single, _) => to_state_value(&nested.block, value),
        (BlockNestingMode::List | BlockNestingMode::Set, Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|item| to_state_value(&nested.block, item))
                .collect(),
        ),
        (BlockNestingMode::Map, Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(key, item)| (key.clone(), to_state_value(&nested.block, item)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

// An omitted collection reads back as its empty default so plans stay stable.
fn empty_default(default: Option<&Value>) -> Value {
    match default {
        Some(Value::Array(items)) if items.is_empty() => Value::Array(Vec::new()),
        Some(Value::Object(entries)) if entries.is_empty() => Value::Object(Map::new()),
        _ => Value::Null,
    }
}

/// Replace `null` attributes of a state object with their schema defaults.
pub fn fill_defaults(block: &Block, state: &mut Value) {
    let Some(object) = state.as_object_mut() else {
        return;
    };
    for (name, attr) in &block.attributes {
        if let Some(default) = &attr.default {
            let slot = object.entry(name.clone()).or_insert(Value::Null);
            if slot.is_null() {
                *slot = default.clone();
            }
        }
    }
}

/// Decode a state object into an API model.
pub fn from_state<T: DeserializeOwned>(
    block: &Block,
    state: &Value,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(to_api_value(block, state))
}

/// Encode an API model as a state object.
pub fn to_state<T: Serialize>(block: &Block, model: &T) -> Result<Value, serde_json::Error> {
    Ok(to_state_value(block, &serde_json::to_value(model)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{ClientOidcPolicy, IdpAdapterAttributeContract};
    use crate::schema::{Attribute, AttributeFlags, AttributeType};
    use serde_json::json;

    fn field_block() -> Block {
        Block::new()
            .with_attribute("type", Attribute::required_string())
            .with_attribute("id", Attribute::required_string())
            .with_attribute("registration_page_field", Attribute::optional_bool())
            .with_attribute(
                "attributes",
                Attribute::new(
                    AttributeType::map(AttributeType::Bool),
                    AttributeFlags::optional_computed(),
                ),
            )
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("ping_one_ldap_gateway_id"), "pingOneLdapGatewayId");
        assert_eq!(snake_to_camel("id"), "id");
        assert_eq!(
            snake_to_camel("attribute_contract_fulfillment"),
            "attributeContractFulfillment"
        );
    }

    #[test]
    fn test_to_api_keeps_map_keys() {
        let api = to_api_value(
            &field_block(),
            &json!({
                "type": "TEXT",
                "id": "first_name",
                "registration_page_field": null,
                "attributes": {"Read-Only": false, "Unique ID Field": true}
            }),
        );
        assert_eq!(
            api,
            json!({
                "type": "TEXT",
                "id": "first_name",
                "attributes": {"Read-Only": false, "Unique ID Field": true}
            })
        );
    }

    #[test]
    fn test_to_state_fills_missing_names() {
        let state = to_state_value(&field_block(), &json!({"type": "EMAIL", "id": "mail"}));
        assert_eq!(
            state,
            json!({
                "type": "EMAIL",
                "id": "mail",
                "registration_page_field": null,
                "attributes": null
            })
        );
    }

    #[test]
    fn test_nested_blocks_round_trip_through_models() {
        let block = Block::new()
            .with_block(
                "core_attributes",
                crate::schema::NestedBlock::set(
                    Block::new()
                        .with_attribute("name", Attribute::required_string())
                        .with_attribute("pseudonym", Attribute::optional_computed_bool())
                        .with_attribute("masked", Attribute::optional_computed_bool()),
                ),
            )
            .with_attribute("mask_ognl_values", Attribute::optional_computed_bool());

        let contract: IdpAdapterAttributeContract = from_state(
            &block,
            &json!({
                "core_attributes": [{"name": "username", "pseudonym": true, "masked": null}],
                "mask_ognl_values": false
            }),
        )
        .unwrap();
        assert_eq!(contract.core_attributes[0].name, "username");
        assert_eq!(contract.core_attributes[0].masked, None);
        assert_eq!(contract.mask_ognl_values, Some(false));

        let state = to_state(&block, &contract).unwrap();
        assert_eq!(state["core_attributes"][0]["pseudonym"], json!(true));
        assert!(state["core_attributes"][0]["masked"].is_null());
    }

    #[test]
    fn test_empty_default_for_missing_collections() {
        let block = Block::new().with_attribute(
            "logout_uris",
            Attribute::string_set(AttributeFlags::optional()).with_default(json!([])),
        );
        let state = to_state(&block, &ClientOidcPolicy::default()).unwrap();
        assert_eq!(state["logout_uris"], json!([]));
    }

    #[test]
    fn test_fill_defaults() {
        let block = Block::new()
            .with_attribute(
                "enabled",
                Attribute::optional_computed_bool().with_default(json!(true)),
            )
            .with_attribute("name", Attribute::optional_string());
        let mut state = json!({"name": null});
        fill_defaults(&block, &mut state);
        assert_eq!(state, json!({"enabled": true, "name": null}));

        let mut configured = json!({"enabled": false});
        fill_defaults(&block, &mut configured);
        assert_eq!(configured["enabled"], false);
    }
}
