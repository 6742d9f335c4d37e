//! `pingfederate_data_store`.
//!
//! A data store is one of several variants, each configured in its own nested
//! block. Custom plugin stores and PingOne LDAP gateway stores are supported.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::{CustomDataStore, DataStore, PingOneLdapGatewayDataStore};
use crate::client::{http_error, PingFederateClient};
use crate::common::values::is_defined;
use crate::common::{id, plugin_configuration, resource_link, values};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, request_build_error, required_str, Resource};
use crate::schema::{Attribute, AttributeFlags, Block, Diagnostic, NestedBlock, Schema, Validator};
use crate::types::{PlanResult, ReadResult};

const PATH: &str = "dataStores";
const CUSTOM: &str = "custom_data_store";
const GATEWAY: &str = "ping_one_ldap_gateway_data_store";

const LDAP_TYPES: &[&str] = &[
    "ACTIVE_DIRECTORY",
    "ORACLE_DIRECTORY_SERVER",
    "ORACLE_UNIFIED_DIRECTORY",
    "UNBOUNDID_DS",
    "PING_DIRECTORY",
    "GENERIC",
];

/// A data store of any supported variant.
pub struct DataStoreResource;

fn store_type(value: &str) -> Attribute {
    Attribute::computed_string()
        .with_default(json!(value))
        .with_description("The data store type.")
}

fn custom_block() -> Block {
    Block::new()
        .with_attribute("type", store_type("CUSTOM"))
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description(
                    "The plugin instance name. The name can be modified once the instance is \
                     created.",
                ),
        )
        .with_block(
            "plugin_descriptor_ref",
            resource_link::required(
                "Reference to the plugin descriptor for this instance. The plugin descriptor \
                 cannot be modified once the instance is created.",
            ),
        )
        .with_block(
            "parent_ref",
            resource_link::optional(
                "The reference to this plugin's parent instance. The parent reference is only \
                 accepted if the plugin type supports parent instances.",
            ),
        )
        .with_block("configuration", plugin_configuration::nested_block())
}

fn gateway_block() -> Block {
    Block::new()
        .with_attribute("type", store_type("PING_ONE_LDAP_GATEWAY"))
        .with_attribute(
            "name",
            Attribute::optional_computed_string()
                .with_use_state_for_unknown()
                .with_description(
                    "The data store name with a unique value across all data sources. Omitting \
                     this attribute will set the value to a combination of the hostname(s) and the \
                     principal.",
                ),
        )
        .with_block(
            "ping_one_connection_ref",
            resource_link::required("Reference to the PingOne connection this gateway uses."),
        )
        .with_attribute(
            "ldap_type",
            Attribute::required_string()
                .with_description(
                    "A type that allows PingFederate to configure many provisioning settings \
                     automatically.",
                )
                .with_validator(Validator::one_of(LDAP_TYPES)),
        )
        .with_attribute(
            "ping_one_ldap_gateway_id",
            Attribute::required_string()
                .with_description("The ID of the PingOne LDAP Gateway this data store uses."),
        )
        .with_attribute(
            "ping_one_environment_id",
            Attribute::required_string()
                .with_description("The environment ID that the gateway belongs to."),
        )
        .with_attribute(
            "use_ssl",
            Attribute::optional_computed_bool()
                .with_default(json!(false))
                .with_description(
                    "Connects to the LDAP data store using secure SSL/TLS encryption (LDAPS). The \
                     default value is false.",
                ),
        )
        .with_attribute(
            "binary_attributes",
            Attribute::string_set(AttributeFlags::optional())
                .with_validator(Validator::SizeAtLeast { min: 1 })
                .with_description("A list of LDAP attributes to be handled as binary data."),
        )
}

fn request(plan: &Value) -> Result<DataStore, ProviderError> {
    let id = values::opt_string(plan, "data_store_id");
    let mask_attribute_values = values::get_bool(plan, "mask_attribute_values");
    let missing = |name: &str| ProviderError::InvalidRequest(format!("plan has no '{}'", name));

    if let Some(custom) = plan.get(CUSTOM).filter(|v| !v.is_null()) {
        let configuration = plugin_configuration::client_struct(
            custom.get("configuration").unwrap_or(&Value::Null),
        )
        .map_err(|err| request_build_error("DataStore", err))?;
        return Ok(DataStore::Custom(CustomDataStore {
            id,
            mask_attribute_values,
            name: required_str(custom, "name")?.to_string(),
            plugin_descriptor_ref: resource_link::client_struct(custom.get("plugin_descriptor_ref"))
                .ok_or_else(|| missing("plugin_descriptor_ref"))?,
            parent_ref: resource_link::client_struct(custom.get("parent_ref")),
            configuration,
        }));
    }

    let gateway = plan
        .get(GATEWAY)
        .filter(|v| !v.is_null())
        .ok_or_else(|| missing("custom_data_store or ping_one_ldap_gateway_data_store"))?;
    Ok(DataStore::PingOneLdapGateway(PingOneLdapGatewayDataStore {
        id,
        mask_attribute_values,
        name: values::opt_string(gateway, "name"),
        ldap_type: required_str(gateway, "ldap_type")?.to_string(),
        ping_one_connection_ref: resource_link::client_struct(
            gateway.get("ping_one_connection_ref"),
        )
        .ok_or_else(|| missing("ping_one_connection_ref"))?,
        ping_one_environment_id: required_str(gateway, "ping_one_environment_id")?.to_string(),
        ping_one_ldap_gateway_id: required_str(gateway, "ping_one_ldap_gateway_id")?.to_string(),
        use_ssl: values::get_bool(gateway, "use_ssl"),
        binary_attributes: values::string_set(gateway, "binary_attributes"),
    }))
}

fn custom_state(known: &Value, store: &CustomDataStore) -> Value {
    let plan_config = known
        .get(CUSTOM)
        .and_then(|custom| custom.get("configuration"))
        .unwrap_or(&Value::Null);
    json!({
        "type": "CUSTOM",
        "name": store.name,
        "plugin_descriptor_ref": resource_link::to_state(Some(&store.plugin_descriptor_ref)),
        "parent_ref": resource_link::to_state(store.parent_ref.as_ref()),
        "configuration": plugin_configuration::to_state(
            plan_config,
            &store.configuration,
            plan_config.is_null()
        ),
    })
}

fn gateway_state(store: &PingOneLdapGatewayDataStore) -> Value {
    let binary_attributes = match store.binary_attributes.as_deref() {
        Some(attrs) if !attrs.is_empty() => values::set_value(Some(attrs)),
        _ => Value::Null,
    };
    json!({
        "type": "PING_ONE_LDAP_GATEWAY",
        "name": store.name,
        "ping_one_connection_ref": resource_link::to_state(Some(&store.ping_one_connection_ref)),
        "ldap_type": store.ldap_type,
        "ping_one_ldap_gateway_id": store.ping_one_ldap_gateway_id,
        "ping_one_environment_id": store.ping_one_environment_id,
        "use_ssl": store.use_ssl.unwrap_or(false),
        "binary_attributes": binary_attributes,
    })
}

fn to_state(known: &Value, response: &DataStore) -> Value {
    let (custom, gateway) = match response {
        DataStore::Custom(store) => (custom_state(known, store), Value::Null),
        DataStore::PingOneLdapGateway(store) => (Value::Null, gateway_state(store)),
    };
    json!({
        "id": response.id(),
        "data_store_id": response.id(),
        "mask_attribute_values": response.mask_attribute_values().unwrap_or(false),
        CUSTOM: custom,
        GATEWAY: gateway,
    })
}

fn store_id(state: &Value) -> Result<&str, ProviderError> {
    required_str(state, "id").or_else(|_| required_str(state, "data_store_id"))
}

#[async_trait]
impl Resource for DataStoreResource {
    fn type_name(&self) -> &'static str {
        "data_store"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Manages a data store resource")
            .with_attribute("id", id::id_attribute())
            .with_attribute(
                "data_store_id",
                id::custom_id_attribute(
                    false,
                    "The persistent, unique ID for the data store. It can be any combination of \
                     [a-zA-Z0-9._-]. This property is system-assigned if not specified.",
                ),
            )
            .with_attribute(
                "mask_attribute_values",
                Attribute::optional_computed_bool()
                    .with_default(json!(false))
                    .with_description("Whether attribute values should be masked in the log."),
            )
            .with_block(
                CUSTOM,
                NestedBlock::single(custom_block()).with_description("A custom data store."),
            )
            .with_block(
                GATEWAY,
                NestedBlock::single(gateway_block())
                    .with_description("A PingOne LDAP Gateway data store."),
            )
    }

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let configured = [CUSTOM, GATEWAY]
            .iter()
            .filter(|name| is_defined(config.get(**name)))
            .count();
        if configured == 1 {
            return Vec::new();
        }
        vec![Diagnostic::error("Invalid Attribute Combination!").with_detail(format!(
            "Exactly one of {} or {} must be configured.",
            CUSTOM, GATEWAY
        ))]
    }

    fn modify_plan(&self, prior: Option<&Value>, _config: &Value, plan: &mut PlanResult) {
        let Some(prior_config) = prior
            .and_then(|prior| prior.get(CUSTOM))
            .and_then(|custom| custom.get("configuration"))
        else {
            return;
        };
        if let Some(plan_config) = plan
            .planned_state
            .get_mut(CUSTOM)
            .and_then(|custom| custom.get_mut("configuration"))
        {
            plugin_configuration::mark_computed_attrs_unknown_on_change(
                plan_config,
                Some(prior_config),
            );
        }
    }

    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let body = request(plan)?;
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: DataStore = client
            .post(&[PATH], &body)
            .await
            .map_err(|err| http_error("An error occurred while creating the DataStore", err))?;
        debug!("Add response: {:?}", response);
        Ok(to_state(plan, &response))
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let id = store_id(state)?;
        let summary = "An error occurred while looking for a DataStore";
        match client.get::<DataStore>(&[PATH, id]).await {
            Ok(response) => {
                debug!("Read response: {:?}", response);
                Ok(ReadResult::found(to_state(state, &response)))
            },
            Err(err) if err.is_not_found() => Ok(removed_on_not_found(summary, &err)),
            Err(err) => Err(http_error(summary, err)),
        }
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let id = store_id(prior)?;
        let body = request(plan)?;
        debug!("Update request: {}", serde_json::to_string(&body)?);
        match client.put::<_, DataStore>(&[PATH, id], &body).await {
            Ok(response) => Ok(to_state(plan, &response)),
            // Removed outside of the provider; the next read drops it from state.
            Err(err) if err.is_not_found() => {
                debug!(id, "Data store not found on update");
                Ok(plan.clone())
            },
            Err(err) => Err(http_error("An error occurred while updating DataStore", err)),
        }
    }

    async fn delete(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<(), ProviderError> {
        let id = store_id(state)?;
        match client.delete(&[PATH, id]).await {
            Err(err) if !err.is_not_found() => {
                Err(http_error("An error occurred while deleting a DataStore", err))
            },
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use crate::plan::plan_resource;
    use crate::validation::validate;
    use httpmock::prelude::*;

    fn gateway_config() -> Value {
        json!({
            "data_store_id": "pingOneLdapGatewayDataStore",
            "ping_one_ldap_gateway_data_store": {
                "ldap_type": "PING_DIRECTORY",
                "ping_one_connection_ref": {"id": "noeOvkyHSmDn7Sl5YrEQyp"},
                "ping_one_environment_id": "f5901536-2b60-4d4a-a987-3d56aadad46d",
                "ping_one_ldap_gateway_id": "3b7b5d9d-1820-4b13-9b1a-6b6a49d1b0a5"
            }
        })
    }

    #[test]
    fn test_exactly_one_variant() {
        let resource = DataStoreResource;
        assert!(resource.validate_config(&gateway_config()).is_empty());
        assert_eq!(
            resource.validate_config(&json!({"data_store_id": "x"}))[0].summary,
            "Invalid Attribute Combination!"
        );

        let mut both = gateway_config();
        both[CUSTOM] = json!({"name": "custom"});
        assert_eq!(resource.validate_config(&both).len(), 1);
    }

    #[test]
    fn test_gateway_schema_rules() {
        let schema = DataStoreResource.schema();
        let mut config = gateway_config();
        config[GATEWAY]["ldap_type"] = json!("OPENLDAP");
        config[GATEWAY]["binary_attributes"] = json!([]);
        let mut attributes: Vec<String> = validate(&schema, &config)
            .into_iter()
            .filter_map(|d| d.attribute)
            .collect();
        attributes.sort();
        assert_eq!(
            attributes,
            vec![
                "ping_one_ldap_gateway_data_store.binary_attributes",
                "ping_one_ldap_gateway_data_store.ldap_type",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_gateway_store() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/pf-admin-api/v1/dataStores").json_body(json!({
                    "type": "PING_ONE_LDAP_GATEWAY",
                    "id": "pingOneLdapGatewayDataStore",
                    "maskAttributeValues": false,
                    "ldapType": "PING_DIRECTORY",
                    "pingOneConnectionRef": {"id": "noeOvkyHSmDn7Sl5YrEQyp"},
                    "pingOneEnvironmentId": "f5901536-2b60-4d4a-a987-3d56aadad46d",
                    "pingOneLdapGatewayId": "3b7b5d9d-1820-4b13-9b1a-6b6a49d1b0a5",
                    "useSsl": false
                }));
                then.status(201).json_body(json!({
                    "type": "PING_ONE_LDAP_GATEWAY",
                    "id": "pingOneLdapGatewayDataStore",
                    "maskAttributeValues": false,
                    "name": "PING_DIRECTORY (pingone-gateway)",
                    "ldapType": "PING_DIRECTORY",
                    "pingOneConnectionRef": {
                        "id": "noeOvkyHSmDn7Sl5YrEQyp",
                        "location": "https://localhost:9999/pf-admin-api/v1/pingOneConnections/noeOvkyHSmDn7Sl5YrEQyp"
                    },
                    "pingOneEnvironmentId": "f5901536-2b60-4d4a-a987-3d56aadad46d",
                    "pingOneLdapGatewayId": "3b7b5d9d-1820-4b13-9b1a-6b6a49d1b0a5",
                    "useSsl": false,
                    "binaryAttributes": []
                }));
            })
            .await;

        let resource = DataStoreResource;
        let config = gateway_config();
        let planned = plan_resource(&resource.schema(), None, &config, &config).planned_state;
        let client = client_for(&server.base_url());
        let state = resource.create(&client, &planned).await.unwrap();
        mock.assert_async().await;

        assert_eq!(state["id"], "pingOneLdapGatewayDataStore");
        assert_eq!(state[CUSTOM], Value::Null);
        assert_eq!(state[GATEWAY]["type"], "PING_ONE_LDAP_GATEWAY");
        assert_eq!(state[GATEWAY]["name"], "PING_DIRECTORY (pingone-gateway)");
        assert_eq!(state[GATEWAY]["binary_attributes"], Value::Null);
    }

    #[tokio::test]
    async fn test_custom_store_lifecycle() {
        let server = MockServer::start_async().await;
        let body = json!({
            "type": "CUSTOM",
            "id": "restDs",
            "name": "REST API",
            "pluginDescriptorRef": {"id": "com.pingidentity.pf.datastore.other.RestDataSourceDriver"},
            "configuration": {
                "fields": [
                    {"name": "Authentication Method", "value": "None"},
                    {"name": "Connection Timeout", "value": "10000"}
                ],
                "tables": []
            }
        });
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pf-admin-api/v1/dataStores/restDs");
                then.status(200).json_body(body.clone());
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/pf-admin-api/v1/dataStores/gone");
                then.status(404);
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/pf-admin-api/v1/dataStores/gone");
                then.status(404);
            })
            .await;

        let client = client_for(&server.base_url());
        let resource = DataStoreResource;

        let imported = resource.read(&client, &json!({"id": "restDs"})).await.unwrap();
        let state = imported.state.unwrap();
        assert_eq!(state["data_store_id"], "restDs");
        assert_eq!(state[CUSTOM]["type"], "CUSTOM");
        assert_eq!(state[CUSTOM]["configuration"]["fields"].as_array().unwrap().len(), 2);

        let plan = json!({
            "id": "gone",
            "data_store_id": "gone",
            CUSTOM: {
                "name": "REST API",
                "plugin_descriptor_ref": {"id": "com.pingidentity.pf.datastore.other.RestDataSourceDriver"},
                "configuration": {"fields": [], "tables": []}
            }
        });
        let updated = resource.update(&client, &plan, &plan).await.unwrap();
        update.assert_async().await;
        assert_eq!(updated, plan);

        resource.delete(&client, &plan).await.unwrap();
        delete.assert_async().await;
    }
}
