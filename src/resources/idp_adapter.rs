//! `pingfederate_idp_adapter`: IdP adapter plugin instances with their
//! attribute contract and mapping.
//!
//! The attribute contract and mapping are converted through their schema
//! blocks. Attribute sources are the exception: they are a tagged union on
//! the wire and go through [`attribute_sources`].

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::{IdpAdapter, IdpAdapterAttributeContract, IdpAdapterContractMapping};
use crate::client::{http_error, PingFederateClient};
use crate::common::{
    attribute_sources, id, json, plugin_configuration, resource_link, source_type_id_key, values,
};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, request_build_error, required_str, Resource};
use crate::schema::{Attribute, Block, Diagnostic, NestedBlock, Schema, Validator};
use crate::types::{PlanResult, ReadResult};

const PATH: &[&str] = &["idp", "adapters"];

const CONDITIONS: &[&str] = &[
    "EQUALS",
    "EQUALS_CASE_INSENSITIVE",
    "EQUALS_DN",
    "NOT_EQUAL",
    "NOT_EQUAL_CASE_INSENSITIVE",
    "NOT_EQUAL_DN",
    "MULTIVALUE_CONTAINS",
    "MULTIVALUE_CONTAINS_CASE_INSENSITIVE",
    "MULTIVALUE_CONTAINS_DN",
    "MULTIVALUE_DOES_NOT_CONTAIN",
    "MULTIVALUE_DOES_NOT_CONTAIN_CASE_INSENSITIVE",
    "MULTIVALUE_DOES_NOT_CONTAIN_DN",
];

const ERROR_RESULT: &str =
    "The error result to return if this issuance criterion fails. This error result will show up \
     in the PingFederate server logs.";

/// Edit-only IdP adapter instance.
pub struct IdpAdapterResource;

fn adapter_attribute() -> Block {
    Block::new()
        .with_attribute(
            "name",
            Attribute::required_string().with_description("The name of this attribute."),
        )
        .with_attribute(
            "pseudonym",
            Attribute::optional_bool().with_description(
                "Specifies whether this attribute is used to construct a pseudonym for the SP. \
                 Defaults to false.",
            ),
        )
        .with_attribute(
            "masked",
            Attribute::optional_bool()
                .with_description(
                    "Specifies whether this attribute is masked in PingFederate logs. Defaults to \
                     false.",
                ),
        )
}

fn attribute_contract_block() -> Block {
    Block::new()
        .with_block(
            "core_attributes",
            NestedBlock::set(adapter_attribute())
                .required()
                .with_description(
                    "A list of IdP adapter attributes that correspond to the attributes exposed by \
                     the IdP adapter type.",
                ),
        )
        .with_block(
            "extended_attributes",
            NestedBlock::set(adapter_attribute()).with_description(
                "A list of additional attributes that can be returned by the IdP adapter. The \
                 extended attributes are only used if the adapter supports them.",
            ),
        )
        .with_attribute(
            "unique_user_key_attribute",
            Attribute::optional_string()
                .with_description(
                    "The attribute to use for uniquely identify a user's authentication sessions.",
                ),
        )
        .with_attribute(
            "mask_ognl_values",
            Attribute::optional_bool().with_description(
                "Whether or not all OGNL expressions used to fulfill an outgoing assertion \
                 contract should be masked in the logs. Defaults to false.",
            ),
        )
        .with_attribute(
            "inherited",
            Attribute::optional_bool().with_description(
                "Whether this attribute contract is inherited from its parent instance. If true, \
                 the rest of the properties in this model become read-only. The default value is \
                 false.",
            ),
        )
}

fn issuance_criteria_block() -> Block {
    let conditional = Block::new()
        .with_block("source", source_type_id_key::source())
        .with_attribute(
            "attribute_name",
            Attribute::required_string()
                .with_description("The name of the attribute to use in this issuance criterion."),
        )
        .with_attribute(
            "condition",
            Attribute::required_string()
                .with_description(
                    "The condition that will be applied to the source attribute's value and the \
                     expected value.",
                )
                .with_validator(Validator::one_of(CONDITIONS)),
        )
        .with_attribute(
            "value",
            Attribute::required_string()
                .with_description("The expected value of this issuance criterion."),
        )
        .with_attribute(
            "error_result",
            Attribute::optional_string().with_description(ERROR_RESULT),
        );

    let expression = Block::new()
        .with_attribute(
            "expression",
            Attribute::required_string().with_description("The OGNL expression to evaluate."),
        )
        .with_attribute(
            "error_result",
            Attribute::optional_string().with_description(ERROR_RESULT),
        );

    Block::new()
        .with_block(
            "conditional_criteria",
            NestedBlock::list(conditional).with_description(
                "An issuance criterion that checks a source attribute against a particular \
                 condition and the expected value.",
            ),
        )
        .with_block(
            "expression_criteria",
            NestedBlock::list(expression).with_description(
                "An issuance criterion that uses a Boolean return value from an OGNL expression to \
                 determine whether or not it passes.",
            ),
        )
}

fn attribute_mapping_block() -> Block {
    Block::new()
        .with_block("attribute_sources", attribute_sources::nested_block())
        .with_block(
            "attribute_contract_fulfillment",
            attribute_sources::attribute_contract_fulfillment().required(),
        )
        .with_block(
            "issuance_criteria",
            NestedBlock::single(issuance_criteria_block()).with_description(
                "The issuance criteria that this transaction must meet before the corresponding \
                 attribute contract is fulfilled.",
            ),
        )
        .with_attribute(
            "inherited",
            Attribute::optional_bool().with_description(
                "Whether this attribute mapping is inherited from its parent instance. If true, \
                 the rest of the properties in this model become read-only. The default value is \
                 false.",
            ),
        )
}

fn mapping_request(state: &Value) -> Result<IdpAdapterContractMapping, serde_json::Error> {
    let mut body = json::to_api_value(&attribute_mapping_block(), state);
    let sources = attribute_sources::client_struct(state.get("attribute_sources"))?;
    if let Value::Object(fields) = &mut body {
        match sources {
            Some(sources) => {
                fields.insert("attributeSources".to_string(), serde_json::to_value(sources)?)
            },
            None => fields.remove("attributeSources"),
        };
    }
    serde_json::from_value(body)
}

fn mapping_state(mapping: &IdpAdapterContractMapping) -> Result<Value, serde_json::Error> {
    let mut state = json::to_state(&attribute_mapping_block(), mapping)?;
    if let Value::Object(fields) = &mut state {
        fields.insert(
            "attribute_sources".to_string(),
            attribute_sources::to_state(mapping.attribute_sources.as_deref())?,
        );
    }
    Ok(state)
}

fn request(plan: &Value) -> Result<IdpAdapter, ProviderError> {
    let build = |err| request_build_error("IdpAdapter", err);

    let plugin_descriptor_ref = resource_link::client_struct(plan.get("plugin_descriptor_ref"))
        .ok_or_else(|| {
            ProviderError::InvalidRequest("plan has no 'plugin_descriptor_ref'".to_string())
        })?;
    let configuration =
        plugin_configuration::client_struct(plan.get("configuration").unwrap_or(&Value::Null))
            .map_err(build)?;

    let attribute_contract = match plan.get("attribute_contract").filter(|v| !v.is_null()) {
        Some(contract) => Some(
            json::from_state::<IdpAdapterAttributeContract>(&attribute_contract_block(), contract)
                .map_err(build)?,
        ),
        None => None,
    };
    let attribute_mapping = match plan.get("attribute_mapping").filter(|v| !v.is_null()) {
        Some(mapping) => Some(mapping_request(mapping).map_err(build)?),
        None => None,
    };

    Ok(IdpAdapter {
        id: required_str(plan, "id")?.to_string(),
        name: values::opt_string(plan, "name").unwrap_or_default(),
        plugin_descriptor_ref,
        parent_ref: resource_link::client_struct(plan.get("parent_ref")),
        configuration,
        authn_ctx_class_ref: values::opt_string(plan, "authn_ctx_class_ref"),
        attribute_mapping,
        attribute_contract,
    })
}

fn to_state(known: &Value, response: &IdpAdapter) -> Result<Value, ProviderError> {
    let plan_config = known.get("configuration").unwrap_or(&Value::Null);
    let attribute_contract = match &response.attribute_contract {
        Some(contract) => json::to_state(&attribute_contract_block(), contract)?,
        None => Value::Null,
    };
    let attribute_mapping = match &response.attribute_mapping {
        Some(mapping) => mapping_state(mapping)?,
        None => Value::Null,
    };

    Ok(json!({
        "id": response.id,
        "name": response.name,
        "authn_ctx_class_ref": response.authn_ctx_class_ref,
        "plugin_descriptor_ref": resource_link::to_state(Some(&response.plugin_descriptor_ref)),
        "parent_ref": resource_link::to_state(response.parent_ref.as_ref()),
        "configuration": plugin_configuration::to_state(
            plan_config,
            &response.configuration,
            plan_config.is_null()
        ),
        "attribute_contract": attribute_contract,
        "attribute_mapping": attribute_mapping,
    }))
}

#[async_trait]
impl Resource for IdpAdapterResource {
    fn type_name(&self) -> &'static str {
        "idp_adapter"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Manages an Idp Adapter")
            .with_attribute(
                "id",
                id::custom_id_attribute(
                    true,
                    "The ID of the plugin instance. The ID cannot be modified once the instance is \
                     created.",
                ),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description(
                        "The plugin instance name. The name can be modified once the instance is \
                         created.",
                    ),
            )
            .with_attribute(
                "authn_ctx_class_ref",
                Attribute::optional_string()
                    .with_description(
                        "The fixed value that indicates how the user was authenticated.",
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
            .with_block(
                "attribute_contract",
                NestedBlock::single(attribute_contract_block())
                    .with_description("The list of attributes that the IdP adapter provides."),
            )
            .with_block(
                "attribute_mapping",
                NestedBlock::single(attribute_mapping_block())
                    .with_description(
                        "The attributes mapping from attribute sources to attribute targets.",
                    ),
            )
    }

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let sources = config
            .get("attribute_mapping")
            .and_then(|mapping| mapping.get("attribute_sources"));
        attribute_sources::validate(sources, "attribute_mapping.attribute_sources")
    }

    fn modify_plan(&self, prior: Option<&Value>, _config: &Value, plan: &mut PlanResult) {
        let Some(prior_config) = prior.and_then(|prior| prior.get("configuration")) else {
            return;
        };
        if let Some(plan_config) = plan.planned_state.get_mut("configuration") {
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
        let response: IdpAdapter = client
            .post(PATH, &body)
            .await
            .map_err(|err| http_error("An error occurred while creating the IdpAdapter", err))?;
        debug!("Add response: {:?}", response);
        to_state(plan, &response)
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let id = required_str(state, "id")?;
        let summary = "An error occurred while looking for an IdpAdapter";
        match client.get::<IdpAdapter>(&[PATH[0], PATH[1], id]).await {
            Ok(response) => {
                debug!("Read response: {:?}", response);
                Ok(ReadResult::found(to_state(state, &response)?))
            },
            Err(err) if err.is_not_found() => Ok(removed_on_not_found(summary, &err)),
            Err(err) => Err(http_error(summary, err)),
        }
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        _prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let body = request(plan)?;
        debug!("Update request: {}", serde_json::to_string(&body)?);
        let response: IdpAdapter = client
            .put(&[PATH[0], PATH[1], body.id.as_str()], &body)
            .await
            .map_err(|err| http_error("An error occurred while updating IdpAdapter", err))?;
        to_state(plan, &response)
    }

    // Edit-only: the adapter is only dropped from state.
    async fn delete(
        &self,
        _client: &PingFederateClient,
        _state: &Value,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use crate::plan::plan_resource;
    use crate::validation::validate;
    use httpmock::prelude::*;

    fn config() -> Value {
        json!({
            "id": "HTMLFormPD",
            "name": "HTML Form PD",
            "plugin_descriptor_ref": {"id": "com.pingidentity.adapters.htmlform.idp.HtmlFormIdpAuthnAdapter"},
            "configuration": {
                "fields": [{"name": "Password Reset Type", "value": "NONE"}],
                "tables": [{
                    "name": "Credential Validators",
                    "rows": [
                        {
                            "fields": [
                                {"name": "Password Credential Validator Instance", "value": "pcv"}
                            ]
                        }
                    ]
                }]
            },
            "attribute_contract": {
                "core_attributes": [
                    {"name": "username", "pseudonym": true},
                    {"name": "policy.action"}
                ],
                "mask_ognl_values": false
            },
            "attribute_mapping": {
                "attribute_sources": [{
                    "ldap_attribute_source": {
                        "data_store_ref": {"id": "LDAP-1"},
                        "id": "ldap",
                        "search_scope": "SUBTREE",
                        "search_filter": "(uid=${username})",
                        "search_attributes": ["mail"],
                        "binary_attribute_settings": {"objectGUID": {"binary_encoding": "BASE64"}}
                    }
                }],
                "attribute_contract_fulfillment": {
                    "username": {"source": {"type": "ADAPTER"}, "value": "username"},
                    "policy.action": {"source": {"type": "ADAPTER"}, "value": "policy.action"}
                },
                "issuance_criteria": {
                    "conditional_criteria": [{
                        "source": {"type": "LDAP_DATA_STORE", "id": "ldap"},
                        "attribute_name": "mail",
                        "condition": "MULTIVALUE_CONTAINS_CASE_INSENSITIVE",
                        "value": "@example.com"
                    }]
                }
            }
        })
    }

    fn response() -> Value {
        json!({
            "id": "HTMLFormPD",
            "name": "HTML Form PD",
            "pluginDescriptorRef": {
                "id": "com.pingidentity.adapters.htmlform.idp.HtmlFormIdpAuthnAdapter",
                "location": "https://localhost:9999/pf-admin-api/v1/idp/adapters/descriptors/com.pingidentity.adapters.htmlform.idp.HtmlFormIdpAuthnAdapter"
            },
            "configuration": {
                "fields": [
                    {"name": "Password Reset Type", "value": "NONE"},
                    {"name": "Session Timeout", "value": "60"}
                ],
                "tables": [{
                    "name": "Credential Validators",
                    "rows": [
                        {
                            "defaultRow": false,
                            "fields": [
                                {"name": "Password Credential Validator Instance", "value": "pcv"}
                            ]
                        }
                    ]
                }]
            },
            "attributeContract": {
                "coreAttributes": [
                    {"name": "username", "pseudonym": true, "masked": false},
                    {"name": "policy.action", "pseudonym": false, "masked": false}
                ],
                "maskOgnlValues": false
            },
            "attributeMapping": {
                "attributeSources": [{
                    "type": "LDAP",
                    "dataStoreRef": {
                        "id": "LDAP-1",
                        "location": "https://localhost:9999/pf-admin-api/v1/dataStores/LDAP-1"
                    },
                    "id": "ldap",
                    "searchScope": "SUBTREE",
                    "searchFilter": "(uid=${username})",
                    "searchAttributes": ["mail"],
                    "binaryAttributeSettings": {"objectGUID": {"binaryEncoding": "BASE64"}}
                }],
                "attributeContractFulfillment": {
                    "username": {"source": {"type": "ADAPTER"}, "value": "username"},
                    "policy.action": {"source": {"type": "ADAPTER"}, "value": "policy.action"}
                },
                "issuanceCriteria": {
                    "conditionalCriteria": [{
                        "source": {"type": "LDAP_DATA_STORE", "id": "ldap"},
                        "attributeName": "mail",
                        "condition": "MULTIVALUE_CONTAINS_CASE_INSENSITIVE",
                        "value": "@example.com"
                    }]
                }
            }
        })
    }

    #[test]
    fn test_condition_is_validated() {
        let schema = IdpAdapterResource.schema();
        assert!(validate(&schema, &config()).is_empty());

        let mut bad = config();
        bad["attribute_mapping"]["issuance_criteria"]["conditional_criteria"][0]["condition"] =
            json!("CONTAINS");
        let diagnostics = validate(&schema, &bad);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute.as_deref(),
            Some("attribute_mapping.issuance_criteria.conditional_criteria.0.condition")
        );
    }

    #[test]
    fn test_attribute_source_needs_a_kind() {
        let mut config = config();
        config["attribute_mapping"]["attribute_sources"] = json!([{}]);
        let diagnostics = IdpAdapterResource.validate_config(&config);
        assert_eq!(diagnostics[0].summary, "Missing Attribute Configuration");
    }

    #[tokio::test]
    async fn test_create_sends_tagged_sources() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pf-admin-api/v1/idp/adapters")
                    .json_body_partial(r#"{
                        "id": "HTMLFormPD",
                        "attributeMapping": {
                            "attributeSources": [
                                {"type": "LDAP", "id": "ldap", "searchScope": "SUBTREE"}
                            ],
                            "attributeContractFulfillment": {
                                "policy.action": {
                                    "source": {"type": "ADAPTER"},
                                    "value": "policy.action"
                                }
                            }
                        },
                        "attributeContract": {
                            "coreAttributes": [{"name": "username", "pseudonym": true}]
                        }
                    }"#);
                then.status(201).json_body(response());
            })
            .await;

        let resource = IdpAdapterResource;
        let planned = plan_resource(&resource.schema(), None, &config(), &config()).planned_state;
        let client = client_for(&server.base_url());
        let state = resource.create(&client, &planned).await.unwrap();
        mock.assert_async().await;

        let ldap = &state["attribute_mapping"]["attribute_sources"][0]["ldap_attribute_source"];
        assert_eq!(ldap["search_filter"], "(uid=${username})");
        assert_eq!(ldap["binary_attribute_settings"]["objectGUID"]["binary_encoding"], "BASE64");
        assert_eq!(
            state["attribute_mapping"]["attribute_contract_fulfillment"]["policy.action"]["value"],
            "policy.action"
        );
        assert_eq!(state["configuration"]["fields"].as_array().unwrap().len(), 1);
        assert_eq!(state["configuration"]["fields_all"].as_array().unwrap().len(), 2);
        let criteria = &state["attribute_mapping"]["issuance_criteria"]["conditional_criteria"];
        assert_eq!(criteria[0]["attribute_name"], "mail");
    }

    #[tokio::test]
    async fn test_read_and_delete() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pf-admin-api/v1/idp/adapters/missing");
                then.status(404).json_body(json!({"resultId": "not_found"}));
            })
            .await;

        let client = client_for(&server.base_url());
        let result = IdpAdapterResource
            .read(&client, &json!({"id": "missing"}))
            .await
            .unwrap();
        assert!(result.is_removed());
        assert_eq!(
            result.diagnostics[0].summary,
            "An error occurred while looking for an IdpAdapter"
        );

        IdpAdapterResource
            .delete(&client, &json!({"id": "HTMLFormPD"}))
            .await
            .unwrap();
    }
}
