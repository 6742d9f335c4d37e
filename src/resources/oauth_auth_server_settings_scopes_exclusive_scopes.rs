//! `pingfederate_oauth_auth_server_settings_scopes_exclusive_scopes`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::ScopeEntry;
use crate::client::{http_error, PingFederateClient};
use crate::common::{id, values};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, required_str, Resource};
use crate::schema::{Attribute, Diagnostic, Schema};
use crate::types::{PlanResult, ReadResult};

const PATH: &[&str] = &["oauth", "authServerSettings", "scopes", "exclusiveScopes"];
const THING: &str = "OauthAuthServerSettingsScopesExclusiveScopes";

/// An exclusive OAuth scope, addressed by its name.
pub struct OauthAuthServerSettingsScopesExclusiveScopesResource;

fn scope_path(name: &str) -> [&str; 5] {
    [PATH[0], PATH[1], PATH[2], PATH[3], name]
}

fn request(plan: &Value) -> Result<ScopeEntry, ProviderError> {
    Ok(ScopeEntry {
        name: required_str(plan, "name")?.to_string(),
        description: values::opt_string(plan, "description").unwrap_or_default(),
        dynamic: values::get_bool(plan, "dynamic"),
    })
}

fn to_state(response: &ScopeEntry) -> Value {
    json!({
        "id": response.name,
        "name": response.name,
        "description": response.description,
        "dynamic": response.dynamic.unwrap_or(false),
    })
}

// Imports only know the id, which is the scope name.
fn scope_name(state: &Value) -> Result<&str, ProviderError> {
    required_str(state, "name").or_else(|_| required_str(state, "id"))
}

#[async_trait]
impl Resource for OauthAuthServerSettingsScopesExclusiveScopesResource {
    fn type_name(&self) -> &'static str {
        "oauth_auth_server_settings_scopes_exclusive_scopes"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Manages an exclusive scope of the OAuth authorization server.")
            .with_attribute("id", id::id_attribute())
            .with_attribute(
                "name",
                Attribute::optional_computed_string()
                    .with_force_new()
                    .with_description("The name of the scope."),
            )
            .with_attribute(
                "description",
                Attribute::required_string()
                    .with_description(
                        "The description of the scope that appears when the user is prompted for \
                         authorization.",
                    ),
            )
            .with_attribute(
                "dynamic",
                Attribute::optional_computed_bool()
                    .with_default(json!(false))
                    .with_force_new()
                    .with_description("True if the scope is dynamic. (Defaults to false)"),
            )
    }

    fn modify_plan(&self, _prior: Option<&Value>, _config: &Value, plan: &mut PlanResult) {
        let planned = &plan.planned_state;
        if !values::bool_or_false(planned, "dynamic") {
            return;
        }
        if let Some(name) = values::get_str(planned, "name") {
            if !name.starts_with('*') {
                plan.diagnostics.push(
                    Diagnostic::error(
                        "Dynamic property is set to true with Name property incorrectly specified!",
                    )
                    .with_detail(
                        "The Name property must be prefixed with an \"*\". For example, \
                         \"*example\"",
                    )
                    .with_attribute("name"),
                );
            }
        }
    }

    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let body = request(plan)?;
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: ScopeEntry = client.post(PATH, &body).await.map_err(|err| {
            http_error(&format!("An error occurred while creating the {}", THING), err)
        })?;
        debug!("Add response: {:?}", response);
        Ok(to_state(&response))
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let name = scope_name(state)?;
        let summary = format!("An error occurred while looking for a {}", THING);
        match client.get::<ScopeEntry>(&scope_path(name)).await {
            Ok(response) => {
                debug!("Read response: {:?}", response);
                Ok(ReadResult::found(to_state(&response)))
            },
            Err(err) if err.is_not_found() => Ok(removed_on_not_found(&summary, &err)),
            Err(err) => Err(http_error(&summary, err)),
        }
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let name = scope_name(prior)?;
        let body = request(plan)?;
        debug!("Update request: {}", serde_json::to_string(&body)?);
        let response: ScopeEntry = client
            .put(&scope_path(name), &body)
            .await
            .map_err(|err| {
                http_error(&format!("An error occurred while updating {}", THING), err)
            })?;
        Ok(to_state(&response))
    }

    async fn delete(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<(), ProviderError> {
        let name = scope_name(state)?;
        client
            .delete(&scope_path(name))
            .await
            .map_err(|err| {
                http_error(&format!("An error occurred while deleting a {}", THING), err)
            })
    }

    fn import_id_attribute(&self) -> &'static str {
        "name"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use crate::plan::plan_resource;
    use crate::schema::DiagnosticSeverity;
    use httpmock::prelude::*;

    fn plan(config: Value) -> PlanResult {
        let resource = OauthAuthServerSettingsScopesExclusiveScopesResource;
        let mut result = plan_resource(&resource.schema(), None, &config, &config);
        resource.modify_plan(None, &config, &mut result);
        result
    }

    #[test]
    fn test_dynamic_scope_needs_wildcard_name() {
        let result = plan(json!({"name": "write", "description": "Write", "dynamic": true}));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].summary,
            "Dynamic property is set to true with Name property incorrectly specified!"
        );
        assert_eq!(result.diagnostics[0].severity, DiagnosticSeverity::Error);

        assert!(plan(json!({"name": "*write", "description": "Write", "dynamic": true}))
            .diagnostics
            .is_empty());
        let static_scope = plan(json!({"name": "write", "description": "Write"}));
        assert!(static_scope.diagnostics.is_empty());
        assert_eq!(static_scope.planned_state["dynamic"], json!(false));
    }

    #[tokio::test]
    async fn test_create_and_read() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pf-admin-api/v1/oauth/authServerSettings/scopes/exclusiveScopes")
                    .json_body(json!({"name": "*admin", "description": "Admin", "dynamic": true}));
                then.status(201)
                    .json_body(json!({"name": "*admin", "description": "Admin", "dynamic": true}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(
                        "/pf-admin-api/v1/oauth/authServerSettings/scopes/exclusiveScopes/*admin",
                    );
                then.status(200)
                    .json_body(json!({"name": "*admin", "description": "Administrators"}));
            })
            .await;

        let client = client_for(&server.base_url());
        let resource = OauthAuthServerSettingsScopesExclusiveScopesResource;
        let state = resource
            .create(
                &client,
                &json!({"id": null, "name": "*admin", "description": "Admin", "dynamic": true}),
            )
            .await
            .unwrap();
        create.assert_async().await;
        assert_eq!(state["id"], "*admin");

        let refreshed = resource.read(&client, &json!({"id": "*admin"})).await.unwrap();
        assert_eq!(
            refreshed.state,
            Some(json!({
                "id": "*admin",
                "name": "*admin",
                "description": "Administrators",
                "dynamic": false
            }))
        );
    }

    #[tokio::test]
    async fn test_read_missing_scope_is_removed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/pf-admin-api/v1/oauth/authServerSettings/scopes/exclusiveScopes/gone");
                then.status(404).json_body(json!({"resultId": "not_found"}));
            })
            .await;

        let client = client_for(&server.base_url());
        let result = OauthAuthServerSettingsScopesExclusiveScopesResource
            .read(&client, &json!({"id": "gone", "name": "gone"}))
            .await
            .unwrap();
        assert!(result.is_removed());
        assert_eq!(result.diagnostics[0].severity, DiagnosticSeverity::Warning);
    }

    #[tokio::test]
    async fn test_delete_reports_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/pf-admin-api/v1/oauth/authServerSettings/scopes/exclusiveScopes/gone");
                then.status(404);
            })
            .await;

        let client = client_for(&server.base_url());
        let err = OauthAuthServerSettingsScopesExclusiveScopesResource
            .delete(&client, &json!({"id": "gone", "name": "gone"}))
            .await
            .unwrap_err();
        assert_eq!(
            err.into_diagnostics()[0].summary,
            "An error occurred while deleting a OauthAuthServerSettingsScopesExclusiveScopes"
        );
    }
}
