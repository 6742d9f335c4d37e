//! The provider: a registry of resources and data sources over one API client.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::PingFederateClient;
use crate::config::{provider_schema, ProviderConfig};
use crate::error::ProviderError;
use crate::plan::plan_resource;
use crate::resource::{DataSource, Resource};
use crate::schema::{Diagnostic, ProviderSchema};
use crate::server::ProviderService;
use crate::types::{ImportedResource, PlanResult, ReadResult};
use crate::validation::validate;
use crate::{data_sources, resources};

/// Prefix of every resource and data source type name.
pub const TYPE_PREFIX: &str = "pingfederate_";

/// PingFederate provider.
pub struct PingFederateProvider {
    resources: BTreeMap<String, Arc<dyn Resource>>,
    data_sources: BTreeMap<String, Arc<dyn DataSource>>,
    client: RwLock<Option<Arc<PingFederateClient>>>,
}

impl Default for PingFederateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PingFederateProvider {
    /// Provider with every resource and data source registered.
    pub fn new() -> Self {
        Self::with_types(resources::all(), data_sources::all())
    }

    /// Provider serving only the given types.
    pub fn with_types(
        resources: Vec<Arc<dyn Resource>>,
        data_sources: Vec<Arc<dyn DataSource>>,
    ) -> Self {
        Self {
            resources: resources
                .into_iter()
                .map(|r| (format!("{}{}", TYPE_PREFIX, r.type_name()), r))
                .collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (format!("{}{}", TYPE_PREFIX, d.type_name()), d))
                .collect(),
            client: RwLock::new(None),
        }
    }

    fn resource(&self, resource_type: &str) -> Result<&Arc<dyn Resource>, ProviderError> {
        self.resources
            .get(resource_type)
            .ok_or_else(|| ProviderError::UnknownResource(resource_type.to_string()))
    }

    fn data_source(&self, data_source_type: &str) -> Result<&Arc<dyn DataSource>, ProviderError> {
        self.data_sources
            .get(data_source_type)
            .ok_or_else(|| ProviderError::UnknownResource(data_source_type.to_string()))
    }

    async fn client(&self, type_name: &str) -> Result<Arc<PingFederateClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "{} cannot be managed before the provider is configured",
                type_name
            ))
        })
    }
}

#[async_trait::async_trait]
impl ProviderService for PingFederateProvider {
    fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(provider_schema());
        for (name, resource) in &self.resources {
            schema = schema.with_resource(name.clone(), resource.schema());
        }
        for (name, data_source) in &self.data_sources {
            schema = schema.with_data_source(name.clone(), data_source.schema());
        }
        schema
    }

    async fn validate_provider_config(
        &self,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&provider_schema(), &config))
    }

    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = match ProviderConfig::from_value(&config) {
            Ok(config) => config,
            Err(diagnostics) => return Ok(diagnostics),
        };
        let client = PingFederateClient::new(&config).map_err(|err| {
            ProviderError::diagnostic(
                Diagnostic::error("Unable to create PingFederate client")
                    .with_detail(err.to_string()),
            )
        })?;
        info!(base_url = %client.base_url(), "Configured PingFederate client");
        *self.client.write().await = Some(Arc::new(client));
        Ok(vec![])
    }

    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let mut diagnostics = validate(&resource.schema(), &config);
        diagnostics.extend(resource.validate_config(&config));
        Ok(diagnostics)
    }

    async fn plan(
        &self,
        resource_type: &str,
        prior_state: Option<Value>,
        proposed_state: Value,
        config: Value,
    ) -> Result<PlanResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        let prior = prior_state.as_ref().filter(|prior| !prior.is_null());
        let mut plan = plan_resource(&resource.schema(), prior, &proposed_state, &config);
        if !plan.is_destroy() {
            resource.modify_plan(prior, &config, &mut plan);
        }
        debug!(
            resource_type,
            changes = plan.changes.len(),
            requires_replace = plan.requires_replace,
            "Planned resource"
        );
        Ok(plan)
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client(resource_type).await?;
        resource.create(&client, &planned_state).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<ReadResult, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client(resource_type).await?;
        resource.read(&client, &current_state).await
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client(resource_type).await?;
        resource.update(&client, &prior_state, &planned_state).await
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.resource(resource_type)?;
        let client = self.client(resource_type).await?;
        resource.delete(&client, &current_state).await
    }

    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.resource(resource_type)?;
        let mut state = json!({ "id": id });
        state[resource.import_id_attribute()] = json!(id);
        Ok(vec![ImportedResource::new(resource_type, state)])
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        Ok(validate(&data_source.schema(), &config))
    }

    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        let client = self.client(data_source_type).await?;
        data_source.read(&client, &config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    async fn configured(server: &MockServer) -> PingFederateProvider {
        let provider = PingFederateProvider::new();
        let diagnostics = provider
            .configure(json!({
                "https_host": server.base_url(),
                "username": "administrator",
                "password": "2FederateM0re",
            }))
            .await
            .unwrap();
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        provider
    }

    #[test]
    fn test_registry_names_are_prefixed() {
        let provider = PingFederateProvider::new();
        let metadata = provider.metadata();
        assert!(metadata.resources.iter().all(|name| name.starts_with(TYPE_PREFIX)));
        assert!(metadata.resources.contains(&"pingfederate_oauth_client".to_string()));
        assert_eq!(metadata.data_sources, vec!["pingfederate_key_pair_signing_import"]);
        assert!(provider.schema().provider.block.attributes.contains_key("https_host"));
    }

    #[tokio::test]
    async fn test_operations_need_configure() {
        let provider = PingFederateProvider::new();
        let err = provider
            .create("pingfederate_virtual_host_names", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));

        let err = provider
            .read_data_source("pingfederate_key_pair_signing_import", json!({"id": "k"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let provider = PingFederateProvider::new();
        let err = provider
            .validate_resource_config("pingfederate_nope", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownResource(_)));
    }

    #[tokio::test]
    async fn test_validate_runs_schema_and_resource_checks() {
        let provider = PingFederateProvider::new();
        let diagnostics = provider
            .validate_resource_config(
                "pingfederate_data_store",
                json!({"mask_attribute_values": "yes"}),
            )
            .await
            .unwrap();
        assert!(diagnostics.iter().any(|d| d.summary == "Invalid Attribute Combination!"));
        assert!(diagnostics.len() >= 2);
    }

    #[tokio::test]
    async fn test_import_seeds_id_attribute() {
        let provider = PingFederateProvider::new();
        let imported = provider
            .import_resource("pingfederate_oauth_client", "app")
            .await
            .unwrap();
        assert_eq!(imported[0].resource_type, "pingfederate_oauth_client");
        assert_eq!(imported[0].state, json!({"id": "app", "client_id": "app"}));
    }

    #[tokio::test]
    async fn test_plan_applies_resource_rules_except_on_destroy() {
        let provider = PingFederateProvider::new();
        let resource_type = "pingfederate_oauth_auth_server_settings_scopes_exclusive_scopes";
        let config = json!({
            "name": "exclusive",
            "description": "Exclusive scope",
            "dynamic": true
        });
        let plan = provider
            .plan(resource_type, None, config.clone(), config)
            .await
            .unwrap();
        assert!(plan.has_errors());

        let prior = json!({
            "id": "exclusive",
            "name": "exclusive",
            "description": "d",
            "dynamic": true
        });
        let destroy = provider
            .plan(resource_type, Some(prior), Value::Null, Value::Null)
            .await
            .unwrap();
        assert!(destroy.is_destroy());
        assert!(destroy.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_import_then_read() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(
                        "/pf-admin-api/v1/oauth/authServerSettings/scopes/exclusiveScopes/*admin",
                    );
                then.status(200)
                    .json_body(json!({"name": "*admin", "description": "Admin", "dynamic": true}));
            })
            .await;

        let provider = configured(&server).await;
        let resource_type = "pingfederate_oauth_auth_server_settings_scopes_exclusive_scopes";
        let imported = provider.import_resource(resource_type, "*admin").await.unwrap();
        let result = provider
            .read(resource_type, imported[0].state.clone())
            .await
            .unwrap();
        assert_eq!(
            result.state,
            Some(json!({"id": "*admin", "name": "*admin", "description": "Admin", "dynamic": true}))
        );
    }

    #[tokio::test]
    async fn test_configure_reports_missing_values() {
        let provider = PingFederateProvider::new();
        let diagnostics = provider
            .configure(json!({
                "https_host": "https://localhost:9999",
                "username": "administrator",
                "password": ""
            }))
            .await
            .unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Unable to find password");
        let err =
            provider.delete("pingfederate_data_store", json!({"id": "ds"})).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
