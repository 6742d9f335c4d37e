//! `pingfederate_protocol_metadata_lifetime_settings`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::ProtocolMetadataLifetimeSettings;
use crate::client::{http_error, PingFederateClient};
use crate::common::{id, values};
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use crate::types::ReadResult;

const PATH: &[&str] = &["protocolMetadata", "lifetimeSettings"];

/// Edit-only settings object.
pub struct ProtocolMetadataLifetimeSettingsResource;

fn to_state(response: &ProtocolMetadataLifetimeSettings) -> Value {
    json!({
        "id": "id",
        "cache_duration": response.cache_duration,
        "reload_delay": response.reload_delay,
    })
}

impl ProtocolMetadataLifetimeSettingsResource {
    async fn put(
        &self,
        client: &PingFederateClient,
        plan: &Value,
        summary: &str,
    ) -> Result<Value, ProviderError> {
        let body = ProtocolMetadataLifetimeSettings {
            cache_duration: values::get_i64(plan, "cache_duration"),
            reload_delay: values::get_i64(plan, "reload_delay"),
        };
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: ProtocolMetadataLifetimeSettings = client
            .put(PATH, &body)
            .await
            .map_err(|err| http_error(summary, err))?;
        Ok(to_state(&response))
    }
}

#[async_trait]
impl Resource for ProtocolMetadataLifetimeSettingsResource {
    fn type_name(&self) -> &'static str {
        "protocol_metadata_lifetime_settings"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Manages a ProtocolMetadataLifetimeSettings.")
            .with_attribute("id", id::id_attribute())
            .with_attribute(
                "cache_duration",
                Attribute::optional_computed_int64()
                    .with_description(
                        "This field adjusts the validity of your metadata in minutes. The default \
                         value is 1440 (1 day).",
                    )
                    .with_use_state_for_unknown(),
            )
            .with_attribute(
                "reload_delay",
                Attribute::optional_computed_int64()
                    .with_description(
                        "This field adjusts the frequency of automatic reloading of SAML metadata \
                         in minutes. The default value is 1440 (1 day).",
                    )
                    .with_use_state_for_unknown(),
            )
    }

    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        self.put(
            client,
            plan,
            "An error occurred while creating the ProtocolMetadataLifetimeSettings",
        )
        .await
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        _state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let response: ProtocolMetadataLifetimeSettings = client.get(PATH).await.map_err(|err| {
            http_error(
                "An error occurred while looking for a ProtocolMetadataLifetimeSettings",
                err,
            )
        })?;
        debug!("Read response: {:?}", response);
        Ok(ReadResult::found(to_state(&response)))
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        _prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        self.put(
            client,
            plan,
            "An error occurred while updating ProtocolMetadataLifetimeSettings",
        )
        .await
    }

    async fn delete(
        &self,
        _client: &PingFederateClient,
        _state: &Value,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}
