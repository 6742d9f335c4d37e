//! `pingfederate_virtual_host_names`: the server's virtual host names.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::VirtualHostNames;
use crate::client::{http_error, PingFederateClient};
use crate::common::{id, values};
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeFlags, Schema};
use crate::types::ReadResult;

const PATH: &[&str] = &["virtualHostNames"];

/// Edit-only settings object.
pub struct VirtualHostNamesResource;

fn request(plan: &Value) -> VirtualHostNames {
    VirtualHostNames {
        virtual_host_names: values::string_set(plan, "virtual_host_names"),
    }
}

fn to_state(response: &VirtualHostNames) -> Value {
    json!({
        "id": "id",
        "virtual_host_names": values::set_value_or_empty(response.virtual_host_names.as_deref()),
    })
}

impl VirtualHostNamesResource {
    async fn put(
        &self,
        client: &PingFederateClient,
        plan: &Value,
        summary: &str,
    ) -> Result<Value, ProviderError> {
        let body = request(plan);
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: VirtualHostNames = client
            .put(PATH, &body)
            .await
            .map_err(|err| http_error(summary, err))?;
        Ok(to_state(&response))
    }
}

#[async_trait]
impl Resource for VirtualHostNamesResource {
    fn type_name(&self) -> &'static str {
        "virtual_host_names"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Manages a VirtualHostNames.")
            .with_attribute("id", id::id_attribute())
            .with_attribute(
                "virtual_host_names",
                Attribute::string_set(AttributeFlags::optional_computed())
                    .with_description("List of virtual host names.")
                    .with_use_state_for_unknown(),
            )
    }

    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        self.put(client, plan, "An error occurred while creating the VirtualHostNames")
            .await
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        _state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let response: VirtualHostNames = client
            .get(PATH)
            .await
            .map_err(|err| {
                http_error("An error occurred while looking for a VirtualHostNames", err)
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
        self.put(client, plan, "An error occurred while updating VirtualHostNames")
            .await
    }

    // Edit-only: there is nothing to delete.
    async fn delete(
        &self,
        _client: &PingFederateClient,
        _state: &Value,
    ) -> Result<(), ProviderError> {
        Ok(())
    }
}
