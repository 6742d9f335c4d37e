//! `pingfederate_authentication_api_settings`.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::AuthnApiSettings;
use crate::client::{http_error, PingFederateClient};
use crate::common::{id, resource_link, values};
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use crate::types::ReadResult;

const PATH: &[&str] = &["authenticationApi", "settings"];

const FLAGS: [(&str, &str); 4] = [
    ("api_enabled", "Enable Authentication API"),
    (
        "enable_api_descriptions",
        "Enable API descriptions",
    ),
    (
        "restrict_access_to_redirectless_mode",
        "Enable restrict access to redirectless mode",
    ),
    (
        "include_request_context",
        "Includes request context in API responses",
    ),
];

/// Edit-only settings object.
pub struct AuthenticationApiSettingsResource;

fn request(plan: &Value) -> AuthnApiSettings {
    AuthnApiSettings {
        api_enabled: values::get_bool(plan, "api_enabled"),
        enable_api_descriptions: values::get_bool(plan, "enable_api_descriptions"),
        restrict_access_to_redirectless_mode: values::get_bool(
            plan,
            "restrict_access_to_redirectless_mode",
        ),
        include_request_context: values::get_bool(plan, "include_request_context"),
        default_application_ref: resource_link::client_struct(plan.get("default_application_ref")),
    }
}

fn to_state(response: &AuthnApiSettings) -> Value {
    json!({
        "id": "id",
        "api_enabled": response.api_enabled.unwrap_or(false),
        "enable_api_descriptions": response.enable_api_descriptions.unwrap_or(false),
        "restrict_access_to_redirectless_mode":
            response.restrict_access_to_redirectless_mode.unwrap_or(false),
        "include_request_context": response.include_request_context.unwrap_or(false),
        "default_application_ref": resource_link::to_state(
            response.default_application_ref.as_ref()
        ),
    })
}

impl AuthenticationApiSettingsResource {
    async fn put(
        &self,
        client: &PingFederateClient,
        plan: &Value,
        summary: &str,
    ) -> Result<Value, ProviderError> {
        let body = request(plan);
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: AuthnApiSettings = client
            .put(PATH, &body)
            .await
            .map_err(|err| http_error(summary, err))?;
        Ok(to_state(&response))
    }
}

#[async_trait]
impl Resource for AuthenticationApiSettingsResource {
    fn type_name(&self) -> &'static str {
        "authentication_api_settings"
    }

    fn schema(&self) -> Schema {
        let schema = FLAGS.iter().fold(
            Schema::v0()
                .with_description("Manages the authentication API settings.")
                .with_attribute("id", id::id_attribute()),
            |schema, (name, description)| {
                schema.with_attribute(
                    *name,
                    Attribute::optional_computed_bool()
                        .with_default(json!(false))
                        .with_description(format!("{}. The default is false.", description)),
                )
            },
        );
        schema.with_block(
            "default_application_ref",
            resource_link::optional(
                "Enable this setting to use the default application for authentication API \
                 requests.",
            ),
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
            "An error occurred while creating the AuthenticationApiSettings",
        )
        .await
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        _state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let response: AuthnApiSettings = client.get(PATH).await.map_err(|err| {
            http_error(
                "An error occurred while looking for an AuthenticationApiSettings",
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
            "An error occurred while updating AuthenticationApiSettings",
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
