//! The per-type adapters the provider dispatches to.
//!
//! A [`Resource`] maps its state tree onto one PingFederate configuration
//! object; a [`DataSource`] only reads. Both receive the configured
//! [`PingFederateClient`] on every call and hold no state of their own.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{report_http_error_as_warning, ApiError, PingFederateClient};
use crate::error::ProviderError;
use crate::schema::{Diagnostic, Schema};
use crate::types::{PlanResult, ReadResult};

/// A managed object type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name without the provider prefix, e.g. `oauth_client`.
    fn type_name(&self) -> &'static str;

    /// Schema of the resource state.
    fn schema(&self) -> Schema;

    /// Cross-attribute checks on the configuration. Schema checks have already run.
    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let _ = config;
        Vec::new()
    }

    /// Adjust a computed plan. Not called for destroy plans.
    fn modify_plan(&self, prior: Option<&Value>, config: &Value, plan: &mut PlanResult) {
        let _ = (prior, config, plan);
    }

    /// Create the object and return its state.
    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError>;

    /// Refresh the state.
    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError>;

    /// Apply a plan over the prior state and return the new state.
    async fn update(
        &self,
        client: &PingFederateClient,
        prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError>;

    /// Delete the object.
    async fn delete(&self, client: &PingFederateClient, state: &Value) -> Result<(), ProviderError>;

    /// Attribute an import id is written to.
    fn import_id_attribute(&self) -> &'static str {
        "id"
    }
}

/// A read-only lookup.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name without the provider prefix.
    fn type_name(&self) -> &'static str;

    /// Schema of the data source.
    fn schema(&self) -> Schema;

    /// Read the object described by the configuration.
    async fn read(
        &self,
        client: &PingFederateClient,
        config: &Value,
    ) -> Result<Value, ProviderError>;
}

/// Read result for a 404: warn and drop the object from state.
pub fn removed_on_not_found(summary: &str, err: &ApiError) -> ReadResult {
    ReadResult::removed(report_http_error_as_warning(summary, err))
}

/// Error for a plan that could not be turned into a request body.
pub fn request_build_error(thing: &str, err: serde_json::Error) -> ProviderError {
    ProviderError::diagnostic(
        Diagnostic::error(format!(
            "Failed to add optional properties to add request for {}",
            thing
        ))
        .with_detail(err.to_string()),
    )
}

/// A string attribute the operation cannot do without, such as the object id.
pub fn required_str<'a>(state: &'a Value, name: &str) -> Result<&'a str, ProviderError> {
    state
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProviderError::InvalidRequest(format!("state has no '{}'", name)))
}
