//! Plugin instances that are nothing more than a descriptor plus configuration.
//!
//! Notification publishers and client registration policies share one shape
//! and one lifecycle; a [`PluginInstanceKind`] supplies the parts that differ.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::{
    ClientRegistrationPolicy, NotificationPublisher, PluginConfiguration, ResourceLink,
};
use crate::client::{http_error, PingFederateClient};
use crate::common::{id, plugin_configuration, values};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, request_build_error, required_str, Resource};
use crate::schema::{Attribute, Block, NestedBlock, Schema, Validator};
use crate::types::{PlanResult, ReadResult};

/// API model of a plugin instance.
pub trait PluginInstance: Serialize + DeserializeOwned + Debug + Send + Sync {
    /// Assemble a request body.
    fn new(
        id: String,
        name: String,
        plugin_descriptor_ref: ResourceLink,
        parent_ref: Option<ResourceLink>,
        configuration: PluginConfiguration,
    ) -> Self;

    /// `(id, name, plugin_descriptor_ref, parent_ref, configuration)`.
    fn parts(&self) -> (&str, &str, &ResourceLink, Option<&ResourceLink>, &PluginConfiguration);
}

macro_rules! plugin_instance {
    ($model:ty) => {
        impl PluginInstance for $model {
            fn new(
                id: String,
                name: String,
                plugin_descriptor_ref: ResourceLink,
                parent_ref: Option<ResourceLink>,
                configuration: PluginConfiguration,
            ) -> Self {
                Self {
                    id,
                    name,
                    plugin_descriptor_ref,
                    parent_ref,
                    configuration,
                }
            }

            fn parts(
                &self,
            ) -> (&str, &str, &ResourceLink, Option<&ResourceLink>, &PluginConfiguration) {
                (
                    &self.id,
                    &self.name,
                    &self.plugin_descriptor_ref,
                    self.parent_ref.as_ref(),
                    &self.configuration,
                )
            }
        }
    };
}

plugin_instance!(NotificationPublisher);
plugin_instance!(ClientRegistrationPolicy);

/// The parts of a plugin instance resource that differ per kind.
pub struct PluginInstanceKind {
    /// Resource type name.
    pub type_name: &'static str,
    /// Collection path.
    pub path: &'static [&'static str],
    /// Attribute holding the user-chosen id.
    pub id_attribute: &'static str,
    /// Object name used in error summaries.
    pub thing: &'static str,
    /// Resource description.
    pub description: &'static str,
    /// Description of the user-chosen id.
    pub id_description: &'static str,
}

/// A plugin instance resource of kind `K` backed by model `M`.
pub struct PluginInstanceResource<M> {
    kind: &'static PluginInstanceKind,
    model: PhantomData<fn() -> M>,
}

impl<M> PluginInstanceResource<M> {
    /// Resource for `kind`.
    pub const fn new(kind: &'static PluginInstanceKind) -> Self {
        Self {
            kind,
            model: PhantomData,
        }
    }
}

fn id_link(description: &str) -> NestedBlock {
    NestedBlock::single(Block::new().with_attribute(
        "id",
        Attribute::required_string().with_description("The ID of the resource."),
    ))
    .with_description(description)
}

fn link_state(link: Option<&ResourceLink>) -> Value {
    link.map_or(Value::Null, |link| json!({"id": link.id}))
}

impl<M: PluginInstance> PluginInstanceResource<M> {
    fn collection(&self) -> Vec<&str> {
        self.kind.path.to_vec()
    }

    fn item<'a>(&self, id: &'a str) -> Vec<&'a str> {
        let mut path: Vec<&str> = self.kind.path.to_vec();
        path.push(id);
        path
    }

    fn summary(&self, action: &str) -> String {
        format!("An error occurred while {} the {}", action, self.kind.thing)
    }

    fn request(&self, plan: &Value) -> Result<M, ProviderError> {
        let configuration = plugin_configuration::client_struct(
            plan.get("configuration").unwrap_or(&Value::Null),
        )
        .map_err(|err| request_build_error(self.kind.thing, err))?;
        let descriptor =
            crate::common::resource_link::client_struct(plan.get("plugin_descriptor_ref"))
                .ok_or_else(|| {
                    ProviderError::InvalidRequest("plan has no 'plugin_descriptor_ref'".to_string())
                })?;

        Ok(M::new(
            required_str(plan, self.kind.id_attribute)?.to_string(),
            values::opt_string(plan, "name").unwrap_or_default(),
            descriptor,
            crate::common::resource_link::client_struct(plan.get("parent_ref")),
            configuration,
        ))
    }

    // `known` is the plan or prior state the response is merged into.
    fn to_state(&self, known: &Value, response: &M) -> Value {
        let (id, name, descriptor, parent, configuration) = response.parts();
        let plan_config = known.get("configuration").unwrap_or(&Value::Null);
        let is_import_read = plan_config.is_null();

        let mut state = json!({
            "id": id,
            "name": name,
            "plugin_descriptor_ref": link_state(Some(descriptor)),
            "parent_ref": link_state(parent),
            "configuration": plugin_configuration::to_state(
                plan_config,
                configuration,
                is_import_read
            ),
        });
        if let Some(fields) = state.as_object_mut() {
            fields.insert(self.kind.id_attribute.to_string(), Value::String(id.to_string()));
        }
        state
    }

    fn instance_id<'a>(&self, state: &'a Value) -> Result<&'a str, ProviderError> {
        required_str(state, self.kind.id_attribute).or_else(|_| required_str(state, "id"))
    }
}

#[async_trait]
impl<M: PluginInstance> Resource for PluginInstanceResource<M> {
    fn type_name(&self) -> &'static str {
        self.kind.type_name
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description(self.kind.description)
            .with_attribute("id", id::id_attribute())
            .with_attribute(
                self.kind.id_attribute,
                id::custom_id_attribute(true, self.kind.id_description)
                    .with_validator(Validator::LengthAtLeast { min: 1 }),
            )
            .with_attribute(
                "name",
                Attribute::required_string()
                    .with_description(
                        "The plugin instance name. The name can be modified once the instance is \
                         created.",
                    )
                    .with_validator(Validator::LengthAtLeast { min: 1 }),
            )
            .with_block(
                "plugin_descriptor_ref",
                id_link(
                    "Reference to the plugin descriptor for this instance. The plugin descriptor \
                     cannot be modified once the instance is created.",
                )
                    .required()
                    .with_force_new(),
            )
            .with_block(
                "parent_ref",
                id_link(
                    "The reference to this plugin's parent instance. The parent reference is only \
                     accepted if the plugin type supports parent instances.",
                ),
            )
            .with_block("configuration", plugin_configuration::nested_block())
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
        let body = self.request(plan)?;
        debug!("Add request: {}", serde_json::to_string(&body)?);
        let response: M = client
            .post(&self.collection(), &body)
            .await
            .map_err(|err| http_error(&self.summary("creating"), err))?;
        debug!("Add response: {:?}", response);
        Ok(self.to_state(plan, &response))
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let id = self.instance_id(state)?;
        let summary = self.summary("reading");
        match client.get::<M>(&self.item(id)).await {
            Ok(response) => {
                debug!("Read response: {:?}", response);
                Ok(ReadResult::found(self.to_state(state, &response)))
            },
            Err(err) if err.is_not_found() => Ok(removed_on_not_found(&summary, &err)),
            Err(err) => Err(http_error(&summary, err)),
        }
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        _prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let id = self.instance_id(plan)?;
        let body = self.request(plan)?;
        debug!("Update request: {}", serde_json::to_string(&body)?);
        let response: M = client
            .put(&self.item(id), &body)
            .await
            .map_err(|err| http_error(&self.summary("updating"), err))?;
        Ok(self.to_state(plan, &response))
    }

    async fn delete(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<(), ProviderError> {
        let id = self.instance_id(state)?;
        match client.delete(&self.item(id)).await {
            Err(err) if !err.is_not_found() => Err(http_error(&self.summary("deleting"), err)),
            _ => Ok(()),
        }
    }

    fn import_id_attribute(&self) -> &'static str {
        self.kind.id_attribute
    }
}
