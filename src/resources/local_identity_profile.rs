//! `pingfederate_local_identity_profile`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::models::LocalIdentityProfile;
use crate::client::{http_error, PingFederateClient};
use crate::common::values::{self, is_defined};
use crate::common::{id, json, resource_link};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, request_build_error, required_str, Resource};
use crate::schema::{
    Attribute, AttributeFlags, AttributeType, Block, Diagnostic, NestedBlock, Schema, Validator,
};
use crate::types::{PlanResult, ReadResult};

const PATH: &[&str] = &["localIdentity", "identityProfiles"];
const THING: &str = "a local identity profile";

const FIELD_TYPES: &[&str] = &[
    "CHECKBOX",
    "CHECKBOX_GROUP",
    "DATE",
    "DROP_DOWN",
    "EMAIL",
    "PHONE",
    "TEXT",
    "HIDDEN",
];
const DATA_STORE_TYPES: &[&str] = &["LDAP", "PING_ONE_LDAP_GATEWAY", "JDBC", "CUSTOM"];

/// Profiles that let end users register and manage a local identity.
pub struct LocalIdentityProfileResource;

fn flag(default: bool, description: &str) -> Attribute {
    Attribute::optional_computed_bool()
        .with_default(json!(default))
        .with_description(description)
}

fn auth_sources_block() -> NestedBlock {
    NestedBlock::list(
        Block::new()
            .with_attribute(
                "id",
                Attribute::optional_computed_string().with_description(
                    "The persistent, unique ID for the local identity authentication source.",
                ),
            )
            .with_attribute(
                "source",
                Attribute::required_string()
                    .with_description("The local identity authentication source."),
            ),
    )
    .with_default(json!([]))
    .with_description("The local identity authentication sources. Sources are unique.")
}

fn auth_source_update_policy_block() -> Block {
    Block::new()
        .with_attribute(
            "store_attributes",
            flag(
                false,
                "Whether or not to store attributes that came from authentication sources.",
            ),
        )
        .with_attribute(
            "retain_attributes",
            flag(false, "Whether or not to keep attributes after user disconnects."),
        )
        .with_attribute(
            "update_attributes",
            flag(false, "Whether or not to update attributes when users authenticate."),
        )
        .with_attribute(
            "update_interval",
            Attribute::optional_computed_int64()
                .with_default(json!(0))
                .with_description("The minimum number of days between updates."),
        )
}

fn registration_config_block() -> Block {
    Block::new()
        .with_attribute(
            "captcha_enabled",
            flag(false, "Allow CAPTCHA to be used during registration."),
        )
        .with_block(
            "captcha_provider_ref",
            resource_link::optional("Reference to the associated CAPTCHA provider."),
        )
        .with_attribute(
            "template_name",
            Attribute::required_string()
                .with_description("The template name for the registration configuration."),
        )
        .with_attribute(
            "create_authn_session_after_registration",
            flag(
                true,
                "Whether to create an Authentication Session when registering a local account. \
                 Default is true.",
            ),
        )
        .with_attribute(
            "username_field",
            Attribute::optional_string().with_description(
                "When creating an Authentication Session after registering a local account, \
                 PingFederate will pass the Unique ID field's value as the username.",
            ),
        )
        .with_attribute(
            "this_is_my_device_enabled",
            flag(false, "Allows users to indicate whether their device is shared or private."),
        )
        .with_block(
            "registration_workflow",
            resource_link::optional(
                "The policy fragment to be executed as part of the registration workflow.",
            ),
        )
        .with_attribute(
            "execute_workflow",
            Attribute::optional_string()
                .with_description(
                    "This setting indicates whether PingFederate should execute the workflow \
                     before or after account creation.",
                )
                .with_validator(
                    Validator::one_of(&["BEFORE_ACCOUNT_CREATION", "AFTER_ACCOUNT_CREATION"]),
                ),
        )
}

fn profile_config_block() -> Block {
    Block::new()
        .with_attribute(
            "delete_identity_enabled",
            flag(false, "Whether the end user is allowed to use delete functionality."),
        )
        .with_attribute(
            "template_name",
            Attribute::required_string()
                .with_description("The template name for end-user profile management."),
        )
}

fn field_config_block() -> Block {
    Block::new()
        .with_block(
            "fields",
            NestedBlock::list(
                Block::new()
                    .with_attribute(
                        "type",
                        Attribute::required_string()
                            .with_description("The type of the local identity field.")
                            .with_validator(Validator::one_of(FIELD_TYPES)),
                    )
                    .with_attribute(
                        "id",
                        Attribute::required_string()
                            .with_description("Id of the local identity field."),
                    )
                    .with_attribute(
                        "label",
                        Attribute::required_string()
                            .with_description("Label of the local identity field."),
                    )
                    .with_attribute(
                        "registration_page_field",
                        Attribute::optional_bool()
                            .with_description("Whether this is a registration page field or not."),
                    )
                    .with_attribute(
                        "profile_page_field",
                        Attribute::optional_bool()
                            .with_description("Whether this is a profile page field or not."),
                    )
                    .with_attribute(
                        "attributes",
                        Attribute::new(
                            AttributeType::map(AttributeType::Bool),
                            AttributeFlags::optional_computed(),
                        )
                            .with_description("Attributes of the local identity field."),
                    ),
            )
            .with_description("The field configuration for the local identity profile."),
        )
        .with_attribute(
            "strip_space_from_unique_field",
            flag(false, "Strip leading/trailing spaces from unique ID field. Default is true."),
        )
}

fn email_verification_config_block() -> Block {
    let template =
        |description: &str| Attribute::optional_computed_string().with_description(description);
    Block::new()
        .with_attribute(
            "email_verification_enabled",
            flag(false, "Whether the email ownership verification is enabled."),
        )
        .with_attribute(
            "verify_email_template_name",
            template("The template name for verify email."),
        )
        .with_attribute(
            "email_verification_sent_template_name",
            template(
                "The template name for email verification sent. Note: Only applicable if \
                 email_verification_type is OTL.",
            ),
        )
        .with_attribute(
            "email_verification_success_template_name",
            template("The template name for email verification success."),
        )
        .with_attribute(
            "email_verification_error_template_name",
            template("The template name for email verification error."),
        )
        .with_attribute(
            "email_verification_type",
            Attribute::optional_string()
                .with_description("Email Verification Type.")
                .with_validator(Validator::one_of(&["OTP", "OTL"])),
        )
        .with_attribute(
            "otp_length",
            Attribute::optional_int64()
                .with_description(
                    "The OTP length generated for email verification. Note: Only applicable if \
                     email_verification_type is OTP.",
                )
                .with_validator(Validator::Int64Between { min: 5, max: 100 }),
        )
        .with_attribute(
            "otp_retry_attempts",
            Attribute::optional_int64()
                .with_description("The number of OTP retry attempts for email verification."),
        )
        .with_attribute(
            "allowed_otp_character_set",
            Attribute::optional_computed_string()
                .with_description("The allowed character set used to generate the OTP."),
        )
        .with_attribute(
            "otp_time_to_live",
            Attribute::optional_computed_int64().with_description("Field used OTP time to live."),
        )
        .with_attribute(
            "email_verification_otp_template_name",
            template("The template name for email verification OTP verification."),
        )
        .with_attribute(
            "otl_time_to_live",
            Attribute::optional_computed_int64().with_description("Field used OTL time to live."),
        )
        .with_attribute(
            "field_for_email_to_verify",
            Attribute::optional_computed_string()
                .with_default(json!(""))
                .with_description("Field used for email ownership verification."),
        )
        .with_attribute(
            "field_storing_verification_status",
            Attribute::optional_computed_string()
                .with_default(json!(""))
                .with_description("Field used for storing email verification status."),
        )
        .with_block(
            "notification_publisher_ref",
            resource_link::optional("Reference to the associated notification publisher."),
        )
        .with_attribute(
            "require_verified_email",
            Attribute::optional_computed_bool().with_description(
                "Whether the user must verify their email address before they can complete a \
                 single sign-on transaction.",
            ),
        )
        .with_attribute(
            "require_verified_email_template_name",
            template(
                "The template to render when the user must verify their email address before they \
                 can complete a single sign-on transaction.",
            ),
        )
}

fn data_store_config_block() -> Block {
    Block::new()
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_description("The data store config type.")
                .with_validator(Validator::one_of(DATA_STORE_TYPES)),
        )
        .with_attribute(
            "base_dn",
            Attribute::required_string().with_description("The base DN to search from."),
        )
        .with_block(
            "data_store_ref",
            resource_link::required("Reference to the associated data store."),
        )
        .with_block(
            "data_store_mapping",
            NestedBlock::map(
                Block::new()
                    .with_attribute(
                        "type",
                        Attribute::required_string()
                            .with_description("The data store attribute type.")
                            .with_validator(Validator::one_of(DATA_STORE_TYPES)),
                    )
                    .with_attribute(
                        "name",
                        Attribute::required_string()
                            .with_description("The data store attribute name."),
                    )
                    .with_attribute(
                        "metadata",
                        Attribute::new(
                            AttributeType::map(AttributeType::String),
                            AttributeFlags::optional_computed(),
                        )
                            .with_default(json!({}))
                            .with_description("The data store attribute metadata."),
                    ),
            )
            .with_min_items(1)
            .with_description("The data store mapping."),
        )
        .with_attribute(
            "create_pattern",
            Attribute::required_string().with_description(
                "The Relative DN Pattern that will be used to create objects in the directory.",
            ),
        )
        .with_attribute(
            "object_class",
            Attribute::required_string().with_description(
                "The Object Class used by the new objects stored in the LDAP data store.",
            ),
        )
        .with_attribute(
            "auxiliary_object_classes",
            Attribute::string_set(AttributeFlags::optional())
                .with_description(
                    "The Auxiliary Object Classes used by the new objects stored in the LDAP data \
                     store.",
                ),
        )
}

fn build_schema() -> Schema {
    Schema::v0()
        .with_description("Manages a configured local identity profile")
        .with_attribute("id", id::id_attribute())
        .with_attribute(
            "profile_id",
            id::custom_id_attribute(
                false,
                "The persistent, unique ID for the local identity profile. It can be any \
                 combination of [a-zA-Z0-9._-].",
            ),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The local identity profile name. Name is unique."),
        )
        .with_block(
            "apc_id",
            resource_link::required(
                "The reference to the authentication policy contract to use for this local \
                 identity profile.",
            ),
        )
        .with_block("auth_sources", auth_sources_block())
        .with_block(
            "auth_source_update_policy",
            NestedBlock::single(auth_source_update_policy_block())
                .with_computed()
                .with_description("The attribute update policy for authentication sources."),
        )
        .with_attribute(
            "registration_enabled",
            flag(false, "Whether the registration configuration is enabled or not."),
        )
        .with_block(
            "registration_config",
            NestedBlock::single(registration_config_block())
                .with_description("The local identity profile registration configuration."),
        )
        .with_block(
            "profile_config",
            NestedBlock::single(profile_config_block())
                .with_description("The local identity profile management configuration."),
        )
        .with_block(
            "field_config",
            NestedBlock::single(field_config_block())
                .with_description("The local identity profile field configuration."),
        )
        .with_block(
            "email_verification_config",
            NestedBlock::single(email_verification_config_block())
                .with_computed()
                .with_description("The local identity email verification configuration."),
        )
        .with_block(
            "data_store_config",
            NestedBlock::single(data_store_config_block())
                .with_description("The local identity profile data store configuration."),
        )
        .with_attribute(
            "profile_enabled",
            flag(false, "Whether the profile configuration is enabled or not."),
        )
}

fn auth_source_update_policy_default() -> Value {
    json!({
        "store_attributes": false,
        "retain_attributes": false,
        "update_attributes": false,
        "update_interval": 0
    })
}

fn email_verification_config_default() -> Value {
    let mut object = Map::new();
    for name in email_verification_config_block().attributes.keys() {
        object.insert(name.clone(), Value::Null);
    }
    object.insert("email_verification_enabled".to_string(), json!(false));
    object.insert("field_for_email_to_verify".to_string(), json!(""));
    object.insert("field_storing_verification_status".to_string(), json!(""));
    object.insert("notification_publisher_ref".to_string(), Value::Null);
    Value::Object(object)
}

// Defaults that depend on whether verification is enabled and on its type.
fn fill_email_verification_defaults(planned: &mut Value, configured: Option<&Value>) {
    let enabled = values::bool_or_false(planned, "email_verification_enabled");
    let verification_type = values::get_str(planned, "email_verification_type").map(str::to_owned);
    let otp = enabled && verification_type.as_deref() == Some("OTP");
    let otl = enabled && verification_type.as_deref() == Some("OTL");

    let defaults = [
        (
            "verify_email_template_name",
            enabled,
            json!("message-template-email-ownership-verification.html"),
        ),
        (
            "email_verification_success_template_name",
            enabled,
            json!("local.identity.email.verification.success.html"),
        ),
        (
            "email_verification_error_template_name",
            enabled,
            json!("local.identity.email.verification.error.html"),
        ),
        ("require_verified_email", enabled, json!(false)),
        ("allowed_otp_character_set", otp, json!("23456789BCDFGHJKMNPQRSTVWXZbcdfghjkmnpqrstvwxz")),
        ("otp_time_to_live", otp, json!(15)),
        (
            "email_verification_otp_template_name",
            otp,
            json!("local.identity.email.verification.otp.html"),
        ),
        (
            "email_verification_sent_template_name",
            otl,
            json!("local.identity.email.verification.sent.html"),
        ),
        ("otl_time_to_live", otl, json!(1440)),
        (
            "require_verified_email_template_name",
            otl,
            json!("local.identity.email.verification.required.html"),
        ),
    ];
    for (name, applies, default) in defaults {
        if is_defined(configured.and_then(|config| config.get(name))) {
            continue;
        }
        planned[name] = if applies { default } else { Value::Null };
    }
}

fn field_attribute_defaults(field_type: &str) -> Option<Value> {
    let names: &[&str] = match field_type {
        "HIDDEN" => &["Unique ID Field", "Mask Log Values"],
        "CHECKBOX" => &["Mask Log Values", "Must Be Checked", "Read-Only"],
        "DATE" => &["Mask Log Values", "Read-Only", "Required"],
        "EMAIL" | "PHONE" | "TEXT" => &[
            "Mask Log Values",
            "Read-Only",
            "Required",
            "Unique ID Field",
        ],
        _ => return None,
    };
    Some(Value::Object(names.iter().map(|name| (name.to_string(), json!(false))).collect()))
}

fn request(plan: &Value) -> Result<LocalIdentityProfile, ProviderError> {
    let mut body = json::to_api_value(&build_schema().block, plan);
    if let Value::Object(fields) = &mut body {
        fields.remove("id");
        if let Some(profile_id) = fields.remove("profileId") {
            fields.insert("id".to_string(), profile_id);
        }
    }
    serde_json::from_value(body).map_err(|err| request_build_error(THING, err))
}

fn to_state(response: &LocalIdentityProfile) -> Result<Value, ProviderError> {
    let schema = build_schema();
    let mut state = json::to_state(&schema.block, response)?;
    json::fill_defaults(&schema.block, &mut state);
    state["profile_id"] = values::string_value(response.id.as_deref());
    state["id"] = state["profile_id"].clone();
    Ok(state)
}

fn profile_path(id: &str) -> [&str; 3] {
    [PATH[0], PATH[1], id]
}

fn fields(config: &Value) -> &[Value] {
    config
        .get("field_config")
        .and_then(|field_config| field_config.get("fields"))
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

#[async_trait]
impl Resource for LocalIdentityProfileResource {
    fn type_name(&self) -> &'static str {
        "local_identity_profile"
    }

    fn schema(&self) -> Schema {
        build_schema()
    }

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut error = |summary: &str, detail: &str| {
            diagnostics.push(Diagnostic::error(summary).with_detail(detail));
        };
        let combination = "Invalid Attribute Combination!";
        let invalid_value = "Invalid Value for Attribute!";

        if let Some(email) = config.get("email_verification_config").filter(|v| !v.is_null()) {
            let verification_type = values::get_str(email, "email_verification_type");
            let forbidden: &[(&str, &str)] = match verification_type {
                Some("OTP") => &[
                    (
                        "otl_time_to_live",
                        "otl_time_to_live attribute is not allowed when email_verification_type is \
                         OTP. Required attributes are otp_length, otp_retry_attempts and \
                         otp_time_to_live.",
                    ),
                    (
                        "require_verified_email_template_name",
                        "require_verified_email_template_name is not allowed when email \
                         verification or require_verified_email is disabled or when \
                         email_verification_type is OTP.",
                    ),
                    (
                        "email_verification_sent_template_name",
                        "email_verification_sent_template_name is not allowed when email \
                         verification or require_verified_email is disabled or when \
                         email_verification_type is OTP.",
                    ),
                ],
                Some("OTL") => &[
                    (
                        "otp_length",
                        "otp_length attribute is not allowed when email_verification_type is OTL. \
                         Required attribute: otl_time_to_live.",
                    ),
                    (
                        "otp_retry_attempts",
                        "otp_retry_attempts attribute is not allowed when email_verification_type \
                         is OTL. Required attribute: otl_time_to_live.",
                    ),
                    (
                        "allowed_otp_character_set",
                        "allowed_otp_character_set attribute is not allowed when \
                         email_verification_type is OTL. Required attribute: otl_time_to_live.",
                    ),
                    (
                        "email_verification_otp_template_name",
                        "email_verification_otp_template_name attribute is not allowed when \
                         email_verification_type is OTL. Required attribute: otl_time_to_live.",
                    ),
                ],
                _ => &[],
            };
            for (name, detail) in forbidden {
                if is_defined(email.get(*name)) {
                    error(combination, *detail);
                }
            }

            if values::bool_or_false(email, "email_verification_enabled") {
                for name in ["field_for_email_to_verify", "field_storing_verification_status"] {
                    if values::non_empty_str(email, name).is_none() {
                        error(
                            "Missing Required Attribute",
                            &format!(
                                "{} is required when email_verification_enabled is set to true",
                                name
                            ),
                        );
                    }
                }
                if !is_defined(email.get("notification_publisher_ref")) {
                    error(
                        "Missing Required Attribute",
                        "notification_publisher_ref is required when email_verification_enabled is \
                         set to true",
                    );
                }
            }
        }

        let registration_enabled = values::bool_or_false(config, "registration_enabled");
        let profile_enabled = values::bool_or_false(config, "profile_enabled");
        let defined = |name: &str| is_defined(config.get(name));

        if !registration_enabled && !profile_enabled {
            let page_blocks = [
                "email_verification_config",
                "data_store_config",
                "field_config",
                "registration_config",
                "profile_config",
            ];
            if page_blocks.iter().any(|name| defined(name)) {
                error(
                    combination,
                    "email, data_store_config, field Config, registration_config and \
                     profile_config are not allowed when registration and profile are disabled.",
                );
            }
            if defined("auth_source_update_policy") {
                error(
                    combination,
                    "auth_source_update_policy is not allowed when registration and profile are \
                     disabled.",
                );
            }
        } else {
            if !profile_enabled {
                for field in fields(config) {
                    if values::get_bool(field, "profile_page_field") == Some(true) {
                        error(
                            invalid_value,
                            "profile_page_field option for the fields attribute should not be set \
                             to 'true' when profile is disabled.",
                        );
                    }
                    if values::get_bool(field, "registration_page_field") == Some(false) {
                        error(
                            invalid_value,
                            "registration_page_field option is required to be set to 'true' for \
                             the fields attribute when registration is the only option enabled.",
                        );
                    }
                }
                if defined("profile_config") {
                    error(
                        combination,
                        "profile_config is not allowed when profile is not enabled.",
                    );
                }
            } else if !defined("profile_config") {
                error(invalid_value, "profile_config is required when profile is enabled.");
            }

            if !registration_enabled {
                for field in fields(config) {
                    if values::get_bool(field, "registration_page_field") == Some(true) {
                        error(
                            invalid_value,
                            "registration_page_field option for the fields attribute should not be \
                             set to 'true' when registration is disabled.",
                        );
                    }
                    if values::get_bool(field, "profile_page_field") == Some(false) {
                        error(
                            invalid_value,
                            "profile_page_field option is required to be set to 'true' for the \
                             fields attribute when profile management is the only option enabled.",
                        );
                    }
                }
                if defined("registration_config") {
                    error(
                        "Invalid Attribute!",
                        "registration_config is not allowed when registration is not enabled.",
                    );
                }
            } else if !defined("registration_config") {
                error(
                    invalid_value,
                    "registration_config is required when registration is enabled.",
                );
            }
        }

        if let Some(registration) = config.get("registration_config").filter(|v| !v.is_null()) {
            let captcha_enabled = values::bool_or_false(registration, "captcha_enabled");
            if captcha_enabled != is_defined(registration.get("captcha_provider_ref")) {
                error(
                    "Invalid registration captcha settings",
                    "If registration_config.captcha_enabled is set to true, then \
                     registration_config.captcha_provider_ref must be configured. If \
                     registration_config.captcha_enabled is false, then \
                     registration_config.captcha_provider_ref must not be configured.",
                );
            }
        }

        diagnostics
    }

    fn modify_plan(&self, _prior: Option<&Value>, config: &Value, plan: &mut PlanResult) {
        let planned = &mut plan.planned_state;
        let enabled = values::bool_or_false(planned, "registration_enabled")
            || values::bool_or_false(planned, "profile_enabled");

        if !is_defined(config.get("auth_source_update_policy")) {
            planned["auth_source_update_policy"] =
                if enabled { auth_source_update_policy_default() } else { Value::Null };
        }
        let email_config = config.get("email_verification_config").filter(|v| !v.is_null());
        if email_config.is_none() {
            planned["email_verification_config"] =
                if enabled { email_verification_config_default() } else { Value::Null };
        }
        if planned["email_verification_config"].is_object() {
            fill_email_verification_defaults(
                &mut planned["email_verification_config"],
                email_config,
            );
        }

        let configured_fields = fields(config);
        if let Some(planned_fields) = planned
            .get_mut("field_config")
            .and_then(|field_config| field_config.get_mut("fields"))
            .and_then(Value::as_array_mut)
        {
            for (i, field) in planned_fields.iter_mut().enumerate() {
                if is_defined(configured_fields.get(i).and_then(|f| f.get("attributes"))) {
                    continue;
                }
                let defaults = values::get_str(field, "type").and_then(field_attribute_defaults);
                if let Some(defaults) = defaults {
                    field["attributes"] = defaults;
                }
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
        let response: LocalIdentityProfile = client
            .post(PATH, &body)
            .await
            .map_err(|err| {
                http_error("An error occurred while creating the local identity profiles", err)
            })?;
        to_state(&response)
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let profile_id = required_str(state, "profile_id").or_else(|_| required_str(state, "id"))?;
        let summary = "An error occurred while getting the local identity profile";
        match client.get::<LocalIdentityProfile>(&profile_path(profile_id)).await {
            Ok(response) => Ok(ReadResult::found(to_state(&response)?)),
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
        let profile_id = required_str(plan, "profile_id")?;
        let body = request(plan)?;
        let response: LocalIdentityProfile = client
            .put(&profile_path(profile_id), &body)
            .await
            .map_err(|err| {
                http_error("An error occurred while updating a local identity profile", err)
            })?;
        to_state(&response)
    }

    async fn delete(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<(), ProviderError> {
        let profile_id = required_str(state, "profile_id")?;
        match client.delete(&profile_path(profile_id)).await {
            Err(err) if !err.is_not_found() => {
                Err(http_error("An error occurred while deleting local identity profile", err))
            },
            _ => Ok(()),
        }
    }

    fn import_id_attribute(&self) -> &'static str {
        "profile_id"
    }
}
