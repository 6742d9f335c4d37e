//! The `source` of an attribute fulfillment.

use serde_json::{json, Value};

use super::values::{get_str, opt_string};
use crate::client::models::SourceTypeIdKey;
use crate::schema::{Attribute, Block, NestedBlock, Validator};

/// Every source type the admin API accepts.
pub const SOURCE_TYPES: &[&str] = &[
    "TOKEN_EXCHANGE_PROCESSOR_POLICY",
    "ACCOUNT_LINK",
    "ADAPTER",
    "ASSERTION",
    "CONTEXT",
    "CUSTOM_DATA_STORE",
    "EXPRESSION",
    "JDBC_DATA_STORE",
    "LDAP_DATA_STORE",
    "PING_ONE_LDAP_GATEWAY_DATA_STORE",
    "MAPPED_ATTRIBUTES",
    "NO_MAPPING",
    "TEXT",
    "TOKEN",
    "REQUEST",
    "OAUTH_PERSISTENT_GRANT",
    "SUBJECT_TOKEN",
    "ACTOR_TOKEN",
    "PASSWORD_CREDENTIAL_VALIDATOR",
    "IDP_CONNECTION",
    "AUTHENTICATION_POLICY_CONTRACT",
    "CLAIMS",
    "LOCAL_IDENTITY_PROFILE",
    "EXTENDED_CLIENT_METADATA",
    "EXTENDED_PROPERTIES",
    "TRACKED_HTTP_PARAMS",
    "FRAGMENT",
    "INPUTS",
    "ATTRIBUTE_QUERY",
    "IDENTITY_STORE_USER",
    "IDENTITY_STORE_GROUP",
    "SCIM_USER",
    "SCIM_GROUP",
];

/// `{type, id}` block.
pub fn block() -> Block {
    Block::new()
        .with_attribute(
            "type",
            Attribute::required_string()
                .with_description("The source type of this key.")
                .with_validator(Validator::one_of(SOURCE_TYPES)),
        )
        .with_attribute(
            "id",
            Attribute::optional_string().with_description(
                "The attribute source ID that refers to the attribute source that this key \
                 references.",
            ),
        )
}

/// The required `source` block.
pub fn source() -> NestedBlock {
    NestedBlock::single(block()).required()
}

/// Request struct for a `source` in state.
pub fn client_struct(value: &Value) -> Option<SourceTypeIdKey> {
    Some(SourceTypeIdKey {
        source_type: get_str(value, "type")?.to_string(),
        id: opt_string(value, "id"),
    })
}

/// State value for a `source`.
pub fn to_state(key: &SourceTypeIdKey) -> Value {
    json!({
        "type": key.source_type,
        "id": key.id,
    })
}
