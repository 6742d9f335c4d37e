//! `pingfederate_oauth_client`.
//!
//! Request bodies and state are converted through the resource schema, so
//! every attribute maps onto the camelCase field of the same name. Values the
//! server omits read back as their schema defaults. The client secret and the
//! secondary secrets are carried from the plan because the API never returns
//! their plaintext.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::models::Client;
use crate::client::{http_error, PingFederateClient};
use crate::common::values::{self, is_defined};
use crate::common::{id, json, resource_link};
use crate::error::ProviderError;
use crate::resource::{removed_on_not_found, request_build_error, required_str, Resource};
use crate::schema::{Attribute, AttributeFlags, Block, Diagnostic, NestedBlock, Schema, Validator};
use crate::types::ReadResult;

const PATH: &[&str] = &["oauth", "clients"];

const GRANT_TYPES: &[&str] = &[
    "IMPLICIT",
    "AUTHORIZATION_CODE",
    "RESOURCE_OWNER_CREDENTIALS",
    "CLIENT_CREDENTIALS",
    "REFRESH_TOKEN",
    "EXTENSION",
    "DEVICE_CODE",
    "ACCESS_TOKEN_VALIDATION",
    "CIBA",
    "TOKEN_EXCHANGE",
];

const REUSABLE_GRANT_TYPES: &[&str] =
    &["IMPLICIT", "AUTHORIZATION_CODE", "RESOURCE_OWNER_CREDENTIALS"];

const SIGNING_ALGORITHMS: &[&str] = &[
    "RS256", "RS384", "RS512", "ES256", "ES384", "ES512", "PS256", "PS384", "PS512",
];

// Response signing also accepts the HMAC algorithms.
const RESPONSE_SIGNING_ALGORITHMS: &[&str] = &[
    "RS256", "RS384", "RS512", "HS256", "HS384", "HS512", "ES256", "ES384", "ES512", "PS256",
    "PS384", "PS512",
];

const ID_TOKEN_SIGNING_ALGORITHMS: &[&str] = &[
    "NONE", "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "ES256", "ES384", "ES512",
    "PS256", "PS384", "PS512",
];

const KEY_ENCRYPTION_ALGORITHMS: &[&str] = &[
    "DIR",
    "A128KW",
    "A192KW",
    "A256KW",
    "A128GCMKW",
    "A192GCMKW",
    "A256GCMKW",
    "ECDH_ES",
    "ECDH_ES_A128KW",
    "ECDH_ES_A192KW",
    "ECDH_ES_A256KW",
    "RSA_OAEP",
    "RSA_OAEP_256",
];

const CONTENT_ENCRYPTION_ALGORITHMS: &[&str] = &[
    "AES_128_CBC_HMAC_SHA_256",
    "AES_192_CBC_HMAC_SHA_384",
    "AES_256_CBC_HMAC_SHA_512",
    "AES_128_GCM",
    "AES_192_GCM",
    "AES_256_GCM",
];

const OVERRIDE_TYPES: &[&str] = &["OVERRIDE_SERVER_DEFAULT", "SERVER_DEFAULT"];

const TIME_UNITS: &[&str] = &["MINUTES", "HOURS", "DAYS"];

const CIBA_ATTRIBUTES: &[&str] = &[
    "ciba_delivery_mode",
    "ciba_notification_endpoint",
    "ciba_polling_interval",
    "ciba_require_signed_requests",
    "ciba_request_object_signing_algorithm",
    "ciba_user_code_supported",
];

/// OAuth clients of the authorization server.
pub struct OauthClientResource;

fn flag(description: &str) -> Attribute {
    Attribute::optional_computed_bool()
        .with_default(json!(false))
        .with_description(description)
}

fn empty_set(description: &str) -> Attribute {
    Attribute::string_set(AttributeFlags::optional_computed())
        .with_default(json!([]))
        .with_description(description)
}

fn server_default(values: &[&str], description: &str) -> Attribute {
    Attribute::optional_computed_string()
        .with_default(json!("SERVER_DEFAULT"))
        .with_validator(Validator::one_of(values))
        .with_description(description)
}

fn algorithm(values: &[&str], description: &str) -> Attribute {
    Attribute::optional_string()
        .with_validator(Validator::one_of(values))
        .with_description(description)
}

fn secondary_secrets_block() -> Block {
    Block::new()
        .with_attribute(
            "secret",
            Attribute::required_string().sensitive().with_description(
                "Secondary client secret for Basic Authentication. This field will not be \
                 populated for GET requests.",
            ),
        )
        .with_attribute(
            "expiry_time",
            Attribute::required_string()
                .with_description("The expiry time of the secondary secret."),
        )
}

fn client_auth_block() -> Block {
    Block::new()
        .with_attribute(
            "type",
            Attribute::optional_string()
                .with_description(
                    "Client authentication type. The required field for type SECRET is secret. \
                     The required fields for type CERTIFICATE are client_cert_issuer_dn and \
                     client_cert_subject_dn. The required field for type PRIVATE_KEY_JWT is \
                     either jwks or jwks_url.",
                )
                .with_validator(Validator::one_of(&[
                    "NONE",
                    "CERTIFICATE",
                    "SECRET",
                    "PRIVATE_KEY_JWT",
                ])),
        )
        .with_attribute(
            "secret",
            Attribute::optional_string().sensitive().with_description(
                "Client secret for Basic Authentication. This field will not be populated for \
                 GET requests.",
            ),
        )
        .with_block(
            "secondary_secrets",
            NestedBlock::set(secondary_secrets_block())
                .with_default(json!([]))
                .with_description(
                    "The list of secondary client secrets that are temporarily retained.",
                ),
        )
        .with_attribute(
            "client_cert_issuer_dn",
            Attribute::optional_string().with_description("Client TLS Certificate Issuer DN."),
        )
        .with_attribute(
            "client_cert_subject_dn",
            Attribute::optional_string().with_description("Client TLS Certificate Subject DN."),
        )
        .with_attribute(
            "enforce_replay_prevention",
            Attribute::optional_bool().with_description(
                "Enforce replay prevention on JSON Web Tokens. This field is applicable only for \
                 Private Key JWT Client Authentication.",
            ),
        )
        .with_attribute(
            "token_endpoint_auth_signing_algorithm",
            algorithm(
                SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm that must be used to sign the JSON Web \
                 Tokens. This field is applicable only for Private Key JWT Client \
                 Authentication.",
            ),
        )
}

fn oidc_policy_block() -> Block {
    Block::new()
        .with_attribute(
            "id_token_signing_algorithm",
            algorithm(
                ID_TOKEN_SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm required for the ID Token. A null value \
                 will represent the default algorithm which is RS256.",
            ),
        )
        .with_attribute(
            "id_token_encryption_algorithm",
            algorithm(
                KEY_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] encryption algorithm used to encrypt the content \
                 encryption key for the ID Token.",
            ),
        )
        .with_attribute(
            "id_token_content_encryption_algorithm",
            algorithm(
                CONTENT_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] content encryption algorithm for the ID Token.",
            ),
        )
        .with_block(
            "policy_group",
            resource_link::optional(
                "The Open ID Connect policy. A null value will represent the default policy group.",
            ),
        )
        .with_attribute(
            "grant_access_session_revocation_api",
            flag("Determines whether this client is allowed to access the Session Revocation API."),
        )
        .with_attribute(
            "grant_access_session_session_management_api",
            flag("Determines whether this client is allowed to access the Session Management API."),
        )
        .with_attribute(
            "ping_access_logout_capable",
            flag(
                "Set this value to true if you wish to enable client application logout, and the \
                 client is PingAccess, or its logout endpoints follow the PingAccess path \
                 convention.",
            ),
        )
        .with_attribute(
            "logout_uris",
            Attribute::string_set(AttributeFlags::optional()).with_description(
                "A list of client logout URI's which will be invoked when a user logs out through \
                 one of PingFederate's SLO endpoints.",
            ),
        )
        .with_attribute(
            "pairwise_identifier_user_type",
            flag("Determines whether the subject identifier type is pairwise."),
        )
        .with_attribute(
            "sector_identifier_uri",
            Attribute::optional_string().with_description(
                "The URI references a file with a single JSON array of Redirect URI and JWKS URL \
                 values.",
            ),
        )
}

fn jwks_settings_block() -> Block {
    Block::new()
        .with_attribute(
            "jwks_url",
            Attribute::optional_string()
                .with_description("JSON Web Key Set (JWKS) URL of the OAuth client."),
        )
        .with_attribute(
            "jwks",
            Attribute::optional_string()
                .with_description("JSON Web Key Set (JWKS) document of the OAuth client."),
        )
}

// Every attribute and nested block of the block, with its default or null.
fn default_object(block: &Block) -> Value {
    let mut object = Map::new();
    for (name, attr) in &block.attributes {
        object.insert(name.clone(), attr.default.clone().unwrap_or(Value::Null));
    }
    for (name, nested) in &block.blocks {
        object.insert(name.clone(), nested.default.clone().unwrap_or(Value::Null));
    }
    Value::Object(object)
}

fn build_schema() -> Schema {
    let mut client_auth_default = default_object(&client_auth_block());
    client_auth_default["type"] = json!("NONE");

    Schema::v0()
        .with_description("Manages an Oauth Client")
        .with_attribute("id", id::id_attribute())
        .with_attribute(
            "client_id",
            id::custom_id_attribute(
                true,
                "A unique identifier the client provides to the Resource Server to identify \
                 itself. This identifier is included with every request the client makes.",
            ),
        )
        .with_attribute(
            "name",
            Attribute::required_string().with_description(
                "A descriptive name for the client instance. This name appears when the user is \
                 prompted for authorization.",
            ),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description(
                "A description of what the client application does. This description appears \
                 when the user is prompted for authorization.",
            ),
        )
        .with_attribute(
            "enabled",
            Attribute::optional_computed_bool()
                .with_default(json!(true))
                .with_description(
                    "Specifies whether the client is enabled. The default value is true.",
                ),
        )
        .with_attribute(
            "grant_types",
            Attribute::string_set(AttributeFlags::required())
                .with_validator(Validator::SizeAtLeast { min: 1 })
                .with_validator(Validator::elements_one_of(GRANT_TYPES))
                .with_description(
                    "The grant types allowed for this client. The EXTENSION grant type applies \
                     to SAML/JWT assertion grants.",
                ),
        )
        .with_attribute(
            "redirect_uris",
            empty_set(
                "URIs to which the OAuth AS may redirect the resource owner's user agent after \
                 authorization is obtained.",
            ),
        )
        .with_attribute("restricted_scopes", empty_set("The scopes available for this client."))
        .with_attribute(
            "exclusive_scopes",
            empty_set("The exclusive scopes available for this client."),
        )
        .with_attribute(
            "authorization_detail_types",
            empty_set("The authorization detail types available for this client.")
                .with_validator(Validator::SizeAtLeast { min: 1 }),
        )
        .with_attribute(
            "restricted_response_types",
            empty_set(
                "The response types allowed for this client. If omitted all response types are \
                 available to the client.",
            ),
        )
        .with_attribute(
            "logo_url",
            Attribute::optional_string().with_description(
                "The location of the logo used on user-facing OAuth grant authorization and \
                 revocation pages.",
            ),
        )
        .with_block(
            "default_access_token_manager_ref",
            resource_link::optional("The default access token manager for this client."),
        )
        .with_attribute(
            "restrict_to_default_access_token_manager",
            flag(
                "Determines whether the client is restricted to using only its default access \
                 token manager. The default is false.",
            ),
        )
        .with_attribute(
            "validate_using_all_eligible_atms",
            flag(
                "Validates token using all eligible access token managers for the client. This \
                 setting is ignored if 'restrict_to_default_access_token_manager' is set to true.",
            ),
        )
        .with_attribute(
            "bypass_approval_page",
            flag(
                "Use this setting, for example, when you want to deploy a trusted application and \
                 authenticate end users via an IdP adapter or IdP connection.",
            ),
        )
        .with_attribute(
            "restrict_scopes",
            flag("Restricts this client's access to specific scopes."),
        )
        .with_attribute(
            "require_pushed_authorization_requests",
            flag(
                "Determines whether pushed authorization requests are required when initiating \
                 an authorization request. The default is false.",
            ),
        )
        .with_attribute(
            "require_jwt_secured_authorization_response_mode",
            flag(
                "Determines whether JWT secured authorization response mode is required when \
                 initiating an authorization request. The default is false.",
            ),
        )
        .with_attribute(
            "require_signed_requests",
            flag(
                "Determines whether signed requests are required for this client. The default is \
                 false.",
            ),
        )
        .with_attribute(
            "request_object_signing_algorithm",
            algorithm(
                SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm that must be used to sign the Request \
                 Object. All signing algorithms are allowed if value is not present.",
            ),
        )
        .with_attribute(
            "allow_authentication_api_init",
            flag(
                "Set to true to allow this client to initiate the authentication API \
                 redirectless flow.",
            ),
        )
        .with_attribute(
            "require_proof_key_for_code_exchange",
            flag(
                "Determines whether Proof Key for Code Exchange (PKCE) is required for this \
                 client.",
            ),
        )
        .with_attribute(
            "refresh_rolling",
            server_default(
                &["ROLL", "DONT_ROLL", "SERVER_DEFAULT"],
                "Use ROLL or DONT_ROLL to override the Roll Refresh Token Values setting on the \
                 Authorization Server Settings. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "refresh_token_rolling_interval_type",
            server_default(
                OVERRIDE_TYPES,
                "Use OVERRIDE_SERVER_DEFAULT to override the Refresh Token Rolling Interval value \
                 on the Authorization Server Settings. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "refresh_token_rolling_interval",
            Attribute::optional_int64().with_description(
                "The minimum interval to roll refresh tokens, in hours. This value will override \
                 the Refresh Token Rolling Interval Value on the Authorization Server Settings.",
            ),
        )
        .with_attribute(
            "refresh_token_rolling_grace_period_type",
            server_default(
                OVERRIDE_TYPES,
                "When specified, it overrides the global Refresh Token Grace Period defined in \
                 the Authorization Server Settings. The default value is SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "refresh_token_rolling_grace_period",
            Attribute::optional_int64().with_description(
                "The grace period that a rolled refresh token remains valid in seconds.",
            ),
        )
        .with_attribute(
            "persistent_grant_expiration_type",
            server_default(
                &["INDEFINITE_EXPIRY", "SERVER_DEFAULT", "OVERRIDE_SERVER_DEFAULT"],
                "Allows an administrator to override the Persistent Grant Lifetime set globally \
                 for the OAuth AS. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "persistent_grant_expiration_time",
            Attribute::optional_computed_int64()
                .with_default(json!(0))
                .with_description(
                    "The persistent grant expiration time. -1 indicates an indefinite amount of \
                     time.",
                ),
        )
        .with_attribute(
            "persistent_grant_expiration_time_unit",
            Attribute::optional_computed_string()
                .with_default(json!("DAYS"))
                .with_validator(Validator::one_of(TIME_UNITS))
                .with_description("The persistent grant expiration time unit."),
        )
        .with_attribute(
            "persistent_grant_idle_timeout_type",
            server_default(
                &["INDEFINITE_EXPIRY", "SERVER_DEFAULT", "OVERRIDE_SERVER_DEFAULT"],
                "Allows an administrator to override the Persistent Grant Idle Timeout set \
                 globally for the OAuth AS. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "persistent_grant_idle_timeout",
            Attribute::optional_computed_int64()
                .with_default(json!(0))
                .with_description("The persistent grant idle timeout."),
        )
        .with_attribute(
            "persistent_grant_idle_timeout_time_unit",
            Attribute::optional_computed_string()
                .with_default(json!("DAYS"))
                .with_validator(Validator::one_of(TIME_UNITS))
                .with_description("The persistent grant idle timeout time unit."),
        )
        .with_attribute(
            "persistent_grant_reuse_type",
            server_default(
                OVERRIDE_TYPES,
                "Allows and administrator to override the Reuse Existing Persistent Access Grants \
                 for Grant Types set globally for OAuth AS. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "persistent_grant_reuse_grant_types",
            empty_set(
                "The grant types that the OAuth AS can reuse rather than creating a new grant for \
                 each request. Only 'IMPLICIT' or 'AUTHORIZATION_CODE' or \
                 'RESOURCE_OWNER_CREDENTIALS' are valid grant types.",
            )
            .with_validator(Validator::SizeAtLeast { min: 1 })
            .with_validator(Validator::elements_one_of(REUSABLE_GRANT_TYPES)),
        )
        .with_attribute(
            "client_secret_retention_period_type",
            server_default(
                OVERRIDE_TYPES,
                "Use OVERRIDE_SERVER_DEFAULT to override the Client Secret Retention Period value \
                 on the Authorization Server Settings. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "client_secret_retention_period",
            Attribute::optional_int64().with_description(
                "The length of time in minutes that client secrets will be retained as secondary \
                 secrets after secret change. The default value is 0, which will disable \
                 secondary client secret retention.",
            ),
        )
        .with_attribute(
            "client_secret_changed_time",
            Attribute::computed_string()
                .with_use_state_for_unknown()
                .with_description(
                    "The time at which the client secret was last changed. This property is read \
                     only.",
                ),
        )
        .with_attribute(
            "token_introspection_signing_algorithm",
            algorithm(
                RESPONSE_SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm required to sign the Token Introspection \
                 Response. A null value will represent the default algorithm which is RS256.",
            ),
        )
        .with_attribute(
            "token_introspection_encryption_algorithm",
            algorithm(
                KEY_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] encryption algorithm used to encrypt the \
                 content-encryption key of the Token Introspection Response.",
            ),
        )
        .with_attribute(
            "token_introspection_content_encryption_algorithm",
            algorithm(
                CONTENT_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] content-encryption algorithm for the Token \
                 Introspection Response.",
            ),
        )
        .with_attribute(
            "jwt_secured_authorization_response_mode_signing_algorithm",
            algorithm(
                RESPONSE_SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm required to sign the JWT Secured \
                 Authorization Response. A null value will represent the default algorithm \
                 which is RS256.",
            ),
        )
        .with_attribute(
            "jwt_secured_authorization_response_mode_encryption_algorithm",
            algorithm(
                KEY_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] encryption algorithm used to encrypt the \
                 content-encryption key of the JWT Secured Authorization Response.",
            ),
        )
        .with_attribute(
            "jwt_secured_authorization_response_mode_content_encryption_algorithm",
            algorithm(
                CONTENT_ENCRYPTION_ALGORITHMS,
                "The JSON Web Encryption [JWE] content-encryption algorithm for the JWT Secured \
                 Authorization Response.",
            ),
        )
        .with_attribute(
            "device_flow_setting_type",
            server_default(
                OVERRIDE_TYPES,
                "Allows an administrator to override the Device Authorization Settings set \
                 globally for the OAuth AS. Defaults to SERVER_DEFAULT.",
            ),
        )
        .with_attribute(
            "user_authorization_url_override",
            Attribute::optional_string().with_description(
                "The URL used as 'verification_url' and 'verification_url_complete' values in a \
                 Device Authorization request.",
            ),
        )
        .with_attribute(
            "pending_authorization_timeout_override",
            Attribute::optional_int64()
                .with_description("The 'device_code' and 'user_code' timeout, in seconds."),
        )
        .with_attribute(
            "device_polling_interval_override",
            Attribute::optional_int64().with_description(
                "The amount of time client should wait between polling requests, in seconds.",
            ),
        )
        .with_attribute(
            "bypass_activation_code_confirmation_override",
            Attribute::optional_bool().with_description(
                "Indicates if the Activation Code Confirmation page should be bypassed if \
                 'verification_url_complete' is used by the end user to authorize a device.",
            ),
        )
        .with_attribute(
            "ciba_delivery_mode",
            algorithm(
                &["POLL", "PING"],
                "The token delivery mode for the client. The default value is 'POLL'.",
            ),
        )
        .with_attribute(
            "ciba_notification_endpoint",
            Attribute::optional_string().with_description(
                "The endpoint the OP will call after a successful or failed end-user \
                 authentication.",
            ),
        )
        .with_attribute(
            "ciba_polling_interval",
            Attribute::optional_int64()
                .with_validator(Validator::Int64Between { min: 1, max: 3600 })
                .with_description(
                    "The minimum amount of time in seconds that the Client must wait between \
                     polling requests to the token endpoint.",
                ),
        )
        .with_attribute(
            "ciba_require_signed_requests",
            Attribute::optional_bool().with_description(
                "Determines whether CIBA signed requests are required for this client.",
            ),
        )
        .with_attribute(
            "ciba_request_object_signing_algorithm",
            algorithm(
                SIGNING_ALGORITHMS,
                "The JSON Web Signature [JWS] algorithm that must be used to sign the CIBA \
                 Request Object. All signing algorithms are allowed if value is not present.",
            ),
        )
        .with_attribute(
            "ciba_user_code_supported",
            Attribute::optional_bool().with_description(
                "Determines whether the CIBA user code parameter is supported by this client.",
            ),
        )
        .with_block("request_policy_ref", resource_link::optional("The CIBA request policy."))
        .with_block(
            "token_exchange_processor_policy_ref",
            resource_link::optional("The Token Exchange Processor policy."),
        )
        .with_block(
            "client_auth",
            NestedBlock::single(client_auth_block())
                .with_default(client_auth_default)
                .with_use_state_for_unknown()
                .with_description(
                    "Client authentication settings. If this model is null, it indicates that no \
                     client authentication will be used.",
                ),
        )
        .with_block(
            "oidc_policy",
            NestedBlock::single(oidc_policy_block())
                .with_default(default_object(&oidc_policy_block()))
                .with_use_state_for_unknown()
                .with_description(
                    "Open ID Connect Policy settings. This is included in the message only when \
                     OIDC is enabled.",
                ),
        )
        .with_block(
            "jwks_settings",
            NestedBlock::single(jwks_settings_block()).with_description(
                "JSON Web Key Set Settings of the OAuth client. Required if private key JWT \
                 client authentication or signed requests is enabled.",
            ),
        )
        .with_block(
            "extended_parameters",
            NestedBlock::map(Block::new().with_attribute(
                "values",
                Attribute::string_set(AttributeFlags::optional())
                    .with_description("A list of values"),
            ))
            .with_description(
                "OAuth Client Metadata can be extended to use custom Client Metadata Parameters.",
            ),
        )
        .with_attribute(
            "creation_date",
            Attribute::computed_string()
                .with_use_state_for_unknown()
                .with_description(
                    "The time at which the client was created. This property is read only.",
                ),
        )
        .with_attribute(
            "modification_date",
            Attribute::computed_string()
                .with_use_state_for_unknown()
                .with_description(
                    "The time at which the client was last changed. This property is read only.",
                ),
        )
}

fn request(plan: &Value) -> Result<Client, ProviderError> {
    let schema = build_schema();
    let mut body = json::to_api_value(&schema.block, plan);
    if let Value::Object(fields) = &mut body {
        for read_only in ["id", "creationDate", "modificationDate", "clientSecretChangedTime"] {
            fields.remove(read_only);
        }
        if !values::bool_or_false(plan, "restrict_scopes") {
            fields.remove("restrictedScopes");
        }
    }
    serde_json::from_value(body).map_err(|err| request_build_error("OAuth Client", err))
}

// `known` holds the client secrets: the plan after a write, prior state on read.
fn to_state(known: &Value, response: &Client) -> Result<Value, ProviderError> {
    let schema = build_schema();
    let mut state = json::to_state(&schema.block, response)?;
    json::fill_defaults(&schema.block, &mut state);
    state["id"] = json!(response.client_id);

    let known_auth = known.get("client_auth");
    let secret = known_auth
        .and_then(|auth| values::non_empty_str(auth, "secret"))
        .map_or(Value::Null, |secret| json!(secret));
    // Secondary secrets read back without their plaintext.
    let secondary_secrets = known_auth
        .and_then(|auth| auth.get("secondary_secrets"))
        .filter(|secrets| secrets.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));
    if state["client_auth"].is_null() {
        state["client_auth"] = json!({"type": "NONE"});
    }
    let mut client_auth = default_object(&client_auth_block());
    if let (Some(auth), Some(read)) =
        (client_auth.as_object_mut(), state["client_auth"].as_object())
    {
        auth.extend(read.iter().map(|(k, v)| (k.clone(), v.clone())));
        auth.insert("secret".to_string(), secret);
        auth.insert("secondary_secrets".to_string(), secondary_secrets);
    }
    state["client_auth"] = client_auth;

    if state["oidc_policy"].is_null() {
        state["oidc_policy"] = default_object(&oidc_policy_block());
    }
    json::fill_defaults(&oidc_policy_block(), &mut state["oidc_policy"]);

    Ok(state)
}

fn client_path(id: &str) -> [&str; 3] {
    [PATH[0], PATH[1], id]
}

#[async_trait]
impl Resource for OauthClientResource {
    fn type_name(&self) -> &'static str {
        "oauth_client"
    }

    fn schema(&self) -> Schema {
        build_schema()
    }

    fn validate_config(&self, config: &Value) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut error = |summary: &str| diagnostics.push(Diagnostic::error(summary));

        if (is_defined(config.get("persistent_grant_expiration_time"))
            || is_defined(config.get("persistent_grant_expiration_time_unit")))
            && values::get_str(config, "persistent_grant_expiration_type")
                != Some("OVERRIDE_SERVER_DEFAULT")
        {
            error(
                "persistent_grant_expiration_type must be configured to \
                 \"OVERRIDE_SERVER_DEFAULT\" to modify the other persistent_grant_expiration \
                 values.",
            );
        }

        let rolling_override = values::get_str(config, "refresh_token_rolling_interval_type")
            == Some("OVERRIDE_SERVER_DEFAULT");
        if rolling_override != is_defined(config.get("refresh_token_rolling_interval")) {
            error(
                "refresh_token_rolling_interval must be configured when \
                 refresh_token_rolling_interval_type is \"OVERRIDE_SERVER_DEFAULT\".",
            );
        }

        let client_auth = config.get("client_auth").filter(|v| !v.is_null());
        let jwks_defined = config
            .get("jwks_settings")
            .and_then(Value::as_object)
            .is_some_and(|jwks| jwks.values().any(|v| !v.is_null()));

        if let Some(auth) = client_auth {
            match values::get_str(auth, "type") {
                Some("PRIVATE_KEY_JWT") if !jwks_defined => {
                    error(
                        "jwks_settings must be defined when client_auth is configured to \
                         \"PRIVATE_KEY_JWT\".",
                    );
                },
                Some("CERTIFICATE")
                    if !is_defined(auth.get("client_cert_subject_dn"))
                        || !is_defined(auth.get("client_cert_issuer_dn")) =>
                {
                    error(
                        "client_cert_subject_dn and client_cert_issuer_dn must be defined when \
                         client_auth is configured to \"CERTIFICATE\".",
                    );
                },
                _ => {},
            }
        }

        let grant_types = values::string_set(config, "grant_types").unwrap_or_default();
        if grant_types.iter().any(|grant| grant == "CLIENT_CREDENTIALS") {
            match client_auth {
                Some(auth) => {
                    if values::get_str(auth, "type") != Some("SECRET") {
                        error(
                            "client_auth.type must be set to \"SECRET\" when \
                             \"CLIENT_CREDENTIALS\" is included in grant_types.",
                        );
                    }
                    if values::non_empty_str(auth, "secret").is_none() {
                        error(
                            "client_auth.secret cannot be empty when \"CLIENT_CREDENTIALS\" is \
                             included in grant_types.",
                        );
                    }
                },
                None => error(
                    "client_auth must be defined when \"CLIENT_CREDENTIALS\" is included in \
                     grant_types.",
                ),
            }
        }

        let ciba = grant_types.iter().any(|grant| grant == "CIBA");
        if !ciba && CIBA_ATTRIBUTES.iter().any(|name| is_defined(config.get(*name))) {
            error(
                "ciba attributes can only be configured when \"CIBA\" is included in \
                 grant_types.",
            );
        }
        if ciba
            && values::get_str(config, "ciba_delivery_mode") == Some("PING")
            && !is_defined(config.get("ciba_notification_endpoint"))
        {
            error(
                "ciba_notification_endpoint must be defined when ciba_delivery_mode is \"PING\".",
            );
        }

        let oidc_policy = config.get("oidc_policy").filter(|v| !v.is_null());
        let introspection_encrypted =
            is_defined(config.get("token_introspection_encryption_algorithm"));
        if client_auth.is_none() {
            let hmac_signed = [
                oidc_policy.and_then(|oidc| values::get_str(oidc, "id_token_signing_algorithm")),
                values::get_str(config, "token_introspection_signing_algorithm"),
                values::get_str(
                    config,
                    "jwt_secured_authorization_response_mode_signing_algorithm",
                ),
            ]
            .contains(&Some("HS256"));
            if hmac_signed {
                error("client_auth must be defined when using the \"HS256\" signing algorithm");
            }
            if introspection_encrypted {
                error(
                    "client_auth must be configured when token_introspection_encryption_algorithm \
                     is configured.",
                );
            }
        }

        if values::len(config, "restricted_scopes") > 0
            && !values::bool_or_false(config, "restrict_scopes")
        {
            error("restrict_scopes must be set to true to configure restricted_scopes.");
        }

        if let Some(oidc) = oidc_policy {
            if !values::bool_or_false(oidc, "pairwise_identifier_user_type")
                && is_defined(oidc.get("sector_identifier_uri"))
            {
                error(
                    "sector_identifier_uri can only be configured when \
                     pairwise_identifier_user_type is set to true.",
                );
            }
            if is_defined(oidc.get("id_token_encryption_algorithm"))
                != is_defined(oidc.get("id_token_content_encryption_algorithm"))
            {
                error(
                    "oidc_policy.id_token_encryption_algorithm and \
                     oidc_policy.id_token_content_encryption_algorithm must be configured \
                     together.",
                );
            }
        }

        if !jwks_defined {
            if introspection_encrypted {
                error(
                    "token_introspection_encryption_algorithm must not be configured when \
                     jwks_settings is not configured.",
                );
            }
            if values::bool_or_false(config, "require_signed_requests") {
                error(
                    "require_signed_requests must be false when jwks_settings is not configured.",
                );
            }
        }

        diagnostics
    }

    async fn create(
        &self,
        client: &PingFederateClient,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let body = request(plan)?;
        let response: Client = client
            .post(PATH, &body)
            .await
            .map_err(|err| http_error("An error occurred while creating the OAuth Client", err))?;
        debug!(client_id = %response.client_id, "Created OAuth client");
        to_state(plan, &response)
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<ReadResult, ProviderError> {
        let client_id = required_str(state, "client_id").or_else(|_| required_str(state, "id"))?;
        match client.get::<Client>(&client_path(client_id)).await {
            Ok(response) => Ok(ReadResult::found(to_state(state, &response)?)),
            Err(err) if err.is_not_found() => Ok(removed_on_not_found(
                "An error occurred while getting the OAuth Client",
                &err,
            )),
            Err(err) => Err(http_error("An error occurred while getting the OAuth Client", err)),
        }
    }

    async fn update(
        &self,
        client: &PingFederateClient,
        _prior: &Value,
        plan: &Value,
    ) -> Result<Value, ProviderError> {
        let client_id = required_str(plan, "client_id")?;
        let body = request(plan)?;
        match client.put::<_, Client>(&client_path(client_id), &body).await {
            Ok(response) => to_state(plan, &response),
            Err(err) if err.is_not_found() => Ok(plan.clone()),
            Err(err) => Err(http_error("An error occurred while updating OAuth Client", err)),
        }
    }

    async fn delete(
        &self,
        client: &PingFederateClient,
        state: &Value,
    ) -> Result<(), ProviderError> {
        let client_id = required_str(state, "client_id")?;
        match client.delete(&client_path(client_id)).await {
            Err(err) if !err.is_not_found() => {
                Err(http_error("An error occurred while deleting an OAuth Client", err))
            },
            _ => Ok(()),
        }
    }

    fn import_id_attribute(&self) -> &'static str {
        "client_id"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use crate::plan::plan_resource;
    use crate::validation::validate;
    use httpmock::prelude::*;

    fn summaries(config: Value) -> Vec<String> {
        OauthClientResource
            .validate_config(&config)
            .into_iter()
            .map(|d| d.summary)
            .collect()
    }

    #[test]
    fn test_client_credentials_needs_secret() {
        assert_eq!(
            summaries(json!({
                "client_id": "app",
                "name": "App",
                "grant_types": ["CLIENT_CREDENTIALS"]
            })),
            vec![
                "client_auth must be defined when \"CLIENT_CREDENTIALS\" is included in \
                 grant_types."
            ]
        );
        assert_eq!(
            summaries(json!({
                "client_id": "app",
                "name": "App",
                "grant_types": ["CLIENT_CREDENTIALS"],
                "client_auth": {"type": "NONE"}
            })),
            vec![
                "client_auth.type must be set to \"SECRET\" when \"CLIENT_CREDENTIALS\" is \
                 included in grant_types.",
                "client_auth.secret cannot be empty when \"CLIENT_CREDENTIALS\" is included in \
                 grant_types.",
            ]
        );
        assert!(summaries(json!({
            "client_id": "app",
            "name": "App",
            "grant_types": ["CLIENT_CREDENTIALS"],
            "client_auth": {"type": "SECRET", "secret": "2FederateM0re"}
        }))
        .is_empty());
    }

    #[test]
    fn test_cross_field_rules() {
        assert_eq!(
            summaries(json!({
                "grant_types": ["AUTHORIZATION_CODE"],
                "restricted_scopes": ["email"],
                "persistent_grant_expiration_time": 30,
                "require_signed_requests": true,
                "oidc_policy": {
                    "id_token_signing_algorithm": "HS256",
                    "sector_identifier_uri": "https://example.com"
                }
            })),
            vec![
                "persistent_grant_expiration_type must be configured to \
                 \"OVERRIDE_SERVER_DEFAULT\" to modify the other persistent_grant_expiration \
                 values.",
                "client_auth must be defined when using the \"HS256\" signing algorithm",
                "restrict_scopes must be set to true to configure restricted_scopes.",
                "sector_identifier_uri can only be configured when pairwise_identifier_user_type \
                 is set to true.",
                "require_signed_requests must be false when jwks_settings is not configured.",
            ]
        );
        assert_eq!(
            summaries(json!({
                "grant_types": ["AUTHORIZATION_CODE"],
                "client_auth": {"type": "PRIVATE_KEY_JWT"}
            })),
            vec![
                "jwks_settings must be defined when client_auth is configured to \
                 \"PRIVATE_KEY_JWT\"."
            ]
        );
    }

    #[test]
    fn test_refresh_token_rolling_interval_follows_its_type() {
        let message = "refresh_token_rolling_interval must be configured when \
                       refresh_token_rolling_interval_type is \"OVERRIDE_SERVER_DEFAULT\".";
        assert_eq!(
            summaries(json!({
                "grant_types": ["REFRESH_TOKEN"],
                "refresh_token_rolling_interval_type": "OVERRIDE_SERVER_DEFAULT"
            })),
            vec![message]
        );
        assert_eq!(
            summaries(json!({
                "grant_types": ["REFRESH_TOKEN"],
                "refresh_token_rolling_interval": 12
            })),
            vec![message]
        );
        assert!(summaries(json!({
            "grant_types": ["REFRESH_TOKEN"],
            "refresh_token_rolling_interval_type": "OVERRIDE_SERVER_DEFAULT",
            "refresh_token_rolling_interval": 12
        }))
        .is_empty());
    }

    #[test]
    fn test_ciba_attributes_need_ciba_grant() {
        assert_eq!(
            summaries(json!({
                "grant_types": ["AUTHORIZATION_CODE"],
                "ciba_user_code_supported": true
            })),
            vec![
                "ciba attributes can only be configured when \"CIBA\" is included in \
                 grant_types."
            ]
        );
        assert_eq!(
            summaries(json!({"grant_types": ["CIBA"], "ciba_delivery_mode": "PING"})),
            vec!["ciba_notification_endpoint must be defined when ciba_delivery_mode is \"PING\"."]
        );
        assert!(summaries(json!({
            "grant_types": ["CIBA"],
            "ciba_delivery_mode": "PING",
            "ciba_notification_endpoint": "https://app.example.com/ciba",
            "ciba_polling_interval": 5
        }))
        .is_empty());
    }

    #[test]
    fn test_response_encryption_needs_client_auth_and_jwks() {
        assert_eq!(
            summaries(json!({
                "grant_types": ["AUTHORIZATION_CODE"],
                "token_introspection_signing_algorithm": "HS256",
                "jwt_secured_authorization_response_mode_signing_algorithm": "HS256",
                "token_introspection_encryption_algorithm": "RSA_OAEP"
            })),
            vec![
                "client_auth must be defined when using the \"HS256\" signing algorithm",
                "client_auth must be configured when token_introspection_encryption_algorithm is \
                 configured.",
                "token_introspection_encryption_algorithm must not be configured when \
                 jwks_settings is not configured.",
            ]
        );
        assert!(summaries(json!({
            "grant_types": ["AUTHORIZATION_CODE"],
            "client_auth": {"type": "PRIVATE_KEY_JWT"},
            "jwks_settings": {"jwks_url": "https://app.example.com/jwks"},
            "token_introspection_encryption_algorithm": "RSA_OAEP",
            "token_introspection_content_encryption_algorithm": "AES_128_GCM"
        }))
        .is_empty());
    }

    #[test]
    fn test_id_token_encryption_algorithms_come_in_pairs() {
        assert_eq!(
            summaries(json!({
                "grant_types": ["AUTHORIZATION_CODE"],
                "oidc_policy": {"id_token_encryption_algorithm": "DIR"}
            })),
            vec![
                "oidc_policy.id_token_encryption_algorithm and \
                 oidc_policy.id_token_content_encryption_algorithm must be configured together."
            ]
        );
        assert!(summaries(json!({
            "grant_types": ["AUTHORIZATION_CODE"],
            "oidc_policy": {
                "id_token_encryption_algorithm": "DIR",
                "id_token_content_encryption_algorithm": "AES_256_GCM"
            }
        }))
        .is_empty());
    }

    #[test]
    fn test_grant_types_are_validated() {
        let schema = OauthClientResource.schema();
        let diagnostics = validate(
            &schema,
            &json!({"client_id": "app", "name": "App", "grant_types": ["PASSWORD"]}),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("grant_types"));
        assert!(!validate(
            &schema,
            &json!({"client_id": "app", "name": "App", "grant_types": []})
        )
        .is_empty());
    }

    #[test]
    fn test_algorithm_and_interval_values_are_validated() {
        let schema = OauthClientResource.schema();
        let diagnostics = validate(
            &schema,
            &json!({
                "client_id": "app",
                "name": "App",
                "grant_types": ["CIBA"],
                "ciba_polling_interval": 7200,
                "token_introspection_content_encryption_algorithm": "AES_512_GCM",
                "persistent_grant_reuse_grant_types": ["CLIENT_CREDENTIALS"]
            }),
        );
        let mut attributes: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        attributes.sort_unstable();
        assert_eq!(
            attributes,
            vec![
                "ciba_polling_interval",
                "persistent_grant_reuse_grant_types",
                "token_introspection_content_encryption_algorithm",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_keeps_secret_and_defaults() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/pf-admin-api/v1/oauth/clients")
                    .json_body_partial(
                        r#"{
                        "clientId": "app",
                        "grantTypes": ["CLIENT_CREDENTIALS"],
                        "clientAuth": {"type": "SECRET", "secret": "2FederateM0re"},
                        "refreshRolling": "SERVER_DEFAULT",
                        "enabled": true
                    }"#,
                    );
                then.status(201).json_body(json!({
                    "clientId": "app",
                    "name": "App",
                    "enabled": true,
                    "grantTypes": ["CLIENT_CREDENTIALS"],
                    "redirectUris": [],
                    "refreshRolling": "SERVER_DEFAULT",
                    "persistentGrantExpirationType": "SERVER_DEFAULT",
                    "persistentGrantExpirationTime": 0,
                    "bypassApprovalPage": false,
                    "restrictScopes": false,
                    "clientAuth": {"type": "SECRET", "encryptedSecret": "OBF:JWE:abc"},
                    "oidcPolicy": {
                        "grantAccessSessionRevocationApi": false,
                        "pingAccessLogoutCapable": false
                    },
                    "clientSecretChangedTime": "2024-04-01T10:00:00Z",
                    "creationDate": "2024-04-01T10:00:00Z",
                    "modificationDate": "2024-04-01T10:00:00Z"
                }));
            })
            .await;

        let resource = OauthClientResource;
        let config = json!({
            "client_id": "app",
            "name": "App",
            "grant_types": ["CLIENT_CREDENTIALS"],
            "client_auth": {"type": "SECRET", "secret": "2FederateM0re"}
        });
        let planned = plan_resource(&resource.schema(), None, &config, &config).planned_state;
        let client = client_for(&server.base_url());
        let state = resource.create(&client, &planned).await.unwrap();
        mock.assert_async().await;

        assert_eq!(state["id"], "app");
        assert_eq!(state["client_auth"]["secret"], "2FederateM0re");
        assert_eq!(state["client_auth"]["type"], "SECRET");
        assert_eq!(state["client_auth"]["secondary_secrets"], json!([]));
        assert_eq!(state["persistent_grant_expiration_time_unit"], "DAYS");
        assert_eq!(state["persistent_grant_idle_timeout_time_unit"], "DAYS");
        assert_eq!(state["refresh_token_rolling_interval_type"], "SERVER_DEFAULT");
        assert_eq!(state["device_flow_setting_type"], "SERVER_DEFAULT");
        assert_eq!(state["require_proof_key_for_code_exchange"], false);
        assert_eq!(state["require_jwt_secured_authorization_response_mode"], false);
        assert_eq!(state["oidc_policy"]["pairwise_identifier_user_type"], false);
        assert_eq!(
            state["oidc_policy"]["grant_access_session_session_management_api"],
            false
        );
        assert_eq!(state["oidc_policy"]["policy_group"], Value::Null);
        assert_eq!(state["exclusive_scopes"], json!([]));
        assert_eq!(state["authorization_detail_types"], json!([]));
        assert_eq!(state["jwks_settings"], Value::Null);
        assert_eq!(state["client_secret_changed_time"], "2024-04-01T10:00:00Z");
        assert_eq!(state["creation_date"], "2024-04-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_update_sends_extended_settings() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/pf-admin-api/v1/oauth/clients/app")
                    .json_body_partial(
                        r#"{
                        "grantTypes": ["CIBA", "TOKEN_EXCHANGE"],
                        "cibaDeliveryMode": "PING",
                        "cibaNotificationEndpoint": "https://app.example.com/ciba",
                        "cibaPollingInterval": 5,
                        "requestPolicyRef": {"id": "cibaPolicy"},
                        "tokenExchangeProcessorPolicyRef": {"id": "exchange"},
                        "refreshTokenRollingIntervalType": "OVERRIDE_SERVER_DEFAULT",
                        "refreshTokenRollingInterval": 12,
                        "clientSecretRetentionPeriodType": "OVERRIDE_SERVER_DEFAULT",
                        "clientSecretRetentionPeriod": 30,
                        "authorizationDetailTypes": ["payment"],
                        "clientAuth": {
                            "type": "SECRET",
                            "secret": "2FederateM0re",
                            "secondarySecrets": [
                                {"secret": "0ldSecret", "expiryTime": "2030-01-01T00:00:00Z"}
                            ]
                        },
                        "oidcPolicy": {
                            "policyGroup": {"id": "default"},
                            "grantAccessSessionSessionManagementApi": true
                        }
                    }"#,
                    );
                then.status(200).json_body(json!({
                    "clientId": "app",
                    "name": "App",
                    "grantTypes": ["CIBA", "TOKEN_EXCHANGE"],
                    "cibaDeliveryMode": "PING",
                    "cibaNotificationEndpoint": "https://app.example.com/ciba",
                    "cibaPollingInterval": 5,
                    "requestPolicyRef": {
                        "id": "cibaPolicy",
                        "location": "https://localhost:9999/pf-admin-api/v1/cibaPolicy"
                    },
                    "tokenExchangeProcessorPolicyRef": {"id": "exchange"},
                    "refreshTokenRollingIntervalType": "OVERRIDE_SERVER_DEFAULT",
                    "refreshTokenRollingInterval": 12,
                    "clientSecretRetentionPeriodType": "OVERRIDE_SERVER_DEFAULT",
                    "clientSecretRetentionPeriod": 30,
                    "authorizationDetailTypes": ["payment"],
                    "clientAuth": {
                        "type": "SECRET",
                        "encryptedSecret": "OBF:JWE:abc",
                        "secondarySecrets": [
                            {"encryptedSecret": "OBF:JWE:old", "expiryTime": "2030-01-01T00:00:00Z"}
                        ]
                    },
                    "oidcPolicy": {
                        "policyGroup": {"id": "default"},
                        "grantAccessSessionSessionManagementApi": true
                    }
                }));
            })
            .await;

        let resource = OauthClientResource;
        let config = json!({
            "client_id": "app",
            "name": "App",
            "grant_types": ["CIBA", "TOKEN_EXCHANGE"],
            "ciba_delivery_mode": "PING",
            "ciba_notification_endpoint": "https://app.example.com/ciba",
            "ciba_polling_interval": 5,
            "request_policy_ref": {"id": "cibaPolicy"},
            "token_exchange_processor_policy_ref": {"id": "exchange"},
            "refresh_token_rolling_interval_type": "OVERRIDE_SERVER_DEFAULT",
            "refresh_token_rolling_interval": 12,
            "client_secret_retention_period_type": "OVERRIDE_SERVER_DEFAULT",
            "client_secret_retention_period": 30,
            "authorization_detail_types": ["payment"],
            "client_auth": {
                "type": "SECRET",
                "secret": "2FederateM0re",
                "secondary_secrets": [
                    {"secret": "0ldSecret", "expiry_time": "2030-01-01T00:00:00Z"}
                ]
            },
            "oidc_policy": {
                "policy_group": {"id": "default"},
                "grant_access_session_session_management_api": true
            }
        });
        assert!(resource.validate_config(&config).is_empty());
        let planned = plan_resource(&resource.schema(), None, &config, &config).planned_state;
        let client = client_for(&server.base_url());
        let state = resource.update(&client, &planned, &planned).await.unwrap();
        mock.assert_async().await;

        assert_eq!(state["ciba_delivery_mode"], "PING");
        assert_eq!(state["request_policy_ref"]["id"], "cibaPolicy");
        assert_eq!(state["oidc_policy"]["policy_group"]["id"], "default");
        assert_eq!(
            state["client_auth"]["secondary_secrets"],
            json!([{"secret": "0ldSecret", "expiry_time": "2030-01-01T00:00:00Z"}])
        );
        assert_eq!(state["refresh_token_rolling_interval"], 12);
    }

    #[test]
    fn test_restricted_scopes_only_sent_when_restricted() {
        let plan = json!({
            "client_id": "app",
            "name": "App",
            "grant_types": ["AUTHORIZATION_CODE"],
            "restrict_scopes": false,
            "restricted_scopes": ["email"],
            "client_secret_changed_time": "2024-04-01T10:00:00Z",
            "extended_parameters": {"authNexp": {"values": ["a"]}}
        });
        let body = request(&plan).unwrap();
        assert_eq!(body.restricted_scopes, None);
        assert_eq!(body.client_secret_changed_time, None);
        assert_eq!(body.extended_parameters.unwrap()["authNexp"].values, vec!["a"]);

        let mut restricted = plan.clone();
        restricted["restrict_scopes"] = json!(true);
        assert_eq!(
            request(&restricted).unwrap().restricted_scopes,
            Some(vec!["email".to_string()])
        );
    }

    #[tokio::test]
    async fn test_missing_client() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pf-admin-api/v1/oauth/clients/gone");
                then.status(404).json_body(json!({"resultId": "not_found"}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/pf-admin-api/v1/oauth/clients/gone");
                then.status(404);
            })
            .await;

        let client = client_for(&server.base_url());
        let state = json!({"id": "gone", "client_id": "gone"});
        let result = OauthClientResource.read(&client, &state).await.unwrap();
        assert!(result.is_removed());
        OauthClientResource.delete(&client, &state).await.unwrap();
    }
}
