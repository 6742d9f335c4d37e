//! `pingfederate_key_pair_signing_import`: look up an imported signing key pair.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::models::KeyPairView;
use crate::client::{http_error, PingFederateClient};
use crate::common::values;
use crate::error::ProviderError;
use crate::resource::{required_str, DataSource};
use crate::schema::{Attribute, Schema, Validator};

const SUMMARY: &str = "An error occurred while getting the KeyPair Signing Import";

/// Signing key pair imported from a PKCS12 or PEM file.
pub struct KeyPairSigningImportDataSource;

// The key material and its password are never returned by the server.
fn to_state(config: &Value, response: &KeyPairView) -> Value {
    json!({
        "id": response.id.as_deref().or_else(|| values::get_str(config, "id")),
        "file_data": config.get("file_data").cloned().unwrap_or(Value::Null),
        "format": config.get("format").cloned().unwrap_or(Value::Null),
        "password": config.get("password").cloned().unwrap_or(Value::Null),
        "crypto_provider": response.crypto_provider,
    })
}

#[async_trait]
impl DataSource for KeyPairSigningImportDataSource {
    fn type_name(&self) -> &'static str {
        "key_pair_signing_import"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Data source to retrieve a KeyPair Signing Import.")
            .with_attribute(
                "id",
                Attribute::optional_computed_string().with_description(
                    "The persistent, unique ID for the certificate. It can be any combination of \
                     [a-z0-9._-].",
                ),
            )
            .with_attribute(
                "file_data",
                Attribute::required_string()
                    .with_description("Base-64 encoded PKCS12 or PEM file data."),
            )
            .with_attribute(
                "format",
                Attribute::required_string()
                    .with_description("Key pair file format.")
                    .with_validator(Validator::one_of(&["PKCS12", "PEM"])),
            )
            .with_attribute(
                "password",
                Attribute::required_string()
                    .sensitive()
                    .with_description("Password for the file."),
            )
            .with_attribute(
                "crypto_provider",
                Attribute::computed_string()
                    .with_description(
                        "Cryptographic Provider. This is only applicable if Hybrid HSM mode is \
                         true.",
                    )
                    .with_validator(Validator::one_of(&["LOCAL", "HSM"])),
            )
    }

    async fn read(
        &self,
        client: &PingFederateClient,
        config: &Value,
    ) -> Result<Value, ProviderError> {
        let id = required_str(config, "id")?;
        let response: KeyPairView = client
            .get(&["keyPairs", "signing", id])
            .await
            .map_err(|err| http_error(SUMMARY, err))?;
        debug!("Read response: {:?}", response);
        Ok(to_state(config, &response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::client_for;
    use crate::validation::validate;
    use httpmock::prelude::*;

    fn config() -> Value {
        json!({
            "id": "signing",
            "file_data": "MIIJ...",
            "format": "PKCS12",
            "password": "2FederateM0re",
            "crypto_provider": null
        })
    }

    #[tokio::test]
    async fn test_read_carries_file_settings() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/pf-admin-api/v1/keyPairs/signing/signing");
                then.status(200).json_body(json!({
                    "id": "signing",
                    "subjectDN": "CN=signing",
                    "keyAlgorithm": "RSA",
                    "cryptoProvider": "LOCAL",
                    "status": "VALID"
                }));
            })
            .await;

        let client = client_for(&server.base_url());
        let state = KeyPairSigningImportDataSource.read(&client, &config()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(
            state,
            json!({
                "id": "signing",
                "file_data": "MIIJ...",
                "format": "PKCS12",
                "password": "2FederateM0re",
                "crypto_provider": "LOCAL"
            })
        );
    }

    #[tokio::test]
    async fn test_read_error_summary() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/pf-admin-api/v1/keyPairs/signing/signing");
                then.status(404).json_body(json!({
                    "resultId": "not_found",
                    "message": "Resource not found."
                }));
            })
            .await;

        let client = client_for(&server.base_url());
        let err = KeyPairSigningImportDataSource.read(&client, &config()).await.unwrap_err();
        assert_eq!(err.into_diagnostics()[0].summary, SUMMARY);
    }

    #[test]
    fn test_format_is_validated() {
        let mut bad = config();
        bad["format"] = json!("DER");
        let diagnostics = validate(&KeyPairSigningImportDataSource.schema(), &bad);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("format"));
    }
}
