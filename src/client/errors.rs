//! Conversion of failed API calls into diagnostics.

use serde::Deserialize;
use tracing::{debug, warn};

use super::ApiError;
use crate::error::ProviderError;
use crate::schema::Diagnostic;

/// Error envelope returned by the admin API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PingFederateError {
    /// Schema URNs of the error.
    #[serde(default)]
    pub schemas: Vec<String>,
    /// Status code as a string.
    #[serde(default)]
    pub status: String,
    /// Human-readable detail.
    #[serde(default)]
    pub detail: String,
}

fn parse_body(err: &ApiError) -> Option<(&str, PingFederateError)> {
    let body = err.body()?;
    debug!("Error HTTP response body: {}", body);
    match serde_json::from_str::<PingFederateError>(body) {
        Ok(envelope) => Some((body, envelope)),
        Err(parse_err) => {
            warn!("Failed to unmarshal HTTP response body: {}", parse_err);
            None
        },
    }
}

/// Error diagnostic for a failed call. A JSON error body is appended verbatim.
pub fn report_http_error(summary: &str, err: &ApiError) -> Diagnostic {
    let detail = match parse_body(err) {
        Some((body, _)) => format!("{} - Detail: {}", err, body),
        None => err.to_string(),
    };
    Diagnostic::error(summary).with_detail(detail)
}

/// Warning diagnostic for a failed call, carrying only the envelope's `detail`.
pub fn report_http_error_as_warning(summary: &str, err: &ApiError) -> Diagnostic {
    let detail = match parse_body(err) {
        Some((_, envelope)) => format!("{} - Detail: {}", err, envelope.detail),
        None => err.to_string(),
    };
    Diagnostic::warning(summary).with_detail(detail)
}

/// [`report_http_error`] wrapped as a [`ProviderError`].
pub fn http_error(summary: &str, err: ApiError) -> ProviderError {
    ProviderError::diagnostic(report_http_error(summary, &err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;
    use reqwest::StatusCode;

    fn status_error(status: StatusCode, body: &str) -> ApiError {
        ApiError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_error_appends_raw_body() {
        let body = r#"{"schemas":["urn:pingidentity:api:messages:2.0:Error"],"status":"422","detail":"Validation error(s) occurred."}"#;
        let err = status_error(StatusCode::UNPROCESSABLE_ENTITY, body);

        let diagnostic =
            report_http_error("An error occurred while creating the OAuth Client", &err);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
        assert_eq!(
            diagnostic.summary,
            "An error occurred while creating the OAuth Client"
        );
        assert_eq!(
            diagnostic.detail,
            Some(format!("422 Unprocessable Entity - Detail: {}", body))
        );
    }

    #[test]
    fn test_warning_uses_envelope_detail() {
        let err = status_error(
            StatusCode::NOT_FOUND,
            r#"{"status":"404","detail":"Resource not found."}"#,
        );

        let diagnostic = report_http_error_as_warning("OAuth Client not found", &err);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(
            diagnostic.detail.as_deref(),
            Some("404 Not Found - Detail: Resource not found.")
        );
    }

    #[test]
    fn test_unparseable_body_falls_back_to_error_text() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

        let diagnostic = report_http_error("An error occurred", &err);
        assert_eq!(diagnostic.detail.as_deref(), Some("502 Bad Gateway"));

        let diagnostic = report_http_error_as_warning("An error occurred", &err);
        assert_eq!(diagnostic.detail.as_deref(), Some("502 Bad Gateway"));
    }

    #[test]
    fn test_errors_without_body() {
        let err = ApiError::Url("not a base".to_string());
        let diagnostic = report_http_error("An error occurred", &err);
        assert_eq!(diagnostic.detail.as_deref(), Some("invalid request URL: not a base"));
    }

    #[test]
    fn test_http_error_wraps_diagnostic() {
        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        match http_error("An error occurred while updating", err) {
            ProviderError::Diagnostics(diagnostics) => {
                assert_eq!(diagnostics.len(), 1);
                assert_eq!(
                    diagnostics[0].detail.as_deref(),
                    Some("500 Internal Server Error")
                );
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
