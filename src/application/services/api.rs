//! Shared request/response handling for the Storyblok APIs

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::infrastructure::traits::{ApiRequest, ApiResponse, HttpTransport};

/// Phrases the management API uses for duplicate names.
const ALREADY_EXISTS_MARKERS: [&str; 2] = ["already exists", "already been taken"];

/// Human-readable message from an error response.
///
/// Order: `error` string, `error.message`, whole JSON body, raw text, status text.
pub fn api_error_message(response: &ApiResponse) -> String {
    let body = response.body.trim();
    if body.is_empty() {
        return response.reason.clone();
    }

    match serde_json::from_str::<Value>(body) {
        Ok(json) => match json.get("error") {
            Some(Value::String(message)) => message.clone(),
            Some(error) => match error.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => pretty(&json),
            },
            None => pretty(&json),
        },
        Err(_) => body.to_string(),
    }
}

fn pretty(json: &Value) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
}

/// True for API errors reporting a duplicate resource.
pub fn is_already_exists(error: &ApplicationError) -> bool {
    match error {
        ApplicationError::Api { message, .. } => {
            let message = message.to_ascii_lowercase();
            ALREADY_EXISTS_MARKERS.iter().any(|m| message.contains(m))
        }
        _ => false,
    }
}

/// Send a request; non-2xx statuses become `ApplicationError::Api`.
pub(crate) fn send_checked(
    http: &dyn HttpTransport,
    operation: &'static str,
    request: &ApiRequest,
) -> ApplicationResult<ApiResponse> {
    debug!(operation, url = %request.url, "sending request");
    let response = http
        .send(request)
        .with_context(|| format!("{operation}: {}", request.url))?;

    if response.is_success() {
        Ok(response)
    } else {
        Err(ApplicationError::Api {
            operation,
            status: response.status,
            message: api_error_message(&response),
        })
    }
}

/// Decode a successful response body.
pub(crate) fn parse_body<T: DeserializeOwned>(
    operation: &'static str,
    response: &ApiResponse,
) -> ApplicationResult<T> {
    serde_json::from_str(&response.body).map_err(|e| ApplicationError::InvalidResponse {
        operation,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            reason: "Unprocessable Entity".to_string(),
            body: body.to_string(),
        }
    }

    #[rstest]
    #[case(r#"{"error":"Unauthorized"}"#, "Unauthorized")]
    #[case(r#"{"error":{"message":"Component already exists"}}"#, "Component already exists")]
    #[case("plain failure", "plain failure")]
    #[case("", "Unprocessable Entity")]
    fn test_api_error_message(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(api_error_message(&response(422, body)), expected);
    }

    #[test]
    fn given_unrecognised_json_when_extracting_message_then_pretty_prints_body() {
        let message = api_error_message(&response(422, r#"{"name":["has already been taken"]}"#));
        assert!(message.contains("\"name\""));
        assert!(message.contains("has already been taken"));
        assert!(message.contains('\n'));
    }

    #[rstest]
    #[case("Component already exists", true)]
    #[case("{\n  \"name\": [\n    \"has already been taken\"\n  ]\n}", true)]
    #[case("Unauthorized", false)]
    fn test_is_already_exists(#[case] message: &str, #[case] expected: bool) {
        let error = ApplicationError::Api {
            operation: "create component",
            status: 422,
            message: message.to_string(),
        };
        assert_eq!(is_already_exists(&error), expected);
    }
}
