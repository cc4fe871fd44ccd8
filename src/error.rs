//! Error types for REST calls.
//!
//! Failed responses are split into [`Error::Validation`] (HTTP 400) and
//! [`Error::Remote`] (every other non-success status). Both keep the raw
//! response body so a failed call can always be diagnosed, and optionally a
//! structured detail object decoded by the configured serializer.

use crate::serializer::ContentSerializer;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

/// The main error type for REST calls.
///
/// # Examples
///
/// ```no_run
/// use restline::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// match client.get::<serde_json::Value>("items/{0}", restline::args![7]).await {
///     Ok(response) => println!("Success: {:?}", response.data),
///     Err(Error::Validation { raw_response, .. }) => {
///         eprintln!("Rejected by the service: {}", raw_response);
///     }
///     Err(Error::Remote { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The service answered with `400 Bad Request`.
    ///
    /// `detail` is populated only when the client is configured with
    /// [`ErrorBody::Structured`](crate::ErrorBody::Structured) for bad requests
    /// and the body could be decoded.
    #[error("Bad request (status {status}): {raw_response}")]
    Validation {
        /// The HTTP status code (always 400)
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The decoded error body, if configured and decodable
        detail: Option<serde_json::Value>,
        /// The response headers
        headers: HeaderMap,
    },

    /// The service answered with a non-success status other than 400.
    #[error("HTTP error {status}: {raw_response}")]
    Remote {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The decoded error body, if configured and decodable
        detail: Option<serde_json::Value>,
        /// The response headers
        headers: HeaderMap,
    },

    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    ///
    /// Transport faults are never retried.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A fault raised by an injected transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The call was cancelled through its cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Failed to deserialize a successful response body into the declared type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serializer error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration was provided, including malformed URL templates
    /// and invalid header names or values.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The resolved URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Several operations run through the blocking bridge failed at once.
    #[error("{} operations failed; first: {}", .0.len(), .0.first().map(ToString::to_string).unwrap_or_default())]
    Composite(Vec<Error>),

    /// The blocking bridge could not start its worker.
    #[error("Failed to start blocking worker: {0}")]
    Runtime(#[from] std::io::Error),
}

impl Error {
    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Validation { status, .. } => Some(*status),
            Error::Remote { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Validation { raw_response, .. } => Some(raw_response),
            Error::Remote { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the structured error detail, when one was decoded.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            Error::Validation { detail, .. } | Error::Remote { detail, .. } => detail.as_ref(),
            _ => None,
        }
    }

    /// Decodes the structured error detail into a typed error contract.
    ///
    /// Returns `None` when there is no detail or it does not match `T`.
    ///
    /// ```
    /// use restline::Error;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct SoftError { code: String }
    ///
    /// let err = Error::Validation {
    ///     status: http::StatusCode::BAD_REQUEST,
    ///     raw_response: r#"{"code":"bad_date"}"#.to_string(),
    ///     detail: Some(serde_json::json!({"code": "bad_date"})),
    ///     headers: http::HeaderMap::new(),
    /// };
    ///
    /// let detail: SoftError = err.detail_as().unwrap();
    /// assert_eq!(detail.code, "bad_date");
    /// ```
    pub fn detail_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.detail()?.clone()).ok()
    }

    /// Returns `true` for `400 Bad Request` errors.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

/// How the body of an error response is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBody {
    /// Keep the raw text only.
    #[default]
    Text,
    /// Also decode the body with the configured serializer into
    /// [`Error::detail`]. Bodies that fail to decode keep their raw text.
    Structured,
}

/// Raw text reported for an error response with an empty body.
pub(crate) const NO_DETAILS: &str = "(no details returned)";

/// Turns a non-success response into [`Error::Validation`] or [`Error::Remote`].
///
/// Failing to read or decode the body never replaces the primary error: the
/// raw text falls back to a placeholder and the detail is left empty.
pub(crate) async fn classify_error(
    response: reqwest::Response,
    serializer: &dyn ContentSerializer,
    bad_request_body: ErrorBody,
    server_error_body: ErrorBody,
) -> Error {
    let status = response.status();
    let headers = response.headers().clone();
    let (raw_response, has_content) = match response.text().await {
        Ok(text) if text.is_empty() => (NO_DETAILS.to_string(), false),
        Ok(text) => (text, true),
        Err(e) => (format!("(failed to read content: {})", e), false),
    };

    let format = if status == StatusCode::BAD_REQUEST {
        bad_request_body
    } else {
        server_error_body
    };
    let detail = match format {
        ErrorBody::Structured if has_content => {
            match serializer.deserialize(&raw_response) {
                Ok(detail) => Some(detail),
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to decode error response body"
                    );
                    None
                }
            }
        }
        _ => None,
    };

    if status.is_client_error() {
        tracing::error!(
            status = status.as_u16(),
            response = %raw_response,
            "Client error (4xx)"
        );
    } else if status.is_server_error() {
        tracing::warn!(
            status = status.as_u16(),
            response = %raw_response,
            "Server error (5xx)"
        );
    }

    if status == StatusCode::BAD_REQUEST {
        Error::Validation {
            status,
            raw_response,
            detail,
            headers,
        }
    } else {
        Error::Remote {
            status,
            raw_response,
            detail,
            headers,
        }
    }
}

/// A specialized `Result` type for REST calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::JsonSerializer;
    use serde::Deserialize;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        let response = http::Response::builder()
            .status(status)
            .header("x-request-id", "r-1")
            .body(body)
            .unwrap();
        reqwest::Response::from(response)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct SoftError {
        code: String,
        message: String,
    }

    #[tokio::test]
    async fn test_bad_request_is_validation_error() {
        let err = classify_error(
            response(400, "Date is invalid"),
            &JsonSerializer::new(),
            ErrorBody::Text,
            ErrorBody::Text,
        )
        .await;

        assert!(err.is_validation());
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.raw_response(), Some("Date is invalid"));
        assert!(err.detail().is_none());
    }

    #[tokio::test]
    async fn test_empty_error_body_gets_placeholder() {
        let err = classify_error(
            response(404, ""),
            &JsonSerializer::new(),
            ErrorBody::Structured,
            ErrorBody::Structured,
        )
        .await;

        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.raw_response(), Some(NO_DETAILS));
        assert!(err.detail().is_none());
        assert!(!err.to_string().ends_with(": "));
    }

    #[tokio::test]
    async fn test_structured_bad_request_detail() {
        let err = classify_error(
            response(400, r#"{"code":"date","message":"Date is invalid"}"#),
            &JsonSerializer::new(),
            ErrorBody::Structured,
            ErrorBody::Text,
        )
        .await;

        let detail: SoftError = err.detail_as().unwrap();
        assert_eq!(
            detail,
            SoftError {
                code: "date".to_string(),
                message: "Date is invalid".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_detail_keeps_primary_error() {
        let err = classify_error(
            response(503, "<html>down</html>"),
            &JsonSerializer::new(),
            ErrorBody::Structured,
            ErrorBody::Structured,
        )
        .await;

        match err {
            Error::Remote {
                status,
                raw_response,
                detail,
                headers,
            } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(raw_response, "<html>down</html>");
                assert!(detail.is_none());
                assert_eq!(headers.get("x-request-id").unwrap(), "r-1");
            }
            other => panic!("Expected Remote, got {:?}", other),
        }
    }

    #[test]
    fn test_composite_display() {
        let err = Error::Composite(vec![Error::Timeout, Error::Cancelled]);
        assert_eq!(err.to_string(), "2 operations failed; first: Request timed out");
    }
}
