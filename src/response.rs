//! Result wrapper carrying the call's value together with response metadata.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// The outcome of a successful call.
///
/// `data` is `None` when the response carried no value: an empty body for
/// deserialized results, or a `()` result type.
///
/// # Examples
///
/// ```no_run
/// use restline::{args, Client};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Item {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), restline::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// let response = client.get::<Item>("items/{0}", args![123]).await?;
///
/// if let Some(item) = &response.data {
///     println!("Item: {}", item.name);
/// }
/// println!("Request took {:?} over {} attempt(s)", response.latency, response.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The call's value.
    pub data: Option<T>,

    /// The raw response body, when it was buffered.
    ///
    /// Only deserialized results buffer the body; raw content and streams
    /// leave it unread.
    pub raw_body: Option<String>,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the start of the call until the response was processed,
    /// including every retry and backoff delay.
    pub latency: Duration,

    /// The number of attempts made to complete this call.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: Option<T>,
        raw_body: Option<String>,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use restline::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     Some(42),
    ///     Some("42".to_string()),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    ///     1,
    /// );
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data.as_deref(), Some("42"));
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: self.data.map(f),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns the data, dropping the metadata.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Returns `true` if the call required retries.
    ///
    /// ```
    /// # use restline::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::<()>::new(
    ///     None,
    ///     None,
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    ///     3,
    /// );
    ///
    /// assert!(response.was_retried());
    /// ```
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    ///
    /// ```
    /// # use restline::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::<()>::new(
    ///     None,
    ///     None,
    ///     StatusCode::OK,
    ///     headers,
    ///     Duration::from_millis(100),
    ///     1,
    /// );
    ///
    /// assert_eq!(response.header("content-type").unwrap(), "application/json");
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
