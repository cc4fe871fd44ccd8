//! Response body materialization.
//!
//! The declared result type of a call decides, once and up front, how the
//! response body is read. That decision is a [`ReturnKind`], exposed through
//! the [`ResponseBody`] trait:
//!
//! | Result type        | Kind                      | Body handling                    |
//! |--------------------|---------------------------|----------------------------------|
//! | `()`               | [`ReturnKind::None`]      | not read                         |
//! | [`RawResponse`]    | [`ReturnKind::RawMessage`]| whole response handed over       |
//! | [`StatusCode`]     | [`ReturnKind::StatusCode`]| only the status is kept          |
//! | [`RawContent`]     | [`ReturnKind::RawContent`]| content handed over unread       |
//! | [`ByteStream`]     | [`ReturnKind::Stream`]    | live, unbuffered byte stream     |
//! | [`Json<T>`]        | [`ReturnKind::Object`]    | buffered as text and deserialized|

use crate::serializer::ContentSerializer;
use crate::state::{CallState, ReturnKind};
use crate::{Error, Result};
use bytes::Bytes;
use futures_util::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A response body after the pipeline has applied the call's [`ReturnKind`].
pub enum MaterializedBody {
    /// Nothing was read.
    Nothing,
    /// The full response.
    Message(reqwest::Response),
    /// The response, body unread.
    Content(reqwest::Response),
    /// A stream over the body.
    Stream(ByteStream),
    /// The status code only.
    Status(StatusCode),
    /// The buffered body text.
    Text {
        /// Body text, possibly empty
        text: String,
        /// Response status
        status: StatusCode,
    },
}

impl fmt::Debug for MaterializedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterializedBody::Nothing => f.write_str("Nothing"),
            MaterializedBody::Message(r) => f.debug_tuple("Message").field(&r.status()).finish(),
            MaterializedBody::Content(r) => f.debug_tuple("Content").field(&r.status()).finish(),
            MaterializedBody::Stream(_) => f.write_str("Stream"),
            MaterializedBody::Status(s) => f.debug_tuple("Status").field(s).finish(),
            MaterializedBody::Text { text, status } => f
                .debug_struct("Text")
                .field("text", text)
                .field("status", status)
                .finish(),
        }
    }
}

/// Types a call can return.
///
/// The associated [`KIND`](ResponseBody::KIND) is what the pipeline uses to
/// decide how to read the body; it never changes between attempts.
pub trait ResponseBody: Sized + Send + 'static {
    /// How the body of a response is materialized for this type.
    const KIND: ReturnKind;

    /// Builds the result from the materialized body. `Ok(None)` means the
    /// response carried no value.
    fn from_body(
        body: MaterializedBody,
        serializer: &dyn ContentSerializer,
    ) -> Result<Option<Self>>;
}

impl ReturnKind {
    /// Returns the kind for a declared result type.
    ///
    /// ```
    /// use restline::{ReturnKind, Json, RawContent};
    ///
    /// assert_eq!(ReturnKind::of::<()>(), ReturnKind::None);
    /// assert_eq!(ReturnKind::of::<http::StatusCode>(), ReturnKind::StatusCode);
    /// assert_eq!(ReturnKind::of::<RawContent>(), ReturnKind::RawContent);
    /// assert_eq!(ReturnKind::of::<Json<Vec<u32>>>(), ReturnKind::Object);
    /// ```
    pub const fn of<R: ResponseBody>() -> ReturnKind {
        R::KIND
    }
}

fn unexpected_body<R>(body: &MaterializedBody) -> Result<Option<R>> {
    Err(Error::ConfigurationError(format!(
        "Response body {:?} does not match the declared result type {}",
        body,
        std::any::type_name::<R>()
    )))
}

impl ResponseBody for () {
    const KIND: ReturnKind = ReturnKind::None;

    fn from_body(_: MaterializedBody, _: &dyn ContentSerializer) -> Result<Option<Self>> {
        Ok(None)
    }
}

impl ResponseBody for StatusCode {
    const KIND: ReturnKind = ReturnKind::StatusCode;

    fn from_body(body: MaterializedBody, _: &dyn ContentSerializer) -> Result<Option<Self>> {
        match body {
            MaterializedBody::Status(status) => Ok(Some(status)),
            other => unexpected_body(&other),
        }
    }
}

/// A deserialized response body.
///
/// Wraps any `DeserializeOwned` type so it can be used as a call result;
/// the typed helpers such as [`Client::get`](crate::Client::get) wrap and
/// unwrap it for you.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwraps the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: DeserializeOwned + Send + 'static> ResponseBody for Json<T> {
    const KIND: ReturnKind = ReturnKind::Object;

    fn from_body(
        body: MaterializedBody,
        serializer: &dyn ContentSerializer,
    ) -> Result<Option<Self>> {
        let (text, status) = match body {
            MaterializedBody::Text { text, status } => (text, status),
            other => return unexpected_body(&other),
        };
        if text.is_empty() {
            return Ok(None);
        }

        let failed = |serde_error: String| Error::DeserializationFailed {
            raw_response: text.clone(),
            serde_error,
            status,
        };
        let value = serializer.deserialize(&text).map_err(|e| match e {
            Error::SerializationFailed(message) => failed(message),
            other => failed(other.to_string()),
        })?;
        let data = serde_json::from_value(value).map_err(|e| failed(e.to_string()))?;
        Ok(Some(Json(data)))
    }
}

/// The complete response, handed over with its body unread.
#[derive(Debug)]
pub struct RawResponse(reqwest::Response);

impl RawResponse {
    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.0.status()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.0.headers()
    }

    /// The final URL of the response.
    pub fn url(&self) -> &url::Url {
        self.0.url()
    }

    /// Reads the body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.0.text().await?)
    }

    /// Reads the body as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.0.bytes().await?)
    }

    /// Returns the underlying `reqwest::Response`.
    pub fn into_inner(self) -> reqwest::Response {
        self.0
    }
}

impl ResponseBody for RawResponse {
    const KIND: ReturnKind = ReturnKind::RawMessage;

    fn from_body(body: MaterializedBody, _: &dyn ContentSerializer) -> Result<Option<Self>> {
        match body {
            MaterializedBody::Message(response) => Ok(Some(RawResponse(response))),
            other => unexpected_body(&other),
        }
    }
}

/// The response content, unread. The caller decides how to consume it.
#[derive(Debug)]
pub struct RawContent {
    response: reqwest::Response,
}

impl RawContent {
    /// The `Content-Type` header, if present.
    pub fn content_type(&self) -> Option<&str> {
        self.response
            .headers()
            .get(http::header::CONTENT_TYPE)?
            .to_str()
            .ok()
    }

    /// The declared content length, if known.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Reads the content as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.response.text().await?)
    }

    /// Reads the content as bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }

    /// Turns the content into a byte stream.
    pub fn into_stream(self) -> ByteStream {
        ByteStream::new(self.response)
    }
}

impl ResponseBody for RawContent {
    const KIND: ReturnKind = ReturnKind::RawContent;

    fn from_body(body: MaterializedBody, _: &dyn ContentSerializer) -> Result<Option<Self>> {
        match body {
            MaterializedBody::Content(response) => Ok(Some(RawContent { response })),
            other => unexpected_body(&other),
        }
    }
}

/// A single-use stream of response body chunks.
pub struct ByteStream {
    inner: BoxStream<'static, Result<Bytes>>,
}

impl ByteStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            inner: response.bytes_stream().map_err(Error::Network).boxed(),
        }
    }

    /// Reads the rest of the stream into memory.
    pub async fn collect_bytes(mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(chunk) = self.inner.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream")
    }
}

impl Stream for ByteStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl ResponseBody for ByteStream {
    const KIND: ReturnKind = ReturnKind::Stream;

    fn from_body(body: MaterializedBody, _: &dyn ContentSerializer) -> Result<Option<Self>> {
        match body {
            MaterializedBody::Stream(stream) => Ok(Some(stream)),
            other => unexpected_body(&other),
        }
    }
}

/// Reads a success response according to the call's [`ReturnKind`].
///
/// Only [`ReturnKind::Object`] buffers the body; the text is also kept on the
/// state for diagnostics.
pub(crate) async fn materialize_body(
    response: reqwest::Response,
    state: &mut CallState,
) -> Result<MaterializedBody> {
    match state.return_kind {
        ReturnKind::None => Ok(MaterializedBody::Nothing),
        ReturnKind::RawMessage => Ok(MaterializedBody::Message(response)),
        ReturnKind::RawContent => Ok(MaterializedBody::Content(response)),
        ReturnKind::Stream => Ok(MaterializedBody::Stream(ByteStream::new(response))),
        ReturnKind::StatusCode => Ok(MaterializedBody::Status(response.status())),
        ReturnKind::Object => {
            let status = response.status();
            let text = response.text().await?;
            state.response_body = Some(text.clone());
            Ok(MaterializedBody::Text { text, status })
        }
    }
}
