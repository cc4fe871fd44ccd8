//! REST client and the request pipeline.
//!
//! The [`Client`] type is the main entry point for making calls.
//! Use [`ClientBuilder`] to configure and create clients.

use crate::{
    args::{classify, CallArg},
    body::{materialize_body, ByteStream, Json, RawContent, RawResponse, ResponseBody},
    config::{ClientConfig, DEFAULT_TIMEOUT_SECS},
    error::{classify_error, ErrorBody},
    events::{CallEvent, CallEvents},
    retry::{attempt_schedule, RetryPolicy},
    serializer::{ContentSerializer, JsonSerializer},
    state::CallState,
    transport::{ReqwestTransport, Transport},
    Error, Response, Result,
};
use bytes::Bytes;
use http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::any::type_name;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A REST client with URL templates, retries and typed results.
///
/// The client is cheap to clone and designed to be reused across calls. Unless
/// a transport is injected, every client shares one process-wide HTTP
/// connection pool.
///
/// Every call takes a URL template and a list of [`CallArg`]s built with
/// [`args!`](crate::args): positional URL parameters mixed with per-call
/// modifiers such as headers, a cancellation token, an accept override or a
/// [`CaptureBox`](crate::CaptureBox).
///
/// # Examples
///
/// ```no_run
/// use restline::{args, Client, RetryPolicy};
/// use serde::{Deserialize, Serialize};
/// use std::time::Duration;
///
/// #[derive(Serialize, Deserialize)]
/// struct Item {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), restline::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com/v1")?
///     .timeout(Duration::from_secs(10))
///     .retry_policy(RetryPolicy::fixed(Duration::from_millis(500), 3))
///     .build()?;
///
/// // GET https://api.example.com/v1/items/42
/// let item = client.get::<Item>("items/{0}", args![42]).await?;
///
/// // POST with a per-call header
/// let new_item = Item { id: 0, name: "bolt".to_string() };
/// let created = client
///     .post::<_, Item>("items", &new_item, args![("X-Correlation-Id", "c-17")])
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    base_url: String,
    default_headers: HeaderMap,
    accept: String,
    send_media_type: String,
    serializer: Arc<dyn ContentSerializer>,
    retry_policy: Option<RetryPolicy>,
    timeout: Option<Duration>,
    bad_request_body: ErrorBody,
    server_error_body: ErrorBody,
    events: CallEvents,
}

/// Request body of a call, kept in a form that can be re-sent on every attempt.
enum Payload {
    Empty,
    Value(serde_json::Value),
    Bytes { bytes: Bytes, content_type: String },
}

impl Payload {
    fn from_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Self> {
        let Some(body) = body else {
            return Ok(Payload::Empty);
        };
        match serde_json::to_value(body) {
            Ok(serde_json::Value::Null) => Ok(Payload::Empty),
            Ok(value) => Ok(Payload::Value(value)),
            Err(e) => Err(Error::SerializationFailed(e.to_string())),
        }
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base service URL, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Resolves a URL template against the base URL.
    ///
    /// Only the positional parameters in `args` are used.
    ///
    /// ```
    /// use restline::{args, Client};
    ///
    /// # fn main() -> Result<(), restline::Error> {
    /// let client = Client::builder().base_url("http://localhost:8080/api/")?.build()?;
    /// assert_eq!(
    ///     client.format_url("items/{0}", args!["a b"])?,
    ///     "http://localhost:8080/api/items/a%20b"
    /// );
    /// assert_eq!(client.format_url("", args![])?, "http://localhost:8080/api");
    /// # Ok(())
    /// # }
    /// ```
    pub fn format_url(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<String> {
        let args = classify(args);
        crate::url::format_url(&self.inner.base_url, template, &args.url_params)
    }

    /// Builds a query string from the fields of a serializable value.
    ///
    /// See [`url::build_query`](crate::url::build_query).
    pub fn build_query<T: Serialize + ?Sized>(&self, params: &T) -> Result<String> {
        crate::url::build_query(params)
    }

    /// Makes a call with full control over the body and the result type.
    ///
    /// The result type `R` decides how the response body is read; see
    /// [`ResponseBody`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use restline::{args, Client, RawResponse};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), restline::Error> {
    /// let client = Client::builder().base_url("https://api.example.com")?.build()?;
    ///
    /// let response = client
    ///     .send::<(), RawResponse>(Method::HEAD, "items/{0}", None, args![5])
    ///     .await?;
    /// if let Some(raw) = response.data {
    ///     println!("length: {:?}", raw.headers().get("content-length"));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send<B, R>(
        &self,
        method: Method,
        template: &str,
        body: Option<&B>,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<R>>
    where
        B: Serialize + ?Sized,
        R: ResponseBody,
    {
        let payload = Payload::from_body(body)?;
        self.execute(method, template, payload, type_name::<B>(), args)
            .await
    }

    /// Sends a byte buffer as the request body.
    ///
    /// The buffer is re-sent unchanged on each retry.
    pub async fn send_bytes<R: ResponseBody>(
        &self,
        method: Method,
        template: &str,
        body: impl Into<Bytes>,
        content_type: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<R>> {
        let payload = Payload::Bytes {
            bytes: body.into(),
            content_type: content_type.to_string(),
        };
        self.execute(method, template, payload, type_name::<Bytes>(), args)
            .await
    }

    /// Makes a call without a body and hands back the full response unread.
    pub async fn send_raw(
        &self,
        method: Method,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<RawResponse> {
        let response = self
            .send::<(), RawResponse>(method, template, None, args)
            .await?;
        require(response)
    }

    /// Makes a GET request and deserializes the response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use restline::{args, Client};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Item { name: String }
    ///
    /// # async fn example() -> Result<(), restline::Error> {
    /// let client = Client::builder().base_url("https://api.example.com")?.build()?;
    ///
    /// let items = client.get::<Vec<Item>>("items", args![]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<T>(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send::<(), Json<T>>(Method::GET, template, None, args)
            .await
            .map(|response| response.map(Json::into_inner))
    }

    /// Makes a POST request with a serialized body.
    pub async fn post<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        self.send::<B, Json<T>>(Method::POST, template, Some(body), args)
            .await
            .map(|response| response.map(Json::into_inner))
    }

    /// Makes a PUT request with a serialized body.
    pub async fn put<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        self.send::<B, Json<T>>(Method::PUT, template, Some(body), args)
            .await
            .map(|response| response.map(Json::into_inner))
    }

    /// Makes a PATCH request with a serialized body.
    pub async fn patch<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        self.send::<B, Json<T>>(Method::PATCH, template, Some(body), args)
            .await
            .map(|response| response.map(Json::into_inner))
    }

    /// Makes a DELETE request and returns the response status.
    pub async fn delete(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<StatusCode> {
        let response = self
            .send::<(), StatusCode>(Method::DELETE, template, None, args)
            .await?;
        Ok(response.status)
    }

    /// Makes a GET request and reads the body as text.
    ///
    /// Sends `Accept: text/plain` unless `args` carries an
    /// [`Accept`](crate::Accept) override.
    pub async fn get_string(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<String> {
        let args = with_default_accept("text/plain", args);
        let content = self.get_content(template, args).await?;
        content.text().await
    }

    /// Makes a GET request and reads the body as bytes.
    ///
    /// Sends `Accept: application/octet-stream` unless `args` carries an
    /// [`Accept`](crate::Accept) override.
    pub async fn get_bytes(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Bytes> {
        let args = with_default_accept("application/octet-stream", args);
        let content = self.get_content(template, args).await?;
        content.bytes().await
    }

    /// Makes a GET request and returns a live stream over the body.
    pub async fn get_stream(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<ByteStream> {
        let args = with_default_accept("application/octet-stream", args);
        let response = self
            .send::<(), ByteStream>(Method::GET, template, None, args)
            .await?;
        require(response)
    }

    async fn get_content(&self, template: &str, args: Vec<CallArg>) -> Result<RawContent> {
        let response = self
            .send::<(), RawContent>(Method::GET, template, None, args)
            .await?;
        require(response)
    }

    /// Runs one call: builds the state, loops over scheduled attempts and
    /// returns the last attempt's result or error.
    async fn execute<R: ResponseBody>(
        &self,
        method: Method,
        template: &str,
        payload: Payload,
        request_body_type: &'static str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<R>> {
        let inner = &self.inner;
        let args = classify(args);
        let accept = args.accept.clone().unwrap_or_else(|| inner.accept.clone());
        let mut state = CallState::new(
            method,
            template,
            args,
            accept,
            R::KIND,
            request_body_type,
            type_name::<R>(),
        );
        state.url = crate::url::format_url(&inner.base_url, template, &state.url_params)?;
        let url = Url::parse(&state.url)?;

        let schedule = attempt_schedule(inner.retry_policy.as_ref());
        let mut result = None;

        for (index, delay) in schedule.iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = state.attempt,
                    "Retrying request after delay"
                );
                tokio::select! {
                    biased;
                    _ = state.cancel.cancelled() => return Err(Error::Cancelled),
                    _ = tokio::time::sleep(*delay) => {}
                }
            }

            state.begin_attempt();
            let request = self.build_request(&mut state, &url, &payload)?;

            tracing::debug!(
                method = %state.method,
                url = %state.url,
                attempt = state.attempt,
                "Executing HTTP request"
            );
            inner.events.emit(CallEvent::Sending, &state);

            let sent = inner.transport.send(request, &state.cancel).await;
            state.mark_elapsed();
            let response = sent?;

            let status = response.status();
            state.record_response(status, response.headers());

            tracing::info!(
                status = status.as_u16(),
                latency_ms = state.elapsed.as_millis(),
                attempt = state.attempt,
                "Received HTTP response"
            );

            if status.is_success() {
                inner.events.emit(CallEvent::Received, &state);
                let value = match materialize_body(response, &mut state).await {
                    Ok(body) => R::from_body(body, inner.serializer.as_ref()),
                    Err(e) => Err(e),
                };
                match value {
                    Ok(value) => {
                        state.has_result = value.is_some();
                        result = value;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read response body");
                        state.error = Some(e);
                    }
                }
            } else {
                let error = classify_error(
                    response,
                    inner.serializer.as_ref(),
                    inner.bad_request_body,
                    inner.server_error_body,
                )
                .await;
                state.response_body = error.raw_response().map(str::to_string);
                state.error = Some(error);
                inner.events.emit(CallEvent::ReceivedError, &state);
            }

            state.mark_elapsed();
            inner.events.emit(CallEvent::Completed, &state);

            if !self.should_retry(&state) {
                break;
            }
            if index + 1 < schedule.len() {
                if let Some(error) = &state.error {
                    tracing::warn!(
                        error = %error,
                        attempt = state.attempt,
                        method = %state.method,
                        url = %state.url,
                        "Request failed"
                    );
                }
            }
        }

        if let Some(error) = state.error.take() {
            return Err(error);
        }
        Ok(Response::new(
            result,
            state.response_body.take(),
            state.status.unwrap_or_default(),
            state.response_headers.take().unwrap_or_default(),
            state.elapsed,
            state.attempt,
        ))
    }

    /// Retry only error responses whose status the policy lists, and never
    /// after cancellation.
    fn should_retry(&self, state: &CallState) -> bool {
        let Some(policy) = &self.inner.retry_policy else {
            return false;
        };
        state.error.is_some()
            && !state.is_cancelled()
            && state.status.is_some_and(|status| policy.should_retry(status))
    }

    /// Builds the outbound request of the current attempt.
    fn build_request(
        &self,
        state: &mut CallState,
        url: &Url,
        payload: &Payload,
    ) -> Result<reqwest::Request> {
        let inner = &self.inner;
        let mut request = reqwest::Request::new(state.method.clone(), url.clone());

        let headers = request.headers_mut();
        headers.insert(ACCEPT, header_value(&state.accept)?);
        for (name, value) in &inner.default_headers {
            headers.append(name.clone(), value.clone());
        }
        for (name, value) in &state.headers {
            headers.append(header_name(name)?, header_value(value)?);
        }

        match payload {
            Payload::Empty => {}
            Payload::Value(value) => {
                let text = inner.serializer.serialize(value)?;
                headers.insert(CONTENT_TYPE, header_value(&inner.send_media_type)?);
                state.request_body = Some(text.clone());
                *request.body_mut() = Some(text.into());
            }
            Payload::Bytes {
                bytes,
                content_type,
            } => {
                headers.insert(CONTENT_TYPE, header_value(content_type)?);
                *request.body_mut() = Some(bytes.clone().into());
            }
        }

        if let Some(timeout) = inner.timeout {
            *request.timeout_mut() = Some(timeout);
        }
        Ok(request)
    }
}

fn with_default_accept(
    media_type: &str,
    args: impl IntoIterator<Item = CallArg>,
) -> Vec<CallArg> {
    std::iter::once(CallArg::Accept(media_type.to_string()))
        .chain(args)
        .collect()
}

fn require<T>(response: Response<T>) -> Result<T> {
    response.data.ok_or_else(|| {
        Error::ConfigurationError(format!(
            "Response with status {} carried no {}",
            response.status,
            type_name::<T>()
        ))
    })
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::try_from(name)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use restline::{ClientBuilder, ErrorBody, RetryPolicy};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), restline::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")?
///     .timeout(Duration::from_secs(30))
///     .retry_policy(RetryPolicy::from_secs(&[0.5, 1.0, 5.0])?)
///     .bad_request_body(ErrorBody::Structured)
///     .default_header("User-Agent", "my-app/1.0")?
///     .on_completed(|state| {
///         println!("{} {} took {:?}", state.method, state.url, state.elapsed);
///     })
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<String>,
    default_headers: HeaderMap,
    accept: Option<String>,
    send_media_type: Option<String>,
    serializer: Option<Arc<dyn ContentSerializer>>,
    retry_policy: Option<RetryPolicy>,
    timeout: Option<Duration>,
    bad_request_body: ErrorBody,
    server_error_body: ErrorBody,
    transport: Option<Arc<dyn Transport>>,
    events: CallEvents,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            accept: None,
            send_media_type: None,
            serializer: None,
            retry_policy: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            bad_request_body: ErrorBody::Text,
            server_error_body: ErrorBody::Text,
            transport: None,
            events: CallEvents::default(),
        }
    }

    /// Creates a builder pre-populated from a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL, a header or the retry settings are invalid.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = Self::new()
            .base_url(&config.base_url)?
            .timeout(config.timeout())
            .bad_request_body(config.bad_request_body)
            .server_error_body(config.server_error_body);
        if let Some(accept) = &config.accept {
            builder = builder.accept(accept);
        }
        if let Some(send_media_type) = &config.send_media_type {
            builder = builder.send_media_type(send_media_type);
        }
        for (name, value) in &config.default_headers {
            builder = builder.default_header(name, value)?;
        }
        if let Some(policy) = config.retry_policy()? {
            builder = builder.retry_policy(policy);
        }
        Ok(builder)
    }

    /// Sets the base service URL for all calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim().trim_end_matches('/');
        Url::parse(url)?;
        self.base_url = Some(url.to_string());
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.default_headers
            .append(header_name(name.as_ref())?, header_value(value.as_ref())?);
        Ok(self)
    }

    /// Sets the `Authorization` header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting header value is invalid.
    pub fn authorization(mut self, scheme: &str, credentials: &str) -> Result<Self> {
        let mut value = header_value(&format!("{} {}", scheme, credentials))?;
        value.set_sensitive(true);
        self.default_headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Sets a bearer token as the `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value.
    pub fn bearer_auth(self, token: &str) -> Result<Self> {
        self.authorization("Bearer", token)
    }

    /// Sets the default `Accept` header value.
    ///
    /// Defaults to the serializer's media types.
    pub fn accept(mut self, media_types: impl Into<String>) -> Self {
        self.accept = Some(media_types.into());
        self
    }

    /// Sets the `Content-Type` of serialized request bodies.
    ///
    /// Defaults to the serializer's send media type.
    pub fn send_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.send_media_type = Some(media_type.into());
        self
    }

    /// Replaces the body serializer. Defaults to [`JsonSerializer`].
    pub fn serializer(mut self, serializer: impl ContentSerializer + 'static) -> Self {
        self.serializer = Some(Arc::new(serializer));
        self
    }

    /// Sets the retry policy. Without one, every call makes a single attempt.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables the request timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Sets how `400 Bad Request` bodies are reported.
    pub fn bad_request_body(mut self, format: ErrorBody) -> Self {
        self.bad_request_body = format;
        self
    }

    /// Sets how other error bodies are reported.
    pub fn server_error_body(mut self, format: ErrorBody) -> Self {
        self.server_error_body = format;
        self
    }

    /// Injects the transport used to send requests.
    ///
    /// By default the process-wide shared [`ReqwestTransport`] is used.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Registers an observer called right before each attempt is sent.
    pub fn on_sending<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CallState) + Send + Sync + 'static,
    {
        self.events.subscribe(CallEvent::Sending, Arc::new(observer));
        self
    }

    /// Registers an observer called when a success response arrives.
    pub fn on_received<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CallState) + Send + Sync + 'static,
    {
        self.events.subscribe(CallEvent::Received, Arc::new(observer));
        self
    }

    /// Registers an observer called when an error response arrives.
    pub fn on_received_error<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CallState) + Send + Sync + 'static,
    {
        self.events
            .subscribe(CallEvent::ReceivedError, Arc::new(observer));
        self
    }

    /// Registers an observer called at the end of every attempt.
    pub fn on_completed<F>(mut self, observer: F) -> Self
    where
        F: Fn(&CallState) + Send + Sync + 'static,
    {
        self.events.subscribe(CallEvent::Completed, Arc::new(observer));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the shared HTTP client
    /// could not be created.
    pub fn build(self) -> Result<Client> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::ConfigurationError("Base URL is required".to_string()))?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::shared()?),
        };
        let serializer = self
            .serializer
            .unwrap_or_else(|| Arc::new(JsonSerializer::new()));
        let accept = self
            .accept
            .unwrap_or_else(|| serializer.content_types().to_string());
        let send_media_type = self
            .send_media_type
            .unwrap_or_else(|| serializer.send_media_type().to_string());
        header_value(&accept)?;
        header_value(&send_media_type)?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
                default_headers: self.default_headers,
                accept,
                send_media_type,
                serializer,
                retry_policy: self.retry_policy,
                timeout: self.timeout,
                bad_request_body: self.bad_request_body,
                server_error_body: self.server_error_body,
                events: self.events,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
