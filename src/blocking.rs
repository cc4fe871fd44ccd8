//! Blocking twins of the [`Client`] verbs.
//!
//! Every call is handed to [`run_blocking`], so these methods are safe to use
//! from plain threads as well as from code that is already running inside an
//! async runtime.
//!
//! Results whose body is read lazily ([`RawResponse`](crate::RawResponse),
//! [`RawContent`](crate::RawContent), [`ByteStream`](crate::ByteStream)) stay
//! async-only: their connection belongs to the worker's runtime, which is
//! gone once the blocking call returns.

use crate::{
    args::CallArg, sync::run_blocking, Client, Error, Response, ResponseBody, Result, ReturnKind,
};
use bytes::Bytes;
use http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

/// A blocking REST client.
///
/// # Examples
///
/// ```no_run
/// use restline::{args, blocking::BlockingClient, Client};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Item { name: String }
///
/// # fn example() -> Result<(), restline::Error> {
/// let client = BlockingClient::new(
///     Client::builder().base_url("https://api.example.com")?.build()?,
/// );
///
/// let item = client.get::<Item>("items/{0}", args![3])?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BlockingClient {
    client: Client,
}

impl BlockingClient {
    /// Wraps an async client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The wrapped async client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Blocking [`Client::send`].
    ///
    /// The body is serialized before the call leaves this thread. `R` must be
    /// read eagerly; lazy result types are rejected with
    /// [`Error::ConfigurationError`] before anything is sent.
    pub fn send<B, R>(
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
        if matches!(
            R::KIND,
            ReturnKind::RawMessage | ReturnKind::RawContent | ReturnKind::Stream
        ) {
            return Err(Error::ConfigurationError(format!(
                "{:?} results cannot outlive a blocking call",
                R::KIND
            )));
        }
        let body = body.map(to_value).transpose()?;
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move {
            client
                .send::<serde_json::Value, R>(method, &template, body.as_ref(), args)
                .await
        })
    }

    /// Blocking [`Client::get`].
    pub fn get<T>(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.get::<T>(&template, args).await })
    }

    /// Blocking [`Client::post`].
    pub fn post<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let body = to_value(body)?;
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.post::<_, T>(&template, &body, args).await })
    }

    /// Blocking [`Client::put`].
    pub fn put<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let body = to_value(body)?;
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.put::<_, T>(&template, &body, args).await })
    }

    /// Blocking [`Client::patch`].
    pub fn patch<B, T>(
        &self,
        template: &str,
        body: &B,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Response<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Send + 'static,
    {
        let body = to_value(body)?;
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.patch::<_, T>(&template, &body, args).await })
    }

    /// Blocking [`Client::delete`].
    pub fn delete(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<StatusCode> {
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.delete(&template, args).await })
    }

    /// Blocking [`Client::send_bytes`] that discards the response body.
    pub fn send_bytes(
        &self,
        method: Method,
        template: &str,
        body: impl Into<Bytes>,
        content_type: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<StatusCode> {
        let body = body.into();
        let content_type = content_type.to_string();
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move {
            let response = client
                .send_bytes::<()>(method, &template, body, &content_type, args)
                .await?;
            Ok(response.status)
        })
    }

    /// Blocking [`Client::get_string`].
    pub fn get_string(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<String> {
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.get_string(&template, args).await })
    }

    /// Blocking [`Client::get_bytes`].
    pub fn get_bytes(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> Result<Bytes> {
        let (client, template, args) = self.detach(template, args);
        run_blocking(move || async move { client.get_bytes(&template, args).await })
    }

    fn detach(
        &self,
        template: &str,
        args: impl IntoIterator<Item = CallArg>,
    ) -> (Client, String, Vec<CallArg>) {
        (
            self.client.clone(),
            template.to_string(),
            args.into_iter().collect(),
        )
    }
}

impl From<Client> for BlockingClient {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}

fn to_value<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| Error::SerializationFailed(e.to_string()))
}
