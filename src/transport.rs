//! The seam between the request pipeline and the wire.
//!
//! A [`Transport`] sends one fully built request and returns the response.
//! The default [`ReqwestTransport`] shares a single process-wide
//! `reqwest::Client` (and with it one connection pool) across every
//! [`Client`](crate::Client) that does not supply its own transport.

use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

static SHARED_HTTP_CLIENT: OnceLock<std::result::Result<reqwest::Client, String>> = OnceLock::new();

/// Sends requests on behalf of the pipeline.
///
/// Implementations must be safe to call from many concurrent calls.
///
/// # Examples
///
/// ```
/// use restline::transport::Transport;
/// use tokio_util::sync::CancellationToken;
///
/// struct AlwaysNoContent;
///
/// #[async_trait::async_trait]
/// impl Transport for AlwaysNoContent {
///     async fn send(
///         &self,
///         _request: reqwest::Request,
///         _cancel: &CancellationToken,
///     ) -> restline::Result<reqwest::Response> {
///         let response = http::Response::builder().status(204).body("").unwrap();
///         Ok(reqwest::Response::from(response))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request`, giving up with [`Error::Cancelled`] once `cancel` fires.
    async fn send(
        &self,
        request: reqwest::Request,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response>;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing `reqwest::Client`.
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Returns the transport over the process-wide shared `reqwest::Client`.
    ///
    /// The shared client is built on first use and never rebuilt, so a build
    /// failure is reported to every later caller.
    pub fn shared() -> Result<Self> {
        let shared = SHARED_HTTP_CLIENT.get_or_init(|| {
            tracing::debug!("Creating shared HTTP client");
            reqwest::Client::builder()
                .build()
                .map_err(|e| e.to_string())
        });
        match shared {
            Ok(http_client) => Ok(Self::new(http_client.clone())),
            Err(e) => Err(Error::ConfigurationError(format!(
                "Failed to build HTTP client: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: reqwest::Request,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            sent = self.http_client.execute(request) => sent.map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Network(e)
                }
            }),
        }
    }
}
