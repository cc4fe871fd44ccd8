//! # Restline - REST calls from URL templates
//!
//! Restline turns a URL template, an HTTP method, an optional body and a
//! loose list of call arguments into an HTTP request, retries it on transient
//! failures and converts the response into a typed result or a classified
//! error. It is built on top of `reqwest` and shares one connection pool per
//! process.
//!
//! ## Quick Start
//!
//! ```no_run
//! use restline::{args, Client, RetryPolicy};
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize)]
//! struct CreateOrder {
//!     sku: String,
//!     quantity: u32,
//! }
//!
//! #[derive(Deserialize)]
//! struct Order {
//!     id: u64,
//!     sku: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restline::Error> {
//!     let client = Client::builder()
//!         .base_url("https://api.example.com/v2/")?
//!         .timeout(Duration::from_secs(10))
//!         .retry_policy(RetryPolicy::default())
//!         .build()?;
//!
//!     // GET https://api.example.com/v2/orders/17
//!     let order = client.get::<Order>("orders/{0}", args![17]).await?;
//!     if let Some(order) = order.data {
//!         println!("Order {} for {}", order.id, order.sku);
//!     }
//!
//!     let created = client
//!         .post::<_, Order>(
//!             "orders",
//!             &CreateOrder { sku: "bolt-m6".to_string(), quantity: 40 },
//!             args![("X-Correlation-Id", "c-42")],
//!         )
//!         .await?;
//!     println!("Created after {} attempt(s)", created.attempts);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Call arguments
//!
//! The [`args!`] macro builds the argument list. Each value is classified by
//! its type:
//!
//! - numbers, strings and other scalars are positional URL parameters
//!   (`{0}`, `{1}`, ...), percent-escaped on substitution; `None` becomes an
//!   empty string
//! - `(name, value)` tuples become request headers
//! - a [`CancellationToken`](tokio_util::sync::CancellationToken) cancels the call
//! - [`Accept`] overrides the `Accept` header
//! - a [`CaptureBox`] receives status and headers of the response
//!
//! ## Result types
//!
//! The declared result type decides how the body is read; see [`body`].
//! `Client::get::<T>` deserializes, `send::<_, StatusCode>` keeps only the
//! status, `send::<_, RawContent>` hands back the unread content and
//! `get_stream` returns a live [`ByteStream`].
//!
//! ## Error Handling
//!
//! ```no_run
//! use restline::{args, Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::builder().base_url("https://api.example.com")?.build()?;
//! match client.get::<serde_json::Value>("orders/{0}", args![17]).await {
//!     Ok(response) => println!("Success: {:?}", response.data),
//!     Err(Error::Validation { raw_response, .. }) => {
//!         eprintln!("Rejected: {}", raw_response);
//!     }
//!     Err(Error::Remote { status, raw_response, .. }) => {
//!         eprintln!("HTTP error {}: {}", status, raw_response);
//!     }
//!     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
//!         eprintln!("Unexpected body {}: {}", raw_response, serde_error);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Blocking callers
//!
//! [`blocking::BlockingClient`] runs each call on a dedicated worker through
//! [`sync::run_blocking`], so it can be used from synchronous code, including
//! code that is itself called from inside an async runtime.

pub mod args;
pub mod blocking;
pub mod body;
mod client;
pub mod config;
mod error;
pub mod events;
mod response;
pub mod retry;
pub mod serializer;
mod state;
pub mod sync;
pub mod transport;
pub mod url;

pub use args::{Accept, CallArg, CaptureBox, CapturedResponse};
pub use body::{ByteStream, Json, RawContent, RawResponse, ResponseBody};
pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use error::{Error, ErrorBody, Result};
pub use events::CallEvent;
pub use response::Response;
pub use retry::RetryPolicy;
pub use state::{CallState, ReturnKind};
pub use tokio_util::sync::CancellationToken;
