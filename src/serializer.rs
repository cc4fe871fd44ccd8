//! Body serialization.
//!
//! The client converts request bodies to a [`serde_json::Value`] first and
//! hands that to a [`ContentSerializer`], which produces the wire text. On the
//! way back the serializer parses wire text into a `Value` that is then
//! decoded into the declared type. Any format with a serde data model can be
//! plugged in this way.

use crate::{Error, Result};
use serde_json::Value;

/// Converts between wire text and structured values.
pub trait ContentSerializer: Send + Sync {
    /// Media types accepted from the service, as an `Accept` header value.
    fn content_types(&self) -> &str;

    /// Media type of serialized request bodies.
    fn send_media_type(&self) -> &str;

    /// Serializes a value to wire text.
    fn serialize(&self, value: &Value) -> Result<String>;

    /// Parses wire text into a value.
    fn deserialize(&self, text: &str) -> Result<Value>;
}

/// JSON serializer, the default.
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    content_types: String,
    send_media_type: String,
    pretty: bool,
}

impl JsonSerializer {
    /// Accepts `application/json` and `application/problem+json`.
    pub const DEFAULT_CONTENT_TYPES: &'static str = "application/json, application/problem+json";

    /// Media type for request bodies.
    pub const DEFAULT_SEND_MEDIA_TYPE: &'static str = "application/json";

    /// Creates a compact JSON serializer.
    pub fn new() -> Self {
        Self {
            content_types: Self::DEFAULT_CONTENT_TYPES.to_string(),
            send_media_type: Self::DEFAULT_SEND_MEDIA_TYPE.to_string(),
            pretty: false,
        }
    }

    /// Emits indented JSON, handy when request bodies end up in logs.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSerializer for JsonSerializer {
    fn content_types(&self) -> &str {
        &self.content_types
    }

    fn send_media_type(&self) -> &str {
        &self.send_media_type
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|e| Error::SerializationFailed(e.to_string()))
    }

    fn deserialize(&self, text: &str) -> Result<Value> {
        serde_json::from_str(text).map_err(|e| Error::SerializationFailed(e.to_string()))
    }
}
