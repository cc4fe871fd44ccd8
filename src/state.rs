//! Per-call state threaded through the request pipeline.

use crate::args::{CaptureBox, CapturedResponse, ClassifiedArgs};
use crate::Error;
use http::{HeaderMap, Method, StatusCode};
use std::time::{Duration, Instant, SystemTime};
use tokio_util::sync::CancellationToken;

/// How a response body is materialized, derived from the declared result type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// No value is read from the response.
    None,
    /// The body is buffered as text and deserialized.
    Object,
    /// The full response object is handed to the caller.
    RawMessage,
    /// Only the status code is returned.
    StatusCode,
    /// The unread response content is handed to the caller.
    RawContent,
    /// A live byte stream over the response body.
    Stream,
}

/// Mutable record of one logical call.
///
/// Created when the call starts, updated once per attempt and dropped when the
/// call returns. Lifecycle observers receive a shared reference to it.
#[derive(Debug)]
pub struct CallState {
    /// HTTP method.
    pub method: Method,
    /// The URL template as supplied by the caller.
    pub url_template: String,
    /// Positional URL parameters in substitution order.
    pub url_params: Vec<Option<String>>,
    /// The resolved absolute URL.
    pub url: String,

    /// Name of the declared request body type.
    pub request_body_type: &'static str,
    /// Serialized request body of the current attempt, when it is text.
    pub request_body: Option<String>,
    /// Accept header value for this call.
    pub accept: String,
    /// Extra headers supplied for this call.
    pub headers: Vec<(String, String)>,

    /// Name of the declared result type.
    pub response_body_type: &'static str,
    /// How the response body is materialized; fixed for the whole call.
    pub return_kind: ReturnKind,
    /// Status of the current attempt's response.
    pub status: Option<StatusCode>,
    /// Headers of the current attempt's response.
    pub response_headers: Option<HeaderMap>,
    /// Response body text, when it was buffered.
    pub response_body: Option<String>,
    /// Whether the current attempt produced a result value.
    pub has_result: bool,

    /// Number of attempts started so far.
    pub attempt: usize,
    /// Cancellation token observed by the call.
    pub cancel: CancellationToken,
    /// Wall-clock start of the call.
    pub started_at: SystemTime,
    /// Time elapsed since the call started, updated after each send.
    pub elapsed: Duration,
    /// Error of the current attempt.
    pub error: Option<Error>,

    capture: Option<CaptureBox>,
    start: Instant,
}

impl CallState {
    pub(crate) fn new(
        method: Method,
        url_template: &str,
        args: ClassifiedArgs,
        accept: String,
        return_kind: ReturnKind,
        request_body_type: &'static str,
        response_body_type: &'static str,
    ) -> Self {
        Self {
            method,
            url_template: url_template.to_string(),
            url_params: args.url_params,
            url: String::new(),
            request_body_type,
            request_body: None,
            accept,
            headers: args.headers,
            response_body_type,
            return_kind,
            status: None,
            response_headers: None,
            response_body: None,
            has_result: false,
            attempt: 0,
            cancel: args.cancel.unwrap_or_default(),
            started_at: SystemTime::now(),
            elapsed: Duration::ZERO,
            error: None,
            capture: args.capture,
            start: Instant::now(),
        }
    }

    /// Clears the response side and counts a new attempt.
    pub(crate) fn begin_attempt(&mut self) {
        self.attempt += 1;
        self.request_body = None;
        self.status = None;
        self.response_headers = None;
        self.response_body = None;
        self.has_result = false;
        self.error = None;
    }

    pub(crate) fn mark_elapsed(&mut self) {
        self.elapsed = self.start.elapsed();
    }

    /// Records status and headers, and copies them into the capture box.
    pub(crate) fn record_response(&mut self, status: StatusCode, headers: &HeaderMap) {
        self.status = Some(status);
        self.response_headers = Some(headers.clone());
        if let Some(capture) = &self.capture {
            capture.store(CapturedResponse {
                status,
                headers: headers.clone(),
                url: self.url.clone(),
                attempts: self.attempt,
                elapsed: self.elapsed,
            });
        }
    }

    /// Returns `true` when the call was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{classify, CallArg};

    fn state(args: Vec<CallArg>) -> CallState {
        CallState::new(
            Method::GET,
            "items/{0}",
            classify(args),
            "application/json".to_string(),
            ReturnKind::Object,
            "()",
            "Item",
        )
    }

    #[test]
    fn test_begin_attempt_resets_response_side() {
        let mut state = state(vec![CallArg::from(1)]);
        state.begin_attempt();
        state.record_response(StatusCode::INTERNAL_SERVER_ERROR, &HeaderMap::new());
        state.response_body = Some("boom".to_string());
        state.error = Some(Error::Timeout);

        state.begin_attempt();

        assert_eq!(state.attempt, 2);
        assert!(state.status.is_none());
        assert!(state.response_body.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.return_kind, ReturnKind::Object);
        assert_eq!(state.url_params, vec![Some("1".to_string())]);
    }

    #[test]
    fn test_record_response_fills_capture_box() {
        let capture = CaptureBox::new();
        let mut state = state(vec![CallArg::from(&capture)]);
        state.url = "http://localhost/items/1".to_string();
        state.begin_attempt();
        state.record_response(StatusCode::CREATED, &HeaderMap::new());

        let captured = capture.get().unwrap();
        assert_eq!(captured.status, StatusCode::CREATED);
        assert_eq!(captured.url, "http://localhost/items/1");
        assert_eq!(captured.attempts, 1);
    }

    #[test]
    fn test_state_without_token_is_not_cancelled() {
        let state = state(vec![]);
        assert!(!state.is_cancelled());
    }
}
