//! Per-call modifiers passed alongside the method, URL template and body.
//!
//! A call takes an ordered list of [`CallArg`] values. Most of them are
//! positional URL parameters; the rest are special modifiers: a cancellation
//! token, an accept media type override, a [`CaptureBox`] and extra headers.
//! [`classify`] sorts them out. Use the [`args!`](crate::args) macro to build
//! the list from plain values.

use http::{HeaderMap, StatusCode};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One entry of a call's argument list.
#[derive(Debug, Clone)]
pub enum CallArg {
    /// A missing URL parameter; substitutes as an empty string.
    Null,
    /// A URL parameter, already converted to its textual form (not escaped yet).
    Param(String),
    /// Cancellation token for the call.
    Cancel(CancellationToken),
    /// Replaces the configured accept media types for this call.
    Accept(String),
    /// Slot receiving the response metadata once the call completes.
    Capture(CaptureBox),
    /// An extra request header for this call.
    Header(String, String),
}

/// Explicit accept media type override for a single call.
///
/// ```
/// use restline::{args, Accept, CallArg};
///
/// let list = args![Accept("text/csv")];
/// assert!(matches!(&list[0], CallArg::Accept(t) if t == "text/csv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accept<T: Into<String>>(pub T);

/// Values usable as positional URL parameters.
///
/// The textual form does not depend on locale: numbers use Rust's `Display`
/// output (`1.5`, `-3`), booleans are `true`/`false`.
pub trait UrlValue {
    /// Converts the value to the text substituted into the URL template.
    fn to_url_text(&self) -> String;
}

macro_rules! display_url_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl UrlValue for $ty {
                fn to_url_text(&self) -> String {
                    self.to_string()
                }
            }

            impl From<$ty> for CallArg {
                fn from(value: $ty) -> Self {
                    CallArg::Param(value.to_url_text())
                }
            }
        )*
    };
}

display_url_value!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

impl UrlValue for &str {
    fn to_url_text(&self) -> String {
        (*self).to_string()
    }
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        CallArg::Param(value.to_string())
    }
}

impl From<&String> for CallArg {
    fn from(value: &String) -> Self {
        CallArg::Param(value.clone())
    }
}

impl<T: UrlValue> From<Option<T>> for CallArg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => CallArg::Param(v.to_url_text()),
            None => CallArg::Null,
        }
    }
}

impl From<CancellationToken> for CallArg {
    fn from(token: CancellationToken) -> Self {
        CallArg::Cancel(token)
    }
}

impl From<&CancellationToken> for CallArg {
    fn from(token: &CancellationToken) -> Self {
        CallArg::Cancel(token.clone())
    }
}

impl<T: Into<String>> From<Accept<T>> for CallArg {
    fn from(accept: Accept<T>) -> Self {
        CallArg::Accept(accept.0.into())
    }
}

impl From<CaptureBox> for CallArg {
    fn from(capture: CaptureBox) -> Self {
        CallArg::Capture(capture)
    }
}

impl From<&CaptureBox> for CallArg {
    fn from(capture: &CaptureBox) -> Self {
        CallArg::Capture(capture.clone())
    }
}

impl From<(&str, &str)> for CallArg {
    fn from((name, value): (&str, &str)) -> Self {
        CallArg::Header(name.to_string(), value.to_string())
    }
}

impl From<(String, String)> for CallArg {
    fn from((name, value): (String, String)) -> Self {
        CallArg::Header(name, value)
    }
}

impl From<(&str, String)> for CallArg {
    fn from((name, value): (&str, String)) -> Self {
        CallArg::Header(name.to_string(), value)
    }
}

/// Builds a `Vec<CallArg>` from heterogeneous values.
///
/// ```
/// use restline::{args, CallArg, CaptureBox};
///
/// let capture = CaptureBox::new();
/// let list = args![5, "a b", ("X-Correlation-Id", "abc"), &capture, None::<i32>];
///
/// assert_eq!(list.len(), 5);
/// assert!(matches!(list[2], CallArg::Header(..)));
/// assert!(matches!(list[4], CallArg::Null));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::CallArg>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::CallArg::from($arg)),+]
    };
}

/// Response metadata copied into a [`CaptureBox`] after every attempt.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// Status of the last response.
    pub status: StatusCode,
    /// Headers of the last response.
    pub headers: HeaderMap,
    /// The absolute URL the request was sent to.
    pub url: String,
    /// Number of attempts made so far.
    pub attempts: usize,
    /// Time elapsed since the call started.
    pub elapsed: Duration,
}

/// Caller-owned slot for reading raw response metadata after a call.
///
/// Clones share the same slot.
///
/// ```no_run
/// use restline::{args, CaptureBox, Client};
///
/// # async fn example() -> Result<(), restline::Error> {
/// let client = Client::builder().base_url("https://api.example.com")?.build()?;
/// let capture = CaptureBox::new();
/// let _ = client.get::<String>("echo", args![&capture]).await?;
/// println!("etag: {:?}", capture.header("etag"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureBox {
    slot: Arc<Mutex<Option<CapturedResponse>>>,
}

impl CaptureBox {
    /// Creates an empty capture box.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the captured metadata, if a response was received.
    pub fn get(&self) -> Option<CapturedResponse> {
        self.lock().clone()
    }

    /// Status of the captured response.
    pub fn status(&self) -> Option<StatusCode> {
        self.lock().as_ref().map(|c| c.status)
    }

    /// Headers of the captured response.
    pub fn headers(&self) -> Option<HeaderMap> {
        self.lock().as_ref().map(|c| c.headers.clone())
    }

    /// First value of a response header, when present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<String> {
        let guard = self.lock();
        let value = guard.as_ref()?.headers.get(name)?;
        value.to_str().ok().map(str::to_string)
    }

    pub(crate) fn store(&self, captured: CapturedResponse) {
        *self.lock() = Some(captured);
    }

    fn lock(&self) -> MutexGuard<'_, Option<CapturedResponse>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The argument list sorted into its roles.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedArgs {
    /// Positional URL parameters, in input order. `None` marks a null.
    pub url_params: Vec<Option<String>>,
    /// The last cancellation token supplied.
    pub cancel: Option<CancellationToken>,
    /// The last accept override supplied.
    pub accept: Option<String>,
    /// The last capture box supplied.
    pub capture: Option<CaptureBox>,
    /// Extra headers, in input order.
    pub headers: Vec<(String, String)>,
}

/// Sorts a call's argument list.
///
/// Special values are pulled out; everything else stays a positional URL
/// parameter with its relative order preserved. When a cancellation token,
/// accept override or capture box appears more than once, the last one wins.
pub fn classify(args: impl IntoIterator<Item = CallArg>) -> ClassifiedArgs {
    let mut classified = ClassifiedArgs::default();
    for arg in args {
        match arg {
            CallArg::Null => classified.url_params.push(None),
            CallArg::Cancel(token) => classified.cancel = Some(token),
            CallArg::Accept(media_type) => classified.accept = Some(media_type),
            CallArg::Capture(capture) => classified.capture = Some(capture),
            CallArg::Header(name, value) => classified.headers.push((name, value)),
            CallArg::Param(text) => classified.url_params.push(Some(text)),
        }
    }
    classified
}
