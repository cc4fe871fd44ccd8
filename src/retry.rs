//! Retry policy for transient HTTP failures.
//!
//! A [`RetryPolicy`] pairs an ordered list of backoff delays with the set of
//! status codes worth retrying. Each delay is one retry: a policy with four
//! delays makes at most five attempts. Transport faults are never retried,
//! only error responses whose status is in the set.

use crate::{Error, Result};
use http::StatusCode;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

/// Status codes retried by default: 500, 502, 503, 504, 408, 409 and 417.
pub const DEFAULT_RETRY_STATUSES: [StatusCode; 7] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::CONFLICT,
    StatusCode::EXPECTATION_FAILED,
];

/// Defines when and how long to wait before retrying a failed call.
///
/// # Examples
///
/// ```
/// use restline::RetryPolicy;
/// use std::time::Duration;
///
/// // Four retries, half a second apart
/// let policy = RetryPolicy::fixed(Duration::from_millis(500), 4);
/// assert_eq!(policy.max_retries(), 4);
///
/// // 100ms, 200ms, 400ms
/// let exponential = RetryPolicy::exponential(
///     Duration::from_millis(100),
///     Duration::from_secs(10),
///     3,
/// );
/// assert_eq!(exponential.delay_for_retry(3), Some(Duration::from_millis(400)));
///
/// // Only retry 503, reuse the last delay beyond the list
/// let custom = RetryPolicy::new([Duration::from_secs(1), Duration::from_secs(5)])
///     .with_statuses([http::StatusCode::SERVICE_UNAVAILABLE])
///     .with_max_retries(4);
/// assert_eq!(custom.delay_for_retry(4), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
    retry_statuses: HashSet<StatusCode>,
    max_retries: Option<usize>,
    jitter: bool,
}

impl RetryPolicy {
    /// Creates a policy with one retry per delay and the default status set.
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: delays.into_iter().collect(),
            retry_statuses: DEFAULT_RETRY_STATUSES.into_iter().collect(),
            max_retries: None,
            jitter: false,
        }
    }

    /// Creates a policy from delays expressed in seconds.
    ///
    /// Negative and NaN values are treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] for a delay too large to be
    /// represented, including infinity.
    pub fn from_secs(delays: &[f64]) -> Result<Self> {
        let delays = delays
            .iter()
            .map(|&secs| {
                if secs.is_nan() || secs <= 0.0 {
                    return Ok(Duration::ZERO);
                }
                Duration::try_from_secs_f64(secs).map_err(|e| {
                    Error::ConfigurationError(format!("Invalid retry delay {}s: {}", secs, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(delays))
    }

    /// Retries `max_retries` times with the same delay.
    pub fn fixed(delay: Duration, max_retries: usize) -> Self {
        Self::new(std::iter::repeat(delay).take(max_retries))
    }

    /// Retries `max_retries` times, doubling the delay from `initial_delay`
    /// up to `max_delay`.
    pub fn exponential(initial_delay: Duration, max_delay: Duration, max_retries: usize) -> Self {
        Self::new((1..=max_retries).map(|retry| {
            let multiplier = 2u64.saturating_pow(retry.saturating_sub(1) as u32);
            initial_delay
                .saturating_mul(multiplier.try_into().unwrap_or(u32::MAX))
                .min(max_delay)
        }))
    }

    /// Replaces the set of retryable status codes.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = StatusCode>) -> Self {
        self.retry_statuses = statuses.into_iter().collect();
        self
    }

    /// Overrides the number of retries.
    ///
    /// When larger than the number of delays, the last delay is reused for the
    /// extra retries (no delay if the list is empty). When smaller, the list is
    /// truncated.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Scales each delay by a random factor between 50% and 100%.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// The number of retries after the first attempt.
    pub fn max_retries(&self) -> usize {
        self.max_retries.unwrap_or(self.delays.len())
    }

    /// The configured delays.
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Returns `true` if a response with this status may be retried.
    pub fn should_retry(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Returns the delay before the given retry, or `None` if retries are exhausted.
    ///
    /// # Arguments
    ///
    /// * `retry` - The retry number (1-indexed, so 1 = first retry)
    pub fn delay_for_retry(&self, retry: usize) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries() {
            return None;
        }
        let delay = self
            .delays
            .get(retry - 1)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO);

        if self.jitter && !delay.is_zero() {
            let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
            Some(delay.mul_f64(jitter_factor))
        } else {
            Some(delay)
        }
    }

    /// The delay before each scheduled attempt; the first attempt never waits.
    pub fn schedule(&self) -> Vec<Duration> {
        std::iter::once(Duration::ZERO)
            .chain((1..=self.max_retries()).filter_map(|retry| self.delay_for_retry(retry)))
            .collect()
    }
}

impl Default for RetryPolicy {
    /// Retries after 1, 5, 30 and 60 seconds.
    fn default() -> Self {
        Self::new([1, 5, 30, 60].map(Duration::from_secs))
    }
}

/// The attempt schedule for an optional policy: a single immediate attempt
/// when no policy is configured.
pub(crate) fn attempt_schedule(policy: Option<&RetryPolicy>) -> Vec<Duration> {
    policy
        .map(RetryPolicy::schedule)
        .unwrap_or_else(|| vec![Duration::ZERO])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff_delays() {
        let policy = RetryPolicy::exponential(
            Duration::from_millis(100),
            Duration::from_millis(1000),
            5,
        );

        assert_eq!(policy.delay_for_retry(1), Some(Duration::from_millis(100)));
        assert_eq!(policy.delay_for_retry(2), Some(Duration::from_millis(200)));
        assert_eq!(policy.delay_for_retry(3), Some(Duration::from_millis(400)));
        assert_eq!(policy.delay_for_retry(4), Some(Duration::from_millis(800)));
        assert_eq!(policy.delay_for_retry(5), Some(Duration::from_millis(1000)));
        assert_eq!(policy.delay_for_retry(6), None);
    }

    #[test]
    fn test_fixed_delays() {
        let policy = RetryPolicy::fixed(Duration::from_secs(1), 3);

        assert_eq!(policy.delay_for_retry(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for_retry(3), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for_retry(4), None);
    }

    #[test]
    fn test_extra_retries_reuse_last_delay() {
        let policy = RetryPolicy::from_secs(&[0.5, 2.0])
            .unwrap()
            .with_max_retries(4);

        assert_eq!(policy.delay_for_retry(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for_retry(4), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_for_retry(5), None);

        let empty = RetryPolicy::new([]).with_max_retries(2);
        assert_eq!(empty.schedule(), vec![Duration::ZERO; 3]);
    }

    #[test]
    fn test_fewer_retries_truncate() {
        let policy = RetryPolicy::from_secs(&[1.0, 2.0, 3.0])
            .unwrap()
            .with_max_retries(1);
        assert_eq!(policy.schedule(), vec![Duration::ZERO, Duration::from_secs(1)]);
    }

    #[test]
    fn test_schedule_always_has_first_attempt() {
        assert_eq!(attempt_schedule(None), vec![Duration::ZERO]);
        assert_eq!(
            attempt_schedule(Some(&RetryPolicy::new([]))),
            vec![Duration::ZERO]
        );
        assert_eq!(
            attempt_schedule(Some(&RetryPolicy::from_secs(&[0.5, -1.0]).unwrap())),
            vec![Duration::ZERO, Duration::from_millis(500), Duration::ZERO]
        );
    }

    #[test]
    fn test_unrepresentable_delay_is_rejected() {
        assert!(matches!(
            RetryPolicy::from_secs(&[1.0, 1e30]),
            Err(Error::ConfigurationError(_))
        ));
        assert!(RetryPolicy::from_secs(&[f64::INFINITY]).is_err());
        let policy = RetryPolicy::from_secs(&[f64::NAN]).unwrap();
        assert_eq!(policy.delays(), &[Duration::ZERO]);
    }

    #[test]
    fn test_default_statuses() {
        let policy = RetryPolicy::default();
        for status in [500, 502, 503, 504, 408, 409, 417] {
            assert!(policy.should_retry(StatusCode::from_u16(status).unwrap()));
        }
        assert!(!policy.should_retry(StatusCode::NOT_FOUND));
        assert!(!policy.should_retry(StatusCode::BAD_REQUEST));
        assert_eq!(policy.max_retries(), 4);
    }

    #[test]
    fn test_custom_statuses() {
        let policy = RetryPolicy::default().with_statuses([StatusCode::TOO_MANY_REQUESTS]);
        assert!(policy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(!policy.should_retry(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let policy = RetryPolicy::fixed(Duration::from_millis(100), 1).with_jitter(true);
        for _ in 0..50 {
            let delay = policy.delay_for_retry(1).unwrap();
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(100));
        }
    }
}
