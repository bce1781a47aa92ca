//! Retry policy
//!
//! Pure decisions about what happens after a failed attempt. The requester
//! feeds every non-success outcome through `RetryPolicy::decide` and either
//! sleeps and tries again or gives up. Nothing here touches the network or
//! the clock.

use crate::config::ClientConfig;
use crate::error::Error;
use rand::Rng;
use std::time::Duration;

/// A non-success outcome of one attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    /// HTTP 429, with the raw `Retry-After` header if the server sent one
    RateLimited { retry_after: Option<String> },
    /// Network error, timeout, bad status or undecodable body
    Failed(Error),
}

impl AttemptOutcome {
    /// Convert the outcome into the error it stands for
    pub fn into_error(self) -> Error {
        match self {
            Self::RateLimited { retry_after } => Error::RateLimited {
                retry_after_seconds: retry_after
                    .as_deref()
                    .and_then(parse_retry_after)
                    .unwrap_or(0.0),
            },
            Self::Failed(error) => error,
        }
    }
}

/// What to do after an attempt failed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryDecision {
    /// Sleep, then run the next attempt
    Retry {
        /// How long to sleep
        wait: Duration,
    },
    /// Stop; the request is exhausted
    GiveUp,
}

/// Bounded retry budget with two backoff shapes
///
/// Rate limits wait for the server's `Retry-After`, or
/// `backoff_base * 2^attempt + jitter` when it is absent. Every other failure
/// waits a fixed `backoff_base`. Both kinds draw from the same attempt budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts allowed
    pub max_retries: u32,
    /// Backoff base
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    /// Take the retry settings from a client config
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_retries, config.backoff_base_duration())
    }

    /// Whether an attempt with this 0-based index may follow `attempt`
    pub fn has_next_attempt(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_retries
    }

    /// Decide what follows a failed attempt.
    ///
    /// `jitter` is only drawn for rate limits without a usable `Retry-After`.
    /// On the last attempt the decision is always `GiveUp`.
    pub fn decide<J>(&self, attempt: u32, outcome: &AttemptOutcome, jitter: J) -> RetryDecision
    where
        J: FnOnce() -> f64,
    {
        if !self.has_next_attempt(attempt) {
            return RetryDecision::GiveUp;
        }

        let wait = match outcome {
            AttemptOutcome::RateLimited { retry_after } => {
                self.rate_limit_wait(attempt, retry_after.as_deref(), jitter)
            }
            AttemptOutcome::Failed(_) => self.error_wait(),
        };

        RetryDecision::Retry { wait }
    }

    /// Wait after a 429
    pub fn rate_limit_wait<J>(&self, attempt: u32, retry_after: Option<&str>, jitter: J) -> Duration
    where
        J: FnOnce() -> f64,
    {
        let seconds = match retry_after.and_then(parse_retry_after) {
            Some(server) => server,
            None => {
                let exponent = attempt.min(i32::MAX as u32) as i32;
                self.backoff_base.as_secs_f64() * 2f64.powi(exponent) + jitter().clamp(0.0, 1.0)
            }
        };
        seconds_to_duration(seconds)
    }

    /// Wait after any other failure
    pub fn error_wait(&self) -> Duration {
        self.backoff_base
    }
}

/// Parse a `Retry-After` value in seconds. HTTP-dates and garbage yield `None`.
pub fn parse_retry_after(value: &str) -> Option<f64> {
    let seconds: f64 = value.trim().parse().ok()?;
    seconds.is_finite().then_some(seconds.max(0.0))
}

/// Uniform jitter in `[0, 1)`
pub fn uniform_jitter() -> f64 {
    rand::thread_rng().gen::<f64>()
}

fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod retry_tests {
    use super::*;
    use test_case::test_case;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(6, Duration::from_secs(1))
    }

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 6);
        assert_eq!(policy.backoff_base, Duration::from_secs(1));
    }

    #[test_case("2", Some(2.0) ; "integer seconds")]
    #[test_case(" 1.5 ", Some(1.5) ; "fractional with whitespace")]
    #[test_case("-3", Some(0.0) ; "negative clamps to zero")]
    #[test_case("Wed, 21 Oct 2015 07:28:00 GMT", None ; "http date")]
    #[test_case("inf", None ; "infinite")]
    #[test_case("", None ; "empty")]
    fn test_parse_retry_after(raw: &str, expected: Option<f64>) {
        assert_eq!(parse_retry_after(raw), expected);
    }

    #[test]
    fn test_rate_limit_wait_uses_header() {
        let wait = policy().rate_limit_wait(3, Some("2"), || panic!("jitter not needed"));
        assert_eq!(wait, Duration::from_secs(2));
    }

    #[test]
    fn test_rate_limit_wait_exponential() {
        let policy = policy();
        assert_eq!(policy.rate_limit_wait(0, None, || 0.0), Duration::from_secs(1));
        assert_eq!(policy.rate_limit_wait(1, None, || 0.0), Duration::from_secs(2));
        assert_eq!(policy.rate_limit_wait(3, None, || 0.0), Duration::from_secs(8));
        assert_eq!(
            policy.rate_limit_wait(2, None, || 0.5),
            Duration::from_secs_f64(4.5)
        );
    }

    #[test]
    fn test_rate_limit_wait_unparseable_header_falls_back() {
        let wait = policy().rate_limit_wait(1, Some("soon"), || 0.25);
        assert_eq!(wait, Duration::from_secs_f64(2.25));
    }

    #[test]
    fn test_error_wait_is_fixed() {
        let policy = RetryPolicy::new(6, Duration::from_millis(750));
        assert_eq!(policy.error_wait(), Duration::from_millis(750));
    }

    #[test]
    fn test_decide_retries_until_budget_spent() {
        let policy = policy();
        let outcome = AttemptOutcome::Failed(Error::connection("refused"));

        for attempt in 0..5 {
            assert_eq!(
                policy.decide(attempt, &outcome, || 0.0),
                RetryDecision::Retry {
                    wait: Duration::from_secs(1)
                }
            );
        }
        assert_eq!(policy.decide(5, &outcome, || 0.0), RetryDecision::GiveUp);
    }

    #[test]
    fn test_decide_rate_limit_shares_budget() {
        let policy = RetryPolicy::new(2, Duration::from_secs(1));
        let outcome = AttemptOutcome::RateLimited {
            retry_after: Some("2".to_string()),
        };

        assert_eq!(
            policy.decide(0, &outcome, || 0.0),
            RetryDecision::Retry {
                wait: Duration::from_secs(2)
            }
        );
        assert_eq!(policy.decide(1, &outcome, || 0.0), RetryDecision::GiveUp);
    }

    #[test]
    fn test_decide_zero_budget() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        let outcome = AttemptOutcome::Failed(Error::connection("refused"));
        assert_eq!(policy.decide(0, &outcome, || 0.0), RetryDecision::GiveUp);
    }

    #[test]
    fn test_uniform_jitter_range() {
        for _ in 0..100 {
            let j = uniform_jitter();
            assert!((0.0..1.0).contains(&j));
        }
    }

    #[test]
    fn test_outcome_into_error() {
        let err = AttemptOutcome::RateLimited {
            retry_after: Some("3".to_string()),
        }
        .into_error();
        assert!(matches!(err, Error::RateLimited { retry_after_seconds } if retry_after_seconds == 3.0));

        let err = AttemptOutcome::Failed(Error::http_status(503, "")).into_error();
        assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    }
}
