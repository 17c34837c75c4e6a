use std::time::Duration;

use reqwest::header::HeaderValue;

use crate::{backoff::Backoff, ManapoolError, Result};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://manapool.com/api/v1/";

/// Configures rate limiting, retry, and timeout behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// First retry delay; doubled after every retryable failure.
    pub initial_backoff: Duration,
    /// Sustained request rate in requests per second.
    pub rate_limit: f64,
    /// Requests allowed back to back before the sustained rate applies.
    pub rate_burst: u32,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            rate_limit: 10.0,
            rate_burst: 1,
            user_agent: default_user_agent(),
        }
    }
}

impl ClientOptions {
    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry count and the first backoff delay.
    pub fn with_retry(mut self, max_retries: usize, initial_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.initial_backoff = initial_backoff;
        self
    }

    /// Sets the sustained rate and the burst size.
    pub fn with_rate_limit(mut self, rate_limit: f64, rate_burst: u32) -> Self {
        self.rate_limit = rate_limit;
        self.rate_burst = rate_burst;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks every field before a client is built.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(ManapoolError::validation(
                "timeout",
                "timeout must be greater than zero",
            ));
        }
        if !(self.rate_limit.is_finite() && self.rate_limit > 0.0) {
            return Err(ManapoolError::validation(
                "rate_limit",
                format!("rate_limit must be positive, got {}", self.rate_limit),
            ));
        }
        if self.rate_burst == 0 {
            return Err(ManapoolError::validation(
                "rate_burst",
                "rate_burst must be at least 1",
            ));
        }
        if self.user_agent.trim().is_empty() || HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(ManapoolError::validation(
                "user_agent",
                "user_agent must be a non-empty header value",
            ));
        }
        Ok(())
    }

    pub(crate) fn backoff(&self) -> Backoff {
        Backoff::new(self.initial_backoff, self.max_retries)
    }
}

fn default_user_agent() -> String {
    format!("manapool-http/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ClientOptions;
    use crate::ManapoolError;

    #[test]
    fn documented_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.initial_backoff, Duration::from_secs(1));
        assert_eq!(options.rate_limit, 10.0);
        assert_eq!(options.rate_burst, 1);
        assert!(options.user_agent.starts_with("manapool-http/"));
        options.validate().expect("defaults must be valid");
    }

    #[test]
    fn setters_compose() {
        let options = ClientOptions::default()
            .with_timeout(Duration::from_secs(60))
            .with_retry(5, Duration::from_secs(2))
            .with_rate_limit(5.0, 2)
            .with_user_agent("custom-agent");
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.max_retries, 5);
        assert_eq!(options.initial_backoff, Duration::from_secs(2));
        assert_eq!(options.rate_limit, 5.0);
        assert_eq!(options.rate_burst, 2);
        assert_eq!(options.user_agent, "custom-agent");
        assert_eq!(options.backoff().max_attempts(), 6);
    }

    #[test]
    fn invalid_options_name_the_field() {
        let cases = [
            (ClientOptions::default().with_timeout(Duration::ZERO), "timeout"),
            (ClientOptions::default().with_rate_limit(0.0, 1), "rate_limit"),
            (ClientOptions::default().with_rate_limit(1.0, 0), "rate_burst"),
            (ClientOptions::default().with_user_agent("bad\nagent"), "user_agent"),
        ];
        for (options, expected) in cases {
            match options.validate() {
                Err(ManapoolError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected validation error for {expected}, got {other:?}"),
            }
        }
    }
}
