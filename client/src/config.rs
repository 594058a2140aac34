use std::time::Duration;

/// Backoff for transient HTTP failures (transport errors, 429, 5xx)
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// A policy that sends every request exactly once
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: usize) -> Duration {
        let mut delay = self.initial_delay;
        for _ in 1..retry {
            delay = Duration::from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier)
                .min(self.max_delay);
        }
        delay.min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root URL of the backend, without a trailing slash
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `base_url` joined with `path`, tolerating slashes on either side
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            user_agent: concat!("pokedex-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}
