use derive_setters::Setters;

/// Bounds the retry loop wrapped around a client build.
#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into, strip_option)]
pub struct RetryConfig {
    /// Total attempts, the first one included.
    pub max_attempts: usize,
    /// Delay before the first retry. Zero disables waiting entirely.
    pub initial_backoff_ms: u64,
    /// Multiplier applied to the delay after every retry.
    pub backoff_factor: u64,
    /// Upper bound for a single delay.
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            backoff_factor: 2,
            max_delay_ms: Some(1000),
        }
    }
}

impl RetryConfig {
    /// Number of retries after the initial attempt.
    pub fn max_retries(&self) -> usize {
        self.max_attempts.saturating_sub(1)
    }
}
