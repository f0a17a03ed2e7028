use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use nimbus_domain::RetryConfig;
use tracing::warn;

/// Fixed-count retry with exponential backoff.
///
/// Every error is retried until the attempts run out; the error of the last
/// attempt is returned as is.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    fn backoff(&self) -> ExponentialBuilder {
        let mut builder = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.config.initial_backoff_ms))
            .with_factor(self.config.backoff_factor.max(1) as f32)
            .with_max_times(self.config.max_retries());
        if let Some(max_delay) = self.config.max_delay_ms {
            builder = builder.with_max_delay(Duration::from_millis(max_delay))
        }
        builder
    }

    pub async fn execute<T, F, Fut>(&self, call: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        call.retry(self.backoff())
            .notify(|err: &anyhow::Error, delay: Duration| {
                warn!(error = %err, delay = ?delay, "Attempt failed, retrying");
            })
            .await
    }
}
