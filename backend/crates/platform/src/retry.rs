//! Retry Policies
//!
//! Backoff for calls to external collaborators (document stores, identity
//! providers). Callers decide which errors are worth retrying; this module
//! only decides how long to wait and when to give up.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Additional attempts after the first one (0 = try once)
    pub max_retries: u32,
    pub backoff: Backoff,
}

impl RetryConfig {
    pub fn new(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Try exactly once
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }

    pub fn exponential(max_retries: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::Exponential(ExponentialBackoff::new(initial_delay, max_delay)),
        }
    }

    /// Upper bound on the total time spent sleeping between attempts
    ///
    /// Jitter is ignored, so the real figure can exceed this by the jitter factor.
    pub fn max_total_delay(&self) -> Duration {
        (0..self.max_retries)
            .map(|attempt| self.backoff.base_delay(attempt))
            .sum()
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::default(),
        }
    }
}

/// How long to wait before retry number `attempt` (0-based)
#[derive(Debug, Clone)]
pub enum Backoff {
    Fixed(Duration),
    Exponential(ExponentialBackoff),
}

impl Backoff {
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential(exp) => exp.delay(attempt),
        }
    }

    fn base_delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential(exp) => exp.capped(attempt),
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential(ExponentialBackoff::default())
    }
}

/// Exponential backoff with optional jitter
///
/// Delay doubles per attempt starting from `initial_delay`, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// 0.0 = no jitter, 1.0 = up to 100% jitter
    pub jitter_factor: f64,
}

impl ExponentialBackoff {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
            jitter_factor: 0.0,
        }
    }

    pub fn with_jitter(mut self, jitter_factor: f64) -> Self {
        self.jitter_factor = jitter_factor.clamp(0.0, 1.0);
        self
    }

    fn capped(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        let capped = self.capped(attempt);
        if self.jitter_factor <= 0.0 {
            return capped;
        }

        let capped = capped.as_secs_f64();
        let jitter_range = capped * self.jitter_factor;
        let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
        Duration::from_secs_f64((capped + jitter).max(0.0))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            jitter_factor: 0.1,
        }
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent. The last error is returned on exhaustion.
pub async fn retry_async<T, E, F, Fut>(
    config: &RetryConfig,
    is_retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_retries && is_retryable(&e) => {
                let delay = config.backoff.delay(attempt);
                tracing::debug!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying after failure"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
