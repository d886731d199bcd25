use crate::{ReconcileError, settings::BackoffSettings};
use std::time::Duration;

/// Bounded exponential backoff.
///
/// The n-th consecutive failure waits `base × multiplier^(n-1)`, capped at
/// the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    multiplier: u32,
    ceiling: Duration,
}

impl Backoff {
    pub fn new(base: Duration, multiplier: u32, ceiling: Duration) -> Self {
        Self {
            base,
            multiplier,
            ceiling: ceiling.max(base),
        }
    }

    pub const fn base(&self) -> Duration {
        self.base
    }

    pub const fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Delay before retrying after `failures` consecutive failures.
    pub fn delay(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1);
        self.multiplier
            .checked_pow(exponent)
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.ceiling, |delay| delay.min(self.ceiling))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from(&BackoffSettings::default())
    }
}

impl From<&BackoffSettings> for Backoff {
    fn from(settings: &BackoffSettings) -> Self {
        Self::new(
            Duration::from_secs(settings.base_seconds),
            settings.multiplier,
            Duration::from_secs(settings.ceiling_seconds),
        )
    }
}

/// What the dispatcher should do with a resource after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run another pass after the delay.
    Requeue(Duration),
    /// Nothing to do until the resource or its dependencies change.
    AwaitChange,
}

/// Turn an error that escaped a pass into a retry.
///
/// Stale writes retry at once, since the next pass re-reads the resource.
pub fn error_policy(error: &ReconcileError, backoff: &Backoff) -> Action {
    if error.is_stale_write() {
        Action::Requeue(Duration::ZERO)
    } else {
        Action::Requeue(backoff.base())
    }
}
