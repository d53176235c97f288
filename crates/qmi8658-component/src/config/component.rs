//! Host-facing component settings.

use super::Config;
use crate::interface::I2cConfig;

/// How an interrupt line level is turned into an acquisition trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptTrigger {
    /// Acquire on every tick while the line reads high.
    ///
    /// A line held high re-triggers on each tick.
    #[default]
    Level,
    /// Acquire only on a low-to-high transition between two ticks.
    RisingEdge,
}

/// Bounded retry of the setup sequence (probe, configure, enable).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Zero is treated as one.
    pub attempts: u8,
    /// Delay before the second attempt, in milliseconds.
    pub initial_backoff_ms: u32,
    /// Upper bound for the doubling backoff, in milliseconds.
    pub max_backoff_ms: u32,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub const NONE: Self = Self {
        attempts: 1,
        initial_backoff_ms: 0,
        max_backoff_ms: 0,
    };

    /// Creates a policy with `attempts` tries and exponential backoff.
    pub const fn new(attempts: u8, initial_backoff_ms: u32, max_backoff_ms: u32) -> Self {
        Self {
            attempts,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    pub(crate) const fn attempts(self) -> u8 {
        if self.attempts == 0 { 1 } else { self.attempts }
    }

    /// Backoff to wait after failed attempt `attempt` (zero-based).
    pub(crate) fn backoff_ms(self, attempt: u8) -> u32 {
        let factor = 1u32.checked_shl(u32::from(attempt)).unwrap_or(u32::MAX);
        self.initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms.max(self.initial_backoff_ms))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// Complete configuration surface of the component, set once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComponentConfig {
    /// Bus address and serial settings.
    pub i2c: I2cConfig,
    /// Sensor ranges, rates and filters.
    pub sensor: Config,
    /// Interval at which the host calls `update()`, in milliseconds.
    pub update_interval_ms: u32,
    /// Interrupt line trigger semantics.
    pub trigger: InterruptTrigger,
    /// Setup retry policy.
    pub retry: RetryPolicy,
    /// Issue a soft reset between probe and configuration.
    pub soft_reset: bool,
}

impl ComponentConfig {
    /// Default polling interval, matching the usual 60 s sensor update.
    pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 60_000;

    /// Creates the default component configuration.
    pub const fn new() -> Self {
        Self {
            i2c: I2cConfig::DEFAULT,
            sensor: Config::new(),
            update_interval_ms: Self::DEFAULT_UPDATE_INTERVAL_MS,
            trigger: InterruptTrigger::Level,
            retry: RetryPolicy::NONE,
            soft_reset: true,
        }
    }

    /// Sets the I2C configuration.
    #[must_use]
    pub const fn with_i2c(mut self, i2c: I2cConfig) -> Self {
        self.i2c = i2c;
        self
    }

    /// Sets the sensor configuration.
    #[must_use]
    pub const fn with_sensor(mut self, sensor: Config) -> Self {
        self.sensor = sensor;
        self
    }

    /// Sets the update interval.
    #[must_use]
    pub const fn with_update_interval_ms(mut self, interval_ms: u32) -> Self {
        self.update_interval_ms = interval_ms;
        self
    }

    /// Sets the interrupt trigger semantics.
    #[must_use]
    pub const fn with_trigger(mut self, trigger: InterruptTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Sets the setup retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enables or disables the soft reset during setup.
    #[must_use]
    pub const fn with_soft_reset(mut self, enable: bool) -> Self {
        self.soft_reset = enable;
        self
    }
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self::new()
    }
}
