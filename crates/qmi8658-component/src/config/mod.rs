//! Configuration for the QMI8658 driver and component.

pub(crate) mod common;
pub(crate) mod component;

pub use common::{AccelConfig, AccelOutputDataRate, AccelRange, LowPassFilterMode};
pub use common::{GyroConfig, GyroOutputDataRate, GyroRange};
pub use component::{ComponentConfig, InterruptTrigger, RetryPolicy};

use crate::error::Error;

/// Sensor settings applied once at setup.
///
/// Both sub-sensors are always configured; whether they are enabled is
/// decided by which outputs have consumers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Accelerometer range, output data rate and filter.
    pub accel: AccelConfig,
    /// Gyroscope range, output data rate and filter.
    pub gyro: GyroConfig,
}

impl Config {
    /// Creates the default configuration (+/-8 g and +/-512 dps at 1 kHz).
    pub const fn new() -> Self {
        Self {
            accel: AccelConfig::DEFAULT,
            gyro: GyroConfig::DEFAULT,
        }
    }

    /// Sets the accelerometer configuration.
    #[must_use]
    pub const fn with_accel_config(mut self, accel: AccelConfig) -> Self {
        self.accel = accel;
        self
    }

    /// Sets the gyroscope configuration.
    #[must_use]
    pub const fn with_gyro_config(mut self, gyro: GyroConfig) -> Self {
        self.gyro = gyro;
        self
    }

    /// Low-power accel ODRs exist only in accel-only mode.
    pub(crate) fn validate(self, accel_enabled: bool, gyro_enabled: bool) -> Result<(), Error> {
        if accel_enabled && gyro_enabled && self.accel.odr.is_low_power() {
            return Err(Error::InvalidData);
        }
        Ok(())
    }
}
