//! Error type for the QMI8658 component.

use core::fmt;

use crate::output::{Output, Subsystem};

/// Error type for QMI8658 driver and component operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus communication error (I2C NAK, arbitration loss, ...).
    Bus,
    /// Device did not acknowledge or reported an unexpected WHO_AM_I value.
    NotFound,
    /// Data not ready.
    NotReady,
    /// Writing the configuration of a sub-sensor failed.
    ///
    /// The accelerometer is configured before the gyroscope, so
    /// `Configure(Subsystem::Gyro)` means the accelerometer settings were applied.
    Configure(Subsystem),
    /// Invalid data or configuration.
    InvalidData,
    /// An interrupt line could not be read.
    Pin,
    /// A consumer is already bound to this output.
    AlreadyBound(Output),
    /// Operation not allowed in the current component state.
    InvalidState,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("bus transaction failed"),
            Self::NotFound => f.write_str("QMI8658 not found"),
            Self::NotReady => f.write_str("data not ready"),
            Self::Configure(subsystem) => write!(f, "failed to configure {}", subsystem.name()),
            Self::InvalidData => f.write_str("invalid data or configuration"),
            Self::Pin => f.write_str("interrupt pin read failed"),
            Self::AlreadyBound(output) => write!(f, "{} already has a consumer", output.name()),
            Self::InvalidState => f.write_str("operation not allowed in current state"),
        }
    }
}

impl core::error::Error for Error {}
