//! Sensitivity tables for raw sensor counts.

use crate::config::{AccelRange, GyroRange};

/// Returns the accelerometer sensitivity in LSB/g.
pub const fn accel_lsb_per_g(range: AccelRange) -> i32 {
    match range {
        AccelRange::G2 => 16_384,
        AccelRange::G4 => 8_192,
        AccelRange::G8 => 4_096,
        AccelRange::G16 => 2_048,
    }
}

/// Returns the gyroscope sensitivity in LSB/dps.
pub const fn gyro_lsb_per_dps(range: GyroRange) -> i32 {
    match range {
        GyroRange::Dps16 => 2_048,
        GyroRange::Dps32 => 1_024,
        GyroRange::Dps64 => 512,
        GyroRange::Dps128 => 256,
        GyroRange::Dps256 => 128,
        GyroRange::Dps512 => 64,
        GyroRange::Dps1024 => 32,
        GyroRange::Dps2048 => 16,
    }
}

/// Returns the temperature sensitivity in LSB per degree Celsius.
pub const fn temperature_lsb_per_celsius() -> i32 {
    256
}
