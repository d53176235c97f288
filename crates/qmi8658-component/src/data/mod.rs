//! Sensor data readout and unit conversion.

pub(crate) mod scale;

pub use scale::{accel_lsb_per_g, gyro_lsb_per_dps, temperature_lsb_per_celsius};

use crate::config::{AccelRange, GyroRange};
use crate::register::Register;

/// First register of the sample burst (TIMESTAMP_L .. GZ_H).
pub(crate) const RAW_BLOCK_START: Register = Register::TimestampLow;
pub(crate) const RAW_BLOCK_LEN: usize = 17;
const TIMESTAMP_OFFSET: usize = 0;
const TEMPERATURE_OFFSET: usize = 3;
const ACCEL_OFFSET: usize = 5;
const GYRO_OFFSET: usize = 11;

/// Sample timestamp (24-bit device counter, wraps).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp {
    /// Raw 24-bit counter value.
    pub ticks: u32,
}

impl Timestamp {
    /// Timestamp bytes are always little-endian, regardless of CTRL1.BE.
    pub(crate) const fn from_bytes(bytes: [u8; 3]) -> Self {
        let ticks = ((bytes[2] as u32) << 16) | ((bytes[1] as u32) << 8) | (bytes[0] as u32);
        Self { ticks }
    }
}

/// Raw three-axis counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxesRaw {
    /// X-axis raw count.
    pub x: i16,
    /// Y-axis raw count.
    pub y: i16,
    /// Z-axis raw count.
    pub z: i16,
}

impl AxesRaw {
    pub(crate) fn from_bytes(bytes: &[u8], big_endian: bool) -> Self {
        Self {
            x: decode_i16([bytes[0], bytes[1]], big_endian),
            y: decode_i16([bytes[2], bytes[3]], big_endian),
            z: decode_i16([bytes[4], bytes[5]], big_endian),
        }
    }

    fn scaled(self, lsb_per_unit: i32) -> Axes {
        let scale = lsb_per_unit as f32;
        Axes {
            x: f32::from(self.x) / scale,
            y: f32::from(self.y) / scale,
            z: f32::from(self.z) / scale,
        }
    }
}

fn decode_i16(bytes: [u8; 2], big_endian: bool) -> i16 {
    if big_endian {
        i16::from_be_bytes(bytes)
    } else {
        i16::from_le_bytes(bytes)
    }
}

/// Raw register burst sampled at a single timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawBlock {
    /// Sample timestamp.
    pub timestamp: Timestamp,
    /// Raw temperature count (1/256 deg C per LSB).
    pub temperature: i16,
    /// Raw accelerometer counts, if the accelerometer is enabled.
    pub accel: Option<AxesRaw>,
    /// Raw gyroscope counts, if the gyroscope is enabled.
    pub gyro: Option<AxesRaw>,
}

impl RawBlock {
    /// Decodes a burst buffer read from [`RAW_BLOCK_START`].
    pub(crate) fn decode(
        buffer: &[u8; RAW_BLOCK_LEN],
        big_endian: bool,
        accel_enabled: bool,
        gyro_enabled: bool,
    ) -> Self {
        let timestamp = Timestamp::from_bytes([
            buffer[TIMESTAMP_OFFSET],
            buffer[TIMESTAMP_OFFSET + 1],
            buffer[TIMESTAMP_OFFSET + 2],
        ]);
        let temperature = decode_i16(
            [buffer[TEMPERATURE_OFFSET], buffer[TEMPERATURE_OFFSET + 1]],
            big_endian,
        );
        let accel = accel_enabled
            .then(|| AxesRaw::from_bytes(&buffer[ACCEL_OFFSET..ACCEL_OFFSET + 6], big_endian));
        let gyro = gyro_enabled
            .then(|| AxesRaw::from_bytes(&buffer[GYRO_OFFSET..GYRO_OFFSET + 6], big_endian));

        Self {
            timestamp,
            temperature,
            accel,
            gyro,
        }
    }

    /// Converts the raw counts to physical units for the given full-scale ranges.
    pub fn to_sample(self, accel_range: AccelRange, gyro_range: GyroRange) -> Sample {
        Sample {
            timestamp: self.timestamp,
            accel: self
                .accel
                .map(|raw| raw.scaled(accel_lsb_per_g(accel_range))),
            gyro: self
                .gyro
                .map(|raw| raw.scaled(gyro_lsb_per_dps(gyro_range))),
            temperature: f32::from(self.temperature) / temperature_lsb_per_celsius() as f32,
        }
    }
}

/// Three-axis reading in physical units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    /// X-axis value.
    pub x: f32,
    /// Y-axis value.
    pub y: f32,
    /// Z-axis value.
    pub z: f32,
}

impl Axes {
    /// Creates a new three-axis value.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// One acquisition in physical units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Device timestamp of the burst.
    pub timestamp: Timestamp,
    /// Acceleration in g, if the accelerometer is enabled.
    pub accel: Option<Axes>,
    /// Angular rate in deg/s, if the gyroscope is enabled.
    pub gyro: Option<Axes>,
    /// Die temperature in degrees Celsius.
    pub temperature: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_raw_block_little_endian() {
        let mut buffer = [0u8; RAW_BLOCK_LEN];
        buffer[TIMESTAMP_OFFSET] = 0x01;
        buffer[TIMESTAMP_OFFSET + 1] = 0x02;
        buffer[TIMESTAMP_OFFSET + 2] = 0x03;
        buffer[TEMPERATURE_OFFSET] = 0x10;

        buffer[ACCEL_OFFSET] = 0x01;
        buffer[ACCEL_OFFSET + 2] = 0x02;
        buffer[ACCEL_OFFSET + 4] = 0x03;

        buffer[GYRO_OFFSET] = 0x04;
        buffer[GYRO_OFFSET + 2] = 0x05;
        buffer[GYRO_OFFSET + 4] = 0xFF;
        buffer[GYRO_OFFSET + 5] = 0xFF;

        let block = RawBlock::decode(&buffer, false, true, true);
        assert_eq!(block.timestamp.ticks, 0x030201);
        assert_eq!(block.temperature, 0x0010);
        assert_eq!(block.accel, Some(AxesRaw { x: 1, y: 2, z: 3 }));
        assert_eq!(block.gyro, Some(AxesRaw { x: 4, y: 5, z: -1 }));
    }

    #[test]
    fn decode_raw_block_skips_disabled_subsystems() {
        let mut buffer = [0u8; RAW_BLOCK_LEN];
        buffer[TIMESTAMP_OFFSET] = 0xAA;
        buffer[TIMESTAMP_OFFSET + 1] = 0xBB;
        buffer[TIMESTAMP_OFFSET + 2] = 0xCC;
        buffer[TEMPERATURE_OFFSET + 1] = 0x10;
        buffer[ACCEL_OFFSET + 1] = 0x7F;

        let block = RawBlock::decode(&buffer, true, false, false);
        assert_eq!(block.timestamp.ticks, 0xCCBBAA);
        assert_eq!(block.temperature, 0x0010);
        assert!(block.accel.is_none());
        assert!(block.gyro.is_none());
    }

    #[test]
    fn to_sample_scales_by_range() {
        let block = RawBlock {
            timestamp: Timestamp { ticks: 42 },
            temperature: 23 * 256 + 128,
            accel: Some(AxesRaw {
                x: 2_048,
                y: -4_096,
                z: 4_096,
            }),
            gyro: Some(AxesRaw {
                x: 64,
                y: -32,
                z: 0,
            }),
        };

        let sample = block.to_sample(AccelRange::G8, GyroRange::Dps512);

        assert_eq!(sample.timestamp.ticks, 42);
        assert_eq!(sample.temperature, 23.5);
        assert_eq!(sample.accel, Some(Axes::new(0.5, -1.0, 1.0)));
        assert_eq!(sample.gyro, Some(Axes::new(1.0, -0.5, 0.0)));
    }
}
