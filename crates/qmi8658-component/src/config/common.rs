use crate::register::{ctrl2, ctrl3, ctrl5};

/// Low-pass filter bandwidth selection (percent of ODR).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPassFilterMode {
    /// 2.62% of ODR.
    OdrPercent2_62,
    /// 3.59% of ODR.
    OdrPercent3_59,
    /// 5.32% of ODR.
    OdrPercent5_32,
    /// 14.0% of ODR.
    OdrPercent14_0,
}

impl LowPassFilterMode {
    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::OdrPercent2_62 => 0b00,
            Self::OdrPercent3_59 => 0b01,
            Self::OdrPercent5_32 => 0b10,
            Self::OdrPercent14_0 => 0b11,
        }
    }
}

/// Accelerometer full-scale range selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// +/-2 g range.
    G2,
    /// +/-4 g range.
    G4,
    /// +/-8 g range.
    G8,
    /// +/-16 g range.
    G16,
}

impl AccelRange {
    /// Returns the full-scale range in g.
    pub const fn g(self) -> u16 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::G2 => 0b000,
            Self::G4 => 0b001,
            Self::G8 => 0b010,
            Self::G16 => 0b011,
        }
    }
}

/// Accelerometer output data rate selection.
///
/// Low-power rates are only reachable with the gyroscope disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelOutputDataRate {
    /// 8000 Hz.
    Hz8000,
    /// 4000 Hz.
    Hz4000,
    /// 2000 Hz.
    Hz2000,
    /// 1000 Hz.
    Hz1000,
    /// 500 Hz.
    Hz500,
    /// 250 Hz.
    Hz250,
    /// 125 Hz.
    Hz125,
    /// 62.5 Hz.
    Hz62_5,
    /// 31.25 Hz.
    Hz31_25,
    /// 128 Hz (low power).
    LowPowerHz128,
    /// 21 Hz (low power).
    LowPowerHz21,
    /// 11 Hz (low power).
    LowPowerHz11,
    /// 3 Hz (low power).
    LowPowerHz3,
}

impl AccelOutputDataRate {
    /// Returns the nominal output data rate in milli-hertz.
    pub const fn hz_milli(self) -> u32 {
        match self {
            Self::Hz8000 => 8_000_000,
            Self::Hz4000 => 4_000_000,
            Self::Hz2000 => 2_000_000,
            Self::Hz1000 => 1_000_000,
            Self::Hz500 => 500_000,
            Self::Hz250 => 250_000,
            Self::Hz125 => 125_000,
            Self::Hz62_5 => 62_500,
            Self::Hz31_25 => 31_250,
            Self::LowPowerHz128 => 128_000,
            Self::LowPowerHz21 => 21_000,
            Self::LowPowerHz11 => 11_000,
            Self::LowPowerHz3 => 3_000,
        }
    }

    /// Returns true if the ODR selects accelerometer low-power mode.
    pub const fn is_low_power(self) -> bool {
        matches!(
            self,
            Self::LowPowerHz128 | Self::LowPowerHz21 | Self::LowPowerHz11 | Self::LowPowerHz3
        )
    }

    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::Hz8000 => 0b0000,
            Self::Hz4000 => 0b0001,
            Self::Hz2000 => 0b0010,
            Self::Hz1000 => 0b0011,
            Self::Hz500 => 0b0100,
            Self::Hz250 => 0b0101,
            Self::Hz125 => 0b0110,
            Self::Hz62_5 => 0b0111,
            Self::Hz31_25 => 0b1000,
            Self::LowPowerHz128 => 0b1100,
            Self::LowPowerHz21 => 0b1101,
            Self::LowPowerHz11 => 0b1110,
            Self::LowPowerHz3 => 0b1111,
        }
    }
}

/// Accelerometer settings (range + ODR + filter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelConfig {
    /// Full-scale range.
    pub range: AccelRange,
    /// Output data rate.
    pub odr: AccelOutputDataRate,
    /// Low-pass filter mode (None disables LPF).
    pub lpf: Option<LowPassFilterMode>,
}

impl AccelConfig {
    /// Default accelerometer settings: +/-8 g at 1 kHz, LPF off.
    pub const DEFAULT: Self = Self {
        range: AccelRange::G8,
        odr: AccelOutputDataRate::Hz1000,
        lpf: None,
    };

    /// Creates accelerometer settings with the LPF disabled.
    pub const fn new(range: AccelRange, odr: AccelOutputDataRate) -> Self {
        Self {
            range,
            odr,
            lpf: None,
        }
    }

    /// Returns these settings with the low-pass filter enabled.
    #[must_use]
    pub const fn with_lpf(self, mode: LowPassFilterMode) -> Self {
        Self {
            lpf: Some(mode),
            ..self
        }
    }

    pub(crate) const fn ctrl2_value(self) -> u8 {
        ((self.range.bits() << ctrl2::A_FS_SHIFT) & ctrl2::A_FS_MASK)
            | (self.odr.bits() & ctrl2::A_ODR_MASK)
    }

    /// Accelerometer half of CTRL5.
    pub(crate) const fn ctrl5_bits(self) -> u8 {
        match self.lpf {
            Some(mode) => {
                ctrl5::A_LPF_EN | ((mode.bits() << ctrl5::A_LPF_MODE_SHIFT) & ctrl5::A_LPF_MODE_MASK)
            }
            None => 0,
        }
    }
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Gyroscope full-scale range selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// +/-16 deg/s.
    Dps16,
    /// +/-32 deg/s.
    Dps32,
    /// +/-64 deg/s.
    Dps64,
    /// +/-128 deg/s.
    Dps128,
    /// +/-256 deg/s.
    Dps256,
    /// +/-512 deg/s.
    Dps512,
    /// +/-1024 deg/s.
    Dps1024,
    /// +/-2048 deg/s.
    Dps2048,
}

impl GyroRange {
    /// Returns the full-scale range in degrees per second.
    pub const fn dps(self) -> u16 {
        match self {
            Self::Dps16 => 16,
            Self::Dps32 => 32,
            Self::Dps64 => 64,
            Self::Dps128 => 128,
            Self::Dps256 => 256,
            Self::Dps512 => 512,
            Self::Dps1024 => 1024,
            Self::Dps2048 => 2048,
        }
    }

    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::Dps16 => 0b000,
            Self::Dps32 => 0b001,
            Self::Dps64 => 0b010,
            Self::Dps128 => 0b011,
            Self::Dps256 => 0b100,
            Self::Dps512 => 0b101,
            Self::Dps1024 => 0b110,
            Self::Dps2048 => 0b111,
        }
    }
}

/// Gyroscope output data rate selection.
///
/// Actual rates follow the gyro natural frequency (~0.94x nominal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroOutputDataRate {
    /// 8000 Hz.
    Hz8000,
    /// 4000 Hz.
    Hz4000,
    /// 2000 Hz.
    Hz2000,
    /// 1000 Hz.
    Hz1000,
    /// 500 Hz.
    Hz500,
    /// 250 Hz.
    Hz250,
    /// 125 Hz.
    Hz125,
    /// 62.5 Hz.
    Hz62_5,
    /// 31.25 Hz.
    Hz31_25,
}

impl GyroOutputDataRate {
    /// Returns the actual output data rate in milli-hertz.
    pub const fn hz_milli(self) -> u32 {
        match self {
            Self::Hz8000 => 7_520_000,
            Self::Hz4000 => 3_760_000,
            Self::Hz2000 => 1_880_000,
            Self::Hz1000 => 940_000,
            Self::Hz500 => 470_000,
            Self::Hz250 => 235_000,
            Self::Hz125 => 117_500,
            Self::Hz62_5 => 58_750,
            Self::Hz31_25 => 29_375,
        }
    }

    pub(crate) const fn bits(self) -> u8 {
        match self {
            Self::Hz8000 => 0b0000,
            Self::Hz4000 => 0b0001,
            Self::Hz2000 => 0b0010,
            Self::Hz1000 => 0b0011,
            Self::Hz500 => 0b0100,
            Self::Hz250 => 0b0101,
            Self::Hz125 => 0b0110,
            Self::Hz62_5 => 0b0111,
            Self::Hz31_25 => 0b1000,
        }
    }
}

/// Gyroscope settings (range + ODR + filter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroConfig {
    /// Full-scale range.
    pub range: GyroRange,
    /// Output data rate.
    pub odr: GyroOutputDataRate,
    /// Low-pass filter mode (None disables LPF).
    pub lpf: Option<LowPassFilterMode>,
}

impl GyroConfig {
    /// Default gyroscope settings: +/-512 dps at 1 kHz, LPF off.
    pub const DEFAULT: Self = Self {
        range: GyroRange::Dps512,
        odr: GyroOutputDataRate::Hz1000,
        lpf: None,
    };

    /// Creates gyroscope settings with the LPF disabled.
    pub const fn new(range: GyroRange, odr: GyroOutputDataRate) -> Self {
        Self {
            range,
            odr,
            lpf: None,
        }
    }

    /// Returns these settings with the low-pass filter enabled.
    #[must_use]
    pub const fn with_lpf(self, mode: LowPassFilterMode) -> Self {
        Self {
            lpf: Some(mode),
            ..self
        }
    }

    pub(crate) const fn ctrl3_value(self) -> u8 {
        ((self.range.bits() << ctrl3::G_FS_SHIFT) & ctrl3::G_FS_MASK)
            | (self.odr.bits() & ctrl3::G_ODR_MASK)
    }

    /// Gyroscope half of CTRL5.
    pub(crate) const fn ctrl5_bits(self) -> u8 {
        match self.lpf {
            Some(mode) => {
                ctrl5::G_LPF_EN | ((mode.bits() << ctrl5::G_LPF_MODE_SHIFT) & ctrl5::G_LPF_MODE_MASK)
            }
            None => 0,
        }
    }
}

impl Default for GyroConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
