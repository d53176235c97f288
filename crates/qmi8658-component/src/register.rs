//! QMI8658 register addresses and bit masks used by the driver.

/// QMI8658 register addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    /// Device identifier.
    WhoAmI = 0x00,
    /// Device revision.
    RevisionId = 0x01,
    /// Serial interface settings.
    Ctrl1 = 0x02,
    /// Accelerometer range and ODR.
    Ctrl2 = 0x03,
    /// Gyroscope range and ODR.
    Ctrl3 = 0x04,
    /// Low-pass filter settings.
    Ctrl5 = 0x06,
    /// Sensor enable.
    Ctrl7 = 0x08,
    /// Data available flags.
    Status0 = 0x2E,
    /// Timestamp low byte, start of the sample burst.
    TimestampLow = 0x30,
    /// Soft reset.
    Reset = 0x60,
}

impl Register {
    /// Returns the register address.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Expected values for WHO_AM_I.
pub mod who_am_i {
    /// Expected WHO_AM_I register value.
    pub const EXPECTED: u8 = 0b0000_0101;
}

/// CTRL1 register bits.
pub mod ctrl1 {
    /// Auto-increment register address on reads.
    pub const ADDR_AI: u8 = 0b0100_0000;
    /// Big-endian serial interface read data.
    pub const BE: u8 = 0b0010_0000;
}

/// CTRL2 register bits.
pub mod ctrl2 {
    /// Accelerometer full-scale selection mask.
    pub const A_FS_MASK: u8 = 0b0111_0000;
    /// Accelerometer full-scale selection shift.
    pub const A_FS_SHIFT: u8 = 4;
    /// Accelerometer output data rate selection mask.
    pub const A_ODR_MASK: u8 = 0b0000_1111;
}

/// CTRL3 register bits.
pub mod ctrl3 {
    /// Gyroscope full-scale selection mask.
    pub const G_FS_MASK: u8 = 0b0111_0000;
    /// Gyroscope full-scale selection shift.
    pub const G_FS_SHIFT: u8 = 4;
    /// Gyroscope output data rate selection mask.
    pub const G_ODR_MASK: u8 = 0b0000_1111;
}

/// CTRL5 register bits.
pub mod ctrl5 {
    /// Gyroscope low-pass filter mode mask.
    pub const G_LPF_MODE_MASK: u8 = 0b0110_0000;
    /// Gyroscope low-pass filter mode shift.
    pub const G_LPF_MODE_SHIFT: u8 = 5;
    /// Gyroscope low-pass filter enable.
    pub const G_LPF_EN: u8 = 0b0001_0000;
    /// Accelerometer low-pass filter mode mask.
    pub const A_LPF_MODE_MASK: u8 = 0b0000_0110;
    /// Accelerometer low-pass filter mode shift.
    pub const A_LPF_MODE_SHIFT: u8 = 1;
    /// Accelerometer low-pass filter enable.
    pub const A_LPF_EN: u8 = 0b0000_0001;
}

/// CTRL7 register bits.
pub mod ctrl7 {
    /// Enable gyroscope.
    pub const G_EN: u8 = 0b0000_0010;
    /// Enable accelerometer.
    pub const A_EN: u8 = 0b0000_0001;
}

/// STATUS0 register bits.
pub mod status0 {
    /// Accelerometer data available.
    pub const ACCEL_AVAIL: u8 = 0b0000_0001;
    /// Gyroscope data available.
    pub const GYRO_AVAIL: u8 = 0b0000_0010;
}

/// RESET register values.
pub mod reset {
    /// Soft reset command value.
    pub const SOFT_RESET: u8 = 0b1011_0000;
}
