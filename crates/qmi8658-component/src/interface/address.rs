//! I2C address selection for the QMI8658.

/// QMI8658 I2C addresses, selected by the SA0 strap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Qmi8658Address {
    /// 0x6A (SA0 = low).
    Primary,
    /// 0x6B (SA0 = high).
    Secondary,
}

impl Qmi8658Address {
    /// Returns the 7-bit I2C address.
    pub const fn addr(self) -> u8 {
        match self {
            Self::Primary => 0x6A,
            Self::Secondary => 0x6B,
        }
    }
}
