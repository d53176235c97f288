//! Register I/O over the serial bus.

pub(crate) mod address;
pub(crate) mod i2c;

pub use address::Qmi8658Address;
pub use i2c::{I2cConfig, I2cInterface};

use crate::error::Error;
use crate::register::ctrl1;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Minimal async register I/O used by the driver.
#[allow(async_fn_in_trait)]
pub trait Interface: sealed::Sealed {
    /// Reads a single register.
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error>;
    /// Reads a contiguous block of registers into `buffer`.
    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error>;
    /// Writes a single register.
    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error>;
}

/// Serial interface settings applied via CTRL1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InterfaceSettings {
    pub(crate) auto_increment: bool,
    pub(crate) big_endian: bool,
}

impl InterfaceSettings {
    pub(crate) const fn ctrl1_value(self) -> u8 {
        let mut value = 0;
        if self.auto_increment {
            value |= ctrl1::ADDR_AI;
        }
        if self.big_endian {
            value |= ctrl1::BE;
        }
        value
    }
}
