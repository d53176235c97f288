//! I2C transport for the QMI8658.

use embedded_hal_async::i2c::I2c;

use super::Qmi8658Address;
use super::{Interface, InterfaceSettings, sealed};
use crate::error::Error;

/// I2C interface configuration (address + serial settings).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// 7-bit device address.
    pub address: u8,
    /// Register address auto-increment on burst reads (CTRL1.ADDR_AI).
    pub auto_increment: bool,
    /// Big-endian sensor data (CTRL1.BE).
    pub big_endian: bool,
}

impl I2cConfig {
    /// Primary address, auto-increment and big-endian data.
    pub const DEFAULT: Self = Self::new(Qmi8658Address::Primary.addr());

    /// Creates a configuration for the provided address.
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            auto_increment: true,
            big_endian: true,
        }
    }

    /// Sets the serial read endianness (CTRL1.BE).
    #[must_use]
    pub const fn with_big_endian(mut self, enable: bool) -> Self {
        self.big_endian = enable;
        self
    }

    pub(crate) const fn interface_settings(self) -> InterfaceSettings {
        InterfaceSettings {
            auto_increment: self.auto_increment,
            big_endian: self.big_endian,
        }
    }
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// I2C register interface.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new I2C interface with the given bus and 7-bit address.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit device address.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Releases the underlying I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    async fn read_reg(&mut self, reg: u8) -> Result<u8, Error> {
        let mut buffer = [0u8];
        self.read_regs(reg, &mut buffer).await?;
        Ok(buffer[0])
    }

    async fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Error> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.i2c
            .write_read(self.address, &[reg], buffer)
            .await
            .map_err(|_| Error::Bus)
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error> {
        self.i2c
            .write(self.address, &[reg, value])
            .await
            .map_err(|_| Error::Bus)
    }
}

impl<I2C> sealed::Sealed for I2cInterface<I2C> {}
