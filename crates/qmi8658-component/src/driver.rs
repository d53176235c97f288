//! QMI8658 driver implementation.
//!
//! Register-level bring-up and sample readout. The driver never schedules:
//! readiness is polled by the caller through [`Qmi8658::is_data_ready`] or
//! implicitly through [`Qmi8658::read_sample`].

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{AccelConfig, Config, GyroConfig};
use crate::data::{RAW_BLOCK_LEN, RAW_BLOCK_START, RawBlock, Sample};
use crate::error::Error;
use crate::interface::{I2cConfig, I2cInterface, Interface, InterfaceSettings};
use crate::output::Subsystem;
use crate::register::{Register, ctrl7, reset, status0, who_am_i};

const SOFT_RESET_DELAY_MS: u32 = 150;

/// Identity registers read during probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// WHO_AM_I value (always 0x05 for a detected device).
    pub chip_id: u8,
    /// REVISION_ID value.
    pub revision: u8,
}

/// QMI8658 6-axis IMU driver.
pub struct Qmi8658<I> {
    interface: I,
    config: Config,
    settings: InterfaceSettings,
    identity: Option<DeviceIdentity>,
    ctrl7: u8,
}

/// I2C type alias for the QMI8658 driver.
pub type Qmi8658I2c<I2C> = Qmi8658<I2cInterface<I2C>>;

impl<I2C> Qmi8658<I2cInterface<I2C>>
where
    I2C: I2c,
{
    /// Creates a new I2C-based driver with default settings.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::with_i2c_config(i2c, Config::default(), I2cConfig::default())
    }

    /// Creates a new I2C-based driver with a custom configuration.
    pub fn with_i2c_config(i2c: I2C, config: Config, i2c_config: I2cConfig) -> Self {
        let interface = I2cInterface::new(i2c, i2c_config.address);
        Self::new(interface, config, i2c_config.interface_settings())
    }

    /// Returns the 7-bit address the driver talks to.
    pub fn address(&self) -> u8 {
        self.interface.address()
    }

    /// Releases the I2C bus, consuming the driver.
    pub fn release(self) -> I2C {
        self.interface.release()
    }
}

impl<I> Qmi8658<I>
where
    I: Interface,
{
    pub(crate) const fn new(interface: I, config: Config, settings: InterfaceSettings) -> Self {
        Self {
            interface,
            config,
            settings,
            identity: None,
            ctrl7: 0,
        }
    }

    /// Returns the sensor configuration last applied (or to be applied).
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Identity read by the last successful probe.
    pub const fn identity(&self) -> Option<DeviceIdentity> {
        self.identity
    }

    /// Returns true if `subsystem` has been enabled in CTRL7.
    pub const fn enabled(&self, subsystem: Subsystem) -> bool {
        self.ctrl7 & enable_bit(subsystem) != 0
    }

    /// Reads WHO_AM_I and REVISION_ID.
    ///
    /// A bus fault and an unexpected identity both report
    /// [`Error::NotFound`]. No register is written.
    pub async fn probe(&mut self) -> Result<DeviceIdentity, Error> {
        let chip_id = match self.read_reg(Register::WhoAmI).await {
            Ok(value) => value,
            Err(_) => {
                error!("QMI8658 did not acknowledge");
                return Err(Error::NotFound);
            }
        };
        if chip_id != who_am_i::EXPECTED {
            error!("unexpected WHO_AM_I {:#x}", chip_id);
            return Err(Error::NotFound);
        }
        let revision = self
            .read_reg(Register::RevisionId)
            .await
            .map_err(|_| Error::NotFound)?;

        info!("QMI8658 found, chip id {:#x}, revision {:#x}", chip_id, revision);
        let identity = DeviceIdentity { chip_id, revision };
        self.identity = Some(identity);
        Ok(identity)
    }

    /// Performs a software reset and waits for the device to come back.
    pub async fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        self.write_reg(Register::Reset, reset::SOFT_RESET).await?;
        delay.delay_ms(SOFT_RESET_DELAY_MS).await;
        self.ctrl7 = 0;
        Ok(())
    }

    /// Applies `config` with both sensors disabled.
    ///
    /// Ordering: CTRL7=0, CTRL1, then accelerometer (CTRL2, CTRL5) and
    /// gyroscope (CTRL3, CTRL5). A fault while writing a sub-sensor returns
    /// [`Error::Configure`] naming it and stops there.
    pub async fn configure(&mut self, config: Config) -> Result<(), Error> {
        self.write_reg(Register::Ctrl7, 0).await?;
        self.ctrl7 = 0;
        self.write_reg(Register::Ctrl1, self.settings.ctrl1_value())
            .await?;

        if self.configure_accel(config.accel).await.is_err() {
            error!("failed to configure accelerometer");
            return Err(Error::Configure(Subsystem::Accel));
        }
        if self
            .configure_gyro(config.gyro, config.accel.ctrl5_bits())
            .await
            .is_err()
        {
            error!("failed to configure gyroscope");
            return Err(Error::Configure(Subsystem::Gyro));
        }

        self.config = config;
        debug!(
            "configured accel {:?} gyro {:?}",
            config.accel.range, config.gyro.range
        );
        Ok(())
    }

    async fn configure_accel(&mut self, accel: AccelConfig) -> Result<(), Error> {
        self.write_reg(Register::Ctrl2, accel.ctrl2_value()).await?;
        self.write_reg(Register::Ctrl5, accel.ctrl5_bits()).await
    }

    async fn configure_gyro(&mut self, gyro: GyroConfig, accel_ctrl5: u8) -> Result<(), Error> {
        self.write_reg(Register::Ctrl3, gyro.ctrl3_value()).await?;
        self.write_reg(Register::Ctrl5, accel_ctrl5 | gyro.ctrl5_bits())
            .await
    }

    /// Turns on `subsystem`, keeping any already enabled subsystem running.
    pub async fn enable(&mut self, subsystem: Subsystem) -> Result<(), Error> {
        let ctrl7 = self.ctrl7 | enable_bit(subsystem);
        self.config
            .validate(ctrl7 & ctrl7::A_EN != 0, ctrl7 & ctrl7::G_EN != 0)?;
        self.write_reg(Register::Ctrl7, ctrl7).await?;
        self.ctrl7 = ctrl7;
        info!("enabled {}", subsystem.name());
        Ok(())
    }

    /// Turns both subsystems off.
    pub async fn disable_all(&mut self) -> Result<(), Error> {
        self.write_reg(Register::Ctrl7, 0).await?;
        self.ctrl7 = 0;
        debug!("all subsystems disabled");
        Ok(())
    }

    /// Returns true if either subsystem is running.
    pub const fn any_enabled(&self) -> bool {
        self.ctrl7 != 0
    }

    /// Returns true when every enabled subsystem has fresh data.
    ///
    /// Always false while nothing is enabled.
    pub async fn is_data_ready(&mut self) -> Result<bool, Error> {
        let mut required = 0;
        if self.enabled(Subsystem::Accel) {
            required |= status0::ACCEL_AVAIL;
        }
        if self.enabled(Subsystem::Gyro) {
            required |= status0::GYRO_AVAIL;
        }
        if required == 0 {
            return Ok(false);
        }
        let status = self.read_reg(Register::Status0).await?;
        Ok(status & required == required)
    }

    /// Reads timestamp, temperature and both sensors in one burst.
    ///
    /// Relies on CTRL1.ADDR_AI for the burst.
    pub async fn read_raw_block(&mut self) -> Result<RawBlock, Error> {
        let mut buffer = [0u8; RAW_BLOCK_LEN];
        self.read_regs(RAW_BLOCK_START, &mut buffer).await?;
        Ok(RawBlock::decode(
            &buffer,
            self.settings.big_endian,
            self.enabled(Subsystem::Accel),
            self.enabled(Subsystem::Gyro),
        ))
    }

    /// Reads one sample in physical units.
    ///
    /// Returns [`Error::NotReady`] without reading the data registers when
    /// the data-ready flags are clear.
    pub async fn read_sample(&mut self) -> Result<Sample, Error> {
        if !self.is_data_ready().await? {
            return Err(Error::NotReady);
        }
        self.read_fresh_sample().await
    }

    /// Burst read and conversion, for callers that already saw the ready flags.
    pub(crate) async fn read_fresh_sample(&mut self) -> Result<Sample, Error> {
        let raw = self.read_raw_block().await?;
        let sample = raw.to_sample(self.config.accel.range, self.config.gyro.range);
        trace!("sample at tick {}", sample.timestamp.ticks);
        Ok(sample)
    }

    /// Consumes the driver and returns the register interface.
    pub fn into_interface(self) -> I {
        self.interface
    }

    async fn read_reg(&mut self, reg: Register) -> Result<u8, Error> {
        self.interface.read_reg(reg.addr()).await
    }

    async fn read_regs(&mut self, reg: Register, buffer: &mut [u8]) -> Result<(), Error> {
        self.interface.read_regs(reg.addr(), buffer).await
    }

    async fn write_reg(&mut self, reg: Register, value: u8) -> Result<(), Error> {
        self.interface.write_reg(reg.addr(), value).await
    }
}

const fn enable_bit(subsystem: Subsystem) -> u8 {
    match subsystem {
        Subsystem::Accel => ctrl7::A_EN,
        Subsystem::Gyro => ctrl7::G_EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccelOutputDataRate, AccelRange, GyroOutputDataRate, GyroRange};
    use crate::config::LowPassFilterMode;
    use crate::data::Axes;
    use crate::register::ctrl1;
    use crate::testing::{MockDelay, MockInterface};
    use futures::executor::block_on;

    const SETTINGS: InterfaceSettings = InterfaceSettings {
        auto_increment: true,
        big_endian: true,
    };

    fn driver(mock: &MockInterface) -> Qmi8658<MockInterface> {
        Qmi8658::new(mock.clone(), Config::new(), SETTINGS)
    }

    #[test]
    fn probe_reports_identity_without_writes() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);

        let identity = block_on(imu.probe()).expect("probe");

        assert_eq!(identity.chip_id, 0x05);
        assert_eq!(identity.revision, 0x7C);
        assert_eq!(imu.identity(), Some(identity));
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn probe_rejects_wrong_identity() {
        let mock = MockInterface::default().with_reg(Register::WhoAmI.addr(), 0x68);
        let mut imu = driver(&mock);

        assert_eq!(block_on(imu.probe()), Err(Error::NotFound));
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn probe_maps_nak_to_not_found() {
        let mock = MockInterface::absent();
        let mut imu = driver(&mock);

        assert_eq!(block_on(imu.probe()), Err(Error::NotFound));
        assert_eq!(mock.transactions(), 1);
    }

    #[test]
    fn soft_reset_writes_reset_and_waits() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        let mut delay = MockDelay::default();

        block_on(imu.soft_reset(&mut delay)).expect("reset");

        assert_eq!(mock.writes(), [(Register::Reset.addr(), 0xB0)]);
        assert_eq!(delay.last_ns, Some(150_000_000));
        assert_eq!(delay.total_ns, 150_000_000);
    }

    #[test]
    fn configure_writes_registers_in_order() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        let config = Config::new()
            .with_accel_config(
                AccelConfig::new(AccelRange::G4, AccelOutputDataRate::Hz250)
                    .with_lpf(LowPassFilterMode::OdrPercent5_32),
            )
            .with_gyro_config(
                GyroConfig::new(GyroRange::Dps256, GyroOutputDataRate::Hz125)
                    .with_lpf(LowPassFilterMode::OdrPercent2_62),
            );

        block_on(imu.configure(config)).expect("configure");

        let accel_ctrl5 = config.accel.ctrl5_bits();
        assert_eq!(
            mock.writes(),
            [
                (Register::Ctrl7.addr(), 0),
                (Register::Ctrl1.addr(), ctrl1::ADDR_AI | ctrl1::BE),
                (Register::Ctrl2.addr(), config.accel.ctrl2_value()),
                (Register::Ctrl5.addr(), accel_ctrl5),
                (Register::Ctrl3.addr(), config.gyro.ctrl3_value()),
                (Register::Ctrl5.addr(), accel_ctrl5 | config.gyro.ctrl5_bits()),
            ]
        );
        assert_eq!(imu.config(), config);
    }

    #[test]
    fn configure_names_the_failing_subsystem() {
        let mock = MockInterface::qmi8658();
        mock.fail_writes_to(Register::Ctrl3.addr());
        let mut imu = driver(&mock);

        assert_eq!(
            block_on(imu.configure(Config::new())),
            Err(Error::Configure(Subsystem::Gyro))
        );
        assert_eq!(mock.reg(Register::Ctrl2.addr()), Config::new().accel.ctrl2_value());

        let mock = MockInterface::qmi8658();
        mock.fail_writes_to(Register::Ctrl2.addr());
        let mut imu = driver(&mock);
        assert_eq!(
            block_on(imu.configure(Config::new())),
            Err(Error::Configure(Subsystem::Accel))
        );
        assert!(
            !mock
                .writes()
                .iter()
                .any(|(reg, _)| *reg == Register::Ctrl3.addr())
        );
    }

    #[test]
    fn configure_reports_shared_register_fault_as_bus() {
        let mock = MockInterface::qmi8658();
        mock.fail_writes_to(Register::Ctrl1.addr());
        let mut imu = driver(&mock);

        assert_eq!(block_on(imu.configure(Config::new())), Err(Error::Bus));
    }

    #[test]
    fn enable_accumulates_ctrl7_bits() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);

        block_on(imu.enable(Subsystem::Gyro)).expect("gyro");
        assert_eq!(mock.reg(Register::Ctrl7.addr()), ctrl7::G_EN);
        assert!(!imu.enabled(Subsystem::Accel));

        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        assert_eq!(mock.reg(Register::Ctrl7.addr()), ctrl7::G_EN | ctrl7::A_EN);
        assert!(imu.enabled(Subsystem::Accel));
        assert!(imu.enabled(Subsystem::Gyro));
    }

    #[test]
    fn disable_all_clears_ctrl7() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        assert!(imu.any_enabled());

        block_on(imu.disable_all()).expect("disable");
        assert_eq!(mock.reg(Register::Ctrl7.addr()), 0);
        assert!(!imu.any_enabled());
    }

    #[test]
    fn enable_rejects_low_power_accel_with_gyro() {
        let mock = MockInterface::qmi8658();
        let config = Config::new().with_accel_config(AccelConfig::new(
            AccelRange::G2,
            AccelOutputDataRate::LowPowerHz128,
        ));
        let mut imu = Qmi8658::new(mock.clone(), config, SETTINGS);

        block_on(imu.enable(Subsystem::Accel)).expect("accel only");
        assert_eq!(block_on(imu.enable(Subsystem::Gyro)), Err(Error::InvalidData));
        assert!(!imu.enabled(Subsystem::Gyro));
    }

    #[test]
    fn data_ready_requires_every_enabled_subsystem() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);

        assert_eq!(block_on(imu.is_data_ready()), Ok(false));
        assert!(mock.reads().iter().all(|(reg, _)| *reg != Register::Status0.addr()));

        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        block_on(imu.enable(Subsystem::Gyro)).expect("gyro");

        mock.set_reg(Register::Status0.addr(), status0::ACCEL_AVAIL);
        assert_eq!(block_on(imu.is_data_ready()), Ok(false));

        mock.set_reg(
            Register::Status0.addr(),
            status0::ACCEL_AVAIL | status0::GYRO_AVAIL,
        );
        assert_eq!(block_on(imu.is_data_ready()), Ok(true));
    }

    #[test]
    fn read_sample_requires_ready_flag() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        mock.clear_log();

        assert_eq!(block_on(imu.read_sample()), Err(Error::NotReady));
        assert_eq!(mock.reads(), [(Register::Status0.addr(), 1)]);
    }

    #[test]
    fn read_sample_decodes_big_endian_burst() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        block_on(imu.configure(Config::new())).expect("configure");
        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        block_on(imu.enable(Subsystem::Gyro)).expect("gyro");

        mock.set_reg(
            Register::Status0.addr(),
            status0::ACCEL_AVAIL | status0::GYRO_AVAIL,
        );
        mock.set_regs(
            Register::TimestampLow.addr(),
            &[
                0x10, 0x00, 0x00, // timestamp
                0x17, 0x80, // 23.5 C
                0x08, 0x00, 0xF8, 0x00, 0x10, 0x00, // 0.5 g, -0.5 g, 1 g
                0x00, 0x40, 0xFF, 0xC0, 0x00, 0x00, // 1 dps, -1 dps, 0
            ],
        );
        mock.clear_log();

        let sample = block_on(imu.read_sample()).expect("sample");

        assert_eq!(sample.timestamp.ticks, 0x10);
        assert_eq!(sample.temperature, 23.5);
        assert_eq!(sample.accel, Some(Axes::new(0.5, -0.5, 1.0)));
        assert_eq!(sample.gyro, Some(Axes::new(1.0, -1.0, 0.0)));
        assert_eq!(
            mock.reads(),
            [
                (Register::Status0.addr(), 1),
                (Register::TimestampLow.addr(), RAW_BLOCK_LEN),
            ]
        );
    }

    #[test]
    fn little_endian_reads_follow_the_i2c_config() {
        let mock = MockInterface::qmi8658();
        let settings = I2cConfig::DEFAULT.with_big_endian(false).interface_settings();
        let mut imu = Qmi8658::new(mock.clone(), Config::new(), settings);
        block_on(imu.configure(Config::new())).expect("configure");
        block_on(imu.enable(Subsystem::Accel)).expect("accel");
        assert_eq!(mock.reg(Register::Ctrl1.addr()), ctrl1::ADDR_AI);

        mock.set_reg(Register::Status0.addr(), status0::ACCEL_AVAIL);
        mock.set_regs(
            Register::TimestampLow.addr(),
            &[
                0x01, 0x00, 0x00, // timestamp
                0x80, 0x17, // 23.5 C
                0x00, 0x08, 0x00, 0xF8, 0x00, 0x10, // 0.5 g, -0.5 g, 1 g
            ],
        );

        let sample = block_on(imu.read_sample()).expect("sample");

        assert_eq!(sample.temperature, 23.5);
        assert_eq!(sample.accel, Some(Axes::new(0.5, -0.5, 1.0)));
        assert_eq!(sample.gyro, None);
    }

    #[test]
    fn soft_reset_clears_enabled_subsystems() {
        let mock = MockInterface::qmi8658();
        let mut imu = driver(&mock);
        let mut delay = MockDelay::default();
        block_on(imu.enable(Subsystem::Accel)).expect("accel");

        block_on(imu.soft_reset(&mut delay)).expect("reset");

        assert!(!imu.enabled(Subsystem::Accel));
        assert_eq!(delay.calls, 1);
    }
}
