//! Acquisition controller built on top of the driver.
//!
//! [`Qmi8658Component`] owns the driver, the consumer table and up to two
//! interrupt lines. The host calls [`Qmi8658Component::initialize`] once, then
//! [`Qmi8658Component::update`] every update interval and
//! [`Qmi8658Component::poll_tick`] on every scheduler tick.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{ComponentConfig, InterruptTrigger};
use crate::data::Sample;
use crate::driver::{DeviceIdentity, Qmi8658};
use crate::error::Error;
use crate::interface::{I2cInterface, Interface};
use crate::output::{Output, Outputs, Subsystem, ValueSink};

/// Placeholder for an interrupt line that is not wired. Always reads low.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Lifecycle state of the component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// `initialize` has not run yet.
    #[default]
    Uninitialized,
    /// Probed, configured and enabled.
    Ready,
    /// Setup failed; the component stays inert.
    Failed,
}

/// Outcome of a single acquisition attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acquisition {
    /// The component is not `Ready`; the bus was not touched.
    Inactive,
    /// The data-ready flags were clear; nothing was published.
    NotReady,
    /// A sample was read and forwarded to the bound consumers.
    Published {
        /// Sample in physical units.
        sample: Sample,
        /// Number of values handed to consumers.
        published: u8,
    },
}

struct InterruptLine<P> {
    pin: Option<P>,
    was_high: bool,
}

impl<P: InputPin> InterruptLine<P> {
    const fn new(pin: Option<P>) -> Self {
        Self {
            pin,
            was_high: false,
        }
    }

    const fn is_wired(&self) -> bool {
        self.pin.is_some()
    }

    fn triggered(&mut self, trigger: InterruptTrigger) -> Result<bool, Error> {
        let Some(pin) = self.pin.as_mut() else {
            return Ok(false);
        };
        let high = pin.is_high().map_err(|_| Error::Pin)?;
        let fired = match trigger {
            InterruptTrigger::Level => high,
            InterruptTrigger::RisingEdge => high && !self.was_high,
        };
        self.was_high = high;
        Ok(fired)
    }
}

/// QMI8658 acquisition component.
pub struct Qmi8658Component<I, S, INT1 = NoPin, INT2 = NoPin> {
    driver: Qmi8658<I>,
    config: ComponentConfig,
    outputs: Outputs<S>,
    int1: InterruptLine<INT1>,
    int2: InterruptLine<INT2>,
    state: DeviceState,
    last_sample: Option<Sample>,
    fault: Option<Error>,
    fault_reported: bool,
}

/// I2C type alias for the component.
pub type Qmi8658ComponentI2c<I2C, S, INT1 = NoPin, INT2 = NoPin> =
    Qmi8658Component<I2cInterface<I2C>, S, INT1, INT2>;

impl<I2C, S> Qmi8658Component<I2cInterface<I2C>, S>
where
    I2C: I2c,
{
    /// Creates a component on `i2c` using the address and settings in `config`.
    pub fn new_i2c(i2c: I2C, config: ComponentConfig) -> Self {
        let interface = I2cInterface::new(i2c, config.i2c.address);
        Self::with_interface(interface, config)
    }
}

impl<I, S> Qmi8658Component<I, S>
where
    I: Interface,
{
    pub(crate) fn with_interface(interface: I, config: ComponentConfig) -> Self {
        let driver = Qmi8658::new(interface, config.sensor, config.i2c.interface_settings());
        Self {
            driver,
            config,
            outputs: Outputs::new(),
            int1: InterruptLine::new(None),
            int2: InterruptLine::new(None),
            state: DeviceState::Uninitialized,
            last_sample: None,
            fault: None,
            fault_reported: false,
        }
    }

    /// Attaches the optional interrupt lines.
    pub fn with_interrupts<INT1, INT2>(
        self,
        int1: Option<INT1>,
        int2: Option<INT2>,
    ) -> Qmi8658Component<I, S, INT1, INT2>
    where
        INT1: InputPin,
        INT2: InputPin,
    {
        Qmi8658Component {
            driver: self.driver,
            config: self.config,
            outputs: self.outputs,
            int1: InterruptLine::new(int1),
            int2: InterruptLine::new(int2),
            state: self.state,
            last_sample: self.last_sample,
            fault: self.fault,
            fault_reported: self.fault_reported,
        }
    }
}

impl<I, S, INT1, INT2> Qmi8658Component<I, S, INT1, INT2>
where
    I: Interface,
    S: ValueSink,
    INT1: InputPin,
    INT2: InputPin,
{
    /// Binds a consumer to `output`.
    ///
    /// Only allowed before `initialize`, since the set of bound outputs
    /// decides which sensors get enabled.
    pub fn bind(&mut self, output: Output, sink: S) -> Result<(), Error> {
        if self.state != DeviceState::Uninitialized {
            return Err(Error::InvalidState);
        }
        self.outputs.bind(output, sink)
    }

    /// Removes the consumer bound to `output`.
    pub fn unbind(&mut self, output: Output) -> Result<Option<S>, Error> {
        if self.state != DeviceState::Uninitialized {
            return Err(Error::InvalidState);
        }
        Ok(self.outputs.unbind(output))
    }

    /// Returns true if `output` has a consumer.
    pub fn is_bound(&self, output: Output) -> bool {
        self.outputs.is_bound(output)
    }

    /// Probes, resets, configures and enables the device.
    ///
    /// Only subsystems with at least one bound output are enabled. The whole
    /// sequence is retried according to the configured [`RetryPolicy`]; a
    /// configuration the bindings cannot run fails at once. A failed attempt
    /// turns off any sensor it had already enabled.
    /// Once the state has left `Uninitialized` this returns it unchanged.
    ///
    /// [`RetryPolicy`]: crate::RetryPolicy
    pub async fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DeviceState {
        if self.state != DeviceState::Uninitialized {
            return self.state;
        }

        let accel = self.outputs.wants(Subsystem::Accel);
        let gyro = self.outputs.wants(Subsystem::Gyro);
        if let Err(err) = self.config.sensor.validate(accel, gyro) {
            error!("low-power accelerometer rate cannot run with the gyroscope");
            return self.fail(err);
        }

        let retry = self.config.retry;
        let attempts = retry.attempts();
        for attempt in 0..attempts {
            match self.bring_up(delay).await {
                Ok(()) => {
                    self.state = DeviceState::Ready;
                    self.fault = None;
                    info!("QMI8658 ready");
                    return self.state;
                }
                Err(err) => {
                    warn!("setup attempt {} of {} failed: {}", attempt + 1, attempts, err);
                    self.shut_down().await;
                    if matches!(err, Error::InvalidData) {
                        return self.fail(err);
                    }
                    self.fault = Some(err);
                    if attempt + 1 < attempts {
                        let backoff_ms = retry.backoff_ms(attempt);
                        if backoff_ms > 0 {
                            delay.delay_ms(backoff_ms).await;
                        }
                    }
                }
            }
        }

        error!("QMI8658 setup failed");
        self.state = DeviceState::Failed;
        self.state
    }

    fn fail(&mut self, err: Error) -> DeviceState {
        error!("QMI8658 setup failed: {}", err);
        self.fault = Some(err);
        self.state = DeviceState::Failed;
        self.state
    }

    /// Leaves the chip with both sensors off after a partial bring-up.
    async fn shut_down(&mut self) {
        if self.driver.any_enabled() && self.driver.disable_all().await.is_err() {
            warn!("could not disable sensors after failed setup");
        }
    }

    async fn bring_up<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error> {
        self.driver.probe().await?;
        if self.config.soft_reset {
            self.driver.soft_reset(delay).await?;
        }
        self.driver.configure(self.config.sensor).await?;
        for subsystem in Subsystem::ALL {
            if self.outputs.wants(subsystem) {
                self.driver.enable(subsystem).await?;
            } else {
                info!("{} has no consumers, leaving it off", subsystem.name());
            }
        }
        Ok(())
    }

    /// Checks the interrupt lines and acquires once if either fired.
    pub async fn poll_tick(&mut self) -> Result<Option<Acquisition>, Error> {
        let trigger = self.config.trigger;
        let int1 = self.int1.triggered(trigger)?;
        let int2 = self.int2.triggered(trigger)?;
        if int1 || int2 {
            self.acquire().await.map(Some)
        } else {
            Ok(None)
        }
    }

    /// Periodic entry point; same as [`Self::acquire`].
    pub async fn update(&mut self) -> Result<Acquisition, Error> {
        self.acquire().await
    }

    /// Reads one sample if data is ready and publishes it to every bound output.
    ///
    /// Bus errors are returned and leave the state untouched; nothing is
    /// published for a failed read.
    pub async fn acquire(&mut self) -> Result<Acquisition, Error> {
        match self.state {
            DeviceState::Ready => {}
            DeviceState::Failed => {
                if !self.fault_reported {
                    error!("QMI8658 is not operational, skipping acquisition");
                    self.fault_reported = true;
                }
                return Ok(Acquisition::Inactive);
            }
            DeviceState::Uninitialized => return Ok(Acquisition::Inactive),
        }

        // With both sensors off STATUS0 never latches; a temperature-only
        // binding reads the burst unconditionally.
        let temperature_only =
            !self.driver.any_enabled() && self.outputs.is_bound(Output::Temperature);
        if !temperature_only && !self.driver.is_data_ready().await? {
            debug!("data not ready");
            return Ok(Acquisition::NotReady);
        }

        let sample = self.driver.read_fresh_sample().await?;
        if let Some(accel) = sample.accel {
            debug!("accel ({}, {}, {}) g", accel.x, accel.y, accel.z);
        }
        if let Some(gyro) = sample.gyro {
            debug!("gyro ({}, {}, {}) dps", gyro.x, gyro.y, gyro.z);
        }
        debug!("temperature {} C", sample.temperature);

        self.last_sample = Some(sample);
        let published = self.outputs.publish(&sample);
        Ok(Acquisition::Published { sample, published })
    }

    /// Logs the effective configuration.
    pub fn dump_config(&self) {
        info!("QMI8658:");
        info!("  address: {:#x}", self.config.i2c.address);
        if self.state == DeviceState::Failed {
            error!("  communication with QMI8658 failed");
        }
        info!("  update interval: {} ms", self.config.update_interval_ms);
        info!(
            "  interrupts: INT1 {}, INT2 {}, trigger {:?}",
            self.int1.is_wired(),
            self.int2.is_wired(),
            self.config.trigger
        );
        let accel = self.config.sensor.accel;
        info!(
            "  accel: {:?} @ {} mHz, lpf {:?}",
            accel.range,
            accel.odr.hz_milli(),
            accel.lpf
        );
        let gyro = self.config.sensor.gyro;
        info!(
            "  gyro: {:?} @ {} mHz, lpf {:?}",
            gyro.range,
            gyro.odr.hz_milli(),
            gyro.lpf
        );
        for output in self.outputs.bound() {
            info!("  output: {}", output.name());
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Error that put the component into `Failed`, or the last failed attempt.
    pub const fn fault(&self) -> Option<Error> {
        self.fault
    }

    /// Last successfully read sample.
    pub const fn last_sample(&self) -> Option<Sample> {
        self.last_sample
    }

    /// Identity read during probe.
    pub const fn identity(&self) -> Option<DeviceIdentity> {
        self.driver.identity()
    }

    /// Component configuration.
    pub const fn settings(&self) -> ComponentConfig {
        self.config
    }

    /// Returns true if `subsystem` was enabled during setup.
    pub const fn enabled(&self, subsystem: Subsystem) -> bool {
        self.driver.enabled(subsystem)
    }

    /// Releases the bus interface and interrupt lines, consuming the component.
    pub fn release(self) -> (I, Option<INT1>, Option<INT2>) {
        (self.driver.into_interface(), self.int1.pin, self.int2.pin)
    }
}
