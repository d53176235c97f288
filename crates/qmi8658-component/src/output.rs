//! Published value streams and consumer bindings.

use crate::data::Sample;
use crate::error::Error;

/// Sensing subsystem of the QMI8658.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subsystem {
    /// Accelerometer.
    Accel,
    /// Gyroscope.
    Gyro,
}

impl Subsystem {
    /// Both subsystems, accelerometer first.
    pub const ALL: [Self; 2] = [Self::Accel, Self::Gyro];

    /// Human-readable subsystem name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accel => "accelerometer",
            Self::Gyro => "gyroscope",
        }
    }
}

/// Named value stream published by the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Output {
    /// Die temperature in degrees Celsius.
    Temperature,
    /// Acceleration along X in g.
    AccelX,
    /// Acceleration along Y in g.
    AccelY,
    /// Acceleration along Z in g.
    AccelZ,
    /// Angular rate around X in deg/s.
    GyroX,
    /// Angular rate around Y in deg/s.
    GyroY,
    /// Angular rate around Z in deg/s.
    GyroZ,
}

/// Number of distinct outputs.
pub const OUTPUT_COUNT: usize = 7;

impl Output {
    /// All outputs in publish order.
    pub const ALL: [Self; OUTPUT_COUNT] = [
        Self::Temperature,
        Self::AccelX,
        Self::AccelY,
        Self::AccelZ,
        Self::GyroX,
        Self::GyroY,
        Self::GyroZ,
    ];

    /// Subsystem that must be enabled to produce this output.
    ///
    /// Temperature is read alongside either subsystem and has none.
    pub const fn subsystem(self) -> Option<Subsystem> {
        match self {
            Self::Temperature => None,
            Self::AccelX | Self::AccelY | Self::AccelZ => Some(Subsystem::Accel),
            Self::GyroX | Self::GyroY | Self::GyroZ => Some(Subsystem::Gyro),
        }
    }

    /// Stable snake_case name, suitable for telemetry keys.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::AccelX => "accel_x",
            Self::AccelY => "accel_y",
            Self::AccelZ => "accel_z",
            Self::GyroX => "gyro_x",
            Self::GyroY => "gyro_y",
            Self::GyroZ => "gyro_z",
        }
    }

    /// Extracts this output's value from a sample.
    ///
    /// Returns `None` when the owning subsystem was not sampled.
    pub fn value(self, sample: &Sample) -> Option<f32> {
        match self {
            Self::Temperature => Some(sample.temperature),
            Self::AccelX => sample.accel.map(|a| a.x),
            Self::AccelY => sample.accel.map(|a| a.y),
            Self::AccelZ => sample.accel.map(|a| a.z),
            Self::GyroX => sample.gyro.map(|g| g.x),
            Self::GyroY => sample.gyro.map(|g| g.y),
            Self::GyroZ => sample.gyro.map(|g| g.z),
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Consumer of published values.
///
/// A sink receives the output kind with every value so one sink type can
/// multiplex several streams (a channel sender, a telemetry encoder, ...).
pub trait ValueSink {
    /// Publishes a new value for `output`.
    fn publish(&mut self, output: Output, value: f32);
}

impl<T: ValueSink + ?Sized> ValueSink for &mut T {
    fn publish(&mut self, output: Output, value: f32) {
        (**self).publish(output, value);
    }
}

/// Mapping from each [`Output`] to zero or one consumer.
pub struct Outputs<S> {
    slots: [Option<S>; OUTPUT_COUNT],
}

impl<S> Default for Outputs<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Outputs<S> {
    /// Creates an empty binding table.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Binds `sink` to `output`.
    ///
    /// Fails with [`Error::AlreadyBound`] if the output already has a consumer.
    pub fn bind(&mut self, output: Output, sink: S) -> Result<(), Error> {
        let slot = &mut self.slots[output.index()];
        if slot.is_some() {
            return Err(Error::AlreadyBound(output));
        }
        *slot = Some(sink);
        Ok(())
    }

    /// Removes and returns the consumer bound to `output`.
    pub fn unbind(&mut self, output: Output) -> Option<S> {
        self.slots[output.index()].take()
    }

    /// Returns true if `output` has a consumer.
    pub fn is_bound(&self, output: Output) -> bool {
        self.slots[output.index()].is_some()
    }

    /// Returns true if any output of `subsystem` has a consumer.
    pub fn wants(&self, subsystem: Subsystem) -> bool {
        Output::ALL
            .iter()
            .any(|output| output.subsystem() == Some(subsystem) && self.is_bound(*output))
    }

    /// Iterates over the bound outputs in publish order.
    pub fn bound(&self) -> impl Iterator<Item = Output> + '_ {
        Output::ALL
            .into_iter()
            .filter(|output| self.is_bound(*output))
    }

    /// Number of bound outputs.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: ValueSink> Outputs<S> {
    /// Publishes every bound output present in `sample`; returns how many were published.
    pub fn publish(&mut self, sample: &Sample) -> u8 {
        let mut published = 0;
        for output in Output::ALL {
            let Some(sink) = self.slots[output.index()].as_mut() else {
                continue;
            };
            if let Some(value) = output.value(sample) {
                sink.publish(output, value);
                published += 1;
            }
        }
        published
    }
}
