//! Testing infrastructure (mock bus, delays, pins and sinks).

pub(crate) mod mock;

pub(crate) use mock::{MockDelay, MockInterface, MockPin, RecordingSink};
