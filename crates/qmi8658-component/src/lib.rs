//! Async `#![no_std]` driver and acquisition component for the
//! [QMI8658](https://www.qstcorp.com/en_comp_prod/QMI8658C) 6-axis IMU
//! (accelerometer + gyroscope + temperature) from QST Corporation.
//!
//! Two layers are provided:
//!
//! - [`Qmi8658`]: register-level driver (probe, reset, configure, enable,
//!   data-ready check, burst sample read) over `embedded-hal-async` I2C.
//! - [`Qmi8658Component`]: host-facing controller that owns the lifecycle
//!   state, decides when to sample (periodic update or interrupt line) and
//!   publishes converted values to the consumers bound to each [`Output`].
//!
//! # Quick start
//!
//! ```rust,no_run
//! use ph_qmi8658_component::{ComponentConfig, DeviceState, Output, Qmi8658Component, ValueSink};
//! # use embedded_hal_async::delay::DelayNs;
//! # use embedded_hal_async::i2c::I2c;
//! #
//! struct Print;
//!
//! impl ValueSink for Print {
//!     fn publish(&mut self, _output: Output, _value: f32) {}
//! }
//!
//! # async fn example<I2C: I2c, D: DelayNs>(i2c: I2C, delay: &mut D) -> Result<(), ph_qmi8658_component::Error> {
//! let mut imu = Qmi8658Component::new_i2c(i2c, ComponentConfig::new());
//! imu.bind(Output::AccelX, Print)?;
//! imu.bind(Output::Temperature, Print)?;
//! if imu.initialize(delay).await == DeviceState::Ready {
//!     imu.update().await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Only the sensors with at least one bound output are enabled; temperature
//! is read alongside them.
//!
//! # Logging
//!
//! Enable the `defmt` feature to log through `defmt`, or the `log` feature to
//! log through the `log` facade. Without either, logging compiles away.

#![no_std]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "defmt"), forbid(unsafe_code))]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// Must stay first so the logging macros are visible to every module.
mod fmt;

mod component;
mod config;
mod data;
mod driver;
mod error;
mod interface;
mod output;
mod register;

#[cfg(test)]
mod testing;

// Interface layer
pub use interface::Qmi8658Address;
pub use interface::{I2cConfig, I2cInterface};

// Configuration
pub use config::{AccelConfig, AccelOutputDataRate, AccelRange, LowPassFilterMode};
pub use config::{ComponentConfig, Config, InterruptTrigger, RetryPolicy};
pub use config::{GyroConfig, GyroOutputDataRate, GyroRange};

// Driver
pub use driver::{DeviceIdentity, Qmi8658, Qmi8658I2c};

// Component
pub use component::{Acquisition, DeviceState, NoPin, Qmi8658Component, Qmi8658ComponentI2c};
pub use output::{OUTPUT_COUNT, Output, Outputs, Subsystem, ValueSink};

// Data types
pub use data::{Axes, AxesRaw, RawBlock, Sample, Timestamp};
pub use data::{accel_lsb_per_g, gyro_lsb_per_dps, temperature_lsb_per_celsius};

pub use error::Error;
