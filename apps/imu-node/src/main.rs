#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]
//! QMI8658 sensor node for the ESP32-S3 Matrix Board.
//!
//! The component is driven the way a cooperative host scheduler would drive
//! it: `poll_tick()` on every loop tick (interrupt lines) and `update()` once
//! per update interval. Every published value goes to the defmt log.

use defmt::{error, info, warn};
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Input, InputConfig, Pull};
use esp_hal::i2c::master::{Config as I2cConfig, I2c};
use esp_hal::time::Rate;
use esp_hal::timer::timg::TimerGroup;
use ph_qmi8658_component::{
    AccelConfig,
    AccelOutputDataRate,
    AccelRange,
    Acquisition,
    ComponentConfig,
    Config,
    DeviceState,
    GyroConfig,
    GyroOutputDataRate,
    GyroRange,
    LowPassFilterMode,
    Output,
    Qmi8658Address,
    Qmi8658Component,
    Qmi8658ComponentI2c,
    RetryPolicy,
    ValueSink,
};
use {esp_backtrace as _, esp_println as _};

esp_bootloader_esp_idf::esp_app_desc!();

defmt::timestamp!("{=u64:ms}", Instant::now().as_millis());

#[used]
static APP_DESC_REF: &esp_bootloader_esp_idf::EspAppDesc = &ESP_APP_DESC;

/// Friendly hardware identifier for logs.
const BOARD_NAME: &str = "ESP32-S3 Matrix Board";
/// Cooperative loop period; interrupt lines are sampled once per tick.
const POLL_TICK_MS: u64 = 16;
/// Periodic update interval.
const UPDATE_INTERVAL_MS: u32 = 1_000;

/// Forwards every published value to the log.
struct LogSink;

impl ValueSink for LogSink {
    fn publish(&mut self, output: Output, value: f32) {
        info!("{}: {}", output.name(), value);
    }
}

type Imu = Qmi8658ComponentI2c<I2c<'static, esp_hal::Async>, LogSink, Input<'static>, Input<'static>>;

fn park(reason: &str) -> ! {
    error!("{}, parking", reason);
    loop {
        core::hint::spin_loop();
    }
}

#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let int1 = Input::new(peripherals.GPIO10, InputConfig::default().with_pull(Pull::Up));
    let int2 = Input::new(peripherals.GPIO13, InputConfig::default().with_pull(Pull::Up));

    let i2c_config = I2cConfig::default().with_frequency(Rate::from_khz(400));
    let Ok(i2c) = I2c::new(peripherals.I2C0, i2c_config) else {
        park("I2C configuration rejected");
    };
    let i2c = i2c
        .with_sda(peripherals.GPIO11)
        .with_scl(peripherals.GPIO12)
        .into_async();

    let sensor = Config::new()
        .with_accel_config(
            AccelConfig::new(AccelRange::G8, AccelOutputDataRate::Hz1000)
                .with_lpf(LowPassFilterMode::OdrPercent2_62),
        )
        .with_gyro_config(GyroConfig::new(GyroRange::Dps512, GyroOutputDataRate::Hz1000));
    let component_config = ComponentConfig::new()
        .with_i2c(ph_qmi8658_component::I2cConfig::new(Qmi8658Address::Primary.addr()))
        .with_sensor(sensor)
        .with_update_interval_ms(UPDATE_INTERVAL_MS)
        .with_retry(RetryPolicy::new(3, 100, 1_000));

    let mut imu: Imu = Qmi8658Component::new_i2c(i2c, component_config)
        .with_interrupts(Some(int1), Some(int2));
    for output in Output::ALL {
        if let Err(err) = imu.bind(output, LogSink) {
            warn!("could not bind {}: {}", output.name(), err);
        }
    }

    let mut delay = Delay;
    let state = imu.initialize(&mut delay).await;
    imu.dump_config();
    if state == DeviceState::Ready {
        info!("QMI8658 node running ({})", BOARD_NAME);
    } else {
        // The component stays inert; keep the loop so the fault is reported once.
        error!("QMI8658 setup failed: {}", imu.fault());
    }

    let update_interval = Duration::from_millis(u64::from(imu.settings().update_interval_ms));
    let mut next_update = Instant::now() + update_interval;

    loop {
        match imu.poll_tick().await {
            Ok(Some(Acquisition::Published { sample, published })) => {
                defmt::debug!("interrupt sample @{} ({} values)", sample.timestamp.ticks, published);
            }
            Ok(_) => {}
            Err(err) => warn!("interrupt poll failed: {}", err),
        }

        if Instant::now() >= next_update {
            next_update += update_interval;
            if let Err(err) = imu.update().await {
                warn!("update failed: {}", err);
            }
        }

        Timer::after(Duration::from_millis(POLL_TICK_MS)).await;
    }
}
