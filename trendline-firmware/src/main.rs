//! Trendline - Sensor Trend Firmware
//!
//! Main firmware binary for RP2040 boards with an SH1106 OLED on I2C0
//! and a serial console on UART0.
//!
//! ```text
//! sensor ──▶ filter ──▶ trend ──▶ SH1106
//!              ▲
//! UART0 RX ────┘        stats ──▶ UART0 TX
//! ```

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::interrupt::Priority;
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::Uart;
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use trendline_core::filter::WindowFilter;
use trendline_core::graph::{draw_banner, TrendRenderer};
use trendline_core::sensor::Generator;
use trendline_core::stats::TaskRegistry;
use trendline_drivers::display::Sh1106;
use trendline_hal::UartConfig;
use trendline_hal_rp2040::{rp_uart_config, Uart0Port};

use crate::clock::{EmbassyClock, Registry};

mod channels;
mod clock;
mod config;
mod serial;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

/// How long the start-up banner stays up before the graph replaces it
const BANNER_HOLD: Duration = Duration::from_millis(1500);

/// Display I2C clock
const I2C_FREQUENCY: u32 = 400_000;

// Run-time registry (must live forever for task references)
static REGISTRY: StaticCell<Registry> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Trendline firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Console on UART0 (GPIO0 TX, GPIO1 RX); the handle stays alive for
    // the life of main so the pins stay configured
    let uart_config = rp_uart_config(&UartConfig::eight_n_one(config.serial.baudrate));
    let _uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    serial::start(Uart0Port::new(), channels::CONTROL.sender(), Priority::P1);
    info!("UART initialized at {} baud", config.serial.baudrate);

    // SH1106 on I2C0 (GPIO5 SCL, GPIO4 SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let mut display = Sh1106::new(i2c);

    match display.init().await {
        Ok(()) => info!("Display initialized"),
        Err(e) => warn!("Display init failed: {}", e),
    }
    if let Err(e) = draw_banner(&mut display) {
        warn!("Banner draw failed: {}", e);
    }
    if let Err(e) = display.flush().await {
        warn!("Display flush failed: {}", e);
    }

    // Tasks register before the registry is shared
    let mut registry = TaskRegistry::new(EmbassyClock);
    let sensor_id = unwrap!(registry.register("Sensor"));
    let filter_id = unwrap!(registry.register("Filter"));
    let trend_id = unwrap!(registry.register("Graph"));
    let stats_id = unwrap!(registry.register("Stats"));
    let registry: &'static Registry = REGISTRY.init(registry);

    Timer::after(BANNER_HOLD).await;

    // Spawn tasks
    spawner
        .spawn(tasks::sensor_task(
            Generator::from_config(&config.sensor),
            Duration::from_millis(config.sensor.period_ms as u64),
            channels::SAMPLES.sender(),
            registry,
            sensor_id,
        ))
        .unwrap();
    spawner
        .spawn(tasks::filter_task(
            WindowFilter::new(config.filter.initial_window()),
            channels::SAMPLES.receiver(),
            channels::CONTROL.receiver(),
            channels::AVERAGES.sender(),
            registry,
            filter_id,
        ))
        .unwrap();
    spawner
        .spawn(tasks::trend_task(
            TrendRenderer::new(config.graph),
            display,
            channels::AVERAGES.receiver(),
            registry,
            trend_id,
        ))
        .unwrap();
    spawner
        .spawn(tasks::stats_task(
            Duration::from_millis(config.stats.period_ms as u64),
            registry,
            stats_id,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
