//! Trend graph task
//!
//! Renders each average into the SH1106 frame buffer, then flushes the
//! frame to the panel.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};

use trendline_core::graph::TrendRenderer;
use trendline_core::pipeline::trend_cycle;
use trendline_core::stats::TaskId;
use trendline_drivers::display::Sh1106;

use crate::channels::AverageReceiver;
use crate::clock::Registry;

/// Panel on I2C0
pub type Display = Sh1106<I2c<'static, embassy_rp::peripherals::I2C0, Async>>;

#[embassy_executor::task]
pub async fn trend_task(
    mut renderer: TrendRenderer,
    mut display: Display,
    averages: AverageReceiver,
    registry: &'static Registry,
    id: TaskId,
) {
    info!("Trend task started");

    let meter = registry.meter(id);

    loop {
        match trend_cycle(&mut renderer, &averages, &mut display, &meter).await {
            Ok(_) => {
                // Flush time is not charged to the task
                if let Err(e) = display.flush().await {
                    warn!("Display flush failed: {}", e);
                }
            }
            Err(e) => warn!("Trend render failed: {}", e),
        }
    }
}
