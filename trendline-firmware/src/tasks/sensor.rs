//! Synthetic sensor task

use defmt::*;
use embassy_time::{Duration, Timer};

use trendline_core::pipeline::sensor_cycle;
use trendline_core::sensor::Generator;
use trendline_core::stats::TaskId;

use crate::channels::SampleSender;
use crate::clock::Registry;

/// Sensor task - emits one sample, then sleeps for one period
///
/// A full sample queue holds the task in `send`, so a stalled filter
/// slows the generator down rather than losing samples. The sleep starts
/// after the send completes and missed periods are not made up.
#[embassy_executor::task]
pub async fn sensor_task(
    mut generator: Generator,
    period: Duration,
    samples: SampleSender,
    registry: &'static Registry,
    id: TaskId,
) {
    info!("Sensor task started ({} ms period)", period.as_millis());

    let meter = registry.meter(id);

    loop {
        let sample = sensor_cycle(&mut generator, &samples, &meter).await;
        trace!("sample {}", sample);
        Timer::after(period).await;
    }
}
