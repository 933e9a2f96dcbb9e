//! Task cycle bodies
//!
//! Each function is one iteration of a firmware task, between its blocking
//! points. Channels are created once at start-up and passed in, so the
//! same cycles run on the host against real bounded channels.
//!
//! ```text
//! sensor_cycle ──samples──▶ filter_cycle ──averages──▶ trend_cycle
//!                                ▲
//!              UART RX ISR ──control──┘
//! ```

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use trendline_hal::{DisplayError, DrawSurface};

use crate::filter::{FilteredSample, WindowFilter, WindowSize};
use crate::graph::TrendRenderer;
use crate::sensor::Generator;
use crate::serial::TxError;
use crate::stats::{RunTimeMeter, StatsError, StatsReporter, TaskStatsSource};
use crate::Sample;

/// Depth of every inter-task queue
pub const QUEUE_DEPTH: usize = 3;

/// Reasons a reporting cycle produced nothing on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// The report could not be built
    Stats(StatsError),
    /// The serial line refused the report
    Tx(TxError),
}

impl From<StatsError> for ReportError {
    fn from(e: StatsError) -> Self {
        Self::Stats(e)
    }
}

impl From<TxError> for ReportError {
    fn from(e: TxError) -> Self {
        Self::Tx(e)
    }
}

/// Generate one sample and queue it
///
/// Suspends while the sample queue is full.
pub async fn sensor_cycle<M: RawMutex, const N: usize>(
    generator: &mut Generator,
    samples: &Sender<'_, M, Sample, N>,
    meter: &impl RunTimeMeter,
) -> Sample {
    let sample = meter.measure(|| generator.next_sample());
    samples.send(sample).await;
    sample
}

/// Average one sample and queue the result
///
/// At most one pending window update is taken per cycle, before the
/// sample enters the history.
pub async fn filter_cycle<M, C, const S: usize, const K: usize, const A: usize>(
    filter: &mut WindowFilter,
    samples: &Receiver<'_, M, Sample, S>,
    control: &Receiver<'_, C, WindowSize, K>,
    averages: &Sender<'_, M, FilteredSample, A>,
    meter: &impl RunTimeMeter,
) -> FilteredSample
where
    M: RawMutex,
    C: RawMutex,
{
    let sample = samples.receive().await;
    let filtered = meter.measure(|| {
        if let Ok(window) = control.try_receive() {
            filter.set_window(window);
        }
        filter.push(sample)
    });
    averages.send(filtered).await;
    filtered
}

/// Draw the next average onto `surface`
pub async fn trend_cycle<M: RawMutex, D: DrawSurface, const N: usize>(
    renderer: &mut TrendRenderer,
    averages: &Receiver<'_, M, FilteredSample, N>,
    surface: &mut D,
    meter: &impl RunTimeMeter,
) -> Result<FilteredSample, DisplayError> {
    let sample = averages.receive().await;
    meter.measure(|| renderer.render(sample, surface))?;
    Ok(sample)
}

/// Build a report from `source` and hand it to `transmit`
///
/// Returns the number of bytes handed over.
pub fn stats_cycle<S, F>(
    reporter: &mut StatsReporter,
    source: &S,
    meter: &impl RunTimeMeter,
    transmit: F,
) -> Result<usize, ReportError>
where
    S: TaskStatsSource,
    F: FnOnce(&[u8]) -> Result<(), TxError>,
{
    meter.measure(|| -> Result<usize, ReportError> {
        let report = reporter.report(source)?;
        transmit(report.as_bytes())?;
        Ok(report.len())
    })
}
