//! Run-time statistics task

use defmt::*;
use embassy_time::{Duration, Ticker};

use trendline_core::pipeline::{stats_cycle, ReportError};
use trendline_core::serial::TxError;
use trendline_core::stats::{StatsReporter, TaskId};

use crate::clock::Registry;
use crate::serial;

/// Stats task - sends a run-time report every period
///
/// Reports that cannot be built, or that find the console still busy
/// with the previous one, are skipped until the next period.
#[embassy_executor::task]
pub async fn stats_task(period: Duration, registry: &'static Registry, id: TaskId) {
    info!("Stats task started ({} ms period)", period.as_millis());

    let meter = registry.meter(id);
    let mut reporter = StatsReporter::new();
    let mut ticker = Ticker::every(period);

    loop {
        ticker.next().await;

        match stats_cycle(&mut reporter, registry, &meter, serial::transmit) {
            Ok(len) => trace!("Report queued ({} bytes)", len),
            Err(ReportError::Tx(TxError::Busy)) => {
                warn!("Console busy, report skipped");
            }
            Err(e) => {
                warn!("Report skipped: {} ({} so far)", e, reporter.skipped());
            }
        }
    }
}
