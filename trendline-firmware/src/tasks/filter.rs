//! Moving-average filter task

use defmt::*;

use trendline_core::filter::WindowFilter;
use trendline_core::pipeline::filter_cycle;
use trendline_core::stats::TaskId;

use crate::channels::{AverageSender, ControlReceiver, SampleReceiver};
use crate::clock::Registry;

#[embassy_executor::task]
pub async fn filter_task(
    mut filter: WindowFilter,
    samples: SampleReceiver,
    control: ControlReceiver,
    averages: AverageSender,
    registry: &'static Registry,
    id: TaskId,
) {
    info!("Filter task started (N = {})", filter.window().get());

    let meter = registry.meter(id);
    let mut window = filter.window();

    loop {
        let out = filter_cycle(&mut filter, &samples, &control, &averages, &meter).await;
        if out.window != window {
            debug!("Window size now {}", out.window.get());
            window = out.window;
        }
        trace!("average {} over {}", out.average, out.window.get());
    }
}
