//! Run-time statistics clock and registry

use embassy_time::Instant;
use trendline_core::stats::{RunTimeClock, TaskRegistry};

/// Number of registered pipeline tasks
pub const TASK_COUNT: usize = 4;

/// Registry shared by all tasks
pub type Registry = TaskRegistry<EmbassyClock, TASK_COUNT>;

/// Microseconds since boot from the embassy time driver
pub struct EmbassyClock;

impl RunTimeClock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
