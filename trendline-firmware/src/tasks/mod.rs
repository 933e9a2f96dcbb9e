//! Embassy async tasks
//!
//! One task per pipeline stage, all at the same priority on the thread
//! executor. Each loops over its cycle from `trendline_core::pipeline`.

pub mod filter;
pub mod sensor;
pub mod stats;
pub mod trend;

pub use filter::filter_task;
pub use sensor::sensor_task;
pub use stats::stats_task;
pub use trend::{trend_task, Display};
