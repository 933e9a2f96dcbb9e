//! Task run-time statistics
//!
//! Tasks charge the time they spend working (between blocking points) to
//! a registry; the reporter periodically snapshots the registry and
//! formats a text table for the serial console.

pub mod registry;
pub mod report;

use heapless::String;

pub use registry::{RunTimeClock, RunTimeMeter, TaskId, TaskMeter, TaskRegistry, IDLE_TASK_NAME};
pub use report::{Report, StatsReporter, REPORT_CAPACITY};

/// Maximum task name length
pub const TASK_NAME_LEN: usize = 8;

/// Maximum number of entries in one snapshot, idle entry included
pub const MAX_TASKS: usize = 8;

/// Statistics errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatsError {
    /// Snapshot buffer cannot hold every task
    SnapshotCapacity,
    /// Formatted report does not fit the report buffer
    ReportOverflow,
    /// No room to register another task
    TooManyTasks,
    /// Task name longer than [`TASK_NAME_LEN`]
    NameTooLong,
}

/// Run-time figures for one task at the instant of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskStat {
    pub name: String<TASK_NAME_LEN>,
    /// Cumulative busy time in microseconds
    pub run_time: u64,
}

/// Summary returned alongside the per-task figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    /// Number of entries written
    pub count: usize,
    /// Time since statistics started, in microseconds
    pub total_run_time: u64,
}

/// Source of task statistics snapshots
pub trait TaskStatsSource {
    /// Number of entries the next snapshot will produce
    fn task_count(&self) -> usize;

    /// Fill `out` with one entry per task
    ///
    /// Fails with [`StatsError::SnapshotCapacity`] if `out` is shorter than
    /// [`TaskStatsSource::task_count`].
    fn snapshot(&self, out: &mut [TaskStat]) -> Result<Snapshot, StatsError>;
}
