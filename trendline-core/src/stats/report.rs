//! Run-time statistics report formatting

use core::fmt::Write;

use heapless::{String, Vec};

use super::{StatsError, TaskStat, TaskStatsSource, MAX_TASKS};

/// Report buffer size in bytes
pub const REPORT_CAPACITY: usize = 384;

/// A formatted report, ready for the serial line
pub type Report = String<REPORT_CAPACITY>;

const RULE_TOP: &str = "====================================\n";
const RULE_HEADER: &str = "************************************\n";

/// Formats periodic task run-time reports
///
/// Report layout:
///
/// ```text
/// ====================================
/// Task    Abs Time    %Time
/// ************************************
/// Sensor  1234        1%
/// IDLE    98000       98%
/// ```
///
/// Columns are tab-separated. When the total run time is too small to
/// derive percentages, the percentage column is left out.
#[derive(Debug, Default)]
pub struct StatsReporter {
    produced: u32,
    skipped: u32,
}

impl StatsReporter {
    pub const fn new() -> Self {
        Self {
            produced: 0,
            skipped: 0,
        }
    }

    /// Snapshot `source` and format a report
    ///
    /// The snapshot buffer lives only for the duration of this call. On
    /// error the cycle counts as skipped.
    pub fn report<S: TaskStatsSource>(&mut self, source: &S) -> Result<Report, StatsError> {
        match Self::format(source) {
            Ok(report) => {
                self.produced = self.produced.wrapping_add(1);
                Ok(report)
            }
            Err(e) => {
                self.skipped = self.skipped.wrapping_add(1);
                Err(e)
            }
        }
    }

    /// Reports produced so far
    pub fn produced(&self) -> u32 {
        self.produced
    }

    /// Reporting cycles abandoned so far
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    fn format<S: TaskStatsSource>(source: &S) -> Result<Report, StatsError> {
        let mut stats: Vec<TaskStat, MAX_TASKS> = Vec::new();
        stats
            .resize_default(source.task_count())
            .map_err(|_| StatsError::SnapshotCapacity)?;

        let snapshot = source.snapshot(&mut stats)?;
        let stats = &stats[..snapshot.count];

        // Percentages are whole numbers of hundredths of the total
        let per_cent = snapshot.total_run_time / 100;

        let mut out = Report::new();
        write_report(&mut out, stats, per_cent).map_err(|_| StatsError::ReportOverflow)?;
        Ok(out)
    }
}

fn write_report(out: &mut Report, stats: &[TaskStat], per_cent: u64) -> core::fmt::Result {
    out.write_str(RULE_TOP)?;
    if per_cent > 0 {
        out.write_str("Task\tAbs Time\t%Time\n")?;
    } else {
        out.write_str("Task\tAbs Time\n")?;
    }
    out.write_str(RULE_HEADER)?;

    for stat in stats {
        write!(out, "{}\t{}", stat.name, stat.run_time)?;
        if per_cent > 0 {
            let pct = stat.run_time / per_cent;
            if pct > 0 {
                write!(out, "\t{}%", pct)?;
            } else {
                out.write_str("\t<1%")?;
            }
        }
        out.write_char('\n')?;
    }
    Ok(())
}
