//! Task run-time registry
//!
//! Tasks are registered once during start-up, before the registry is
//! shared. Counters are atomics so any task can charge time through a
//! shared reference.

use heapless::{String, Vec};
use portable_atomic::{AtomicU64, Ordering};

use super::{Snapshot, StatsError, TaskStat, TaskStatsSource, TASK_NAME_LEN};

/// Name reported for time not charged to any task
pub const IDLE_TASK_NAME: &str = "IDLE";

/// Monotonic microsecond clock
pub trait RunTimeClock {
    fn now_us(&self) -> u64;
}

/// Charges the duration of a closure to some task
pub trait RunTimeMeter {
    fn measure<R>(&self, f: impl FnOnce() -> R) -> R;
}

/// No accounting
impl RunTimeMeter for () {
    fn measure<R>(&self, f: impl FnOnce() -> R) -> R {
        f()
    }
}

/// Handle for a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(u8);

impl TaskId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Registry of per-task cumulative run time
///
/// Holds up to `N` tasks; snapshots report one extra idle entry.
pub struct TaskRegistry<C, const N: usize> {
    clock: C,
    started_us: u64,
    names: Vec<String<TASK_NAME_LEN>, N>,
    counters: [AtomicU64; N],
}

impl<C: RunTimeClock, const N: usize> TaskRegistry<C, N> {
    /// Create an empty registry; total run time counts from now
    pub fn new(clock: C) -> Self {
        let started_us = clock.now_us();
        Self {
            clock,
            started_us,
            names: Vec::new(),
            counters: core::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Register a task by name
    pub fn register(&mut self, name: &str) -> Result<TaskId, StatsError> {
        let name = String::try_from(name).map_err(|_| StatsError::NameTooLong)?;
        let index = self.names.len();
        self.names.push(name).map_err(|_| StatsError::TooManyTasks)?;
        Ok(TaskId(index as u8))
    }

    /// Name of a registered task
    pub fn name(&self, id: TaskId) -> Option<&str> {
        self.names.get(id.index()).map(|n| n.as_str())
    }

    /// Add busy time to a task's counter
    pub fn charge(&self, id: TaskId, elapsed_us: u64) {
        if let Some(counter) = self.counters.get(id.index()) {
            counter.fetch_add(elapsed_us, Ordering::Relaxed);
        }
    }

    /// Cumulative busy time of a task
    pub fn run_time(&self, id: TaskId) -> u64 {
        self.counters
            .get(id.index())
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Time since the registry was created
    pub fn total_run_time(&self) -> u64 {
        self.clock.now_us().saturating_sub(self.started_us)
    }

    /// Meter that charges to `id`
    pub fn meter(&self, id: TaskId) -> TaskMeter<'_, C, N> {
        TaskMeter { registry: self, id }
    }
}

impl<C: RunTimeClock, const N: usize> TaskStatsSource for TaskRegistry<C, N> {
    fn task_count(&self) -> usize {
        self.names.len() + 1
    }

    fn snapshot(&self, out: &mut [TaskStat]) -> Result<Snapshot, StatsError> {
        let count = self.task_count();
        if out.len() < count {
            return Err(StatsError::SnapshotCapacity);
        }

        let total_run_time = self.total_run_time();
        let mut busy: u64 = 0;

        for (i, (name, slot)) in self.names.iter().zip(out.iter_mut()).enumerate() {
            let run_time = self.counters[i].load(Ordering::Relaxed);
            busy = busy.saturating_add(run_time);
            slot.name.clone_from(name);
            slot.run_time = run_time;
        }

        let idle = &mut out[count - 1];
        idle.name.clear();
        let _ = idle.name.push_str(IDLE_TASK_NAME);
        idle.run_time = total_run_time.saturating_sub(busy);

        Ok(Snapshot {
            count,
            total_run_time,
        })
    }
}

/// [`RunTimeMeter`] bound to one registered task
pub struct TaskMeter<'a, C, const N: usize> {
    registry: &'a TaskRegistry<C, N>,
    id: TaskId,
}

impl<C: RunTimeClock, const N: usize> RunTimeMeter for TaskMeter<'_, C, N> {
    fn measure<R>(&self, f: impl FnOnce() -> R) -> R {
        let start = self.registry.clock.now_us();
        let result = f();
        let elapsed = self.registry.clock.now_us().saturating_sub(start);
        self.registry.charge(self.id, elapsed);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Clock that advances only when told to
    #[derive(Default)]
    struct ManualClock {
        now: Cell<u64>,
        step: Cell<u64>,
    }

    impl ManualClock {
        fn advance(&self, us: u64) {
            self.now.set(self.now.get() + us);
        }
    }

    impl RunTimeClock for &ManualClock {
        fn now_us(&self) -> u64 {
            // Each read moves time forward by `step`, so measured closures
            // see a non-zero duration
            let now = self.now.get();
            self.now.set(now + self.step.get());
            now
        }
    }

    #[test]
    fn test_register_and_name() {
        let clock = ManualClock::default();
        let mut registry: TaskRegistry<_, 4> = TaskRegistry::new(&clock);
        let sensor = registry.register("Sensor").unwrap();
        let filter = registry.register("Filter").unwrap();

        assert_eq!(registry.name(sensor), Some("Sensor"));
        assert_eq!(registry.name(filter), Some("Filter"));
        assert_eq!(registry.task_count(), 3);
    }

    #[test]
    fn test_register_limits() {
        let clock = ManualClock::default();
        let mut registry: TaskRegistry<_, 1> = TaskRegistry::new(&clock);
        assert_eq!(
            registry.register("FarTooLongName"),
            Err(StatsError::NameTooLong)
        );
        registry.register("One").unwrap();
        assert_eq!(registry.register("Two"), Err(StatsError::TooManyTasks));
    }

    #[test]
    fn test_meter_charges_task() {
        let clock = ManualClock::default();
        let mut registry: TaskRegistry<_, 2> = TaskRegistry::new(&clock);
        let id = registry.register("Filter").unwrap();

        clock.step.set(5);
        let value = registry.meter(id).measure(|| 42);
        assert_eq!(value, 42);
        assert_eq!(registry.run_time(id), 5);
    }

    #[test]
    fn test_snapshot_includes_idle() {
        let clock = ManualClock::default();
        let mut registry: TaskRegistry<_, 2> = TaskRegistry::new(&clock);
        let sensor = registry.register("Sensor").unwrap();
        let filter = registry.register("Filter").unwrap();

        registry.charge(sensor, 100);
        registry.charge(filter, 300);
        clock.advance(1000);

        let mut out: [TaskStat; 3] = Default::default();
        let snapshot = registry.snapshot(&mut out).unwrap();

        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.total_run_time, 1000);
        assert_eq!(out[0].name.as_str(), "Sensor");
        assert_eq!(out[0].run_time, 100);
        assert_eq!(out[1].run_time, 300);
        assert_eq!(out[2].name.as_str(), IDLE_TASK_NAME);
        assert_eq!(out[2].run_time, 600);
    }

    #[test]
    fn test_snapshot_capacity() {
        let clock = ManualClock::default();
        let mut registry: TaskRegistry<_, 4> = TaskRegistry::new(&clock);
        registry.register("A").unwrap();
        registry.register("B").unwrap();

        let mut out: [TaskStat; 2] = Default::default();
        assert_eq!(
            registry.snapshot(&mut out),
            Err(StatsError::SnapshotCapacity)
        );
    }
}
