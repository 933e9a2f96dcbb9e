//! Synthetic temperature sensor
//!
//! Produces a triangular waveform bouncing between a floor and a ceiling,
//! one step per sample.

use crate::config::SensorConfig;
use crate::Sample;

/// Direction the waveform is currently moving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Ascending,
    Descending,
}

/// Triangular waveform generator
#[derive(Debug, Clone)]
pub struct Generator {
    value: Sample,
    phase: Phase,
    floor: Sample,
    ceiling: Sample,
}

impl Generator {
    /// Create a generator resting at `floor`, about to ascend
    ///
    /// `floor` must be below `ceiling`; [`SensorConfig::validate`] checks this
    /// for configured bounds.
    pub const fn new(floor: Sample, ceiling: Sample) -> Self {
        Self {
            value: floor,
            phase: Phase::Ascending,
            floor,
            ceiling,
        }
    }

    /// Create a generator from sensor configuration
    pub const fn from_config(config: &SensorConfig) -> Self {
        Self::new(config.floor, config.ceiling)
    }

    /// Compute the next sample
    ///
    /// Reaching the ceiling flips to descending, reaching the floor flips to
    /// ascending. The bound itself is emitted once before the turn.
    pub fn next_sample(&mut self) -> Sample {
        match self.phase {
            Phase::Ascending => {
                self.value = self.value.saturating_add(1);
                if self.value >= self.ceiling {
                    self.phase = Phase::Descending;
                }
            }
            Phase::Descending => {
                self.value = self.value.saturating_sub(1);
                if self.value <= self.floor {
                    self.phase = Phase::Ascending;
                }
            }
        }
        self.value
    }

    /// Last emitted sample (the floor before the first call)
    pub fn value(&self) -> Sample {
        self.value
    }

    /// Current direction
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::from_config(&SensorConfig::DEFAULT)
    }
}
