//! Configuration type definitions
//!
//! These types represent the pipeline configuration. The firmware build
//! script generates a [`PipelineConfig`] constant from `pipeline.toml`.

use crate::filter::{WindowSize, MAX_WINDOW};
use crate::graph::{TREND_COLUMNS, TREND_PAGES};
use crate::Sample;

/// Panel width in pixel columns
pub const DISPLAY_WIDTH: usize = 128;

/// Panel height in 8-row pages
pub const DISPLAY_PAGES: u8 = 8;

/// Lowest baud rate accepted for the console
pub const MIN_BAUDRATE: u32 = 1_200;

/// Highest baud rate accepted for the console
pub const MAX_BAUDRATE: u32 = 921_600;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Sensor floor is not strictly below the ceiling
    InvalidSensorBounds,
    /// Sensor floor below zero; averages are unsigned
    NegativeSensorFloor,
    /// Initial window outside `1..=MAX_WINDOW`
    InvalidWindow,
    /// A task period of zero milliseconds
    ZeroPeriod,
    /// Graph or text placement falls outside the panel
    GraphOutOfBounds,
    /// Baud rate outside the supported range
    InvalidBaudrate,
}

/// Synthetic sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Lowest sample value; reaching it starts the ascent
    pub floor: Sample,
    /// Highest sample value; reaching it starts the descent
    pub ceiling: Sample,
    /// Sample period in milliseconds
    pub period_ms: u32,
}

impl SensorConfig {
    pub const DEFAULT: Self = Self {
        floor: 16,
        ceiling: 127,
        period_ms: 10,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.floor < 0 {
            return Err(ConfigError::NegativeSensorFloor);
        }
        if self.floor >= self.ceiling {
            return Err(ConfigError::InvalidSensorBounds);
        }
        if self.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}

/// Window filter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterConfig {
    /// Window size used until the first serial command arrives
    pub initial_window: u8,
}

impl FilterConfig {
    pub const DEFAULT: Self = Self { initial_window: 1 };

    /// Initial window, falling back to the minimum if out of range
    pub fn initial_window(&self) -> WindowSize {
        WindowSize::new(self.initial_window).unwrap_or(WindowSize::MIN)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_window == 0 || self.initial_window as usize > MAX_WINDOW {
            return Err(ConfigError::InvalidWindow);
        }
        Ok(())
    }
}

/// Display layout for the trend graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GraphConfig {
    /// Left pixel column of the bar graph
    pub x: u8,
    /// Left pixel column of the numeric readouts
    pub text_x: u8,
    /// Page showing the current average
    pub average_page: u8,
    /// Page showing the current window size
    pub window_page: u8,
    /// Top page of the bar graph
    pub image_page: u8,
}

impl GraphConfig {
    pub const DEFAULT: Self = Self {
        x: 16,
        text_x: 0,
        average_page: 1,
        window_page: 0,
        image_page: 0,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.x as usize + TREND_COLUMNS > DISPLAY_WIDTH
            || self.text_x as usize >= DISPLAY_WIDTH
            || self.average_page >= DISPLAY_PAGES
            || self.window_page >= DISPLAY_PAGES
            || self.image_page as usize + TREND_PAGES as usize > DISPLAY_PAGES as usize
        {
            return Err(ConfigError::GraphOutOfBounds);
        }
        Ok(())
    }
}

/// Statistics report configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsConfig {
    /// Report period in milliseconds
    pub period_ms: u32,
}

impl StatsConfig {
    pub const DEFAULT: Self = Self { period_ms: 3000 };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}

/// Serial console configuration (always 8-N-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    pub baudrate: u32,
}

impl SerialConfig {
    pub const DEFAULT: Self = Self { baudrate: 19_200 };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BAUDRATE..=MAX_BAUDRATE).contains(&self.baudrate) {
            return Err(ConfigError::InvalidBaudrate);
        }
        Ok(())
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineConfig {
    pub sensor: SensorConfig,
    pub filter: FilterConfig,
    pub graph: GraphConfig,
    pub stats: StatsConfig,
    pub serial: SerialConfig,
}

impl PipelineConfig {
    pub const DEFAULT: Self = Self {
        sensor: SensorConfig::DEFAULT,
        filter: FilterConfig::DEFAULT,
        graph: GraphConfig::DEFAULT,
        stats: StatsConfig::DEFAULT,
        serial: SerialConfig::DEFAULT,
    };

    /// Check every section, reporting the first error found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sensor.validate()?;
        self.filter.validate()?;
        self.graph.validate()?;
        self.stats.validate()?;
        self.serial.validate()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
