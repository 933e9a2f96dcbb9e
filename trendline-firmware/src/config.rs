//! Build-time pipeline configuration
//!
//! `build.rs` validates pipeline.toml and generates the `PIPELINE`
//! constant included here.

use defmt::*;
use trendline_core::config::{
    FilterConfig, GraphConfig, PipelineConfig, SensorConfig, SerialConfig, StatsConfig,
};

include!(concat!(env!("OUT_DIR"), "/pipeline_config.rs"));

/// Configuration to run with
///
/// The build script already rejects bad values; the check here catches
/// any drift between its limits and the core's.
pub fn load() -> PipelineConfig {
    match PIPELINE.validate() {
        Ok(()) => {
            info!("Pipeline config: {}", PIPELINE);
            PIPELINE
        }
        Err(e) => {
            error!("Invalid pipeline config: {}", e);
            error!("Using default configuration");
            PipelineConfig::DEFAULT
        }
    }
}
