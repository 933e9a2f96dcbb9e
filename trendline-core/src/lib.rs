//! Board-agnostic core logic for the trendline firmware
//!
//! This crate contains all pipeline logic that does not depend on
//! specific hardware implementations:
//!
//! - Synthetic sensor waveform ([`sensor`])
//! - Moving-average window filter ([`filter`])
//! - Scrolling bar-graph encoding and rendering ([`graph`])
//! - Per-task run-time accounting and reports ([`stats`])
//! - Interrupt-driven serial line state machine ([`serial`])
//! - Task cycle bodies wired to bounded channels ([`pipeline`])
//! - Configuration type definitions ([`config`])

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod filter;
pub mod graph;
pub mod pipeline;
pub mod sensor;
pub mod serial;
pub mod stats;

/// Synthetic temperature reading
pub type Sample = i16;

/// Windowed mean of recent samples
pub type AverageSample = u16;
