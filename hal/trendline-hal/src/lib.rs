//! Trendline Hardware Abstraction Layer
//!
//! This crate defines the peripheral traits the pipeline logic is written
//! against. Chip-specific crates implement them for real hardware, and the
//! host test suites implement them with in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  trendline-core / trendline-firmware    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  trendline-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ trendline-hal-│       │ trendline-    │
//! │    rp2040     │       │   drivers     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - Interrupt-level serial byte port
//! - [`display::DrawSurface`] - Text and image drawing on a paged display

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use display::{DisplayError, DrawSurface, ImageRegion};
pub use uart::{SerialPort, UartConfig};
