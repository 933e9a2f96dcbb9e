//! Pipeline configuration
//!
//! Configuration is fixed at build time; there is no runtime persistence.

pub mod types;

pub use types::*;
