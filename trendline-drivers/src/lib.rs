//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in trendline-hal:
//!
//! - SH1106 128x64 OLED over async I2C ([`display::Sh1106`])

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
