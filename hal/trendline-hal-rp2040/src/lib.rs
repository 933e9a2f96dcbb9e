//! RP2040-specific HAL for the trendline firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `trendline-hal` traits:
//!
//! - UART0 interrupt-level serial port (implements `trendline_hal::SerialPort`)
//! - Framing conversion from `trendline_hal::UartConfig` to embassy-rp

#![no_std]

pub mod uart;

pub use uart::{rp_uart_config, Uart0Irq, Uart0Port};
