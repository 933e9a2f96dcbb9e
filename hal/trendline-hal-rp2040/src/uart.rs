//! UART0 interrupt-level serial port
//!
//! embassy-rp configures the peripheral (pins, baud rate, framing, FIFOs)
//! through `Uart::new_blocking`; after that the serial line drives the
//! data register and interrupt masks directly from the UART0 handler.

use embassy_rp::interrupt::{self, InterruptExt, Priority};
use embassy_rp::pac;
use embassy_rp::uart as rp;
use trendline_hal::uart::{DataBits, Parity, StopBits};
use trendline_hal::{SerialPort, UartConfig};

/// Convert shared framing to embassy-rp's UART config
pub fn rp_uart_config(config: &UartConfig) -> rp::Config {
    let mut out = rp::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => rp::DataBits::DataBits7,
        DataBits::Eight => rp::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => rp::Parity::ParityNone,
        Parity::Even => rp::Parity::ParityEven,
        Parity::Odd => rp::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => rp::StopBits::STOP1,
        StopBits::Two => rp::StopBits::STOP2,
    };
    out
}

/// Interrupt sources pending on UART0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uart0Irq {
    /// RX FIFO reached its level, or the receive timeout fired
    pub receive: bool,
    /// TX FIFO drained to its level
    pub transmit: bool,
}

/// Register-level handle on UART0
///
/// Holds no state; every call goes straight to the peripheral. The UART
/// must already have been configured, and only one context may use the
/// handle at a time (the UART0 handler, or task code with that interrupt
/// masked).
#[derive(Debug)]
pub struct Uart0Port {
    _private: (),
}

impl Uart0Port {
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Unmask receive and receive-timeout interrupts
    ///
    /// The timeout interrupt delivers single keystrokes that never fill
    /// the RX FIFO to its level.
    pub fn enable_receive_interrupts(&mut self) {
        pac::UART0.uartimsc().modify(|w| {
            w.set_rxim(true);
            w.set_rtim(true);
        });
    }

    /// Masked interrupt status
    pub fn pending(&self) -> Uart0Irq {
        let mis = pac::UART0.uartmis().read();
        Uart0Irq {
            receive: mis.rxmis() || mis.rtmis(),
            transmit: mis.txmis(),
        }
    }

    /// Clear the receive timeout and any line error flags
    ///
    /// RX and TX level interrupts clear themselves as the FIFOs are read
    /// or filled.
    pub fn clear_errors(&mut self) {
        pac::UART0.uarticr().write(|w| {
            w.set_rtic(true);
            w.set_feic(true);
            w.set_peic(true);
            w.set_beic(true);
            w.set_oeic(true);
        });
    }

    /// Set the NVIC priority of UART0 and unmask it
    pub fn unmask_interrupt(&mut self, priority: Priority) {
        interrupt::UART0_IRQ.set_priority(priority);
        interrupt::UART0_IRQ.unpend();
        // The handler is installed by the firmware with #[interrupt]
        unsafe { interrupt::UART0_IRQ.enable() };
    }
}

impl Default for Uart0Port {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialPort for Uart0Port {
    fn is_tx_full(&self) -> bool {
        pac::UART0.uartfr().read().txff()
    }

    fn write_byte(&mut self, byte: u8) {
        pac::UART0.uartdr().write(|w| w.set_data(byte));
    }

    fn read_byte(&mut self) -> Option<u8> {
        let r = pac::UART0;
        if r.uartfr().read().rxfe() {
            return None;
        }
        // Frame and parity errors are dropped with the byte
        Some(r.uartdr().read().data())
    }

    fn set_tx_interrupt(&mut self, enabled: bool) {
        pac::UART0.uartimsc().modify(|w| w.set_txim(enabled));
    }
}
