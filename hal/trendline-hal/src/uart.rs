//! UART serial communication abstractions
//!
//! The serial line is driven from interrupt context one byte at a time,
//! so the port trait exposes the transmit/receive data path and the
//! transmit-ready interrupt gate rather than buffered reads and writes.

/// Interrupt-level serial port
///
/// Every method must be callable from an interrupt handler: none of them
/// may block or wait for the line.
pub trait SerialPort {
    /// Whether the transmitter can accept another byte right now
    fn is_tx_full(&self) -> bool;

    /// Place one byte in the transmitter
    ///
    /// Callers check [`SerialPort::is_tx_full`] first; writing to a full
    /// transmitter is implementation-defined.
    fn write_byte(&mut self, byte: u8);

    /// Take the next received byte, if one is pending
    fn read_byte(&mut self) -> Option<u8>;

    /// Enable or disable the transmit-ready interrupt
    fn set_tx_interrupt(&mut self, enabled: bool);
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 19_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8-N-1 framing at the given baud rate
    pub const fn eight_n_one(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_8n1_19200() {
        let config = UartConfig::default();
        assert_eq!(config, UartConfig::eight_n_one(19_200));
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
    }
}
