//! Interrupt-driven serial line
//!
//! Two interrupt sources share the line:
//!
//! - Transmit-ready drains the single outbound message, one character at a
//!   time, from a cursor owned by the line.
//! - Receive decodes console digits into window-size updates and pushes
//!   them onto the control channel without blocking.
//!
//! Task code hands a message over with [`SerialLine::start_send`], which
//! must run with the serial interrupt masked (a critical section).

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Sender, TrySendError};
use heapless::Vec;
use trendline_hal::SerialPort;

use crate::filter::WindowSize;
use crate::stats::REPORT_CAPACITY;

/// Outbound message buffer size
pub const OUTBOUND_CAPACITY: usize = REPORT_CAPACITY;

/// Transmit-side errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// A previous message is still being sent
    Busy,
    /// Message larger than the outbound buffer
    TooLong,
}

/// Transmit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxState {
    Idle,
    Sending,
}

/// Non-blocking destination for window-size updates
///
/// Implementations must be safe to call from interrupt context.
pub trait ControlSink {
    /// Queue an update, handing it back if there is no room
    fn try_push(&mut self, window: WindowSize) -> Result<(), WindowSize>;
}

impl<M: RawMutex, const N: usize> ControlSink for Sender<'_, M, WindowSize, N> {
    fn try_push(&mut self, window: WindowSize) -> Result<(), WindowSize> {
        self.try_send(window).map_err(|TrySendError::Full(w)| w)
    }
}

/// Serial line shared by the transmit and receive interrupts
#[derive(Debug)]
pub struct SerialLine<const N: usize = OUTBOUND_CAPACITY> {
    message: Vec<u8, N>,
    cursor: usize,
    state: TxState,
    ignored: u32,
    dropped: u32,
}

impl<const N: usize> SerialLine<N> {
    pub const fn new() -> Self {
        Self {
            message: Vec::new(),
            cursor: 0,
            state: TxState::Idle,
            ignored: 0,
            dropped: 0,
        }
    }

    /// Current transmit state
    pub fn state(&self) -> TxState {
        self.state
    }

    /// Whether a new message can be started
    pub fn is_idle(&self) -> bool {
        self.state == TxState::Idle
    }

    /// Characters of the current message not yet handed to the port
    pub fn pending(&self) -> usize {
        self.message.len() - self.cursor
    }

    /// Received bytes that were not console digits
    pub fn ignored(&self) -> u32 {
        self.ignored
    }

    /// Window updates lost because the control channel was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Start sending `text`
    ///
    /// The text is copied into the line's own buffer and the first
    /// characters go out immediately. Whatever does not fit in the
    /// transmitter is sent from [`SerialLine::on_transmit_ready`].
    pub fn start_send<P: SerialPort>(&mut self, port: &mut P, text: &[u8]) -> Result<(), TxError> {
        if self.state == TxState::Sending {
            return Err(TxError::Busy);
        }
        if text.len() > N {
            return Err(TxError::TooLong);
        }

        self.message.clear();
        self.message
            .extend_from_slice(text)
            .map_err(|_| TxError::TooLong)?;
        self.cursor = 0;
        self.state = TxState::Sending;

        self.pump(port);
        if self.state == TxState::Sending {
            port.set_tx_interrupt(true);
        }
        Ok(())
    }

    /// Transmit-ready interrupt
    pub fn on_transmit_ready<P: SerialPort>(&mut self, port: &mut P) {
        if self.state == TxState::Sending {
            self.pump(port);
        }
        if self.state == TxState::Idle {
            port.set_tx_interrupt(false);
        }
    }

    /// Receive interrupt
    ///
    /// Drains every pending byte. Returns the number of window updates
    /// accepted by `sink`.
    pub fn on_receive<P: SerialPort, S: ControlSink>(&mut self, port: &mut P, sink: &mut S) -> usize {
        let mut accepted = 0;
        while let Some(byte) = port.read_byte() {
            match WindowSize::from_digit(byte) {
                Some(window) => match sink.try_push(window) {
                    Ok(()) => accepted += 1,
                    Err(_) => self.dropped = self.dropped.wrapping_add(1),
                },
                None => self.ignored = self.ignored.wrapping_add(1),
            }
        }
        accepted
    }

    /// Write characters while the transmitter has room
    ///
    /// The cursor only advances past characters actually written.
    fn pump<P: SerialPort>(&mut self, port: &mut P) {
        while self.cursor < self.message.len() && !port.is_tx_full() {
            port.write_byte(self.message[self.cursor]);
            self.cursor += 1;
        }
        if self.cursor >= self.message.len() {
            self.state = TxState::Idle;
        }
    }
}

impl<const N: usize> Default for SerialLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;
    use proptest::prelude::*;
    use std::collections::VecDeque;
    use std::vec::Vec as StdVec;

    /// UART model with a small transmit FIFO and a wire that empties it
    struct FakePort {
        tx_fifo: VecDeque<u8>,
        tx_depth: usize,
        wire: StdVec<u8>,
        rx: VecDeque<u8>,
        tx_irq: bool,
    }

    impl FakePort {
        fn new(tx_depth: usize) -> Self {
            Self {
                tx_fifo: VecDeque::new(),
                tx_depth,
                wire: StdVec::new(),
                rx: VecDeque::new(),
                tx_irq: false,
            }
        }

        /// Shift one character onto the wire
        ///
        /// Returns true when the transmit-ready interrupt would fire.
        fn shift_out(&mut self) -> bool {
            if let Some(byte) = self.tx_fifo.pop_front() {
                self.wire.push(byte);
            }
            self.tx_irq && self.tx_fifo.len() < self.tx_depth
        }
    }

    impl SerialPort for FakePort {
        fn is_tx_full(&self) -> bool {
            self.tx_fifo.len() >= self.tx_depth
        }

        fn write_byte(&mut self, byte: u8) {
            assert!(!self.is_tx_full(), "write to full transmitter");
            self.tx_fifo.push_back(byte);
        }

        fn read_byte(&mut self) -> Option<u8> {
            self.rx.pop_front()
        }

        fn set_tx_interrupt(&mut self, enabled: bool) {
            self.tx_irq = enabled;
        }
    }

    /// Run the line until the message has been fully shifted out
    fn drain<const N: usize>(line: &mut SerialLine<N>, port: &mut FakePort) {
        for _ in 0..10_000 {
            if port.shift_out() {
                line.on_transmit_ready(port);
            }
            if line.is_idle() && port.tx_fifo.is_empty() {
                return;
            }
        }
        panic!("serial line never finished");
    }

    #[test]
    fn test_round_trip_one_char_per_interrupt() {
        let message = b"====\nSensor\t1234\t12%\nIDLE\t98000\t87%\n";
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(1);

        line.start_send(&mut port, message).unwrap();
        // First character goes out immediately
        assert_eq!(port.tx_fifo.front(), Some(&b'='));
        assert_eq!(line.state(), TxState::Sending);
        assert!(port.tx_irq);

        drain(&mut line, &mut port);
        assert_eq!(port.wire, message);
        assert!(!port.tx_irq);
    }

    #[test]
    fn test_second_send_rejected_while_busy() {
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(1);

        line.start_send(&mut port, b"first\n").unwrap();
        assert_eq!(line.start_send(&mut port, b"second\n"), Err(TxError::Busy));

        drain(&mut line, &mut port);
        assert_eq!(port.wire, b"first\n");

        // Idle again, so the next message goes out whole
        line.start_send(&mut port, b"second\n").unwrap();
        drain(&mut line, &mut port);
        assert_eq!(port.wire, b"first\nsecond\n");
    }

    #[test]
    fn test_short_message_completes_without_interrupt() {
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(16);

        line.start_send(&mut port, b"ok\n").unwrap();
        assert!(line.is_idle());
        assert!(!port.tx_irq);
        assert_eq!(port.tx_fifo.len(), 3);
    }

    #[test]
    fn test_message_too_long() {
        let mut line: SerialLine<4> = SerialLine::new();
        let mut port = FakePort::new(1);
        assert_eq!(line.start_send(&mut port, b"12345"), Err(TxError::TooLong));
        assert!(line.is_idle());
        assert!(port.tx_fifo.is_empty());
    }

    #[test]
    fn test_full_transmitter_holds_cursor() {
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(1);
        line.start_send(&mut port, b"abc").unwrap();
        assert_eq!(line.pending(), 2);

        // Spurious interrupt while the FIFO is still full must not skip
        line.on_transmit_ready(&mut port);
        assert_eq!(line.pending(), 2);

        drain(&mut line, &mut port);
        assert_eq!(port.wire, b"abc");
    }

    #[test]
    fn test_receive_digits() {
        let control: Channel<NoopRawMutex, WindowSize, 3> = Channel::new();
        let mut sender = control.sender();
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(1);
        port.rx.extend(b"3x0\r");

        assert_eq!(line.on_receive(&mut port, &mut sender), 2);
        assert_eq!(line.ignored(), 2);
        assert_eq!(control.try_receive().map(WindowSize::get), Ok(3));
        assert_eq!(control.try_receive().map(WindowSize::get), Ok(10));
        assert!(control.try_receive().is_err());
    }

    #[test]
    fn test_receive_never_blocks_on_full_channel() {
        let control: Channel<NoopRawMutex, WindowSize, 3> = Channel::new();
        let mut sender = control.sender();
        let mut line: SerialLine = SerialLine::new();
        let mut port = FakePort::new(1);
        port.rx.extend(b"12345");

        assert_eq!(line.on_receive(&mut port, &mut sender), 3);
        assert_eq!(line.dropped(), 2);
        // Oldest updates kept, in order
        assert_eq!(control.try_receive().map(WindowSize::get), Ok(1));
        assert_eq!(control.try_receive().map(WindowSize::get), Ok(2));
        assert_eq!(control.try_receive().map(WindowSize::get), Ok(3));
    }

    proptest! {
        #[test]
        fn test_round_trip_any_message(
            message in proptest::collection::vec(any::<u8>(), 0..OUTBOUND_CAPACITY),
            depth in 1usize..8,
        ) {
            let mut line: SerialLine = SerialLine::new();
            let mut port = FakePort::new(depth);

            line.start_send(&mut port, &message).unwrap();
            drain(&mut line, &mut port);
            prop_assert_eq!(&port.wire, &message);
        }
    }
}
