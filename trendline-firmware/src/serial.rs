//! Serial console
//!
//! The UART0 handler owns the line between interrupts. Task code only
//! touches it through [`transmit`], inside a critical section, so the
//! handoff of a new message cannot interleave with the handler.

use core::cell::RefCell;

use defmt::*;
use embassy_rp::interrupt;
use embassy_rp::interrupt::Priority;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use trendline_core::serial::{SerialLine, TxError};
use trendline_hal_rp2040::Uart0Port;

use crate::channels::ControlSender;

/// State shared by the UART0 handler and [`transmit`]
struct Console {
    line: SerialLine,
    port: Uart0Port,
    control: ControlSender,
}

static CONSOLE: Mutex<CriticalSectionRawMutex, RefCell<Option<Console>>> =
    Mutex::new(RefCell::new(None));

/// Hand the UART to the interrupt handler and start receiving
///
/// Window-size commands typed on the console go to `control`.
pub fn start(mut port: Uart0Port, control: ControlSender, priority: Priority) {
    port.enable_receive_interrupts();
    CONSOLE.lock(|cell| {
        let mut slot = cell.borrow_mut();
        let console = slot.insert(Console {
            line: SerialLine::new(),
            port,
            control,
        });
        console.port.unmask_interrupt(priority);
    });
    info!("Serial console started");
}

/// Start sending `text` on the console
///
/// Returns immediately; the rest of the message drains from the transmit
/// interrupt. Fails with [`TxError::Busy`] while a previous message is
/// still in flight.
pub fn transmit(text: &[u8]) -> Result<(), TxError> {
    CONSOLE.lock(|cell| match cell.borrow_mut().as_mut() {
        Some(console) => console.line.start_send(&mut console.port, text),
        // Not started: nothing would ever drain the message
        None => Err(TxError::Busy),
    })
}

#[interrupt]
fn UART0_IRQ() {
    CONSOLE.lock(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(console) = slot.as_mut() else {
            return;
        };

        let pending = console.port.pending();
        if pending.receive {
            let dropped = console.line.dropped();
            console.line.on_receive(&mut console.port, &mut console.control);
            if console.line.dropped() != dropped {
                warn!("Control queue full, window update dropped");
            }
        }
        if pending.transmit {
            console.line.on_transmit_ready(&mut console.port);
        }
        console.port.clear_errors();
    });
}
