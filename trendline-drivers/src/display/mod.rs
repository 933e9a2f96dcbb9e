//! Display drivers

mod sh1106;

pub use sh1106::{Sh1106, HEIGHT, PAGES, SH1106_ADDR, WIDTH};
