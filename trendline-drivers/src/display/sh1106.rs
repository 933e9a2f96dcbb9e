//! SH1106 OLED display driver
//!
//! Driver for 128x64 SH1106-based OLED displays via I2C. Drawing goes to
//! a page-organised frame buffer; [`Sh1106::flush`] copies it to the panel.
//! Text is rendered with embedded-graphics' 5x8 font, one page per line.

use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal_async::i2c::I2c;
use trendline_hal::{DisplayError, DrawSurface, ImageRegion};

/// SH1106 I2C address (typically 0x3C or 0x3D)
pub const SH1106_ADDR: u8 = 0x3C;

/// Visible width in pixels
pub const WIDTH: usize = 128;
/// Visible height in pixels
pub const HEIGHT: usize = 64;
/// Number of 8-row pages
pub const PAGES: usize = HEIGHT / 8;

/// The SH1106 has 132 columns of RAM; the visible 128 start at column 2
const COLUMN_OFFSET: u8 = 2;

/// I2C control bytes
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Power-up sequence, sent as one command stream
const INIT_SEQUENCE: [u8; 23] = [
    CONTROL_COMMAND,
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x12,
    cmd::SET_CONTRAST,
    0xCF,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
    /// Frame buffer, one byte per column per page, bit 0 at the top
    buffer: [[u8; WIDTH]; PAGES],
}

impl<I2C> Sh1106<I2C> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, SH1106_ADDR)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            buffer: [[0; WIDTH]; PAGES],
        }
    }

    /// Frame buffer contents
    pub fn buffer(&self) -> &[[u8; WIDTH]; PAGES] {
        &self.buffer
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> Sh1106<I2C> {
    /// Initialize the panel and turn it on
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        self.write(&INIT_SEQUENCE).await
    }

    /// Copy the frame buffer to the panel, one page at a time
    pub async fn flush(&mut self) -> Result<(), DisplayError> {
        let mut data = [0u8; WIDTH + 1];
        data[0] = CONTROL_DATA;

        for page in 0..PAGES {
            self.write(&[
                CONTROL_COMMAND,
                cmd::SET_PAGE_ADDR | page as u8,
                cmd::SET_LOW_COLUMN | (COLUMN_OFFSET & 0x0F),
                cmd::SET_HIGH_COLUMN | (COLUMN_OFFSET >> 4),
            ])
            .await?;

            data[1..].copy_from_slice(&self.buffer[page]);
            self.write(&data).await?;
        }
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, bytes)
            .await
            .map_err(|_| DisplayError::Communication)
    }
}

impl<I2C> OriginDimensions for Sh1106<I2C> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl<I2C> DrawTarget for Sh1106<I2C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(coord.x), usize::try_from(coord.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let mask = 1 << (y % 8);
            let byte = &mut self.buffer[y / 8][x];
            if color.is_on() {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
        Ok(())
    }
}

impl<I2C> DrawSurface for Sh1106<I2C> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        for page in self.buffer.iter_mut() {
            page.fill(0);
        }
        Ok(())
    }

    fn draw_text(&mut self, x: u8, page: u8, text: &str) -> Result<(), DisplayError> {
        if x as usize >= WIDTH || page as usize >= PAGES {
            return Err(DisplayError::InvalidCoordinates);
        }

        let style = MonoTextStyle::new(&FONT_5X8, BinaryColor::On);
        let origin = Point::new(x as i32, page as i32 * 8);
        // Characters past the right edge are clipped
        Text::with_baseline(text, origin, style, Baseline::Top)
            .draw(self)
            .map_err(|e: Infallible| match e {})?;
        Ok(())
    }

    fn draw_image(&mut self, image: &[u8], region: ImageRegion) -> Result<(), DisplayError> {
        let x = region.x as usize;
        let width = region.width as usize;
        let first_page = region.page as usize;

        if x + width > WIDTH || first_page + region.pages as usize > PAGES {
            return Err(DisplayError::InvalidCoordinates);
        }
        if image.len() < region.len() {
            return Err(DisplayError::BufferOverflow);
        }
        if width == 0 {
            return Ok(());
        }

        for (row, chunk) in image.chunks_exact(width).take(region.pages as usize).enumerate() {
            self.buffer[first_page + row][x..x + width].copy_from_slice(chunk);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorKind, ErrorType, Operation};
    use std::vec::Vec;

    /// I2C bus that records every write
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        fail: bool,
    }

    impl ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    fn display() -> Sh1106<RecordingBus> {
        Sh1106::new(RecordingBus::default())
    }

    #[test]
    fn test_init_is_one_command_stream() {
        let mut display = display();
        block_on(display.init()).unwrap();

        let bus = display.release();
        assert_eq!(bus.writes.len(), 1);
        let (address, bytes) = &bus.writes[0];
        assert_eq!(*address, SH1106_ADDR);
        assert_eq!(bytes[0], CONTROL_COMMAND);
        assert_eq!(bytes[1], cmd::DISPLAY_OFF);
        assert_eq!(*bytes.last().unwrap(), cmd::DISPLAY_ON);
    }

    #[test]
    fn test_flush_framing() {
        let mut display = display();
        display.draw_image(&[0xAA], ImageRegion { x: 0, page: 3, width: 1, pages: 1 }).unwrap();
        block_on(display.flush()).unwrap();

        let bus = display.release();
        assert_eq!(bus.writes.len(), 2 * PAGES);
        for (page, pair) in bus.writes.chunks(2).enumerate() {
            assert_eq!(pair[0].1, [0x00, 0xB0 | page as u8, 0x02, 0x10]);
            assert_eq!(pair[1].1.len(), WIDTH + 1);
            assert_eq!(pair[1].1[0], CONTROL_DATA);
        }
        assert_eq!(bus.writes[7].1[1], 0xAA);
        assert_eq!(bus.writes[5].1[1], 0x00);
    }

    #[test]
    fn test_bus_error_is_communication() {
        let mut display = Sh1106::new(RecordingBus {
            fail: true,
            ..Default::default()
        });
        assert_eq!(block_on(display.flush()), Err(DisplayError::Communication));
    }

    #[test]
    fn test_image_placement() {
        let mut display = display();
        let region = ImageRegion { x: 16, page: 0, width: 2, pages: 2 };
        display.draw_image(&[1, 2, 3, 4], region).unwrap();

        assert_eq!(display.buffer()[0][16..18], [1, 2]);
        assert_eq!(display.buffer()[1][16..18], [3, 4]);
        assert_eq!(display.buffer()[0][15], 0);
        assert_eq!(display.buffer()[2][16], 0);
    }

    #[test]
    fn test_image_bounds() {
        let mut display = display();
        let off_right = ImageRegion { x: 100, page: 0, width: 64, pages: 2 };
        assert_eq!(
            display.draw_image(&[0; 128], off_right),
            Err(DisplayError::InvalidCoordinates)
        );

        let off_bottom = ImageRegion { x: 0, page: 7, width: 4, pages: 2 };
        assert_eq!(
            display.draw_image(&[0; 8], off_bottom),
            Err(DisplayError::InvalidCoordinates)
        );

        let short = ImageRegion { x: 0, page: 0, width: 4, pages: 2 };
        assert_eq!(display.draw_image(&[0; 7], short), Err(DisplayError::BufferOverflow));
    }

    #[test]
    fn test_text_stays_on_its_page() {
        let mut display = display();
        display.draw_text(0, 1, "127").unwrap();

        let lit = |page: usize| display.buffer()[page].iter().any(|&b| b != 0);
        assert!(!lit(0));
        assert!(lit(1));
        assert!(!lit(2));
        // Three 5-pixel glyphs, nothing further right
        assert!(display.buffer()[1][15..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_text_bounds() {
        let mut display = display();
        assert_eq!(
            display.draw_text(0, PAGES as u8, "x"),
            Err(DisplayError::InvalidCoordinates)
        );
        // Long text clips at the right edge
        display.draw_text(120, 0, "clipped").unwrap();
    }

    #[test]
    fn test_clear() {
        let mut display = display();
        display.draw_text(0, 0, "8").unwrap();
        // DrawTarget also has a clear(color)
        DrawSurface::clear(&mut display).unwrap();
        assert!(display.buffer().iter().flatten().all(|&b| b == 0));
    }
}
