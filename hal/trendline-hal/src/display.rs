//! Display surface trait
//!
//! Page-addressed monochrome displays (SH1106, SSD1306, OSRAM 96x16) are
//! organised as horizontal pages of 8 pixel rows. Each byte of an image
//! is one column of one page, least significant bit at the top.

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Image data shorter than the region it is drawn into
    BufferOverflow,
}

/// Rectangular image region in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImageRegion {
    /// Left pixel column
    pub x: u8,
    /// Top page
    pub page: u8,
    /// Width in pixel columns
    pub width: u8,
    /// Height in pages
    pub pages: u8,
}

impl ImageRegion {
    /// Number of image bytes the region covers
    pub const fn len(&self) -> usize {
        self.width as usize * self.pages as usize
    }

    /// Whether the region covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drawing operations used by the trend renderer
///
/// Implementations may draw directly to the panel or into a frame buffer
/// flushed separately.
pub trait DrawSurface {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at pixel column `x` of `page`
    fn draw_text(&mut self, x: u8, page: u8, text: &str) -> Result<(), DisplayError>;

    /// Copy a page-major image into `region`
    ///
    /// `image` holds `region.width` bytes for the first page, followed by
    /// the same for each subsequent page.
    fn draw_image(&mut self, image: &[u8], region: ImageRegion) -> Result<(), DisplayError>;
}
