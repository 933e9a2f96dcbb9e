//! Scrolling bar-graph renderer
//!
//! Each average becomes one 16-pixel-tall column spanning two display
//! pages. Columns scroll right-to-left: the newest bar sits at the right
//! edge of the graph and the oldest drops off the left.

use core::fmt::Write;

use heapless::String;
use trendline_hal::{DisplayError, DrawSurface, ImageRegion};

use crate::config::GraphConfig;
use crate::filter::{FilteredSample, WindowSize};
use crate::AverageSample;

/// Width of the graph in pixel columns
pub const TREND_COLUMNS: usize = 64;

/// Height of the graph in display pages
pub const TREND_PAGES: u8 = 2;

/// Height of the graph in pixel rows
pub const TREND_ROWS: u8 = TREND_PAGES * 8;

/// Highest quantized bar level
pub const MAX_LEVEL: u8 = 15;

/// Quantize an average into a bar level `0..=MAX_LEVEL`
///
/// Averages above 255 saturate at the top level.
pub fn level_for(average: AverageSample) -> u8 {
    (average / 8).min(MAX_LEVEL as AverageSample) as u8
}

/// Fill the bottom `rows` pixel rows of an 8-row page
///
/// Page bytes have the top row in bit 0, so a bar growing upwards sets the
/// high bits first.
const fn page_fill(rows: u8) -> u8 {
    (0xFF00u16 >> rows) as u8
}

/// One encoded column of the bar graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarColumn {
    /// Top page (pixel rows 0-7)
    pub upper: u8,
    /// Bottom page (pixel rows 8-15)
    pub lower: u8,
}

impl BarColumn {
    pub const EMPTY: Self = Self { upper: 0, lower: 0 };

    /// Encode a bar level
    ///
    /// Level 0 is an empty column and [`MAX_LEVEL`] a completely filled one;
    /// the bar height is `level * 16 / 15` rows, so every level is at least
    /// as tall as the one below it.
    pub const fn from_level(level: u8) -> Self {
        let level = if level > MAX_LEVEL { MAX_LEVEL } else { level };
        let rows = level * TREND_ROWS / MAX_LEVEL;

        if rows <= 8 {
            Self {
                upper: 0,
                lower: page_fill(rows),
            }
        } else {
            Self {
                upper: page_fill(rows - 8),
                lower: 0xFF,
            }
        }
    }

    /// Encode an average value
    pub fn from_average(average: AverageSample) -> Self {
        Self::from_level(level_for(average))
    }

    /// Number of lit pixels
    pub const fn filled_rows(&self) -> u32 {
        self.upper.count_ones() + self.lower.count_ones()
    }
}

/// Fixed-width scrolling history of bar columns
///
/// Stored page-major so the buffer can be handed to the display as one
/// image: the first `W` bytes are the top page, the next `W` the bottom.
#[derive(Debug, Clone)]
pub struct ColumnBuffer<const W: usize> {
    pages: [[u8; W]; 2],
}

impl<const W: usize> ColumnBuffer<W> {
    pub const fn new() -> Self {
        Self { pages: [[0; W]; 2] }
    }

    /// Scroll every column one place towards the oldest end and append
    /// `column` at the head
    pub fn push(&mut self, column: BarColumn) {
        if W == 0 {
            return;
        }
        for page in &mut self.pages {
            page.copy_within(1.., 0);
        }
        self.pages[0][W - 1] = column.upper;
        self.pages[1][W - 1] = column.lower;
    }

    /// Column at `index`, 0 being the oldest
    pub fn column(&self, index: usize) -> Option<BarColumn> {
        if index >= W {
            return None;
        }
        Some(BarColumn {
            upper: self.pages[0][index],
            lower: self.pages[1][index],
        })
    }

    /// Columns from oldest to newest
    pub fn columns(&self) -> impl Iterator<Item = BarColumn> + '_ {
        self.pages[0]
            .iter()
            .zip(self.pages[1].iter())
            .map(|(&upper, &lower)| BarColumn { upper, lower })
    }

    /// Page-major image bytes
    pub fn as_image(&self) -> &[u8] {
        self.pages.as_flattened()
    }

    /// Number of columns
    pub const fn width(&self) -> usize {
        W
    }
}

impl<const W: usize> Default for ColumnBuffer<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders filtered samples as a scrolling bar graph with readouts
#[derive(Debug, Clone)]
pub struct TrendRenderer {
    columns: ColumnBuffer<TREND_COLUMNS>,
    layout: GraphConfig,
}

impl TrendRenderer {
    pub const fn new(layout: GraphConfig) -> Self {
        Self {
            columns: ColumnBuffer::new(),
            layout,
        }
    }

    /// Scrolling column history
    pub fn columns(&self) -> &ColumnBuffer<TREND_COLUMNS> {
        &self.columns
    }

    /// Region of the display covered by the bar graph
    pub fn region(&self) -> ImageRegion {
        ImageRegion {
            x: self.layout.x,
            page: self.layout.image_page,
            width: TREND_COLUMNS as u8,
            pages: TREND_PAGES,
        }
    }

    /// Add a sample to the graph and redraw the whole screen
    pub fn render<D: DrawSurface>(
        &mut self,
        sample: FilteredSample,
        surface: &mut D,
    ) -> Result<(), DisplayError> {
        self.columns.push(BarColumn::from_average(sample.average));
        self.refresh(sample.average, sample.window, surface)
    }

    /// Redraw readouts and graph without adding a column
    pub fn refresh<D: DrawSurface>(
        &self,
        average: AverageSample,
        window: WindowSize,
        surface: &mut D,
    ) -> Result<(), DisplayError> {
        let mut text: String<8> = String::new();

        surface.clear()?;

        write!(text, "{}", average).map_err(|_| DisplayError::BufferOverflow)?;
        surface.draw_text(self.layout.text_x, self.layout.average_page, &text)?;

        text.clear();
        write!(text, "{}", window.get()).map_err(|_| DisplayError::BufferOverflow)?;
        surface.draw_text(self.layout.text_x, self.layout.window_page, &text)?;

        surface.draw_image(self.columns.as_image(), self.region())
    }
}

impl Default for TrendRenderer {
    fn default() -> Self {
        Self::new(GraphConfig::DEFAULT)
    }
}

/// Draw the start-up banner
pub fn draw_banner<D: DrawSurface>(surface: &mut D) -> Result<(), DisplayError> {
    surface.clear()?;
    surface.draw_text(0, 0, "trendline")?;
    surface.draw_text(16, 1, "send 0-9 for N")
}
