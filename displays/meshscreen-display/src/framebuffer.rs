//! Monochrome page framebuffer
//!
//! 128x64 pixels, one bit per pixel, laid out as eight horizontal pages of
//! 128 column bytes. This is the native memory layout of SSD1306, SH1106
//! and ST7567 controllers, so a page can be sent to the panel as-is.

use core::convert::Infallible;

use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use meshscreen_core::traits::{DisplayError, DisplaySurface};

/// Width in pixels
pub const WIDTH: usize = 128;

/// Height in pixels
pub const HEIGHT: usize = 64;

/// Number of 8-pixel pages
pub const PAGES: usize = HEIGHT / 8;

/// Glyph cell of the built-in font
pub const GLYPH_SIZE: (u8, u8) = (6, 10);

/// Most glyphs drawn by one text call
const MAX_GLYPHS: usize = WIDTH / GLYPH_SIZE.0 as usize + 1;

/// In-memory 1bpp frame buffer
#[derive(Clone, PartialEq, Eq)]
pub struct PageBuffer {
    pages: [[u8; WIDTH]; PAGES],
}

impl Default for PageBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PageBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageBuffer")
            .field("lit", &self.lit_pixels())
            .finish()
    }
}

impl PageBuffer {
    /// Create a blank buffer
    pub const fn new() -> Self {
        Self {
            pages: [[0; WIDTH]; PAGES],
        }
    }

    /// Raw bytes of one page
    pub fn page(&self, page: usize) -> &[u8; WIDTH] {
        &self.pages[page % PAGES]
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0);
        }
    }

    /// Turn every pixel on
    pub fn fill(&mut self) {
        for page in self.pages.iter_mut() {
            page.fill(0xFF);
        }
    }

    /// Read one pixel; out-of-range pixels read as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match Self::index(x, y) {
            Some((page, col, bit)) => self.pages[page][col] & bit != 0,
            None => false,
        }
    }

    /// Write one pixel; out-of-range pixels are clipped
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if let Some((page, col, bit)) = Self::index(x, y) {
            if on {
                self.pages[page][col] |= bit;
            } else {
                self.pages[page][col] &= !bit;
            }
        }
    }

    /// Number of lit pixels
    pub fn lit_pixels(&self) -> u32 {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|byte| byte.count_ones())
            .sum()
    }

    /// Draw font-table glyphs with their top-left corner at (`x`, `y`)
    ///
    /// Glyph bytes index the Latin-1 font directly; zero bytes are skipped.
    pub fn draw_glyphs(&mut self, x: i16, y: i16, glyphs: &[u8]) {
        let mut text: String<{ MAX_GLYPHS * 2 }> = String::new();
        for &glyph in glyphs.iter().filter(|&&g| g != 0).take(MAX_GLYPHS) {
            // Latin-1 bytes map one-to-one onto the first 256 code points
            if text.push(char::from(glyph)).is_err() {
                break;
            }
        }

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let origin = Point::new(i32::from(x), i32::from(y));
        // Drawing into memory cannot fail
        let _ = Text::with_baseline(&text, origin, style, Baseline::Top).draw(self);
    }

    fn index(x: i32, y: i32) -> Option<(usize, usize, u8)> {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y / 8, x, 1 << (y % 8)))
    }
}

impl OriginDimensions for PageBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for PageBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

/// A buffer alone is a surface with nothing behind it
///
/// Used on nodes without a panel and in host tests.
impl DisplaySurface for PageBuffer {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.clear();
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        PageBuffer::clear(self);
        Ok(())
    }

    fn fill(&mut self) -> Result<(), DisplayError> {
        PageBuffer::fill(self);
        Ok(())
    }

    fn draw_text(&mut self, x: i16, y: i16, glyphs: &[u8]) -> Result<(), DisplayError> {
        self.draw_glyphs(x, y, glyphs);
        Ok(())
    }

    fn display(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_power(&mut self, _on: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn set_brightness(&mut self, _level: u8) -> Result<(), DisplayError> {
        Ok(())
    }

    fn dimensions(&self) -> (u16, u16) {
        (WIDTH as u16, HEIGHT as u16)
    }

    fn glyph_size(&self) -> (u8, u8) {
        GLYPH_SIZE
    }
}
