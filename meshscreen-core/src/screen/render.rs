//! Frame rendering helpers
//!
//! Text is laid out in glyph rows. Every string goes through a fresh
//! [`FontRemapper`] before it reaches the surface.

use core::fmt::{self, Write};

use heapless::String;

use crate::remap::FontRemapper;
use crate::state::Frame;
use crate::traits::{DisplayError, DisplaySurface};

/// Longest line handled by the painter, in glyphs
pub const MAX_LINE_GLYPHS: usize = 64;

/// Longest wrapped paragraph, in glyphs
const MAX_PARAGRAPH_GLYPHS: usize = 160;

/// Row-oriented text writer over a surface
pub(crate) struct Painter<'s, D: DisplaySurface> {
    surface: &'s mut D,
    x: i16,
    y: i16,
    line_height: i16,
    cols: usize,
}

impl<'s, D: DisplaySurface> Painter<'s, D> {
    /// Start painting at (`x`, `y`)
    pub fn new(surface: &'s mut D, x: i16, y: i16) -> Self {
        let (width, _) = surface.dimensions();
        let (glyph_w, glyph_h) = surface.glyph_size();
        let glyph_w = glyph_w.max(1) as u16;
        let usable = width.saturating_sub(x.max(0) as u16);
        Self {
            surface,
            x,
            y,
            line_height: glyph_h as i16,
            cols: ((usable / glyph_w) as usize).min(MAX_LINE_GLYPHS),
        }
    }

    /// Draw one line of text and move to the next row
    pub fn line(&mut self, text: &str) -> Result<(), DisplayError> {
        let mut glyphs = [0u8; MAX_LINE_GLYPHS];
        let len = FontRemapper::new().convert_into(text.as_bytes(), &mut glyphs);
        self.glyph_line(&glyphs[..len])
    }

    /// Draw one formatted line
    pub fn line_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), DisplayError> {
        let mut text: String<MAX_LINE_GLYPHS> = String::new();
        // Overflow just truncates the line
        let _ = text.write_fmt(args);
        self.line(&text)
    }

    /// Draw `text` wrapped over at most `max_lines` rows
    pub fn paragraph(&mut self, text: &str, max_lines: usize) -> Result<(), DisplayError> {
        let mut glyphs = [0u8; MAX_PARAGRAPH_GLYPHS];
        let len = FontRemapper::new().convert_into(text.as_bytes(), &mut glyphs);
        if self.cols == 0 {
            return Ok(());
        }
        for chunk in glyphs[..len].chunks(self.cols).take(max_lines) {
            self.glyph_line(chunk)?;
        }
        Ok(())
    }

    /// Move down without drawing
    pub fn skip(&mut self) {
        self.y += self.line_height;
    }

    fn glyph_line(&mut self, glyphs: &[u8]) -> Result<(), DisplayError> {
        let len = glyphs.len().min(self.cols);
        if len > 0 {
            self.surface.draw_text(self.x, self.y, &glyphs[..len])?;
        }
        self.y += self.line_height;
        Ok(())
    }
}

/// Draw one of the static frames
///
/// Snapshot-backed frames are drawn by [`crate::debug::DebugInfo`].
pub(crate) fn draw_static_frame<D: DisplaySurface>(
    surface: &mut D,
    frame: Frame,
    x: i16,
    y: i16,
) -> Result<(), DisplayError> {
    let mut painter = Painter::new(surface, x, y);
    match frame {
        Frame::Boot => {
            painter.skip();
            painter.line("   Mesh Node")?;
            painter.line_fmt(format_args!("     v{}", env!("CARGO_PKG_VERSION")))?;
        }
        Frame::BluetoothPin(pin) => {
            painter.line("Bluetooth")?;
            painter.line("Enter this code")?;
            painter.skip();
            painter.line_fmt(format_args!("    {:06}", pin % 1_000_000))?;
        }
        Frame::FirmwareUpdate => {
            painter.line("Updating")?;
            painter.skip();
            painter.paragraph("Please be patient and do not power off.", 3)?;
        }
        Frame::Shutdown => {
            painter.skip();
            painter.line("Shutting down...")?;
        }
        Frame::SslCert => {
            painter.line("Creating SSL")?;
            painter.line("certificate")?;
            painter.skip();
            painter.line("Please wait . . .")?;
        }
        Frame::Sleep => {
            painter.skip();
            painter.line("Sleeping...")?;
        }
        Frame::Debug(_) => {}
    }
    Ok(())
}

/// Draw overlay lines (oldest first) on the bottom rows of the surface
pub(crate) fn draw_overlay<'t, D: DisplaySurface>(
    surface: &mut D,
    lines: impl ExactSizeIterator<Item = &'t str>,
) -> Result<(), DisplayError> {
    let (_, height) = surface.dimensions();
    let (_, glyph_h) = surface.glyph_size();
    let count = lines.len() as i16;
    let top = height as i16 - count * glyph_h as i16;
    let mut painter = Painter::new(surface, 0, top.max(0));
    for line in lines {
        painter.line(line)?;
    }
    Ok(())
}
