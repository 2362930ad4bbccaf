//! Rendering surface trait
//!
//! The dispatcher is the only caller of these methods. Text passed to
//! [`DisplaySurface::draw_text`] is already remapped to font-table indices
//! (one byte per glyph, see [`crate::remap`]).

/// Errors reported by a rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
}

/// Rendering surface driven by the display controller
///
/// Implementations own the frame buffer and the link to the panel.
pub trait DisplaySurface {
    /// Initialize the panel
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Clear the frame buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Set every pixel of the frame buffer
    fn fill(&mut self) -> Result<(), DisplayError>;

    /// Draw font-table glyphs with their top-left corner at (`x`, `y`) pixels
    ///
    /// Zero bytes carry no glyph and are skipped.
    fn draw_text(&mut self, x: i16, y: i16, glyphs: &[u8]) -> Result<(), DisplayError>;

    /// Send the frame buffer to the panel
    fn display(&mut self) -> Result<(), DisplayError>;

    /// Send the frame buffer with a full refresh, whatever the panel cadence
    ///
    /// Slow panels (e-ink) only update on this call for critical frames.
    fn force_display(&mut self) -> Result<(), DisplayError> {
        self.display()
    }

    /// Switch the panel on or off
    fn set_power(&mut self, on: bool) -> Result<(), DisplayError>;

    /// Set panel brightness (0-255)
    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError>;

    /// Pixel dimensions as (width, height)
    fn dimensions(&self) -> (u16, u16);

    /// Glyph cell size as (width, height) in pixels
    fn glyph_size(&self) -> (u8, u8) {
        (6, 10)
    }

    /// Whether the panel keeps its image without power (e-ink)
    fn is_persistent(&self) -> bool {
        false
    }
}
