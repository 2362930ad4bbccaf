//! Recording surface for host tests

use std::vec::Vec;

use crate::traits::{DisplayError, DisplaySurface};

/// One call made on the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init,
    Clear,
    Fill,
    Text(i16, i16, Vec<u8>),
    Display,
    ForceDisplay,
    Power(bool),
    Brightness(u8),
}

/// 128x64 surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    /// Fail every call with this error
    pub fail_with: Option<DisplayError>,
    pub persistent: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glyph bytes of every text call, in order
    pub fn texts(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(_, _, glyphs) => Some(glyphs.clone()),
                _ => None,
            })
            .collect()
    }

    /// Count calls matching `call`
    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn record(&mut self, call: Call) -> Result<(), DisplayError> {
        self.calls.push(call);
        match self.fail_with {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl DisplaySurface for RecordingSurface {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.record(Call::Init)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.record(Call::Clear)
    }

    fn fill(&mut self) -> Result<(), DisplayError> {
        self.record(Call::Fill)
    }

    fn draw_text(&mut self, x: i16, y: i16, glyphs: &[u8]) -> Result<(), DisplayError> {
        self.record(Call::Text(x, y, glyphs.to_vec()))
    }

    fn display(&mut self) -> Result<(), DisplayError> {
        self.record(Call::Display)
    }

    fn force_display(&mut self) -> Result<(), DisplayError> {
        self.record(Call::ForceDisplay)
    }

    fn set_power(&mut self, on: bool) -> Result<(), DisplayError> {
        self.record(Call::Power(on))
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError> {
        self.record(Call::Brightness(level))
    }

    fn dimensions(&self) -> (u16, u16) {
        (128, 64)
    }

    fn is_persistent(&self) -> bool {
        self.persistent
    }
}
