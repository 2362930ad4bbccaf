//! UTF-8 to font-table remapper
//!
//! The panel fonts only have single-byte glyph indices laid out like
//! Latin-1. Two-byte UTF-8 sequences starting with 0xC2 or 0xC3 map onto
//! that table; anything else collapses into one replacement glyph per run
//! of unconvertible bytes.
//!
//! The remapper is fed one byte at a time and keeps state across calls
//! for one logical string. A zero output means "no glyph for this byte".

/// Glyph shown for characters the font table cannot represent (¿)
pub const REPLACEMENT_GLYPH: u8 = 0xBF;

/// Lead byte of two-byte sequences for U+0080..U+00BF
const LEAD_C2: u8 = 0xC2;

/// Lead byte of two-byte sequences for U+00C0..U+00FF
const LEAD_C3: u8 = 0xC3;

/// Stateful byte-stream converter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FontRemapper {
    /// Previous non-ASCII byte (0 after an ASCII byte)
    last_lead: u8,
    /// A replacement glyph was already emitted for the current run
    skip_rest: bool,
}

impl FontRemapper {
    /// Create a remapper in its initial state
    pub const fn new() -> Self {
        Self {
            last_lead: 0,
            skip_rest: false,
        }
    }

    /// Forget any pending sequence
    pub fn reset(&mut self) {
        self.last_lead = 0;
        self.skip_rest = false;
    }

    /// Convert one input byte, returning the glyph index or 0
    pub fn convert(&mut self, byte: u8) -> u8 {
        if byte < 0x80 {
            self.reset();
            return byte;
        }

        let last = self.last_lead;
        self.last_lead = byte;

        match last {
            LEAD_C2 => {
                self.skip_rest = false;
                return byte;
            }
            LEAD_C3 => {
                self.skip_rest = false;
                return byte | 0xC0;
            }
            _ => {}
        }

        if byte == LEAD_C2 || byte == LEAD_C3 {
            self.skip_rest = false;
            return 0;
        }

        if self.skip_rest {
            return 0;
        }
        self.skip_rest = true;
        REPLACEMENT_GLYPH
    }

    /// Convert `input` into `out`, dropping zero outputs
    ///
    /// Returns the number of glyphs written. Input that does not fit in
    /// `out` is still consumed so the state stays consistent.
    pub fn convert_into(&mut self, input: &[u8], out: &mut [u8]) -> usize {
        let mut len = 0;
        for &byte in input {
            let glyph = self.convert(byte);
            if glyph != 0 && len < out.len() {
                out[len] = glyph;
                len += 1;
            }
        }
        len
    }

    /// Convert a whole string from a fresh state
    pub fn convert_str<const N: usize>(text: &str) -> heapless::Vec<u8, N> {
        let mut remapper = Self::new();
        let mut glyphs = heapless::Vec::new();
        for &byte in text.as_bytes() {
            let glyph = remapper.convert(byte);
            if glyph != 0 && glyphs.push(glyph).is_err() {
                break;
            }
        }
        glyphs
    }
}
