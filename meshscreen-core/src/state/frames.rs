//! Frames and frame sets
//!
//! A frame set is what the dispatcher cycles through. The normal set is a
//! rotation built from the current layout; every special set holds one
//! static frame.

use heapless::Vec;

use crate::debug::DebugFrame;

/// Most frames in one set
pub const MAX_FRAMES: usize = 8;

/// A single drawable frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Splash shown after power-up
    Boot,
    /// Pairing PIN
    BluetoothPin(u32),
    /// Firmware update in progress
    FirmwareUpdate,
    /// Orderly shutdown
    Shutdown,
    /// Certificate generation during boot
    SslCert,
    /// Last frame before deep sleep
    Sleep,
    /// Drawn from the debug snapshot
    Debug(DebugFrame),
}

/// Which set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameSetKind {
    Boot,
    Normal,
    BluetoothPin,
    FirmwareUpdate,
    Shutdown,
    SslCert,
}

/// What the normal rotation contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NormalLayout {
    /// A text message has been received
    pub has_message: bool,
    /// Wi-Fi is configured
    pub wifi: bool,
}

/// An ordered set of frames with a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSet {
    kind: FrameSetKind,
    frames: Vec<Frame, MAX_FRAMES>,
    current: usize,
}

impl FrameSet {
    /// A set holding one static frame
    pub fn single(kind: FrameSetKind, frame: Frame) -> Self {
        let mut frames = Vec::new();
        // Capacity is at least one
        let _ = frames.push(frame);
        Self {
            kind,
            frames,
            current: 0,
        }
    }

    /// The boot splash
    pub fn boot() -> Self {
        Self::single(FrameSetKind::Boot, Frame::Boot)
    }

    /// The normal rotation for `layout`
    pub fn normal(layout: &NormalLayout) -> Self {
        let mut frames: Vec<Frame, MAX_FRAMES> = Vec::new();
        let mut push = |frame| {
            let _ = frames.push(frame);
        };
        if layout.has_message {
            push(Frame::Debug(DebugFrame::TextMessage));
        }
        push(Frame::Debug(DebugFrame::Status));
        push(Frame::Debug(DebugFrame::Settings));
        if layout.wifi {
            push(Frame::Debug(DebugFrame::WiFi));
        }
        Self {
            kind: FrameSetKind::Normal,
            frames,
            current: 0,
        }
    }

    pub fn kind(&self) -> FrameSetKind {
        self.kind
    }

    pub fn is_normal(&self) -> bool {
        self.kind == FrameSetKind::Normal
    }

    /// Number of frames in the set
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the current frame
    pub fn index(&self) -> usize {
        self.current
    }

    /// The frame under the cursor
    pub fn current(&self) -> Frame {
        self.frames
            .get(self.current)
            .copied()
            .unwrap_or(Frame::Debug(DebugFrame::Status))
    }

    /// Move to the next frame, wrapping around, and return it
    pub fn advance(&mut self) -> Frame {
        if !self.frames.is_empty() {
            self.current = (self.current + 1) % self.frames.len();
        }
        self.current()
    }

    /// Replace the frames with a fresh normal rotation
    ///
    /// Stays on the same frame when it still exists, otherwise keeps the
    /// cursor position clamped to the new length.
    pub fn rebuild(&mut self, layout: &NormalLayout) {
        let previous = self.current();
        let mut rebuilt = Self::normal(layout);
        rebuilt.current = match rebuilt.frames.iter().position(|&f| f == previous) {
            Some(index) => index,
            None => self.current.min(rebuilt.frames.len().saturating_sub(1)),
        };
        *self = rebuilt;
    }
}
