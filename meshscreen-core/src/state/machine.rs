//! Display state machine
//!
//! Every queued command is applied here. The result is an [`Effect`] that
//! tells the dispatcher what to do with the surface; this module never
//! touches the surface itself.

use super::frames::{Frame, FrameSet, FrameSetKind, NormalLayout};
use crate::command::{Command, PrintText};

/// Brightness after power-up
pub const DEFAULT_BRIGHTNESS: u8 = 150;

/// Highest brightness step
pub const MAX_BRIGHTNESS: u8 = 254;

/// Brightness increment per adjust command
const BRIGHTNESS_STEP: u8 = 62;

/// What the dispatcher has to do after applying a command
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Nothing changed
    None,
    /// Panel has to be switched on
    PowerOn,
    /// Panel has to be switched off
    PowerOff,
    /// A different frame set is now active
    FramesChanged,
    /// The rotation moved to another frame
    FrameAdvanced,
    /// Overlay text on the current frame
    Print(PrintText),
    /// Panel brightness changed
    Brightness(u8),
}

/// State owned by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Panel is powered
    pub powered_on: bool,
    /// The normal rotation is showing (no special screen)
    pub showing_normal_frame: bool,
    /// Current brightness
    pub brightness: u8,
    /// Active frame set
    pub frames: FrameSet,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new(DEFAULT_BRIGHTNESS)
    }
}

impl DisplayState {
    /// Initial state: powered off, on the boot splash
    pub fn new(brightness: u8) -> Self {
        Self {
            powered_on: false,
            showing_normal_frame: false,
            brightness,
            frames: FrameSet::boot(),
        }
    }

    /// Check if a special (static) screen is showing
    pub fn showing_special(&self) -> bool {
        !self.showing_normal_frame
    }

    /// Next brightness level in the adjust cycle
    pub fn next_brightness(level: u8) -> u8 {
        if level >= MAX_BRIGHTNESS {
            0
        } else {
            level.saturating_add(BRIGHTNESS_STEP).min(MAX_BRIGHTNESS)
        }
    }

    /// Apply one command
    ///
    /// `layout` describes the normal rotation if this command builds it.
    pub fn apply(&mut self, cmd: Command, layout: &NormalLayout) -> Effect {
        match cmd {
            Command::SetOn => {
                if self.powered_on {
                    Effect::None
                } else {
                    self.powered_on = true;
                    Effect::PowerOn
                }
            }
            Command::SetOff => self.power_off(),
            Command::OnPress => {
                if self.showing_normal_frame && self.frames.len() > 1 {
                    self.frames.advance();
                    Effect::FrameAdvanced
                } else {
                    Effect::None
                }
            }
            Command::Print(text) => {
                if self.showing_normal_frame {
                    Effect::Print(text)
                } else {
                    Effect::None
                }
            }
            Command::StartBluetoothPinScreen(pin) => {
                self.show_special(FrameSetKind::BluetoothPin, Frame::BluetoothPin(pin))
            }
            Command::StartFirmwareUpdateScreen => {
                self.show_special(FrameSetKind::FirmwareUpdate, Frame::FirmwareUpdate)
            }
            Command::StartShutdownScreen => {
                self.show_special(FrameSetKind::Shutdown, Frame::Shutdown)
            }
            Command::ShowSslScreen => self.show_special(FrameSetKind::SslCert, Frame::SslCert),
            Command::StopBluetoothPinScreen => {
                if self.frames.kind() == FrameSetKind::BluetoothPin {
                    self.show_normal(layout)
                } else {
                    Effect::None
                }
            }
            Command::StopBootScreen => {
                if matches!(self.frames.kind(), FrameSetKind::Boot | FrameSetKind::SslCert) {
                    self.show_normal(layout)
                } else {
                    Effect::None
                }
            }
            Command::AdjustBrightness => {
                self.brightness = Self::next_brightness(self.brightness);
                Effect::Brightness(self.brightness)
            }
            Command::RebuildFrames => {
                if self.showing_normal_frame {
                    self.frames.rebuild(layout);
                    Effect::FramesChanged
                } else {
                    Effect::None
                }
            }
        }
    }

    /// Switch off; also used by the urgent power-off path
    pub fn power_off(&mut self) -> Effect {
        if self.powered_on {
            self.powered_on = false;
            Effect::PowerOff
        } else {
            Effect::None
        }
    }

    fn show_special(&mut self, kind: FrameSetKind, frame: Frame) -> Effect {
        self.showing_normal_frame = false;
        self.frames = FrameSet::single(kind, frame);
        Effect::FramesChanged
    }

    fn show_normal(&mut self, layout: &NormalLayout) -> Effect {
        self.showing_normal_frame = true;
        self.frames = FrameSet::normal(layout);
        Effect::FramesChanged
    }
}
