//! Display commands
//!
//! Every state-changing request from a producer becomes one [`Command`].
//! Commands are move-only: a payload is owned by exactly one place at a
//! time (the producer, the queue, or the dispatcher) and is dropped once.

use heapless::String;

/// Maximum bytes of text carried by a single print command
pub const MAX_PRINT_LEN: usize = 64;

/// Owned text payload of [`Command::Print`]
pub type PrintText = String<MAX_PRINT_LEN>;

/// Commands applied by the display dispatcher
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Power the panel on and resume ticking
    SetOn,
    /// Power the panel off
    SetOff,
    /// User button press: advance to the next frame
    OnPress,
    /// Overlay text on the current frame
    Print(PrintText),
    /// Show the Bluetooth pairing screen with this PIN
    StartBluetoothPinScreen(u32),
    /// Show the firmware update screen
    StartFirmwareUpdateScreen,
    /// Show the shutdown screen
    StartShutdownScreen,
    /// Leave the Bluetooth pairing screen
    StopBluetoothPinScreen,
    /// Leave the boot screen
    StopBootScreen,
    /// Step to the next brightness level
    AdjustBrightness,
    /// Show the SSL certificate generation screen
    ShowSslScreen,
    /// Regenerate the normal frame rotation (only while it is showing)
    RebuildFrames,
}

impl Command {
    /// Build a print command, truncating `text` at a character boundary
    pub fn print(text: &str) -> Self {
        let mut payload = PrintText::new();
        for ch in text.chars() {
            if payload.push(ch).is_err() {
                break;
            }
        }
        Command::Print(payload)
    }
}

/// Returned by a failed enqueue: the queue was full
///
/// Hands the rejected command (and its payload) back to the caller, who
/// may retry or simply drop it.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub Command);

impl QueueFull {
    /// Take back the rejected command
    pub fn into_inner(self) -> Command {
        self.0
    }
}
