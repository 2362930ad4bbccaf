//! Status notifications delivered by other subsystems

use heapless::String;

use crate::debug::MAX_MESSAGE_LEN;

/// Battery and supply report from power management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerStatus {
    pub has_battery: bool,
    pub battery_percent: u8,
    pub battery_mv: u16,
    pub charging: bool,
    pub usb_power: bool,
}

/// Position report from the GPS task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionStatus {
    pub connected: bool,
    pub has_lock: bool,
    pub satellites: u8,
    pub latitude_e7: i32,
    pub longitude_e7: i32,
    pub altitude_m: i32,
}

/// Node database counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeStatus {
    pub online: u16,
    pub total: u16,
}

/// Incoming text message
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextPacket {
    /// Sender node number
    pub from: u32,
    pub text: String<MAX_MESSAGE_LEN>,
}

impl TextPacket {
    /// Build a packet, truncating `text` at a character boundary
    pub fn new(from: u32, text: &str) -> Self {
        let mut body = String::new();
        for ch in text.chars() {
            if body.push(ch).is_err() {
                break;
            }
        }
        Self { from, text: body }
    }
}

/// Request from a UI module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiFrameEvent {
    /// The set of frames changed and has to be rebuilt
    pub frame_changed: bool,
    /// Only a repaint is needed
    pub need_redraw: bool,
}

/// Notification categories the bridge can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Category {
    Power,
    Gps,
    Node,
    Text,
    UiFrame,
}
