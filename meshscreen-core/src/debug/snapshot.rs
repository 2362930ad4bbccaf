//! Debug snapshot types
//!
//! Plain-data view of the node status shown on the status frames.

use heapless::String;

/// Maximum channel name length
pub const MAX_CHANNEL_LEN: usize = 12;

/// Maximum stored text message length
pub const MAX_MESSAGE_LEN: usize = 96;

/// Battery and supply state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    /// A battery is connected
    pub has_battery: bool,
    /// Charge level in percent (0-100)
    pub percent: u8,
    /// Battery voltage in millivolts
    pub millivolts: u16,
    /// Battery is charging
    pub charging: bool,
    /// Running from USB power
    pub usb_power: bool,
}

/// Mesh node counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeCounts {
    /// Nodes heard recently
    pub online: u16,
    /// Nodes known in total
    pub total: u16,
}

/// GPS receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsStatus {
    /// A GPS module is present
    pub connected: bool,
    /// Position fix acquired
    pub has_lock: bool,
    /// Satellites in view
    pub satellites: u8,
    /// Latitude in 1e-7 degrees
    pub latitude_e7: i32,
    /// Longitude in 1e-7 degrees
    pub longitude_e7: i32,
    /// Altitude in meters
    pub altitude_m: i32,
}

/// Wi-Fi link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WifiStatus {
    /// Wi-Fi credentials are configured
    pub configured: bool,
    /// Associated with an access point
    pub connected: bool,
    /// IPv4 address (valid when connected)
    pub ip: [u8; 4],
}

/// Last received text message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextMessage {
    /// Sender node number
    pub from: u32,
    /// Message body (UTF-8, truncated to fit)
    pub text: String<MAX_MESSAGE_LEN>,
    /// Uptime in seconds when the message arrived
    pub received_s: u32,
}

impl TextMessage {
    /// Build a message, truncating `text` at a character boundary
    pub fn new(from: u32, text: &str, received_s: u32) -> Self {
        let mut body = String::new();
        for ch in text.chars() {
            if body.push(ch).is_err() {
                break;
            }
        }
        Self {
            from,
            text: body,
            received_s,
        }
    }
}

/// Point-in-time copy of every debug metric
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebugSnapshot {
    pub battery: BatteryStatus,
    pub nodes: NodeCounts,
    pub gps: GpsStatus,
    pub wifi: WifiStatus,
    /// Primary channel name
    pub channel: String<MAX_CHANNEL_LEN>,
    /// Seconds since boot
    pub uptime_s: u32,
    /// Last text message, if any
    pub last_message: Option<TextMessage>,
}

impl Default for DebugSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSnapshot {
    /// Create an empty snapshot
    pub const fn new() -> Self {
        Self {
            battery: BatteryStatus {
                has_battery: false,
                percent: 0,
                millivolts: 0,
                charging: false,
                usb_power: false,
            },
            nodes: NodeCounts { online: 0, total: 0 },
            gps: GpsStatus {
                connected: false,
                has_lock: false,
                satellites: 0,
                latitude_e7: 0,
                longitude_e7: 0,
                altitude_m: 0,
            },
            wifi: WifiStatus {
                configured: false,
                connected: false,
                ip: [0; 4],
            },
            channel: String::new(),
            uptime_s: 0,
            last_message: None,
        }
    }
}
