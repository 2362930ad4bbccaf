//! Configuration type definitions
//!
//! Display settings chosen at startup. Stored as postcard-serialized binary
//! data or parsed from the `[display]` section of a text config.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::DEFAULT_BRIGHTNESS;

/// Current config layout version
pub const CONFIG_VERSION: u8 = 1;

/// Default I2C address of the panel controllers
pub const DEFAULT_I2C_ADDRESS: u8 = 0x3C;

/// Default boot splash duration
pub const DEFAULT_BOOT_SCREEN_MS: u32 = 5000;

/// Panel controller model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PanelModel {
    #[default]
    Ssd1306,
    Sh1106,
    St7567,
    /// No panel fitted: the controller runs in no-op mode
    None,
}

impl PanelModel {
    /// Parse a panel name as written in the text config
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ssd1306" => Some(PanelModel::Ssd1306),
            "sh1106" => Some(PanelModel::Sh1106),
            "st7567" => Some(PanelModel::St7567),
            "none" => Some(PanelModel::None),
            _ => None,
        }
    }

    /// Check if a physical panel is present
    pub fn is_present(&self) -> bool {
        *self != PanelModel::None
    }
}

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Layout version
    pub version: u8,
    /// Panel controller
    pub panel: PanelModel,
    /// 7-bit I2C address
    pub i2c_address: u8,
    /// Mount the panel upside down
    pub flip_vertically: bool,
    /// Brightness after power-up
    pub brightness: u8,
    /// How long the boot splash stays up
    pub boot_screen_ms: u32,
    /// Seconds between automatic frame advances (0 = off)
    pub auto_carousel_secs: u16,
    /// Show the Wi-Fi frame in the rotation
    pub wifi_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            panel: PanelModel::default(),
            i2c_address: DEFAULT_I2C_ADDRESS,
            flip_vertically: false,
            brightness: DEFAULT_BRIGHTNESS,
            boot_screen_ms: DEFAULT_BOOT_SCREEN_MS,
            auto_carousel_secs: 0,
            wifi_enabled: false,
        }
    }
}

impl DisplayConfig {
    /// Configuration for a node without a panel
    pub fn headless() -> Self {
        Self {
            panel: PanelModel::None,
            ..Self::default()
        }
    }
}
