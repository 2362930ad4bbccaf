//! Simple TOML parser for the display section
//!
//! Handles only the subset needed for display configuration. It does NOT
//! support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, hex integer, boolean)
//! - [section] headers; only `[display]` is read, other sections are skipped
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys

use super::types::{DisplayConfig, PanelModel};
use super::ConfigError;

/// Parse the `[display]` section of a text config
///
/// Keys missing from the input keep their defaults.
pub fn parse_display_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();
    let mut in_display = false;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_display = line[1..line.len() - 1].trim() == "display";
            continue;
        }

        if !in_display {
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&mut config, key, value)?;
        }
    }

    debug!(
        "Display config: brightness {}, boot {} ms",
        config.brightness,
        config.boot_screen_ms
    );
    Ok(config)
}

fn apply_value(config: &mut DisplayConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "panel" => {
            config.panel =
                PanelModel::from_name(parse_string(value)).ok_or(ConfigError::InvalidValue)?;
        }
        "i2c_address" => {
            let address: u8 = parse_int(value)?;
            if address > 0x7F {
                return Err(ConfigError::InvalidValue);
            }
            config.i2c_address = address;
        }
        "flip_vertically" => config.flip_vertically = parse_bool(value)?,
        "brightness" => config.brightness = parse_int(value)?,
        "boot_screen_ms" => config.boot_screen_ms = parse_int(value)?,
        "auto_carousel_secs" => config.auto_carousel_secs = parse_int(value)?,
        "wifi_enabled" => config.wifi_enabled = parse_bool(value)?,
        _ => {
            warn!("Unknown display config key");
            return Err(ConfigError::UnknownKey);
        }
    }
    Ok(())
}

/// Split `key = value`, dropping inline comments outside strings
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse a decimal or `0x` hex integer
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ConfigError> {
    let raw = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    }
    .map_err(|_| ConfigError::InvalidValue)?;

    T::try_from(raw).map_err(|_| ConfigError::InvalidValue)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}
