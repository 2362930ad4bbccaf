//! Configuration types
//!
//! Board-agnostic display configuration, stored as postcard binary data
//! (feature `serde`) or parsed from a text config.

pub mod toml;
pub mod types;

pub use self::toml::parse_display_config;
pub use types::*;

/// Largest serialized config
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Key not known in this section
    UnknownKey,
    /// Config version mismatch
    VersionMismatch,
}

/// Serialize a config into `buffer`, returning the used prefix
#[cfg(feature = "serde")]
pub fn to_bytes<'b>(
    config: &DisplayConfig,
    buffer: &'b mut [u8],
) -> Result<&'b mut [u8], ConfigError> {
    postcard::to_slice(config, buffer).map_err(|_| ConfigError::Serialize)
}

/// Deserialize a config stored by [`to_bytes`]
#[cfg(feature = "serde")]
pub fn from_bytes(bytes: &[u8]) -> Result<DisplayConfig, ConfigError> {
    let config: DisplayConfig =
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;

    if config.version != CONFIG_VERSION {
        warn!(
            "Display config version mismatch: found {}, expected {}",
            config.version,
            CONFIG_VERSION
        );
        return Err(ConfigError::VersionMismatch);
    }

    Ok(config)
}
