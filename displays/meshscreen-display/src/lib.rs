//! Rendering surfaces for meshscreen
//!
//! - [`PageBuffer`]: 128x64 1bpp frame buffer with `embedded-graphics`
//!   text rendering. Usable on its own as a surface without hardware.
//! - [`I2cPanel`]: SSD1306 / SH1106 / ST7567 panel on a blocking
//!   `embedded-hal` I2C bus, model chosen at runtime from the config.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod framebuffer;
pub mod panel;

pub use framebuffer::{PageBuffer, HEIGHT, WIDTH};
pub use panel::I2cPanel;
