//! Board-agnostic display controller for mesh-radio nodes
//!
//! This crate contains the display logic that does not depend on a
//! specific panel or board:
//!
//! - Command model and the bounded producer queue (`ScreenHandle`)
//! - The single-owner dispatcher that drives the panel (`Screen`)
//! - Display state machine and frame sets
//! - Lock-protected debug snapshot shown on the status frames
//! - Status subscription bridge for power/GPS/node/message events
//! - UTF-8 to font-table remapper
//! - Rendering surface trait and configuration types
//!
//! # Concurrency
//!
//! Any context (interrupt handlers, protocol tasks, power management) may
//! hold a `&ScreenHandle` and enqueue commands; enqueueing never blocks.
//! Exactly one context owns the `Screen` and calls [`Screen::tick`], which
//! is the only code path that touches the rendering surface.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod debug;
pub mod remap;
#[cfg(feature = "embassy-time")]
pub mod runner;
pub mod screen;
pub mod state;
pub mod status;
pub mod traits;

pub use command::{Command, QueueFull};
pub use debug::{DebugInfo, DebugSnapshot, Metric};
pub use remap::FontRemapper;
pub use screen::{Screen, ScreenHandle};
pub use traits::{DisplayError, DisplaySurface};
