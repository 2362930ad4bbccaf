//! Hardware abstraction traits
//!
//! These traits define the interface between the display controller
//! and panel-specific implementations.

pub mod display;

pub use display::{DisplayError, DisplaySurface};
