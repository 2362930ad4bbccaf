//! Display state machine and frame sets
//!
//! Owned by the dispatcher. Nothing outside the owning context reads or
//! writes this state.

pub mod frames;
pub mod machine;

pub use frames::{Frame, FrameSet, FrameSetKind, NormalLayout, MAX_FRAMES};
pub use machine::{DisplayState, Effect, DEFAULT_BRIGHTNESS, MAX_BRIGHTNESS};
