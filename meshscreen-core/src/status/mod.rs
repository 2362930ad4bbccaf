//! Status subscription bridge
//!
//! Adapts notifications from the power, GPS, node database, messaging and
//! UI subsystems into debug snapshot updates and queued display commands.
//! Subscriptions are registered explicitly at startup; each category holds
//! at most one typed handler.

pub mod bridge;
pub mod events;

pub use bridge::{
    Handler, StatusBridge, Subscription, STATUS_DROPPED, STATUS_HANDLED, STATUS_NOT_SUBSCRIBED,
};
pub use events::{Category, NodeStatus, PositionStatus, PowerStatus, TextPacket, UiFrameEvent};
