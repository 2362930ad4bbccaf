//! Debug information store
//!
//! Battery, GPS, node and link metrics are written by any subsystem at any
//! time and read only by the render pass. All state sits behind a single
//! blocking mutex; readers always copy a complete snapshot out before
//! drawing, so the lock is never held while talking to the panel.

mod frames;
pub mod snapshot;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::String;

use crate::traits::{DisplayError, DisplaySurface};

pub use snapshot::{
    BatteryStatus, DebugSnapshot, GpsStatus, NodeCounts, TextMessage, WifiStatus,
    MAX_CHANNEL_LEN, MAX_MESSAGE_LEN,
};

/// A metric update applied in one critical section
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Metric {
    Battery(BatteryStatus),
    Nodes(NodeCounts),
    Gps(GpsStatus),
    Wifi(WifiStatus),
    Channel(String<MAX_CHANNEL_LEN>),
    Uptime(u32),
    TextMessage(TextMessage),
}

/// Frames drawn from the debug snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebugFrame {
    /// Battery, nodes, GPS and uptime
    Status,
    /// Channel and position
    Settings,
    /// Wi-Fi link
    WiFi,
    /// Last received text message
    TextMessage,
}

/// Lock-protected debug metrics
pub struct DebugInfo<M: RawMutex> {
    state: Mutex<M, RefCell<DebugSnapshot>>,
}

impl<M: RawMutex> Default for DebugInfo<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> DebugInfo<M> {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(DebugSnapshot::new())),
        }
    }

    /// Apply one metric update
    pub fn set(&self, metric: Metric) {
        self.update(|snapshot| match metric {
            Metric::Battery(battery) => snapshot.battery = battery,
            Metric::Nodes(nodes) => snapshot.nodes = nodes,
            Metric::Gps(gps) => snapshot.gps = gps,
            Metric::Wifi(wifi) => snapshot.wifi = wifi,
            Metric::Channel(channel) => snapshot.channel = channel,
            Metric::Uptime(uptime_s) => snapshot.uptime_s = uptime_s,
            Metric::TextMessage(message) => snapshot.last_message = Some(message),
        });
    }

    /// Apply an arbitrary multi-field update atomically
    ///
    /// `f` runs with the lock held; keep it short and never draw from it.
    pub fn update<R>(&self, f: impl FnOnce(&mut DebugSnapshot) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Read a field (or a few) without copying the whole snapshot
    pub fn read<R>(&self, f: impl FnOnce(&DebugSnapshot) -> R) -> R {
        self.state.lock(|cell| f(&cell.borrow()))
    }

    /// Copy out the current snapshot
    pub fn snapshot(&self) -> DebugSnapshot {
        self.read(|snapshot| snapshot.clone())
    }

    /// Draw a debug frame with its top-left corner at (`x`, `y`)
    ///
    /// The snapshot is copied under the lock and drawn after releasing it.
    pub fn render_into<D: DisplaySurface>(
        &self,
        surface: &mut D,
        frame: DebugFrame,
        x: i16,
        y: i16,
    ) -> Result<(), DisplayError> {
        let snapshot = self.snapshot();
        frames::draw(&snapshot, surface, frame, x, y)
    }
}
