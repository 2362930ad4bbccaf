//! Subscription table and default handlers

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::events::{Category, NodeStatus, PositionStatus, PowerStatus, TextPacket, UiFrameEvent};
use crate::command::QueueFull;
use crate::debug::{BatteryStatus, GpsStatus, NodeCounts, TextMessage};
use crate::screen::{ScreenHandle, DEFAULT_QUEUE_CAPACITY};

/// Notification handled
pub const STATUS_HANDLED: i32 = 0;

/// No handler registered for the category
pub const STATUS_NOT_SUBSCRIBED: i32 = -1;

/// Handled, but the resulting command did not fit in the queue
pub const STATUS_DROPPED: i32 = 1;

/// Typed handler for one category
pub type Handler<T, M, const N: usize> = fn(&ScreenHandle<M, N>, &T) -> i32;

/// One registration
pub enum Subscription<M: RawMutex, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    Power(Handler<PowerStatus, M, N>),
    Gps(Handler<PositionStatus, M, N>),
    Node(Handler<NodeStatus, M, N>),
    Text(Handler<TextPacket, M, N>),
    UiFrame(Handler<UiFrameEvent, M, N>),
}

impl<M: RawMutex, const N: usize> Subscription<M, N> {
    pub fn category(&self) -> Category {
        match self {
            Subscription::Power(_) => Category::Power,
            Subscription::Gps(_) => Category::Gps,
            Subscription::Node(_) => Category::Node,
            Subscription::Text(_) => Category::Text,
            Subscription::UiFrame(_) => Category::UiFrame,
        }
    }
}

/// Routes status notifications into the display controller
///
/// Notifications may arrive on any context. Handlers only touch the
/// debug snapshot and the producer side of the screen.
pub struct StatusBridge<'a, M: RawMutex, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    screen: &'a ScreenHandle<M, N>,
    power: Option<Handler<PowerStatus, M, N>>,
    gps: Option<Handler<PositionStatus, M, N>>,
    node: Option<Handler<NodeStatus, M, N>>,
    text: Option<Handler<TextPacket, M, N>>,
    ui_frame: Option<Handler<UiFrameEvent, M, N>>,
}

impl<'a, M: RawMutex, const N: usize> StatusBridge<'a, M, N> {
    /// Create a bridge with no subscriptions
    pub fn new(screen: &'a ScreenHandle<M, N>) -> Self {
        Self {
            screen,
            power: None,
            gps: None,
            node: None,
            text: None,
            ui_frame: None,
        }
    }

    /// Create a bridge with the stock handler for every category
    pub fn with_default_subscriptions(screen: &'a ScreenHandle<M, N>) -> Self {
        let mut bridge = Self::new(screen);
        bridge.subscribe(Subscription::Power(on_power_status));
        bridge.subscribe(Subscription::Gps(on_position_status));
        bridge.subscribe(Subscription::Node(on_node_status));
        bridge.subscribe(Subscription::Text(on_text_message));
        bridge.subscribe(Subscription::UiFrame(on_ui_frame_event));
        bridge
    }

    /// Register a handler, replacing any previous one for its category
    pub fn subscribe(&mut self, subscription: Subscription<M, N>) {
        debug!("Subscribed to {:?}", subscription.category());
        match subscription {
            Subscription::Power(h) => self.power = Some(h),
            Subscription::Gps(h) => self.gps = Some(h),
            Subscription::Node(h) => self.node = Some(h),
            Subscription::Text(h) => self.text = Some(h),
            Subscription::UiFrame(h) => self.ui_frame = Some(h),
        }
    }

    pub fn unsubscribe(&mut self, category: Category) {
        match category {
            Category::Power => self.power = None,
            Category::Gps => self.gps = None,
            Category::Node => self.node = None,
            Category::Text => self.text = None,
            Category::UiFrame => self.ui_frame = None,
        }
    }

    pub fn is_subscribed(&self, category: Category) -> bool {
        match category {
            Category::Power => self.power.is_some(),
            Category::Gps => self.gps.is_some(),
            Category::Node => self.node.is_some(),
            Category::Text => self.text.is_some(),
            Category::UiFrame => self.ui_frame.is_some(),
        }
    }

    pub fn notify_power(&self, status: &PowerStatus) -> i32 {
        self.power
            .map_or(STATUS_NOT_SUBSCRIBED, |h| h(self.screen, status))
    }

    pub fn notify_gps(&self, status: &PositionStatus) -> i32 {
        self.gps.map_or(STATUS_NOT_SUBSCRIBED, |h| h(self.screen, status))
    }

    pub fn notify_node(&self, status: &NodeStatus) -> i32 {
        self.node.map_or(STATUS_NOT_SUBSCRIBED, |h| h(self.screen, status))
    }

    pub fn notify_text(&self, packet: &TextPacket) -> i32 {
        self.text.map_or(STATUS_NOT_SUBSCRIBED, |h| h(self.screen, packet))
    }

    pub fn notify_ui_frame(&self, event: &UiFrameEvent) -> i32 {
        self.ui_frame
            .map_or(STATUS_NOT_SUBSCRIBED, |h| h(self.screen, event))
    }
}

fn queued(result: Result<(), QueueFull>) -> i32 {
    match result {
        Ok(()) => STATUS_HANDLED,
        Err(_) => STATUS_DROPPED,
    }
}

/// Copy battery state into the snapshot
pub fn on_power_status<M: RawMutex, const N: usize>(
    screen: &ScreenHandle<M, N>,
    status: &PowerStatus,
) -> i32 {
    screen.debug_info().update(|s| {
        s.battery = BatteryStatus {
            has_battery: status.has_battery,
            percent: status.battery_percent.min(100),
            millivolts: status.battery_mv,
            charging: status.charging,
            usb_power: status.usb_power,
        }
    });
    STATUS_HANDLED
}

/// Copy GPS state into the snapshot
pub fn on_position_status<M: RawMutex, const N: usize>(
    screen: &ScreenHandle<M, N>,
    status: &PositionStatus,
) -> i32 {
    screen.debug_info().update(|s| {
        s.gps = GpsStatus {
            connected: status.connected,
            has_lock: status.has_lock,
            satellites: status.satellites,
            latitude_e7: status.latitude_e7,
            longitude_e7: status.longitude_e7,
            altitude_m: status.altitude_m,
        }
    });
    STATUS_HANDLED
}

/// Update node counts; rebuild the rotation when the total changes
pub fn on_node_status<M: RawMutex, const N: usize>(
    screen: &ScreenHandle<M, N>,
    status: &NodeStatus,
) -> i32 {
    let total_changed = screen.debug_info().update(|s| {
        let changed = s.nodes.total != status.total;
        s.nodes = NodeCounts {
            online: status.online,
            total: status.total,
        };
        changed
    });

    if total_changed {
        debug!("Node count now {}, rebuilding frames", status.total);
        queued(screen.rebuild_frames())
    } else {
        STATUS_HANDLED
    }
}

/// Store the message and bring its frame into the rotation
pub fn on_text_message<M: RawMutex, const N: usize>(
    screen: &ScreenHandle<M, N>,
    packet: &TextPacket,
) -> i32 {
    screen.debug_info().update(|s| {
        s.last_message = Some(TextMessage::new(packet.from, &packet.text, s.uptime_s));
    });
    debug!("Text message from {:x}", packet.from);
    queued(screen.rebuild_frames())
}

/// Rebuild or repaint on request of a UI module
pub fn on_ui_frame_event<M: RawMutex, const N: usize>(
    screen: &ScreenHandle<M, N>,
    event: &UiFrameEvent,
) -> i32 {
    if event.need_redraw {
        screen.request_redraw();
    }
    if event.frame_changed {
        return queued(screen.rebuild_frames());
    }
    STATUS_HANDLED
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    type Handle = ScreenHandle<NoopRawMutex, 2>;

    #[test]
    fn test_unsubscribed_category_is_ignored() {
        let handle = Handle::new();
        let bridge = StatusBridge::new(&handle);
        assert_eq!(bridge.notify_node(&NodeStatus::default()), STATUS_NOT_SUBSCRIBED);
        assert_eq!(
            bridge.notify_text(&TextPacket::new(1, "hi")),
            STATUS_NOT_SUBSCRIBED
        );
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_power_updates_snapshot_only() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);
        let status = PowerStatus {
            has_battery: true,
            battery_percent: 120,
            battery_mv: 4150,
            charging: true,
            usb_power: true,
        };

        assert_eq!(bridge.notify_power(&status), STATUS_HANDLED);
        let battery = handle.debug_info().read(|s| s.battery);
        assert_eq!(battery.percent, 100);
        assert_eq!(battery.millivolts, 4150);
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_gps_updates_snapshot_only() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);
        let status = PositionStatus {
            connected: true,
            has_lock: true,
            satellites: 7,
            ..PositionStatus::default()
        };

        assert_eq!(bridge.notify_gps(&status), STATUS_HANDLED);
        assert!(handle.debug_info().read(|s| s.gps.has_lock));
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_node_rebuild_only_when_total_changes() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);

        bridge.notify_node(&NodeStatus { online: 1, total: 3 });
        assert_eq!(handle.pending(), 1);

        bridge.notify_node(&NodeStatus { online: 2, total: 3 });
        assert_eq!(handle.pending(), 1);
        assert_eq!(handle.debug_info().read(|s| s.nodes.online), 2);
    }

    #[test]
    fn test_text_message_stored_and_rebuilds() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);
        handle.debug_info().update(|s| s.uptime_s = 77);

        assert_eq!(bridge.notify_text(&TextPacket::new(0x1234, "hello")), STATUS_HANDLED);
        let message = handle.debug_info().read(|s| s.last_message.clone()).unwrap();
        assert_eq!(message.from, 0x1234);
        assert_eq!(message.text.as_str(), "hello");
        assert_eq!(message.received_s, 77);
        assert_eq!(handle.try_receive(), Some(Command::RebuildFrames));
    }

    #[test]
    fn test_ui_frame_event() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);

        let redraw = UiFrameEvent {
            frame_changed: false,
            need_redraw: true,
        };
        assert_eq!(bridge.notify_ui_frame(&redraw), STATUS_HANDLED);
        assert_eq!(handle.pending(), 0);
        assert!(handle.take_redraw());

        let changed = UiFrameEvent {
            frame_changed: true,
            need_redraw: false,
        };
        bridge.notify_ui_frame(&changed);
        assert_eq!(handle.try_receive(), Some(Command::RebuildFrames));
    }

    #[test]
    fn test_full_queue_reports_dropped() {
        let handle = Handle::new();
        let bridge = StatusBridge::with_default_subscriptions(&handle);
        handle.on_press().unwrap();
        handle.on_press().unwrap();

        assert_eq!(bridge.notify_text(&TextPacket::new(1, "x")), STATUS_DROPPED);
        // The snapshot is still updated
        assert!(handle.debug_info().read(|s| s.last_message.is_some()));
    }

    fn custom_power(_: &Handle, _: &PowerStatus) -> i32 {
        42
    }

    #[test]
    fn test_custom_handler_code_is_returned() {
        let handle = Handle::new();
        let mut bridge = StatusBridge::new(&handle);
        bridge.subscribe(Subscription::Power(custom_power));
        assert!(bridge.is_subscribed(Category::Power));
        assert_eq!(bridge.notify_power(&PowerStatus::default()), 42);

        bridge.unsubscribe(Category::Power);
        assert_eq!(bridge.notify_power(&PowerStatus::default()), STATUS_NOT_SUBSCRIBED);
    }
}
