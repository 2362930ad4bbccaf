//! Producer side of the display controller
//!
//! A [`ScreenHandle`] is shared by every context that wants to change the
//! display. It is usually placed in a `static` so interrupt handlers can
//! reach it. Nothing here touches the rendering surface.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use crate::command::{Command, QueueFull};
use crate::debug::DebugInfo;

/// Queue capacity used when none is given
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Shared, non-blocking entry point for display producers
pub struct ScreenHandle<M: RawMutex, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    queue: Channel<M, Command, N>,
    /// A panel is fitted; cleared by the owner for headless nodes
    use_display: AtomicBool,
    /// The owner is ticking
    enabled: AtomicBool,
    /// Urgent power-off, applied before any queued command
    power_off_requested: AtomicBool,
    redraw_requested: AtomicBool,
    force_requested: AtomicBool,
    wake: Signal<M, ()>,
    debug: DebugInfo<M>,
}

impl<M: RawMutex, const N: usize> Default for ScreenHandle<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> ScreenHandle<M, N> {
    /// Create a handle with an empty queue
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
            use_display: AtomicBool::new(true),
            enabled: AtomicBool::new(false),
            power_off_requested: AtomicBool::new(false),
            redraw_requested: AtomicBool::new(false),
            force_requested: AtomicBool::new(false),
            wake: Signal::new(),
            debug: DebugInfo::new(),
        }
    }

    /// Queue a command without blocking
    ///
    /// On a full queue the command is handed back inside [`QueueFull`].
    /// Without a display the command is dropped and `Ok` is returned.
    /// [`Command::SetOff`] never enters the queue, see [`Self::set_on`].
    pub fn enqueue(&self, cmd: Command) -> Result<(), QueueFull> {
        if !self.use_display() {
            return Ok(());
        }
        if matches!(cmd, Command::SetOff) {
            self.request_power_off();
            return Ok(());
        }

        match self.queue.try_send(cmd) {
            Ok(()) => {
                self.enabled.store(true, Ordering::Release);
                self.wake.signal(());
                Ok(())
            }
            Err(TrySendError::Full(cmd)) => {
                warn!("Display queue full, command dropped");
                Err(QueueFull(cmd))
            }
        }
    }

    /// Overlay text on the current frame
    ///
    /// On a full queue the text is dropped with the returned error.
    pub fn print(&self, text: &str) -> Result<(), QueueFull> {
        self.enqueue(Command::print(text))
    }

    /// User button press
    pub fn on_press(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::OnPress)
    }

    /// Switch the display on (queued) or off (immediate)
    ///
    /// Power-off bypasses the queue: the owner applies it before any
    /// command still waiting in the queue.
    pub fn set_on(&self, on: bool) -> Result<(), QueueFull> {
        if on {
            self.enqueue(Command::SetOn)
        } else {
            self.enqueue(Command::SetOff)
        }
    }

    pub fn start_bluetooth_pin_screen(&self, pin: u32) -> Result<(), QueueFull> {
        self.enqueue(Command::StartBluetoothPinScreen(pin))
    }

    pub fn start_firmware_update_screen(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::StartFirmwareUpdateScreen)
    }

    pub fn start_shutdown_screen(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::StartShutdownScreen)
    }

    pub fn stop_bluetooth_pin_screen(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::StopBluetoothPinScreen)
    }

    pub fn stop_boot_screen(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::StopBootScreen)
    }

    /// Step to the next brightness level
    pub fn adjust_brightness(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::AdjustBrightness)
    }

    /// Show the certificate generation screen
    pub fn set_ssl_frames(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::ShowSslScreen)
    }

    /// Ask the owner to rebuild the normal rotation
    pub fn rebuild_frames(&self) -> Result<(), QueueFull> {
        self.enqueue(Command::RebuildFrames)
    }

    fn request_power_off(&self) {
        self.power_off_requested.store(true, Ordering::Release);
        self.wake.signal(());
    }

    /// Ask for a full panel refresh on the next tick
    pub fn force_display(&self) {
        self.force_requested.store(true, Ordering::Release);
        self.wake.signal(());
    }

    /// Ask for a fast-rate repaint on the next tick
    pub fn request_redraw(&self) {
        self.redraw_requested.store(true, Ordering::Release);
        self.wake.signal(());
    }

    /// Shared debug metrics shown on the status frames
    pub fn debug_info(&self) -> &DebugInfo<M> {
        &self.debug
    }

    /// Check if the owner is ticking
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Check if a panel is fitted
    pub fn use_display(&self) -> bool {
        self.use_display.load(Ordering::Acquire)
    }

    /// Wait until a producer has something for the owner
    pub async fn wait_wake(&self) {
        self.wake.wait().await
    }

    /// Commands waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub(crate) fn set_use_display(&self, present: bool) {
        self.use_display.store(present, Ordering::Release);
    }

    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub(crate) fn take_power_off(&self) -> bool {
        self.power_off_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn take_redraw(&self) -> bool {
        self.redraw_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn take_force(&self) -> bool {
        self.force_requested.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn try_receive(&self) -> Option<Command> {
        self.queue.try_receive().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    #[test]
    fn test_enqueue_sets_enabled() {
        let handle: ScreenHandle<NoopRawMutex, 4> = ScreenHandle::new();
        assert!(!handle.is_enabled());
        handle.on_press().unwrap();
        assert!(handle.is_enabled());
        assert_eq!(handle.pending(), 1);
    }

    #[test]
    fn test_full_queue_returns_command() {
        let handle: ScreenHandle<NoopRawMutex, 2> = ScreenHandle::new();
        handle.on_press().unwrap();
        handle.on_press().unwrap();

        let err = handle.print("dropped").unwrap_err();
        assert_eq!(err.into_inner(), Command::print("dropped"));
        assert_eq!(handle.pending(), 2);
    }

    #[test]
    fn test_headless_accepts_and_discards() {
        let handle: ScreenHandle<NoopRawMutex, 1> = ScreenHandle::new();
        handle.set_use_display(false);
        for _ in 0..5 {
            assert!(handle.print("ignored").is_ok());
        }
        assert_eq!(handle.pending(), 0);
        assert!(!handle.is_enabled());
    }

    #[test]
    fn test_power_off_bypasses_queue() {
        let handle: ScreenHandle<NoopRawMutex, 1> = ScreenHandle::new();
        handle.on_press().unwrap();
        // Queue is full, power-off still goes through
        assert!(handle.set_on(false).is_ok());
        assert!(handle.take_power_off());
        assert!(!handle.take_power_off());
        assert_eq!(handle.pending(), 1);
    }

    #[test]
    fn test_raw_set_off_bypasses_full_queue() {
        let handle: ScreenHandle<NoopRawMutex, 2> = ScreenHandle::new();
        handle.on_press().unwrap();
        handle.on_press().unwrap();
        assert!(handle.enqueue(Command::SetOff).is_ok());
        assert!(handle.take_power_off());
        assert_eq!(handle.pending(), 2);
    }

    #[test]
    fn test_flags_are_taken_once() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        handle.force_display();
        handle.request_redraw();
        assert!(handle.take_force());
        assert!(handle.take_redraw());
        assert!(!handle.take_force());
        assert!(!handle.take_redraw());
        assert_eq!(handle.capacity(), DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_concurrent_producers_never_exceed_capacity() {
        static HANDLE: ScreenHandle<CriticalSectionRawMutex, 8> = ScreenHandle::new();

        let accepted: usize = std::thread::scope(|scope| {
            let workers: std::vec::Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| (0..10).filter(|_| HANDLE.on_press().is_ok()).count())
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).sum()
        });

        assert_eq!(accepted, 8);
        assert_eq!(HANDLE.pending(), 8);
    }
}
