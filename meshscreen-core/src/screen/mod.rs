//! Display controller
//!
//! Split in two halves:
//!
//! - [`ScreenHandle`]: the shared producer side. Any context may call it;
//!   it only queues commands and raises flags, and never blocks.
//! - [`Screen`]: the owner side. It holds the surface and the display
//!   state and applies queued commands once per [`Screen::tick`].
//!
//! ```ignore
//! static SCREEN: ScreenHandle<CriticalSectionRawMutex> = ScreenHandle::new();
//!
//! let mut screen = Screen::new(&SCREEN, panel, config);
//! screen.setup(now_ms)?;
//! loop {
//!     match screen.tick(now_ms) {
//!         Some(delay) => sleep_or_wake(delay),
//!         None => SCREEN.wait_wake().await,
//!     }
//! }
//! ```

mod dispatcher;
mod handle;
pub(crate) mod render;
#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{Screen, IDLE_DELAY_MS, OVERLAY_LINES, TRANSITION_DELAY_MS, TRANSITION_MS};
pub use handle::{ScreenHandle, DEFAULT_QUEUE_CAPACITY};
pub use render::MAX_LINE_GLYPHS;

#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingSurface};
    use super::*;
    use crate::command::Command;
    use crate::config::DisplayConfig;
    use crate::debug::DebugFrame;
    use crate::state::{Frame, FrameSetKind, DEFAULT_BRIGHTNESS};
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
    use embedded_hal::delay::DelayNs;
    use std::sync::Mutex;
    use std::vec::Vec;

    fn started<'a, const N: usize>(
        handle: &'a ScreenHandle<NoopRawMutex, N>,
    ) -> Screen<'a, NoopRawMutex, RecordingSurface, N> {
        let mut screen = Screen::new(handle, RecordingSurface::new(), DisplayConfig::default());
        screen.setup(0).unwrap();
        screen.surface_mut().calls.clear();
        screen
    }

    fn text(glyphs: &[u8]) -> std::string::String {
        glyphs.iter().map(|&b| b as char).collect()
    }

    #[test]
    fn test_setup_powers_on_and_shows_boot() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = Screen::new(&handle, RecordingSurface::new(), DisplayConfig::default());
        screen.setup(0).unwrap();

        let calls = &screen.surface().calls;
        assert_eq!(calls[0], Call::Init);
        assert_eq!(calls[1], Call::Brightness(DEFAULT_BRIGHTNESS));
        assert_eq!(calls[2], Call::Power(true));
        assert_eq!(calls.last(), Some(&Call::Display));
        assert!(screen.state().powered_on);
        assert_eq!(screen.state().frames.current(), Frame::Boot);
        assert!(handle.is_enabled());
    }

    #[test]
    fn test_tick_drains_everything_in_order() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        handle.stop_boot_screen().unwrap();
        handle.on_press().unwrap();
        handle.print("hello").unwrap();
        screen.tick(10);

        assert_eq!(handle.pending(), 0);
        assert_eq!(screen.dispatched_count(), 3);
        assert_eq!(
            screen.state().frames.current(),
            Frame::Debug(DebugFrame::Settings)
        );
        assert_eq!(screen.overlay().collect::<Vec<_>>(), ["hello"]);
    }

    #[test]
    fn test_capacity_four_burst() {
        let handle: ScreenHandle<NoopRawMutex, 4> = ScreenHandle::new();
        let mut screen = started(&handle);

        let results: Vec<bool> = (0..5)
            .map(|_| handle.start_firmware_update_screen().is_ok())
            .collect();
        assert_eq!(results, [true, true, true, true, false]);
        assert_eq!(handle.pending(), 4);

        screen.tick(10);
        assert_eq!(screen.dispatched_count(), 4);
        assert_eq!(screen.state().frames.kind(), FrameSetKind::FirmwareUpdate);
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_power_off_preempts_queue() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        handle.stop_boot_screen().unwrap();
        handle.print("late").unwrap();
        handle.set_on(false).unwrap();

        assert_eq!(screen.tick(10), None);
        assert!(!screen.state().powered_on);
        assert!(!handle.is_enabled());
        assert_eq!(screen.dispatched_count(), 2);
        // Nothing reaches the panel after it was switched off
        assert_eq!(screen.surface().calls, [Call::Power(false)]);
    }

    #[test]
    fn test_power_on_resumes_ticking() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        screen.set_on(false, 5).unwrap();
        assert_eq!(screen.surface().calls, [Call::Power(false)]);
        assert_eq!(screen.tick(10), None);

        handle.set_on(true).unwrap();
        assert!(handle.is_enabled());
        assert_eq!(screen.tick(20), Some(TRANSITION_DELAY_MS));
        assert!(screen.state().powered_on);
        assert!(screen.surface().calls.contains(&Call::Power(true)));
    }

    #[test]
    fn test_raw_set_off_powers_off_with_full_queue() {
        let handle: ScreenHandle<NoopRawMutex, 2> = ScreenHandle::new();
        let mut screen = started(&handle);

        handle.on_press().unwrap();
        handle.on_press().unwrap();
        assert!(handle.enqueue(Command::SetOff).is_ok());

        assert_eq!(screen.tick(10), None);
        assert!(!screen.state().powered_on);
        assert_eq!(screen.surface().count(&Call::Power(false)), 1);
    }

    #[test]
    fn test_refresh_requests_while_off_are_dropped() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        screen.set_on(false, 5).unwrap();
        handle.force_display();
        handle.request_redraw();
        assert_eq!(screen.tick(10), None);

        handle.force_display();
        handle.set_on(true).unwrap();
        screen.surface_mut().calls.clear();
        assert_eq!(screen.tick(20), Some(TRANSITION_DELAY_MS));
        assert_eq!(screen.surface().count(&Call::ForceDisplay), 0);
        assert_eq!(screen.surface().calls.last(), Some(&Call::Display));
    }

    #[test]
    fn test_headless_is_noop() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = Screen::new(&handle, RecordingSurface::new(), DisplayConfig::headless());
        screen.setup(0).unwrap();

        assert!(handle.print("nobody sees this").is_ok());
        assert!(handle.start_shutdown_screen().is_ok());
        assert_eq!(handle.pending(), 0);
        assert_eq!(screen.tick(10), None);
        assert!(screen.surface().calls.is_empty());
    }

    #[test]
    fn test_boot_screen_times_out() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        screen.tick(4999);
        assert_eq!(screen.state().frames.kind(), FrameSetKind::Boot);

        screen.tick(5000);
        assert!(screen.state().frames.is_normal());
        assert!(screen.state().showing_normal_frame);
        assert_eq!(screen.dispatched_count(), 0);
    }

    #[test]
    fn test_special_screen_holds_past_boot_timeout() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        handle.start_bluetooth_pin_screen(123456).unwrap();
        screen.tick(10);
        screen.tick(6000);
        assert_eq!(screen.state().frames.current(), Frame::BluetoothPin(123456));

        handle.stop_bluetooth_pin_screen().unwrap();
        screen.tick(6010);
        assert!(screen.state().frames.is_normal());
    }

    #[test]
    fn test_frame_rate_settles_with_forced_refresh() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        assert_eq!(screen.tick(0), Some(TRANSITION_DELAY_MS));
        assert_eq!(screen.tick(600), Some(IDLE_DELAY_MS));
        assert_eq!(screen.tick(1600), Some(IDLE_DELAY_MS));

        assert_eq!(screen.surface().count(&Call::ForceDisplay), 1);
        assert_eq!(screen.surface().count(&Call::Display), 2);
    }

    #[test]
    fn test_force_display_flag_from_producer() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);
        screen.tick(600);
        screen.surface_mut().calls.clear();

        handle.force_display();
        screen.tick(1600);
        assert_eq!(screen.surface().calls.last(), Some(&Call::ForceDisplay));
    }

    #[test]
    fn test_redraw_request_restarts_fast_rate() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);
        assert_eq!(screen.tick(600), Some(IDLE_DELAY_MS));

        handle.request_redraw();
        assert_eq!(screen.tick(1600), Some(TRANSITION_DELAY_MS));
    }

    #[test]
    fn test_print_overlay_lifecycle() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        // Ignored on the boot screen
        handle.print("early").unwrap();
        screen.tick(10);
        assert_eq!(screen.overlay().count(), 0);

        handle.stop_boot_screen().unwrap();
        for line in ["A", "B", "C"] {
            handle.print(line).unwrap();
        }
        screen.surface_mut().calls.clear();
        screen.tick(20);
        assert_eq!(screen.overlay().collect::<Vec<_>>(), ["B", "C"]);

        let texts = screen.surface().texts();
        let tail: Vec<_> = texts[texts.len() - 2..].iter().map(|t| text(t)).collect();
        assert_eq!(tail, ["B", "C"]);

        // Frame switches drop the overlay
        handle.on_press().unwrap();
        screen.tick(30);
        assert_eq!(screen.overlay().count(), 0);
    }

    #[test]
    fn test_auto_carousel_advances() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let config = DisplayConfig {
            auto_carousel_secs: 2,
            ..DisplayConfig::default()
        };
        let mut screen = Screen::new(&handle, RecordingSurface::new(), config);
        screen.setup(0).unwrap();

        handle.stop_boot_screen().unwrap();
        screen.tick(100);
        assert_eq!(screen.state().frames.index(), 0);

        screen.tick(1000);
        assert_eq!(screen.state().frames.index(), 0);
        screen.tick(2100);
        assert_eq!(screen.state().frames.index(), 1);
    }

    #[test]
    fn test_brightness_reaches_panel() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        handle.adjust_brightness().unwrap();
        screen.tick(10);
        assert_eq!(screen.state().brightness, 212);
        assert_eq!(screen.surface().calls[0], Call::Brightness(212));
    }

    #[test]
    fn test_surface_errors_do_not_stop_ticking() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);
        screen.surface_mut().fail_with = Some(crate::DisplayError::Communication);

        handle.on_press().unwrap();
        assert_eq!(screen.tick(10), Some(TRANSITION_DELAY_MS));
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_deep_sleep_on_persistent_panel() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);
        screen.surface_mut().persistent = true;

        screen.do_deep_sleep(100).unwrap();
        let calls = &screen.surface().calls;
        assert_eq!(calls[0], Call::Clear);
        assert_eq!(&calls[calls.len() - 2..], [Call::ForceDisplay, Call::Power(false)]);
        assert!(screen
            .surface()
            .texts()
            .iter()
            .any(|t| text(t) == "Sleeping..."));
        assert!(!handle.is_enabled());
    }

    #[test]
    fn test_deep_sleep_on_oled_just_powers_off() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);

        screen.do_deep_sleep(100).unwrap();
        assert_eq!(screen.surface().calls, [Call::Power(false)]);
    }

    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn test_blink_restores_brightness() {
        let handle: ScreenHandle<NoopRawMutex> = ScreenHandle::new();
        let mut screen = started(&handle);
        let mut delay = CountingDelay { total_ns: 0 };

        screen.blink(&mut delay).unwrap();
        let calls = &screen.surface().calls;
        assert_eq!(calls[0], Call::Brightness(254));
        assert_eq!(calls.iter().filter(|c| **c == Call::Fill).count(), 10);
        assert_eq!(calls.last(), Some(&Call::Brightness(DEFAULT_BRIGHTNESS)));
        assert_eq!(delay.total_ns, 1_000_000_000);
    }

    #[test]
    fn test_fifo_across_producers() {
        let handle: ScreenHandle<CriticalSectionRawMutex> = ScreenHandle::new();
        let accepted = Mutex::new(Vec::new());

        std::thread::scope(|scope| {
            for producer in 0..3u32 {
                let handle = &handle;
                let accepted = &accepted;
                scope.spawn(move || {
                    for seq in 0..10u32 {
                        let pin = producer * 100 + seq;
                        // Hold the log lock across enqueue so it records acceptance order
                        let mut log = accepted.lock().unwrap();
                        if handle.start_bluetooth_pin_screen(pin).is_ok() {
                            log.push(pin);
                        }
                    }
                });
            }
        });

        let mut drained = Vec::new();
        while let Some(Command::StartBluetoothPinScreen(pin)) = handle.try_receive() {
            drained.push(pin);
        }
        assert_eq!(drained, accepted.into_inner().unwrap());
        assert_eq!(drained.len(), 30);
    }

    #[test]
    fn test_prints_from_two_contexts_mid_tick() {
        let handle: ScreenHandle<CriticalSectionRawMutex> = ScreenHandle::new();
        let mut screen = Screen::new(&handle, RecordingSurface::new(), DisplayConfig::default());
        screen.setup(0).unwrap();
        handle.stop_boot_screen().unwrap();
        screen.tick(10);

        let accepted = Mutex::new(Vec::new());
        std::thread::scope(|scope| {
            for line in ["A", "B"] {
                let handle = &handle;
                let accepted = &accepted;
                scope.spawn(move || {
                    let mut log = accepted.lock().unwrap();
                    handle.print(line).unwrap();
                    log.push(line);
                });
            }
            screen.tick(20);
        });
        screen.tick(30);

        assert_eq!(
            screen.overlay().collect::<Vec<_>>(),
            accepted.into_inner().unwrap()
        );
    }
}
