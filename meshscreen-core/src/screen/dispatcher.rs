//! Owner side of the display controller
//!
//! [`Screen`] owns the rendering surface and the display state. It is
//! driven from exactly one context by calling [`Screen::tick`]; every
//! surface call in the crate happens on that path.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use heapless::Deque;

use super::handle::{ScreenHandle, DEFAULT_QUEUE_CAPACITY};
use super::render;
use crate::command::{Command, PrintText, QueueFull};
use crate::config::DisplayConfig;
use crate::state::{DisplayState, Effect, Frame, FrameSetKind, NormalLayout, MAX_BRIGHTNESS};
use crate::traits::{DisplayError, DisplaySurface};

/// Tick period while a frame switch settles (30 fps)
pub const TRANSITION_DELAY_MS: u32 = 1000 / 30;

/// Tick period once the frame is static (1 fps)
pub const IDLE_DELAY_MS: u32 = 1000;

/// How long the fast rate is kept after a frame switch
pub const TRANSITION_MS: u32 = 500;

/// Printed lines kept on top of the current frame
pub const OVERLAY_LINES: usize = 2;

/// Flashes done by [`Screen::blink`]
const BLINK_COUNT: u8 = 10;

/// Half period of one flash
const BLINK_HALF_PERIOD_MS: u32 = 50;

/// Display controller owned by a single context
pub struct Screen<'a, M: RawMutex, D: DisplaySurface, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    handle: &'a ScreenHandle<M, N>,
    surface: D,
    config: DisplayConfig,
    state: DisplayState,
    overlay: Deque<PrintText, OVERLAY_LINES>,
    /// Set on the first tick or at setup
    boot_started_ms: Option<u32>,
    last_frame_change_ms: u32,
    in_transition: bool,
    dispatched: u32,
}

impl<'a, M: RawMutex, D: DisplaySurface, const N: usize> Screen<'a, M, D, N> {
    /// Take ownership of `surface`
    ///
    /// A config without a panel switches `handle` into no-op mode.
    pub fn new(handle: &'a ScreenHandle<M, N>, surface: D, config: DisplayConfig) -> Self {
        handle.set_use_display(config.panel.is_present());
        Self {
            handle,
            surface,
            config,
            state: DisplayState::new(config.brightness),
            overlay: Deque::new(),
            boot_started_ms: None,
            last_frame_change_ms: 0,
            in_transition: false,
            dispatched: 0,
        }
    }

    /// Initialise the panel, power it on and show the boot screen
    pub fn setup(&mut self, now_ms: u32) -> Result<(), DisplayError> {
        if !self.handle.use_display() {
            info!("No display fitted, screen disabled");
            return Ok(());
        }

        self.surface.init()?;
        self.surface.set_brightness(self.state.brightness)?;
        self.boot_started_ms = Some(now_ms);
        let layout = self.layout();
        let effect = self.state.apply(Command::SetOn, &layout);
        self.apply_effect(effect, now_ms);
        self.render(false)
    }

    /// Run one dispatcher pass
    ///
    /// Returns the delay until the next tick, or `None` when ticking can
    /// stop until a producer wakes the owner.
    pub fn tick(&mut self, now_ms: u32) -> Option<u32> {
        if !self.handle.use_display() {
            while self.handle.try_receive().is_some() {}
            self.handle.set_enabled(false);
            return None;
        }

        if self.handle.take_power_off() {
            let effect = self.state.power_off();
            self.apply_effect(effect, now_ms);
        }

        let boot_started = *self.boot_started_ms.get_or_insert(now_ms);
        if self.state.frames.kind() == FrameSetKind::Boot
            && now_ms.wrapping_sub(boot_started) >= self.config.boot_screen_ms
        {
            info!("Boot screen timed out");
            self.dispatch(Command::StopBootScreen, now_ms);
        }

        // Only what was queued when the tick started
        let pending = self.handle.pending();
        for _ in 0..pending {
            match self.handle.try_receive() {
                Some(cmd) => {
                    self.dispatched = self.dispatched.wrapping_add(1);
                    self.dispatch(cmd, now_ms);
                }
                None => break,
            }
        }

        if !self.state.powered_on {
            self.drop_refresh_requests();
            self.handle.set_enabled(false);
            // A producer may have queued between the drain and the store
            if self.handle.pending() > 0 {
                self.handle.set_enabled(true);
                return Some(0);
            }
            return None;
        }

        self.auto_carousel(now_ms);

        if self.handle.take_redraw() {
            self.last_frame_change_ms = now_ms;
        }

        let in_transition = now_ms.wrapping_sub(self.last_frame_change_ms) < TRANSITION_MS;
        let mut force = self.handle.take_force();
        if self.in_transition && !in_transition {
            force = true;
        }
        self.in_transition = in_transition;

        report(self.render(force));

        Some(if in_transition {
            TRANSITION_DELAY_MS
        } else {
            IDLE_DELAY_MS
        })
    }

    /// Switch on (queued) or off (immediately, on this context)
    pub fn set_on(&mut self, on: bool, now_ms: u32) -> Result<(), QueueFull> {
        if on {
            return self.handle.set_on(true);
        }
        if self.handle.use_display() {
            let effect = self.state.power_off();
            self.apply_effect(effect, now_ms);
            self.handle.set_enabled(false);
        }
        Ok(())
    }

    /// Redraw the current frame with a full refresh right now
    pub fn force_display(&mut self) -> Result<(), DisplayError> {
        if !self.handle.use_display() || !self.state.powered_on {
            return Ok(());
        }
        self.render(true)
    }

    /// Prepare the panel for deep sleep
    ///
    /// Panels that keep their image get the sleep frame first.
    pub fn do_deep_sleep(&mut self, now_ms: u32) -> Result<(), DisplayError> {
        if !self.handle.use_display() {
            return Ok(());
        }

        if self.surface.is_persistent() {
            self.surface.clear()?;
            render::draw_static_frame(&mut self.surface, Frame::Sleep, 0, 0)?;
            self.surface.force_display()?;
        }

        info!("Screen going to deep sleep");
        let effect = self.state.power_off();
        self.apply_effect(effect, now_ms);
        self.handle.set_enabled(false);
        Ok(())
    }

    /// Flash the whole panel, then restore brightness
    pub fn blink(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        if !self.handle.use_display() || !self.state.powered_on {
            return Ok(());
        }

        self.surface.set_brightness(MAX_BRIGHTNESS)?;
        for _ in 0..BLINK_COUNT {
            self.surface.fill()?;
            self.surface.display()?;
            delay.delay_ms(BLINK_HALF_PERIOD_MS);
            self.surface.clear()?;
            self.surface.display()?;
            delay.delay_ms(BLINK_HALF_PERIOD_MS);
        }
        self.surface.set_brightness(self.state.brightness)
    }

    pub fn handle(&self) -> &'a ScreenHandle<M, N> {
        self.handle
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Printed lines currently shown, oldest first
    pub fn overlay(&self) -> impl Iterator<Item = &str> {
        self.overlay.iter().map(|line| line.as_str())
    }

    /// Queued commands applied so far
    pub fn dispatched_count(&self) -> u32 {
        self.dispatched
    }

    /// Give back the surface
    pub fn release(self) -> D {
        self.surface
    }

    fn layout(&self) -> NormalLayout {
        let (has_message, wifi_configured) = self
            .handle
            .debug_info()
            .read(|s| (s.last_message.is_some(), s.wifi.configured));
        NormalLayout {
            has_message,
            wifi: self.config.wifi_enabled || wifi_configured,
        }
    }

    fn dispatch(&mut self, cmd: Command, now_ms: u32) {
        trace!("Dispatching {:?}", cmd);
        let layout = self.layout();
        let effect = self.state.apply(cmd, &layout);
        self.apply_effect(effect, now_ms);
    }

    fn apply_effect(&mut self, effect: Effect, now_ms: u32) {
        match effect {
            Effect::None => {}
            Effect::PowerOn => {
                info!("Screen on");
                report(self.surface.set_power(true));
                self.drop_refresh_requests();
                self.handle.set_enabled(true);
                self.frame_changed(now_ms);
            }
            Effect::PowerOff => {
                info!("Screen off");
                report(self.surface.set_power(false));
                self.drop_refresh_requests();
            }
            Effect::FramesChanged => {
                debug!("Frame set now {:?}", self.state.frames.kind());
                self.frame_changed(now_ms);
            }
            Effect::FrameAdvanced => self.frame_changed(now_ms),
            Effect::Print(text) => {
                if self.overlay.is_full() {
                    self.overlay.pop_front();
                }
                // Room was made above
                let _ = self.overlay.push_back(text);
            }
            Effect::Brightness(level) => {
                debug!("Brightness {}", level);
                report(self.surface.set_brightness(level));
            }
        }
    }

    /// Refresh requests raised while off are stale once power changes
    fn drop_refresh_requests(&self) {
        self.handle.take_force();
        self.handle.take_redraw();
    }

    fn frame_changed(&mut self, now_ms: u32) {
        self.overlay.clear();
        self.last_frame_change_ms = now_ms;
    }

    fn auto_carousel(&mut self, now_ms: u32) {
        let period_ms = u32::from(self.config.auto_carousel_secs) * 1000;
        if period_ms == 0 || !self.state.frames.is_normal() || self.state.frames.len() < 2 {
            return;
        }
        if now_ms.wrapping_sub(self.last_frame_change_ms) >= period_ms {
            self.state.frames.advance();
            trace!("Carousel advanced to frame {}", self.state.frames.index());
            self.frame_changed(now_ms);
        }
    }

    fn render(&mut self, force: bool) -> Result<(), DisplayError> {
        self.surface.clear()?;
        match self.state.frames.current() {
            Frame::Debug(frame) => {
                self.handle
                    .debug_info()
                    .render_into(&mut self.surface, frame, 0, 0)?
            }
            frame => render::draw_static_frame(&mut self.surface, frame, 0, 0)?,
        }
        render::draw_overlay(&mut self.surface, self.overlay.iter().map(|line| line.as_str()))?;
        if force {
            self.surface.force_display()
        } else {
            self.surface.display()
        }
    }
}

/// Surface failures are logged and otherwise ignored
fn report(result: Result<(), DisplayError>) {
    if let Err(err) = result {
        warn!("Display error: {:?}", err);
    }
}
