//! Async tick loop on embassy-time
//!
//! Runs the dispatcher from an embassy task: tick, then sleep for the
//! suggested delay or until a producer wakes the owner, whichever comes
//! first. A suspended screen (off, or no panel) only waits for a wake.

use embassy_futures::select::select;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Instant, Timer};

use crate::screen::Screen;
use crate::traits::DisplaySurface;

/// Milliseconds since boot, wrapping
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Drive `screen` forever
///
/// `Screen::setup` should have been called first.
pub async fn run_screen<M: RawMutex, D: DisplaySurface, const N: usize>(
    screen: &mut Screen<'_, M, D, N>,
) -> ! {
    let handle = screen.handle();
    loop {
        match screen.tick(now_ms()) {
            Some(delay_ms) => {
                select(Timer::after_millis(u64::from(delay_ms)), handle.wait_wake()).await;
            }
            None => {
                trace!("Screen suspended");
                handle.wait_wake().await;
            }
        }
    }
}
