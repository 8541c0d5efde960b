//! Shutdown button task
//!
//! Waits for the front-panel button and asks the engine to tear down.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::SHUTDOWN;

/// Settle time after the falling edge before the level is trusted
const DEBOUNCE_MS: u64 = 50;

/// Shutdown task - debounces the button and signals the engine once
#[embassy_executor::task]
pub async fn shutdown_task(mut button: Input<'static>) {
    info!("Shutdown task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
        if button.is_low() {
            info!("Shutdown button pressed");
            SHUTDOWN.signal(());
            return;
        }
    }
}
