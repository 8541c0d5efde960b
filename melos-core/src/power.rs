//! Amplifier power control with standby timeout
//!
//! Two complementary switches drive the amplifier supply: "on" powers the
//! signal path, "standby" keeps it parked. Playback start engages on
//! immediately; playback stop arms a standby deadline that a later start
//! cancels.

use embassy_time::{Duration, Instant, Timer};

use crate::traits::Switch;
use melos_protocol::Playing;

/// Amplifier power controller
///
/// The standby timer is a single deadline slot rather than a spawned
/// task: arming overwrites the slot, cancelling clears it, and only the
/// owning event loop polls [`standby_elapsed`](Power::standby_elapsed).
/// A cleared deadline therefore cannot fire afterwards.
pub struct Power<S> {
    on_switch: S,
    standby_switch: S,
    standby_duration: Duration,
    standby_at: Option<Instant>,
}

impl<S: Switch> Power<S> {
    /// Take ownership of the two switches and park in standby
    pub fn new(on_switch: S, standby_switch: S, standby_duration: Duration) -> Self {
        let mut power = Self {
            on_switch,
            standby_switch,
            standby_duration,
            standby_at: None,
        };
        power.switch_to(false);
        power
    }

    /// React to a playback change
    ///
    /// Start cancels any armed deadline and powers on; the on write is
    /// skipped when already on. Stop arms the deadline, replacing a
    /// previous one; a zero duration is due immediately.
    pub fn process_playing(&mut self, playing: Playing) {
        if playing.0 {
            self.standby_at = None;
            self.switch_to(true);
        } else {
            self.standby_at = Some(Instant::now() + self.standby_duration);
        }
    }

    /// Wait until the armed standby deadline; pends forever while disarmed
    pub async fn standby_elapsed(&self) {
        match self.standby_at {
            Some(at) => Timer::at(at).await,
            None => core::future::pending().await,
        }
    }

    /// Deadline expiry action: disarm and park in standby
    pub fn enter_standby(&mut self) {
        self.standby_at = None;
        self.switch_to(false);
    }

    /// True while a standby deadline is armed
    pub fn standby_pending(&self) -> bool {
        self.standby_at.is_some()
    }

    /// True while the amplifier is powered on
    pub fn is_on(&self) -> bool {
        self.on_switch.is_on()
    }

    /// Teardown: disarm and park in standby; idempotent
    pub fn shutdown(&mut self) {
        self.enter_standby();
    }

    /// Drive both switches to one of the two complementary states
    ///
    /// The on switch is written first (make-before-break on power-up),
    /// and writes are skipped for switches already in position.
    fn switch_to(&mut self, on: bool) {
        if self.on_switch.is_on() != on {
            self.on_switch.set_on(on);
        }
        if self.standby_switch.is_on() == on {
            self.standby_switch.set_on(!on);
        }
    }
}
