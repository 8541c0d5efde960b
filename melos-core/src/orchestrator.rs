//! Session arbitration and effector coordination
//!
//! One orchestrator owns the session slot and decides, per event, what
//! the power controller and the display get told. The ingest loop applies
//! events one at a time, so session state needs no locking.
//!
//! ```text
//!                    ┌──────────────┐
//!  Event ──────────▶ │ Orchestrator │ ──▶ Power (on/standby switches)
//!                    │   Session?   │ ──▶ Display (now playing)
//!                    └──────────────┘
//! ```

use crate::power::Power;
use crate::session::Session;
use crate::traits::{DisplayError, NowPlayingDisplay, Switch};
use melos_protocol::{Event, Payload, Playing, Song, Source, User};

/// What one event requires of the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    /// Open a session for this source and user
    Open(Source, User),
    /// Close the session and blank the display
    Close,
    /// Playback changed; tell the power controller
    Playing(Playing),
    /// New song; tell the display
    Song(Song),
    /// Not addressed to the current state; drop it
    Ignore,
}

/// Pure transition logic: what does this event mean right now?
///
/// - no session: a non-empty user from either source opens one,
///   everything else is dropped
/// - with a session: only the owning source is heard; an empty user
///   closes it, playback and song changes feed the effectors
/// - unchanged playback/song values are dropped so effectors never see
///   redundant writes
fn decide(session: Option<&Session>, event: Event) -> Action {
    match (session, event.payload) {
        (None, Payload::User(user)) if !user.is_empty() => Action::Open(event.source, user),
        (None, _) => Action::Ignore,
        (Some(session), Payload::User(user))
            if user.is_empty() && session.source == event.source =>
        {
            Action::Close
        }
        (Some(_), Payload::User(_)) => Action::Ignore,
        (Some(session), Payload::Playing(playing))
            if session.source == event.source && playing != session.playing =>
        {
            Action::Playing(playing)
        }
        (Some(_), Payload::Playing(_)) => Action::Ignore,
        (Some(session), Payload::Song(song))
            if session.source == event.source && session.song.as_ref() != Some(&song) =>
        {
            Action::Song(song)
        }
        (Some(_), Payload::Song(_)) => Action::Ignore,
    }
}

/// Session orchestrator
///
/// Both effectors are optional: a board can run power-only (no display
/// fitted) or display-only, matching the configuration.
pub struct Orchestrator<'d, D, S> {
    display: Option<&'d D>,
    power: Option<Power<S>>,
    session: Option<Session>,
}

impl<'d, D: NowPlayingDisplay, S: Switch> Orchestrator<'d, D, S> {
    pub fn new(display: Option<&'d D>, power: Option<Power<S>>) -> Self {
        Self {
            display,
            power,
            session: None,
        }
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True while the power controller has a standby deadline armed
    pub fn standby_pending(&self) -> bool {
        self.power
            .as_ref()
            .is_some_and(|power| power.standby_pending())
    }

    /// Apply one event
    pub async fn process(&mut self, event: Event) -> Result<(), DisplayError> {
        match decide(self.session.as_ref(), event) {
            Action::Open(source, user) => {
                self.session = Some(Session::new(source, user));
            }
            Action::Close => {
                self.session = None;
                if let Some(display) = self.display {
                    display.clear().await?;
                }
            }
            Action::Playing(playing) => {
                if let Some(session) = self.session.as_mut() {
                    session.playing = playing;
                }
                if let Some(power) = self.power.as_mut() {
                    power.process_playing(playing);
                }
            }
            Action::Song(song) => {
                if let Some(display) = self.display {
                    display.display_now_playing(&song).await?;
                }
                if let Some(session) = self.session.as_mut() {
                    session.song = Some(song);
                }
            }
            Action::Ignore => {}
        }
        Ok(())
    }

    /// Wait for the armed standby deadline
    ///
    /// Pends forever while no deadline is armed or no power controller
    /// is fitted, so it can always sit in a select.
    pub async fn standby_elapsed(&self) {
        match &self.power {
            Some(power) => power.standby_elapsed().await,
            None => core::future::pending().await,
        }
    }

    /// Standby deadline expiry action
    pub fn enter_standby(&mut self) {
        if let Some(power) = self.power.as_mut() {
            power.enter_standby();
        }
    }

    /// Park everything in a safe state; idempotent
    ///
    /// Ends the session, engages standby and releases the display. Power
    /// is parked first so a display fault cannot leave the amp on.
    pub async fn shutdown(&mut self) -> Result<(), DisplayError> {
        self.session = None;
        if let Some(power) = self.power.as_mut() {
            power.shutdown();
        }
        if let Some(display) = self.display {
            display.stop().await?;
        }
        Ok(())
    }
}
