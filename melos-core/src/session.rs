//! Active listening session record

use melos_protocol::{Playing, Song, Source, User};

/// The active listening session
///
/// At most one exists at any time. It is owned by the orchestrator and
/// belongs to the source that opened it until that source disconnects;
/// the other source is not heard while it stands.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    /// Source that opened the session
    pub source: Source,
    /// User the session was opened for (never empty)
    pub user: User,
    /// Last song reported for this session, if any
    pub song: Option<Song>,
    /// Current playback state
    pub playing: Playing,
}

impl Session {
    /// Open a session: no song yet, not playing
    pub fn new(source: Source, user: User) -> Self {
        Self {
            source,
            user,
            song: None,
            playing: Playing(false),
        }
    }
}
