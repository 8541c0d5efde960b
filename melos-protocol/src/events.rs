//! Typed events produced by the source decoders
//!
//! Both decoders emit the same [`Event`] type so the orchestrator can be
//! written once against a single sum type. Text fields are bounded
//! heapless strings; oversized upstream metadata is truncated at a char
//! boundary rather than rejected.

use heapless::String;

/// Maximum length in bytes of one decoded text field (user name, song metadata)
pub const MAX_FIELD_LEN: usize = 64;

/// Maximum length in bytes of one raw transport payload
pub const MAX_MESSAGE_LEN: usize = 256;

/// Bounded text field as stored in decoded events
pub type FieldString = String<MAX_FIELD_LEN>;

/// One raw transport payload as handed to the ingestor
pub type RawPayload = heapless::Vec<u8, MAX_MESSAGE_LEN>;

/// Which upstream receiver produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Spotify-Connect-style helper (stateless text payloads)
    Connect,
    /// AirPlay-style helper (coded payloads, chunked metadata)
    Airplay,
}

/// Track metadata snapshot
///
/// Fields the upstream never reported stay empty. Equality is structural,
/// which is what the orchestrator uses to suppress redundant display writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Song {
    pub artist: FieldString,
    pub album: FieldString,
    pub title: FieldString,
}

impl Song {
    /// Build a song from borrowed text, truncating each field to capacity
    pub fn new(artist: &str, album: &str, title: &str) -> Self {
        Self {
            artist: field(artist),
            album: field(album),
            title: field(title),
        }
    }
}

/// Playback running or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Playing(pub bool);

/// Connected user name; the empty string means "no user" (disconnect)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct User(pub FieldString);

impl User {
    pub fn new(name: &str) -> Self {
        Self(field(name))
    }

    /// True for the disconnect marker
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What an event reports
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload {
    /// User presence changed (empty name = disconnected)
    User(User),
    /// A complete track metadata record
    Song(Song),
    /// Playback started or stopped
    Playing(Playing),
}

/// One decoded event: who said it and what it reports
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    pub source: Source,
    pub payload: Payload,
}

impl Event {
    pub fn user(source: Source, name: &str) -> Self {
        Self {
            source,
            payload: Payload::User(User::new(name)),
        }
    }

    pub fn playing(source: Source, playing: bool) -> Self {
        Self {
            source,
            payload: Payload::Playing(Playing(playing)),
        }
    }

    pub fn song(source: Source, song: Song) -> Self {
        Self {
            source,
            payload: Payload::Song(song),
        }
    }
}

/// Copy text into a bounded field, truncating at a char boundary
pub(crate) fn field(text: &str) -> FieldString {
    let mut out = FieldString::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_truncates_at_char_boundary() {
        // 'é' is two bytes; 33 of them exceed the 64-byte capacity midway
        let mut long = heapless::String::<128>::new();
        for _ in 0..33 {
            long.push('é').unwrap();
        }
        let truncated = field(&long);
        assert_eq!(truncated.len(), 64);
        assert_eq!(truncated.chars().count(), 32);
    }

    #[test]
    fn test_song_equality_is_structural() {
        let a = Song::new("Miles Davis", "Kind of Blue", "So What");
        let b = Song::new("Miles Davis", "Kind of Blue", "So What");
        let c = Song::new("Miles Davis", "Kind of Blue", "Blue in Green");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_user_empty_marker() {
        assert!(User::new("").is_empty());
        assert!(!User::new("alice").is_empty());
    }
}
