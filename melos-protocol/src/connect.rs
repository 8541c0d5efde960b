//! Decoder for the connect receiver (source A)
//!
//! Every payload is a complete, self-contained text message:
//!
//! - `playing` / `paused` / `stopped` - playback state
//! - `user:<name>` - user presence; empty name means disconnected
//! - a line containing `artists:<a>,album:<b>,title:<c>` - track metadata
//!
//! Anything else is not an event and decodes to `None`.

use crate::events::{Event, Song, Source};

/// Payload prefix announcing the connected user
const USER_PREFIX: &[u8] = b"user:";

/// Marker opening a track metadata record
const ARTIST_MARKER: &str = "artists:";
/// Delimiter between artist and album
const ALBUM_MARKER: &str = ",album:";
/// Delimiter between album and title
const TITLE_MARKER: &str = ",title:";

/// Decode one payload from the connect receiver
pub fn decode(payload: &[u8]) -> Option<Event> {
    match payload {
        b"playing" => Some(Event::playing(Source::Connect, true)),
        b"paused" | b"stopped" => Some(Event::playing(Source::Connect, false)),
        _ => {
            if let Some(name) = payload.strip_prefix(USER_PREFIX) {
                let name = core::str::from_utf8(name).ok()?;
                Some(Event::user(Source::Connect, name))
            } else {
                decode_song(payload)
            }
        }
    }
}

/// Decode an `artists:<a>,album:<b>,title:<c>` record
///
/// Boundaries are first-match: the artist runs to the first `,album:` after
/// `artists:`, the album to the first `,title:` after that, and the title
/// takes the remainder. Upstream guarantees the fields themselves do not
/// contain the delimiter sequences.
fn decode_song(payload: &[u8]) -> Option<Event> {
    let text = core::str::from_utf8(payload).ok()?;
    let (_, rest) = text.split_once(ARTIST_MARKER)?;
    let (artist, rest) = rest.split_once(ALBUM_MARKER)?;
    let (album, title) = rest.split_once(TITLE_MARKER)?;
    Some(Event::song(Source::Connect, Song::new(artist, album, title)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Payload, Playing, User};

    extern crate std;
    use proptest::prelude::*;

    #[test]
    fn test_playback_literals() {
        assert_eq!(
            decode(b"playing"),
            Some(Event::playing(Source::Connect, true))
        );
        assert_eq!(
            decode(b"paused"),
            Some(Event::playing(Source::Connect, false))
        );
        assert_eq!(
            decode(b"stopped"),
            Some(Event::playing(Source::Connect, false))
        );
    }

    #[test]
    fn test_user_presence() {
        let event = decode(b"user:alice").unwrap();
        assert_eq!(event.source, Source::Connect);
        assert_eq!(event.payload, Payload::User(User::new("alice")));
    }

    #[test]
    fn test_empty_user_is_disconnect() {
        let event = decode(b"user:").unwrap();
        match event.payload {
            Payload::User(user) => assert!(user.is_empty()),
            other => panic!("expected user payload, got {:?}", other),
        }
    }

    #[test]
    fn test_song_record() {
        let event = decode(b"artists:Pink Floyd,album:The Wall,title:Hey You").unwrap();
        assert_eq!(event.source, Source::Connect);
        assert_eq!(
            event.payload,
            Payload::Song(Song::new("Pink Floyd", "The Wall", "Hey You"))
        );
    }

    #[test]
    fn test_song_record_with_leading_noise() {
        // Upstream prepends bookkeeping fields; the record starts mid-line
        let event = decode(b"kind:2,artists:Nina Simone,album:Pastel Blues,title:Sinnerman");
        assert_eq!(
            event.unwrap().payload,
            Payload::Song(Song::new("Nina Simone", "Pastel Blues", "Sinnerman"))
        );
    }

    #[test]
    fn test_title_takes_remainder() {
        let event = decode(b"artists:A,album:B,title:C,title:D").unwrap();
        assert_eq!(event.payload, Payload::Song(Song::new("A", "B", "C,title:D")));
    }

    #[test]
    fn test_incomplete_song_record_ignored() {
        assert_eq!(decode(b"artists:A,album:B"), None);
        assert_eq!(decode(b"artists:A,title:C"), None);
    }

    #[test]
    fn test_unrecognized_payloads_ignored() {
        assert_eq!(decode(b""), None);
        assert_eq!(decode(b"volume_set"), None);
        assert_eq!(decode(b"PLAYING"), None);
    }

    #[test]
    fn test_invalid_utf8_ignored() {
        assert_eq!(decode(b"user:\xff\xfe"), None);
        assert_eq!(decode(b"artists:\xff,album:b,title:c"), None);
    }

    #[test]
    fn test_playing_flag_values() {
        for (payload, expected) in [
            (&b"playing"[..], Playing(true)),
            (&b"paused"[..], Playing(false)),
        ] {
            match decode(payload).unwrap().payload {
                Payload::Playing(flag) => assert_eq!(flag, expected),
                other => panic!("expected playing payload, got {:?}", other),
            }
        }
    }

    proptest! {
        #[test]
        fn test_decode_never_panics(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode(&payload);
        }

        #[test]
        fn test_unmatched_text_is_ignored(text in "[a-z ]{0,32}") {
            prop_assume!(!matches!(text.as_str(), "playing" | "paused" | "stopped"));
            prop_assert!(decode(text.as_bytes()).is_none());
        }
    }
}
