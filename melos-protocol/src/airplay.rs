//! Decoder for the airplay receiver (source B)
//!
//! Payloads start with an 8-byte code; the rest is data. One track's
//! metadata arrives chunked between start and end markers:
//!
//! ```text
//! ssncmdst            metadata record begins (remainder ignored)
//! coreasarDaft Punk   artist
//! coreasalDiscovery   album
//! coreminmOne More..  title
//! ssncmden            record complete -> Song event (remainder ignored)
//! ```
//!
//! The decoder owns the partially assembled record, so every consumer gets
//! its own accumulator and a fresh start marker always discards the
//! previous chunks. Only one record is assembled at a time; upstream
//! delivers chunks of a record contiguously.

use crate::events::{field, Event, Song, Source};

/// Length of the code prefix on every payload
const CODE_LEN: usize = 8;

/// Session opened, data carries the user name
const SESSION_NAME: &[u8] = b"ssncsnam";
/// Session ended
const DISCONNECT: &[u8] = b"ssncdisc";
/// Playback started (exact payload, no data)
const PLAYBACK_BEGIN: &[u8] = b"ssncpbeg";
/// Playback stopped (exact payload, no data)
const PLAYBACK_END: &[u8] = b"ssncpend";
/// Metadata record begins
const METADATA_START: &[u8] = b"ssncmdst";
/// Metadata record complete
const METADATA_END: &[u8] = b"ssncmden";
/// Track artist chunk
const ARTIST: &[u8] = b"coreasar";
/// Track album chunk
const ALBUM: &[u8] = b"coreasal";
/// Track title chunk
const TITLE: &[u8] = b"coreminm";

/// Name reported when the session carries none
const DEFAULT_USER: &str = "unknown";

/// Stateful decoder for the airplay receiver
///
/// Keep one instance per event stream and feed it every payload in order.
#[derive(Debug, Default)]
pub struct AirplayDecoder {
    partial: Song,
}

impl AirplayDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one payload, updating the metadata accumulator as needed
    ///
    /// Returns `None` for payloads that do not complete an event (unknown
    /// codes, metadata chunks, record start).
    pub fn decode(&mut self, payload: &[u8]) -> Option<Event> {
        if payload == PLAYBACK_BEGIN {
            return Some(Event::playing(Source::Airplay, true));
        }
        if payload == PLAYBACK_END {
            return Some(Event::playing(Source::Airplay, false));
        }
        if let Some(data) = chunk(payload, SESSION_NAME) {
            let name = if data.is_empty() { DEFAULT_USER } else { data };
            return Some(Event::user(Source::Airplay, name));
        }
        if payload.starts_with(DISCONNECT) {
            return Some(Event::user(Source::Airplay, ""));
        }
        if payload.starts_with(METADATA_START) {
            self.partial = Song::default();
            return None;
        }
        if payload.starts_with(METADATA_END) {
            return Some(Event::song(Source::Airplay, core::mem::take(&mut self.partial)));
        }
        if let Some(artist) = chunk(payload, ARTIST) {
            self.partial.artist = field(artist);
            return None;
        }
        if let Some(album) = chunk(payload, ALBUM) {
            self.partial.album = field(album);
            return None;
        }
        if let Some(title) = chunk(payload, TITLE) {
            self.partial.title = field(title);
            return None;
        }
        None
    }
}

/// Split off a code prefix and return the data as text
fn chunk<'a>(payload: &'a [u8], code: &[u8]) -> Option<&'a str> {
    debug_assert_eq!(code.len(), CODE_LEN);
    let data = payload.strip_prefix(code)?;
    core::str::from_utf8(data).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Payload, User};

    extern crate std;
    use proptest::prelude::*;

    #[test]
    fn test_session_name() {
        let mut decoder = AirplayDecoder::new();
        assert_eq!(
            decoder.decode(b"ssncsnamTest"),
            Some(Event::user(Source::Airplay, "Test"))
        );
    }

    #[test]
    fn test_nameless_session_gets_default() {
        let mut decoder = AirplayDecoder::new();
        assert_eq!(
            decoder.decode(b"ssncsnam"),
            Some(Event::user(Source::Airplay, "unknown"))
        );
    }

    #[test]
    fn test_disconnect() {
        let mut decoder = AirplayDecoder::new();
        let event = decoder.decode(b"ssncdisc").unwrap();
        match event.payload {
            Payload::User(user) => assert!(user.is_empty()),
            other => panic!("expected user payload, got {:?}", other),
        }
    }

    #[test]
    fn test_playback_markers_are_exact() {
        let mut decoder = AirplayDecoder::new();
        assert_eq!(
            decoder.decode(b"ssncpbeg"),
            Some(Event::playing(Source::Airplay, true))
        );
        assert_eq!(
            decoder.decode(b"ssncpend"),
            Some(Event::playing(Source::Airplay, false))
        );
        // Trailing data disqualifies the playback markers
        assert_eq!(decoder.decode(b"ssncpbeg0"), None);
        assert_eq!(decoder.decode(b"ssncpendX"), None);
    }

    #[test]
    fn test_metadata_assembly() {
        let mut decoder = AirplayDecoder::new();
        assert_eq!(decoder.decode(b"ssncmdst84821380"), None);
        assert_eq!(decoder.decode(b"coreasarDaft Punk"), None);
        assert_eq!(decoder.decode(b"coreasalDiscovery"), None);
        assert_eq!(decoder.decode(b"coreminmOne More Time"), None);
        assert_eq!(
            decoder.decode(b"ssncmden84821380"),
            Some(Event::song(
                Source::Airplay,
                Song::new("Daft Punk", "Discovery", "One More Time")
            ))
        );
    }

    #[test]
    fn test_metadata_field_order_is_free() {
        let mut decoder = AirplayDecoder::new();
        decoder.decode(b"ssncmdst");
        decoder.decode(b"coreminmSo What");
        decoder.decode(b"coreasarMiles Davis");
        let event = decoder.decode(b"ssncmden").unwrap();
        assert_eq!(
            event.payload,
            Payload::Song(Song::new("Miles Davis", "", "So What"))
        );
    }

    #[test]
    fn test_restart_discards_partial_record() {
        let mut decoder = AirplayDecoder::new();
        decoder.decode(b"ssncmdst");
        decoder.decode(b"coreasarStale Artist");
        decoder.decode(b"ssncmdst");
        decoder.decode(b"coreminmFresh Title");
        let event = decoder.decode(b"ssncmden").unwrap();
        assert_eq!(
            event.payload,
            Payload::Song(Song::new("", "", "Fresh Title"))
        );
    }

    #[test]
    fn test_record_end_clears_accumulator() {
        let mut decoder = AirplayDecoder::new();
        decoder.decode(b"coreminmLeftover");
        decoder.decode(b"ssncmden");
        let event = decoder.decode(b"ssncmden").unwrap();
        assert_eq!(event.payload, Payload::Song(Song::default()));
    }

    #[test]
    fn test_instances_are_independent() {
        let mut first = AirplayDecoder::new();
        let mut second = AirplayDecoder::new();
        first.decode(b"coreasarOnly In First");
        let event = second.decode(b"ssncmden").unwrap();
        assert_eq!(event.payload, Payload::Song(Song::default()));
    }

    #[test]
    fn test_unknown_codes_ignored() {
        let mut decoder = AirplayDecoder::new();
        assert_eq!(decoder.decode(b"ssncpvol-20.0"), None);
        assert_eq!(decoder.decode(b"corePICTjunk"), None);
        assert_eq!(decoder.decode(b""), None);
    }

    #[test]
    fn test_full_session_flow() {
        let mut decoder = AirplayDecoder::new();
        let mut events = std::vec::Vec::new();
        for payload in [
            &b"ssncsnamAlice"[..],
            b"ssncmdst",
            b"coreasarKraftwerk",
            b"coreasalAutobahn",
            b"coreminmAutobahn",
            b"ssncmden",
            b"ssncpbeg",
            b"ssncpend",
            b"ssncdisc",
        ] {
            if let Some(event) = decoder.decode(payload) {
                events.push(event);
            }
        }
        assert_eq!(
            events,
            std::vec![
                Event::user(Source::Airplay, "Alice"),
                Event::song(
                    Source::Airplay,
                    Song::new("Kraftwerk", "Autobahn", "Autobahn")
                ),
                Event::playing(Source::Airplay, true),
                Event::playing(Source::Airplay, false),
                Event {
                    source: Source::Airplay,
                    payload: Payload::User(User::new("")),
                },
            ]
        );
    }

    proptest! {
        #[test]
        fn test_short_payloads_never_decode(payload in proptest::collection::vec(any::<u8>(), 0..CODE_LEN)) {
            let mut decoder = AirplayDecoder::new();
            prop_assert!(decoder.decode(&payload).is_none());
        }
    }
}
