//! Event protocol for the Melos audio appliance controller
//!
//! Two upstream receiver helpers report what is happening on the network:
//! a Spotify-Connect-style helper ("connect") and an AirPlay-style helper
//! ("airplay"). Each sends short standalone payloads over a local
//! transport; this crate turns those raw bytes into typed [`Event`]s.
//!
//! # Payload overview
//!
//! ```text
//! connect:  "playing" | "paused" | "stopped"
//!           "user:<name>"
//!           "...artists:<artist>,album:<album>,title:<title>"
//!
//! airplay:  <8-byte code>[<data>]
//!           e.g. "ssncsnamAlice", "ssncpbeg", "coreminmSo What"
//! ```
//!
//! The connect format is stateless: every payload is a complete event. The
//! airplay format spreads one metadata record over several payloads, so its
//! decoder keeps a per-instance accumulator between calls.

#![no_std]
#![deny(unsafe_code)]

pub mod airplay;
pub mod connect;
pub mod events;

pub use airplay::AirplayDecoder;
pub use events::{Event, FieldString, Payload, Playing, RawPayload, Song, Source, User};
pub use events::{MAX_FIELD_LEN, MAX_MESSAGE_LEN};
