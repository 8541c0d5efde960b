//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use melos_protocol::RawPayload;

/// Channel capacity for payloads from the transport
pub const RAW_EVENT_CHANNEL_SIZE: usize = 8;

/// Framed payload lines from the event feed, oldest first
pub static RAW_EVENTS: Channel<CriticalSectionRawMutex, RawPayload, RAW_EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Asks the engine to tear down cleanly (shutdown button)
pub static SHUTDOWN: Signal<CriticalSectionRawMutex, ()> = Signal::new();
