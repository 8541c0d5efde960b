//! Event ingestion: decoder routing and serialized dispatch
//!
//! One loop owns the orchestrator. Raw payloads arrive on a bounded
//! channel from the transport, are routed to a decoder by prefix, and the
//! decoded events are applied one at a time. A per-event timeout keeps a
//! stalled effector from wedging the loop.

use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};

use crate::orchestrator::Orchestrator;
use crate::traits::{DisplayError, NowPlayingDisplay, Switch};
use melos_protocol::{connect, AirplayDecoder, Event, RawPayload};

/// Payload prefix selecting the connect decoder
const CONNECT_PREFIX: &[u8] = b"connect:";

/// Event ingestor
///
/// Owns the stateful airplay decoder and the dispatch policy. Exactly one
/// instance feeds one orchestrator; dispatch concurrency is one by
/// construction, which is what lets the orchestrator go lock-free.
pub struct Ingestor {
    airplay: AirplayDecoder,
    process_timeout: Duration,
    timeouts: u32,
}

impl Ingestor {
    pub fn new(process_timeout: Duration) -> Self {
        Self {
            airplay: AirplayDecoder::new(),
            process_timeout,
            timeouts: 0,
        }
    }

    /// Route one raw payload to its decoder
    ///
    /// A `connect:` prefix is stripped and the remainder goes to the
    /// connect decoder; everything else goes to the airplay decoder.
    /// Payloads neither decoder recognizes are dropped silently.
    pub fn decode(&mut self, payload: &[u8]) -> Option<Event> {
        match payload.strip_prefix(CONNECT_PREFIX) {
            Some(rest) => connect::decode(rest),
            None => self.airplay.decode(payload),
        }
    }

    /// Events dropped because processing exceeded the timeout
    pub fn timed_out(&self) -> u32 {
        self.timeouts
    }

    /// Serialized dispatch loop
    ///
    /// Wakes on the next payload, the standby deadline or the stop
    /// signal, whichever comes first. Returns `Ok(())` when stopped; a
    /// display misuse error aborts the loop and is handed to the caller,
    /// which is expected to run teardown.
    pub async fn run<M, const N: usize, D, S>(
        &mut self,
        events: Receiver<'_, M, RawPayload, N>,
        orchestrator: &mut Orchestrator<'_, D, S>,
        stop: &Signal<M, ()>,
    ) -> Result<(), DisplayError>
    where
        M: RawMutex,
        D: NowPlayingDisplay,
        S: Switch,
    {
        loop {
            let wake = select3(
                events.receive(),
                orchestrator.standby_elapsed(),
                stop.wait(),
            )
            .await;
            match wake {
                Either3::First(payload) => {
                    let Some(event) = self.decode(&payload) else {
                        continue;
                    };
                    match with_timeout(self.process_timeout, orchestrator.process(event)).await {
                        Ok(applied) => applied?,
                        Err(_) => {
                            // The processing future was dropped mid-flight;
                            // the next correct event heals any partial effect.
                            self.timeouts = self.timeouts.saturating_add(1);
                            #[cfg(feature = "defmt")]
                            defmt::warn!("event processing timed out, dropped");
                        }
                    }
                }
                Either3::Second(()) => orchestrator.enter_standby(),
                Either3::Third(()) => return Ok(()),
            }
        }
    }
}
