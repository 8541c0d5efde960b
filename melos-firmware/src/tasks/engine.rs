//! Engine task
//!
//! Owns the decoders, the session state and the power relays, and runs
//! the serialized event loop until shutdown is requested.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration};

use melos_core::config::ApplianceConfig;
use melos_core::ingest::Ingestor;
use melos_core::orchestrator::Orchestrator;
use melos_core::power::Power;
use melos_core::traits::NowPlayingDisplay;
use melos_drivers::{Align, CharacterLcd, GpioSwitch};

use crate::channels::{RAW_EVENTS, SHUTDOWN};

/// The panel as wired on the supported boards
pub type ApplianceLcd = CharacterLcd<CriticalSectionRawMutex, Output<'static>, Delay>;

/// A relay channel as wired on the supported boards
pub type RelaySwitch = GpioSwitch<Output<'static>>;

/// Engine task - event dispatch, session arbitration and teardown
#[embassy_executor::task]
pub async fn engine_task(
    display: &'static ApplianceLcd,
    power: Power<RelaySwitch>,
    config: ApplianceConfig,
) {
    info!("Engine task started");

    match display.init().await {
        Ok(()) => {
            if let Some(display_config) = &config.display {
                let _ = display
                    .display_message(&display_config.greeting, Align::Center)
                    .await;
            }
        }
        Err(e) => error!("Display init failed: {:?}", e),
    }

    let mut orchestrator = Orchestrator::new(Some(display), Some(power));
    let mut ingestor = Ingestor::new(Duration::from_millis(
        config.events.process_timeout_ms as u64,
    ));

    match ingestor
        .run(RAW_EVENTS.receiver(), &mut orchestrator, &SHUTDOWN)
        .await
    {
        Ok(()) => info!("Shutdown requested, tearing down"),
        Err(e) => error!("Engine stopped on display fault: {:?}", e),
    }

    if let Err(e) = orchestrator.shutdown().await {
        warn!("Display teardown failed: {:?}", e);
    }
    if ingestor.timed_out() > 0 {
        warn!("{} event(s) dropped on timeout", ingestor.timed_out());
    }
    info!("Engine stopped");
}
