//! Board-agnostic core logic for the audio appliance controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (switch, now-playing display)
//! - Session orchestration (who owns the appliance, what it shows)
//! - Amplifier power control with standby timeout
//! - Event ingestion: decoder routing and serialized dispatch
//! - Configuration type definitions and validation

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod ingest;
pub mod orchestrator;
pub mod power;
pub mod session;
pub mod traits;
