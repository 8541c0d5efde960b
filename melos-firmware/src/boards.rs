//! Board presets
//!
//! Pin maps and geometry for the supported boards, expressed as appliance
//! configs. A preset is validated at startup before any peripheral is
//! claimed; the GPIO claims in `main` must mirror the numbers here.

use melos_core::config::{ApplianceConfig, DisplayConfig, EventsConfig, PowerConfig};

/// Reference build: Pico carrier with the amplifier relay pair on
/// GPIO14/15, a 16x2 panel on GPIO8..13, the event feed on UART0 and the
/// shutdown button on GPIO22.
pub fn pico_default() -> ApplianceConfig {
    ApplianceConfig {
        power: Some(PowerConfig::default()),
        display: Some(DisplayConfig::default()),
        events: EventsConfig::default(),
    }
}
