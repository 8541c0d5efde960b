//! Configuration types for the appliance
//!
//! Plain data describing the fitted hardware: which GPIO lines drive the
//! amplifier switches and the display bus, display geometry, and event
//! dispatch policy. Loading is the platform's business (the firmware
//! ships a board preset); core components assume a config that passed
//! [`ApplianceConfig::validate`].

use heapless::String;

/// Widest supported display row (one HD44780 DDRAM line)
pub const MAX_DISPLAY_WIDTH: u8 = 40;

/// Capacity of the boot greeting text
pub const MAX_GREETING_LEN: usize = 32;

/// GPIO assignment for the amplifier power switches
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerConfig {
    /// Pin driving the "on" relay
    pub pin_on: u8,
    /// Pin driving the "standby" relay
    pub pin_standby: u8,
    /// Seconds to keep the amp on after playback stops
    pub standby_duration_secs: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            pin_on: 14,
            pin_standby: 15,
            standby_duration_secs: 600,
        }
    }
}

/// GPIO assignment for the display bus (4-bit mode)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LcdPinConfig {
    pub register_select: u8,
    pub enable: u8,
    pub data_4: u8,
    pub data_5: u8,
    pub data_6: u8,
    pub data_7: u8,
}

impl Default for LcdPinConfig {
    fn default() -> Self {
        Self {
            register_select: 8,
            enable: 9,
            data_4: 10,
            data_5: 11,
            data_6: 12,
            data_7: 13,
        }
    }
}

impl LcdPinConfig {
    /// All assigned pins in bus order
    pub fn pins(&self) -> [u8; 6] {
        [
            self.register_select,
            self.enable,
            self.data_4,
            self.data_5,
            self.data_6,
            self.data_7,
        ]
    }
}

/// Character cell height of the fitted panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontHeight {
    /// 5x8 dots (the common case)
    #[default]
    Dots8,
    /// 5x10 dots (some 1-line panels)
    Dots10,
}

/// Display geometry and wiring
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    pub pins: LcdPinConfig,
    /// Characters per line
    pub width: u8,
    /// Number of lines (1, 2 or 4)
    pub lines: u8,
    /// Character cell height
    pub font: FontHeight,
    /// Text shown after init, before the first song
    pub greeting: String<MAX_GREETING_LEN>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            pins: LcdPinConfig::default(),
            width: 16,
            lines: 2,
            font: FontHeight::default(),
            greeting: String::try_from("melos").unwrap_or_default(),
        }
    }
}

/// Event dispatch policy
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventsConfig {
    /// Budget for applying one event before it is dropped (milliseconds)
    pub process_timeout_ms: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            process_timeout_ms: 5_000,
        }
    }
}

/// Top-level appliance configuration
///
/// Power and display are each optional so a board can run with only one
/// effector fitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApplianceConfig {
    pub power: Option<PowerConfig>,
    pub display: Option<DisplayConfig>,
    pub events: EventsConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A GPIO line is assigned twice
    PinConflict(u8),
    /// Display width outside 1..=40
    BadWidth(u8),
    /// Display line count not 1, 2 or 4
    BadLineCount(u8),
    /// Event processing timeout is zero
    BadTimeout,
}

impl ApplianceConfig {
    /// Check cross-field consistency
    ///
    /// Components downstream assume these invariants and do not re-check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut assigned: heapless::Vec<u8, 8> = heapless::Vec::new();
        let mut assign = |pin: u8| -> Result<(), ConfigError> {
            if assigned.contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
            // Capacity covers every assignable pin (2 power + 6 display)
            let _ = assigned.push(pin);
            Ok(())
        };

        if let Some(power) = &self.power {
            assign(power.pin_on)?;
            assign(power.pin_standby)?;
        }
        if let Some(display) = &self.display {
            for pin in display.pins.pins() {
                assign(pin)?;
            }
            if display.width == 0 || display.width > MAX_DISPLAY_WIDTH {
                return Err(ConfigError::BadWidth(display.width));
            }
            if !matches!(display.lines, 1 | 2 | 4) {
                return Err(ConfigError::BadLineCount(display.lines));
            }
        }
        if self.events.process_timeout_ms == 0 {
            return Err(ConfigError::BadTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use proptest::prelude::*;

    fn full_config() -> ApplianceConfig {
        ApplianceConfig {
            power: Some(PowerConfig::default()),
            display: Some(DisplayConfig::default()),
            events: EventsConfig::default(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert_eq!(full_config().validate(), Ok(()));
        assert_eq!(ApplianceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_pin_conflict_across_sections() {
        let mut config = full_config();
        config.power.as_mut().unwrap().pin_on = 10; // collides with data_4
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(10)));
    }

    #[test]
    fn test_pin_conflict_within_display() {
        let mut config = full_config();
        config.display.as_mut().unwrap().pins.enable = 8; // collides with register_select
        assert_eq!(config.validate(), Err(ConfigError::PinConflict(8)));
    }

    #[test]
    fn test_width_bounds() {
        let mut config = full_config();
        config.display.as_mut().unwrap().width = 0;
        assert_eq!(config.validate(), Err(ConfigError::BadWidth(0)));
        config.display.as_mut().unwrap().width = 41;
        assert_eq!(config.validate(), Err(ConfigError::BadWidth(41)));
        config.display.as_mut().unwrap().width = 40;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_line_count() {
        for (lines, ok) in [(1, true), (2, true), (3, false), (4, true), (5, false)] {
            let mut config = full_config();
            config.display.as_mut().unwrap().lines = lines;
            assert_eq!(config.validate().is_ok(), ok, "lines = {}", lines);
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = full_config();
        config.events.process_timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::BadTimeout));
    }

    #[test]
    fn test_power_only_board() {
        let config = ApplianceConfig {
            power: Some(PowerConfig::default()),
            display: None,
            events: EventsConfig::default(),
        };
        assert_eq!(config.validate(), Ok(()));
    }

    proptest! {
        #[test]
        fn test_distinct_pins_always_validate(pins in proptest::sample::subsequence((0u8..30).collect::<std::vec::Vec<_>>(), 8)) {
            let config = ApplianceConfig {
                power: Some(PowerConfig {
                    pin_on: pins[0],
                    pin_standby: pins[1],
                    standby_duration_secs: 600,
                }),
                display: Some(DisplayConfig {
                    pins: LcdPinConfig {
                        register_select: pins[2],
                        enable: pins[3],
                        data_4: pins[4],
                        data_5: pins[5],
                        data_6: pins[6],
                        data_7: pins[7],
                    },
                    ..DisplayConfig::default()
                }),
                events: EventsConfig::default(),
            };
            prop_assert_eq!(config.validate(), Ok(()));
        }
    }
}
