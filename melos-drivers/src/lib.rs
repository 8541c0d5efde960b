//! Hardware drivers for the Melos appliance controller.
//!
//! Implementations of the control traits from [`melos_core`] against real
//! peripherals: GPIO-driven relay switches and an HD44780 character display
//! on a 4-bit parallel bus. Everything here is written over `embedded-hal`
//! traits so the drivers stay portable and unit-testable off-target.

#![no_std]
#![deny(unsafe_code)]

pub mod lcd;
pub mod switch;

pub use lcd::{Align, CharacterLcd, LcdPins};
pub use switch::{GpioSwitch, Polarity};
