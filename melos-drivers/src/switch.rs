//! Relay switch driver over a single GPIO output line.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use melos_core::traits::Switch;

/// Electrical polarity of the switch drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Driving the pin high engages the load.
    ActiveHigh,
    /// Driving the pin low engages the load.
    ActiveLow,
}

/// A relay or transistor switch behind one GPIO line.
///
/// Construction immediately drives the pin to its disengaged level, so the
/// load starts off no matter what state the pin reset to.
pub struct GpioSwitch<P> {
    pin: P,
    polarity: Polarity,
    on: bool,
}

impl<P: OutputPin<Error = Infallible>> GpioSwitch<P> {
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut switch = Self {
            pin,
            polarity,
            on: false,
        };
        switch.drive(false);
        switch
    }

    fn drive(&mut self, on: bool) {
        let high = match self.polarity {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        };
        if high {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
        self.on = on;
    }
}

impl<P: OutputPin<Error = Infallible>> Switch for GpioSwitch<P> {
    fn set_on(&mut self, on: bool) {
        self.drive(on);
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use core::cell::RefCell;
    use std::rc::Rc;
    use std::vec;
    use std::vec::Vec;

    #[derive(Clone, Default)]
    struct MockPin {
        levels: Rc<RefCell<Vec<bool>>>,
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.borrow_mut().push(true);
            Ok(())
        }
    }

    #[test]
    fn test_new_parks_pin_at_off_level() {
        let pin = MockPin::default();
        let levels = pin.levels.clone();
        let switch = GpioSwitch::new(pin, Polarity::ActiveHigh);
        assert!(!switch.is_on());
        assert_eq!(*levels.borrow(), vec![false]);

        let pin = MockPin::default();
        let levels = pin.levels.clone();
        let switch = GpioSwitch::new(pin, Polarity::ActiveLow);
        assert!(!switch.is_on());
        assert_eq!(*levels.borrow(), vec![true]);
    }

    #[test]
    fn test_set_on_respects_polarity() {
        let pin = MockPin::default();
        let levels = pin.levels.clone();
        let mut switch = GpioSwitch::new(pin, Polarity::ActiveHigh);
        switch.set_on(true);
        assert!(switch.is_on());
        assert_eq!(*levels.borrow(), vec![false, true]);

        let pin = MockPin::default();
        let levels = pin.levels.clone();
        let mut switch = GpioSwitch::new(pin, Polarity::ActiveLow);
        switch.set_on(true);
        assert!(switch.is_on());
        assert_eq!(*levels.borrow(), vec![true, false]);
    }

    #[test]
    fn test_switch_off_after_on() {
        let pin = MockPin::default();
        let levels = pin.levels.clone();
        let mut switch = GpioSwitch::new(pin, Polarity::ActiveHigh);
        switch.set_on(true);
        switch.set_on(false);
        assert!(!switch.is_on());
        assert_eq!(*levels.borrow(), vec![false, true, false]);
    }
}
