//! On/off output switch trait

/// Trait for one logical on/off output line
///
/// Implementations drive a relay, transistor or indicator via GPIO.
/// The logical state is decoupled from the electrical level so active-low
/// wiring stays an implementation detail.
pub trait Switch {
    /// Engage or release the switch
    fn set_on(&mut self, on: bool);

    /// Check if the switch is currently engaged
    fn is_on(&self) -> bool;
}
