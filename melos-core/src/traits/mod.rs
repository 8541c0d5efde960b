//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod switch;

pub use display::{DisplayError, NowPlayingDisplay};
pub use switch::Switch;
