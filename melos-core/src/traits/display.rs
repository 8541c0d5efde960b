//! Now-playing display trait

use melos_protocol::Song;

/// Errors that can occur with display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Operation issued before `init` (or after `stop`)
    ///
    /// This is a coordination bug in the caller, not a transient fault.
    NotReady,
    /// A bus pin write failed
    Bus,
}

/// Trait for the now-playing display
///
/// Methods are async because real implementations wait out controller
/// timing between bus writes. Methods take `&self`: implementations
/// serialize bus access internally, so init, updates and teardown can be
/// issued through shared references from different callers.
#[allow(async_fn_in_trait)]
pub trait NowPlayingDisplay {
    /// Bring the controller up; idempotent
    async fn init(&self) -> Result<(), DisplayError>;

    /// Blank the screen, keeping it ready for the next write
    async fn clear(&self) -> Result<(), DisplayError>;

    /// Render a song; the line layout depends on the configured line count
    async fn display_now_playing(&self, song: &Song) -> Result<(), DisplayError>;

    /// Blank the screen and release the controller; idempotent
    async fn stop(&self) -> Result<(), DisplayError>;
}
