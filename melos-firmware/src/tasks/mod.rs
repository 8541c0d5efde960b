//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod engine;
pub mod shutdown;
pub mod transport;

pub use engine::engine_task;
pub use shutdown::shutdown_task;
pub use transport::transport_task;
