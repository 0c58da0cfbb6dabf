//! Fan-out/fan-in execution engine
//!
//! Launches one task per work unit, waits for all of them, then drains the
//! collected result messages.

mod aggregate;
mod parallel;
mod session;
mod tracker;

pub use aggregate::Aggregator;
pub use parallel::Dispatcher;
pub use session::RunSession;
