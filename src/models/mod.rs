//! Data models for a fan-out run
//!
//! Defines work units, the shared execution context, and outcome types.

mod outcome;
mod work;

pub use outcome::{Outcome, ResultMessage};
pub use work::{ExecutionContext, WorkUnit};
