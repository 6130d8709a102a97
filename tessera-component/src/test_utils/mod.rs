//! Reusable fixtures for testing components and behaviors.
//!
//! Available behind the `test-utils` feature flag.

mod counter;
mod recorder;
mod tally;

pub use counter::{COUNTER, Counter};
pub use recorder::{Call, Recorder};
pub use tally::{TALLY, Tally};
