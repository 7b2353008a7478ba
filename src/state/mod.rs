//! State - Ordering primitives shared by the input and surface layers.
//!
//! - **Sequencer** - Monotonic event counts and the staleness predicate

pub mod sequencer;

pub use sequencer::*;
