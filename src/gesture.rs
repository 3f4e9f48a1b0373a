//! Gesture classification and interpretation.
//!
//! [`classifier`] holds the stateless per-frame predicates (fist, pinch, palm geometry);
//! [`state`] turns their output into a drawing command stream with debounced clear handling.

pub mod classifier;
pub mod state;
