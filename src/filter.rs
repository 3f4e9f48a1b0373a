//! Signal filtering and smoothing.

mod bank;
mod ema;
mod one_euro;

pub use bank::FilterBank;
pub use ema::Ema;
pub use one_euro::{OneEuroFilter, OneEuroParams};

/// A filter for values of type `V`, fed at a fixed cadence.
pub trait Filter<V> {
    /// Adds a new value to the filter, returning the filtered value.
    fn push(&mut self, value: V) -> V;

    /// Resets the accumulated history and state of the filter to be identical to the state just
    /// after construction.
    fn reset(&mut self);
}

impl<V> Filter<V> for Box<dyn Filter<V>> {
    fn push(&mut self, value: V) -> V {
        (**self).push(value)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// A filter for irregularly sampled values of type `V`.
///
/// Implementations consume `(timestamp, value)` pairs; the time step between consecutive samples
/// may vary from call to call, and the filter's response depends on it.
pub trait TimeBasedFilter<V> {
    /// Feeds a timestamped sample to the filter, returning the filtered value.
    ///
    /// Timestamps are in seconds. A sample whose timestamp does not advance past the previous
    /// one returns the last filtered value and leaves the filter state untouched.
    fn filter(&mut self, time: f64, value: V) -> V;

    /// Reseeds the filter at `(time, value)`, discarding accumulated state.
    fn reset(&mut self, time: f64, value: V);
}

impl<V> TimeBasedFilter<V> for Box<dyn TimeBasedFilter<V>> {
    fn filter(&mut self, time: f64, value: V) -> V {
        (**self).filter(time, value)
    }

    fn reset(&mut self, time: f64, value: V) {
        (**self).reset(time, value);
    }
}
