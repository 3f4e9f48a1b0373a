//! Exponential Moving Average.

use nalgebra::SVector;

use super::Filter;

/// An Exponential Moving Average (EMA) filter over fixed-width vector signals.
///
/// Unlike the adaptive filter, the EMA weighs samples by arrival order alone; it is used as a
/// cheap secondary smoothing stage where the sample cadence is steady enough for that to hold.
#[derive(Debug, Clone, Copy)]
pub struct Ema<const N: usize> {
    alpha: f32,
    last: Option<SVector<f32, N>>,
}

impl<const N: usize> Ema<N> {
    /// Creates a new Exponential Moving Average filter.
    ///
    /// `alpha` defines how quickly the weight of older values decays: values close to 1.0
    /// strongly favor the newest sample, values close to 0.0 favor the accumulated history.
    ///
    /// # Panics
    ///
    /// This method will panic if `alpha` is not in between 0.0 and 1.0.
    pub fn new(alpha: f32) -> Self {
        assert!(alpha >= 0.0 && alpha <= 1.0);
        Self { alpha, last: None }
    }
}

impl<const N: usize> Filter<SVector<f32, N>> for Ema<N> {
    fn push(&mut self, value: SVector<f32, N>) -> SVector<f32, N> {
        match self.last {
            Some(last) => {
                let avg = value * self.alpha + last * (1.0 - self.alpha);
                self.last = Some(avg);
                avg
            }
            None => {
                self.last = Some(value);
                value
            }
        }
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Vector1, Vector2};

    use super::*;

    #[test]
    fn test_ema() {
        let mut filter = Ema::new(0.5);
        assert_eq!(filter.push(Vector1::new(1.0)), Vector1::new(1.0));
        assert_eq!(filter.push(Vector1::new(2.0)), Vector1::new(1.5));
        assert_eq!(filter.push(Vector1::new(2.0)), Vector1::new(1.75));
    }

    #[test]
    fn reset_forgets_history() {
        let mut filter = Ema::new(0.25);
        filter.push(Vector2::new(1.0, -1.0));
        filter.push(Vector2::new(3.0, 5.0));
        filter.reset();
        assert_eq!(filter.push(Vector2::new(8.0, 9.0)), Vector2::new(8.0, 9.0));
    }
}
