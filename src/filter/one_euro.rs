//! One Euro filter: adaptive low-latency smoothing for irregularly sampled signals.
//!
//! An exponential low-pass whose cutoff frequency adapts to the estimated rate of change of the
//! signal: slow movement is smoothed aggressively (suppressing jitter), fast movement widens the
//! cutoff (reducing lag). That trade-off is the whole point of the algorithm; `beta` decides how
//! strongly speed widens the cutoff.
//!
//! See <https://gery.casiez.net/1euro/> for the original description.

use std::f32::consts::TAU;

use nalgebra::SVector;

use super::TimeBasedFilter;

/// Tuning parameters for a [`OneEuroFilter`].
///
/// The same parameters apply to every dimension of the filtered signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneEuroParams {
    /// Minimum cutoff frequency in Hz. Lower values smooth more, at the cost of lag.
    pub min_cutoff: f32,
    /// Speed coefficient. Higher values track fast motion more closely, at the cost of jitter.
    pub beta: f32,
    /// Cutoff frequency in Hz of the low-pass applied to the derivative estimate.
    pub d_cutoff: f32,
}

impl Default for OneEuroParams {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.05,
            d_cutoff: 0.8,
        }
    }
}

/// An adaptive low-pass filter over scalar or fixed-width vector signals.
///
/// `N` is the signal width; a scalar is a width-1 vector. All arithmetic is element-wise, so
/// every dimension is smoothed independently, with its own derivative estimate and adaptive
/// cutoff. Parameters are broadcast to the signal width at construction and never change
/// afterwards.
#[derive(Debug, Clone)]
pub struct OneEuroFilter<const N: usize> {
    min_cutoff: SVector<f32, N>,
    beta: SVector<f32, N>,
    d_cutoff: SVector<f32, N>,
    x_prev: SVector<f32, N>,
    dx_prev: SVector<f32, N>,
    t_prev: f64,
}

impl<const N: usize> OneEuroFilter<N> {
    /// Creates a filter seeded at time `time` (seconds) with value `value` and zero derivative.
    ///
    /// # Panics
    ///
    /// Panics if `params.min_cutoff` or `params.d_cutoff` is not strictly positive, or if
    /// `params.beta` is negative. The smoothing coefficient degenerates for non-positive
    /// cutoffs, so they are rejected instead of clamped.
    pub fn new(time: f64, value: SVector<f32, N>, params: OneEuroParams) -> Self {
        Self::with_derivative(time, value, SVector::zeros(), params)
    }

    /// Like [`OneEuroFilter::new`], but seeds the derivative estimate with `derivative`.
    pub fn with_derivative(
        time: f64,
        value: SVector<f32, N>,
        derivative: SVector<f32, N>,
        params: OneEuroParams,
    ) -> Self {
        assert!(params.min_cutoff > 0.0);
        assert!(params.d_cutoff > 0.0);
        assert!(params.beta >= 0.0);
        Self {
            min_cutoff: SVector::repeat(params.min_cutoff),
            beta: SVector::repeat(params.beta),
            d_cutoff: SVector::repeat(params.d_cutoff),
            x_prev: value,
            dx_prev: derivative,
            t_prev: time,
        }
    }

    /// Returns the most recent filtered value.
    pub fn value(&self) -> SVector<f32, N> {
        self.x_prev
    }

    /// Returns the timestamp of the most recent accepted sample.
    pub fn time(&self) -> f64 {
        self.t_prev
    }
}

impl<const N: usize> TimeBasedFilter<SVector<f32, N>> for OneEuroFilter<N> {
    fn filter(&mut self, time: f64, value: SVector<f32, N>) -> SVector<f32, N> {
        let elapsed = (time - self.t_prev) as f32;
        if elapsed <= 0.0 {
            // Clock jitter or a duplicate frame; keep the previous output.
            return self.x_prev;
        }

        let a_d = self.d_cutoff.map(|cutoff| smoothing_factor(elapsed, cutoff));
        let dx = (value - self.x_prev) / elapsed;
        let dx_hat = exponential_smoothing(a_d, dx, self.dx_prev);

        // Faster estimated motion widens the cutoff, trading smoothing for responsiveness.
        let cutoff = self.min_cutoff + self.beta.component_mul(&dx_hat.abs());
        let a = cutoff.map(|cutoff| smoothing_factor(elapsed, cutoff));
        let x_hat = exponential_smoothing(a, value, self.x_prev);

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        self.t_prev = time;
        x_hat
    }

    fn reset(&mut self, time: f64, value: SVector<f32, N>) {
        self.x_prev = value;
        self.dx_prev = SVector::zeros();
        self.t_prev = time;
    }
}

/// Maps a cutoff frequency and time step to a one-pole IIR coefficient in `(0, 1)`.
///
/// A larger time step or cutoff moves the coefficient towards 1 (more trust in the new sample).
fn smoothing_factor(elapsed: f32, cutoff: f32) -> f32 {
    let r = TAU * cutoff * elapsed;
    r / (r + 1.0)
}

/// `a·x + (1 − a)·x_prev`, element-wise.
fn exponential_smoothing<const N: usize>(
    a: SVector<f32, N>,
    x: SVector<f32, N>,
    x_prev: SVector<f32, N>,
) -> SVector<f32, N> {
    a.component_mul(&x) + (SVector::repeat(1.0) - a).component_mul(&x_prev)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Vector1, Vector2};

    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn seed_value_is_reported_unfiltered() {
        let filter = OneEuroFilter::new(2.0, Vector1::new(7.5), OneEuroParams::default());
        assert_eq!(filter.value(), Vector1::new(7.5));
        assert_eq!(filter.time(), 2.0);
    }

    #[test]
    fn stale_timestamps_are_ignored() {
        let mut filter = OneEuroFilter::new(0.0, Vector1::new(1.0), OneEuroParams::default());
        let out = filter.filter(FRAME, Vector1::new(2.0));

        // Neither a duplicate nor an earlier timestamp may disturb the filter, no matter the
        // sample value.
        assert_eq!(filter.filter(FRAME, Vector1::new(100.0)), out);
        assert_eq!(filter.filter(-1.0, Vector1::new(-100.0)), out);
        assert_eq!(filter.value(), out);
        assert_eq!(filter.time(), FRAME);
    }

    #[test]
    fn output_stays_between_previous_and_sample() {
        let mut rng = fastrand::Rng::with_seed(0x0e02_2024);
        let params = OneEuroParams {
            min_cutoff: 1.0,
            beta: 20.0,
            d_cutoff: 1.0,
        };
        let mut filter = OneEuroFilter::new(0.0, Vector2::new(0.5, 0.5), params);

        let mut time = 0.0;
        let mut prev = filter.value();
        for _ in 0..500 {
            time += rng.f64() * 0.05 + 1e-4;
            let sample = Vector2::new(rng.f32(), rng.f32());
            let out = filter.filter(time, sample);
            for i in 0..2 {
                let lo = prev[i].min(sample[i]);
                let hi = prev[i].max(sample[i]);
                assert!(
                    out[i] >= lo - 1e-6 && out[i] <= hi + 1e-6,
                    "{} outside [{lo}, {hi}]",
                    out[i]
                );
            }
            prev = out;
        }
    }

    #[test]
    fn higher_beta_tracks_faster() {
        let step = |beta: f32| {
            let params = OneEuroParams {
                min_cutoff: 1.0,
                beta,
                d_cutoff: 0.8,
            };
            let mut filter = OneEuroFilter::new(0.0, Vector1::new(0.0), params);
            filter.filter(FRAME, Vector1::new(1.0))[0]
        };

        let sluggish = step(0.0);
        let responsive = step(5.0);
        assert!(responsive > sluggish);
        assert!(responsive < 1.0);
    }

    #[test]
    fn dimensions_are_independent() {
        let params = OneEuroParams::default();
        let mut pair = OneEuroFilter::new(0.0, Vector2::new(0.25, 0.75), params);
        let mut x = OneEuroFilter::new(0.0, Vector1::new(0.25), params);
        let mut y = OneEuroFilter::new(0.0, Vector1::new(0.75), params);

        let mut time = 0.0;
        for i in 0..20 {
            time += FRAME;
            let sample = Vector2::new(0.25 + i as f32 * 0.01, 0.75 - i as f32 * 0.02);
            let out = pair.filter(time, sample);
            assert_relative_eq!(out[0], x.filter(time, Vector1::new(sample[0]))[0]);
            assert_relative_eq!(out[1], y.filter(time, Vector1::new(sample[1]))[0]);
        }
    }

    #[test]
    fn reset_discards_history() {
        let mut filter = OneEuroFilter::new(0.0, Vector1::new(0.0), OneEuroParams::default());
        for i in 1..10 {
            filter.filter(i as f64 * FRAME, Vector1::new(i as f32));
        }

        filter.reset(5.0, Vector1::new(42.0));
        assert_eq!(filter.value(), Vector1::new(42.0));
        assert_eq!(filter.time(), 5.0);

        // With a zeroed derivative, the next step behaves like the first after construction.
        let fresh = OneEuroFilter::new(5.0, Vector1::new(42.0), OneEuroParams::default())
            .filter(5.0 + FRAME, Vector1::new(43.0));
        assert_eq!(filter.filter(5.0 + FRAME, Vector1::new(43.0)), fresh);
    }

    #[test]
    #[should_panic]
    fn rejects_non_positive_min_cutoff() {
        OneEuroFilter::new(
            0.0,
            Vector1::new(0.0),
            OneEuroParams {
                min_cutoff: 0.0,
                ..OneEuroParams::default()
            },
        );
    }

    #[test]
    #[should_panic]
    fn rejects_non_positive_d_cutoff() {
        OneEuroFilter::new(
            0.0,
            Vector1::new(0.0),
            OneEuroParams {
                d_cutoff: -1.0,
                ..OneEuroParams::default()
            },
        );
    }
}
