//! A keyed set of adaptive filters advanced in lockstep.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use nalgebra::Vector2;

use super::{OneEuroFilter, TimeBasedFilter};

/// A named collection of independent [`OneEuroFilter`]s over 2-D points.
///
/// Each key owns its own filter state and parameters; there is no cross-filter coupling, and the
/// evaluation order is irrelevant. The bank exists so that every tracked point of a frame is
/// filtered against the same timestamp.
#[derive(Debug, Clone)]
pub struct FilterBank<K> {
    filters: HashMap<K, OneEuroFilter<2>>,
}

impl<K> Default for FilterBank<K> {
    fn default() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash + fmt::Debug> FilterBank<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a filter under `key`, replacing any previous registration.
    pub fn insert(&mut self, key: K, filter: OneEuroFilter<2>) {
        self.filters.insert(key, filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Feeds every registered filter its raw value for this frame, all at the same timestamp.
    ///
    /// Returns the filtered values under the same keys.
    ///
    /// # Panics
    ///
    /// Panics unless `raw` holds exactly the registered keys; the bank advances together or not
    /// at all.
    pub fn advance(
        &mut self,
        time: f64,
        raw: &HashMap<K, Vector2<f32>>,
    ) -> HashMap<K, Vector2<f32>> {
        assert_eq!(raw.len(), self.filters.len());
        self.filters
            .iter_mut()
            .map(|(key, filter)| {
                let value = raw
                    .get(key)
                    .unwrap_or_else(|| panic!("no raw value for key {key:?}"));
                (*key, filter.filter(time, *value))
            })
            .collect()
    }

    /// Reseeds every registered filter at its raw value, as if newly constructed at `time`.
    ///
    /// # Panics
    ///
    /// Panics unless `raw` holds exactly the registered keys.
    pub fn reset(&mut self, time: f64, raw: &HashMap<K, Vector2<f32>>) {
        assert_eq!(raw.len(), self.filters.len());
        for (key, filter) in &mut self.filters {
            let value = raw
                .get(key)
                .unwrap_or_else(|| panic!("no raw value for key {key:?}"));
            filter.reset(time, *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::OneEuroParams;

    use super::*;

    fn params(min_cutoff: f32) -> OneEuroParams {
        OneEuroParams {
            min_cutoff,
            ..OneEuroParams::default()
        }
    }

    #[test]
    fn filters_stay_independent() {
        let mut bank = FilterBank::new();
        bank.insert("a", OneEuroFilter::new(0.0, Vector2::new(0.0, 0.0), params(1.0)));
        bank.insert("b", OneEuroFilter::new(0.0, Vector2::new(1.0, 1.0), params(4.0)));

        let mut standalone_a = OneEuroFilter::new(0.0, Vector2::new(0.0, 0.0), params(1.0));
        let mut standalone_b = OneEuroFilter::new(0.0, Vector2::new(1.0, 1.0), params(4.0));

        let mut time = 0.0;
        for i in 0..10 {
            time += 1.0 / 30.0;
            let sample_a = Vector2::new(i as f32 * 0.1, 0.5);
            let sample_b = Vector2::new(0.5, 1.0 - i as f32 * 0.1);
            let raw = HashMap::from([("a", sample_a), ("b", sample_b)]);

            let filtered = bank.advance(time, &raw);
            assert_eq!(filtered[&"a"], standalone_a.filter(time, sample_a));
            assert_eq!(filtered[&"b"], standalone_b.filter(time, sample_b));
        }
    }

    #[test]
    fn reset_reseeds_every_filter() {
        let mut bank = FilterBank::new();
        bank.insert("a", OneEuroFilter::new(0.0, Vector2::new(0.0, 0.0), params(1.0)));

        bank.advance(0.1, &HashMap::from([("a", Vector2::new(0.4, 0.4))]));
        bank.reset(1.0, &HashMap::from([("a", Vector2::new(0.9, 0.9))]));

        let filtered = bank.advance(1.0, &HashMap::from([("a", Vector2::new(0.0, 0.0))]));
        // The reseeded timestamp makes this frame a duplicate, returning the seed unchanged.
        assert_eq!(filtered[&"a"], Vector2::new(0.9, 0.9));
    }

    #[test]
    #[should_panic]
    fn rejects_missing_raw_values() {
        let mut bank = FilterBank::new();
        bank.insert("a", OneEuroFilter::new(0.0, Vector2::new(0.0, 0.0), params(1.0)));
        bank.insert("b", OneEuroFilter::new(0.0, Vector2::new(0.0, 0.0), params(1.0)));

        bank.advance(1.0, &HashMap::from([("a", Vector2::new(0.0, 0.0))]));
    }
}
