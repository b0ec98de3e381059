//! Deterministic `DeterministicRng` implementations for tests.

use wayfarer_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Selection always lands on the first candidate.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that returns values from a predetermined sequence, clamped into the
/// requested range. Panics if the sequence is exhausted. Used in tests that
/// need a specific template to be picked from the selector's shortlist.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, index: 0 }
    }

    /// Number of values handed out so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.index
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let val = self.values[self.index];
        self.index += 1;
        val.clamp(min, max.max(min))
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_rng_returns_min() {
        let mut rng = MockRng;
        assert_eq!(rng.next_u32_range(3, 9), 3);
    }

    #[test]
    fn test_sequence_rng_replays_and_clamps() {
        let mut rng = SequenceRng::new(vec![1, 7]);
        assert_eq!(rng.next_u32_range(0, 2), 1);
        assert_eq!(rng.next_u32_range(0, 2), 2);
        assert_eq!(rng.draws(), 2);
    }
}
