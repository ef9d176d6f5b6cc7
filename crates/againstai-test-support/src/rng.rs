//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use againstai_core::rng::DeterministicRng;

/// An RNG that always returns `min`. Every invite code it produces is
/// `AAAAAA`, which makes it handy for exercising collision re-rolls.
#[derive(Debug, Default)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that replays a predetermined sequence, wrapping around when it runs
/// out. Each value is clamped into the requested range.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    ///
    /// # Panics
    ///
    /// Panics if `values` is empty.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value.clamp(min, max)
    }
}
