use std::collections::VecDeque;

use rand::{rngs::SmallRng, Rng};

/// Uniform index source behind every card draw.
pub trait RandomSource {
    /// Returns an index in `0..bound`. Callers never pass a zero bound.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl RandomSource for SmallRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// Replays a fixed sequence of indices, reducing each modulo the requested bound.
/// Once the script runs out every draw returns index 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<usize>,
}

impl ScriptedSource {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        ScriptedSource {
            script: script.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedSource {
    fn next_index(&mut self, bound: usize) -> usize {
        self.script.pop_front().map_or(0, |index| index % bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn scripted_source_replays_then_defaults_to_zero() {
        let mut source = ScriptedSource::new([3, 7, 15]);
        assert_eq!(source.next_index(13), 3);
        assert_eq!(source.next_index(13), 7);
        // 15 wraps into the 4-suit range
        assert_eq!(source.next_index(4), 3);
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.next_index(13), 0);
    }

    #[test]
    fn small_rng_stays_in_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        for bound in 1..=13 {
            for _ in 0..200 {
                assert!(rng.next_index(bound) < bound);
            }
        }
    }

    #[test]
    fn mutable_reference_forwards_to_source() {
        fn draw<S: RandomSource>(mut source: S) -> usize {
            source.next_index(13)
        }

        let mut source = ScriptedSource::new([5, 6]);
        assert_eq!(draw(&mut source), 5);
        assert_eq!(source.remaining(), 1);
    }
}
