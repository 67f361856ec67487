//! Seeded streams and chunk selection.
//!
//! The encoder and the decoder never talk to each other; they only agree
//! because both derive the exact same chunk indices from a packet seed.
//! Everything in this module is therefore pinned: the generator is
//! ChaCha8 keyed through `seed_from_u64`, and bounded values come out of
//! the widening-multiply reduction written below. Changing either
//! changes the meaning of every packet ever emitted.

use std::collections::BTreeSet;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Infinite stream of uniform values in `[0, bound)` derived from a seed.
///
/// Restarting from the same seed reproduces the same sequence.
pub(crate) struct UniformStream {
    rng: ChaCha8Rng,
    bound: u32,
}

impl UniformStream {
    /// `bound` must be non zero.
    pub(crate) fn new(seed: u32, bound: u32) -> Self {
        debug_assert!(bound != 0);
        Self {
            rng: ChaCha8Rng::seed_from_u64(u64::from(seed)),
            bound,
        }
    }

    /// Next value of the stream.
    //
    // Widening multiply with rejection: x maps to (x * bound) >> 32,
    // rejecting the low products that would over-represent small values.
    // Spelled out here instead of going through `Rng::gen_range` because
    // the exact integer sequence is part of the packet format and must
    // not drift with the sampler internals of another crate.
    pub(crate) fn next(&mut self) -> u32 {
        let threshold = self.bound.wrapping_neg() % self.bound;
        loop {
            let wide = u64::from(self.rng.next_u32()) * u64::from(self.bound);
            if wide as u32 >= threshold {
                return (wide >> 32) as u32;
            }
        }
    }

    /// Next raw 32-bit value of the underlying stream, usable as the
    /// seed of a nested stream.
    pub(crate) fn next_seed(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// Infinite stream of per-packet seeds derived from the top-level seed.
pub(crate) struct SeedStream {
    rng: ChaCha8Rng,
}

impl SeedStream {
    pub(crate) fn new(seed: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(u64::from(seed)),
        }
    }

    pub(crate) fn next(&mut self) -> u32 {
        self.rng.next_u32()
    }
}

/// Draws `count` chunk indices from the stream.
///
/// Draws are used directly: an index may come up more than once, and
/// duplicate pairs cancel under XOR.
pub(crate) fn select(count: u32, stream: &mut UniformStream) -> Vec<u32> {
    (0..count).map(|_| stream.next()).collect()
}

/// Expands a packet seed into its effective set of chunk indices.
///
/// The first value of the seed's stream is the degree minus one; the
/// next raw value of the same stream seeds the nested stream the
/// indices are drawn from. The nested seed is taken raw rather than
/// bounded so that index sequences stay distinct across packets even
/// when the chunk count is tiny. Indices drawn an even number of times
/// cancel out of the set, so the set can be empty for degenerate draws.
pub(crate) fn packet_indices(seed: u32, chunk_count: u32) -> BTreeSet<u32> {
    let mut stream = UniformStream::new(seed, chunk_count);
    let degree = stream.next() + 1;
    let mut indices = UniformStream::new(stream.next_seed(), chunk_count);

    let mut set = BTreeSet::new();
    for index in select(degree, &mut indices) {
        if !set.remove(&index) {
            set.insert(index);
        }
    }
    set
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = UniformStream::new(1234, 100);
        let mut b = UniformStream::new(1234, 100);

        for _ in 0..256 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn restarting_reproduces_the_prefix() {
        let mut stream = UniformStream::new(42, 17);
        let prefix: Vec<u32> = (0..64).map(|_| stream.next()).collect();

        let mut restarted = UniformStream::new(42, 17);
        let again: Vec<u32> = (0..64).map(|_| restarted.next()).collect();
        assert_eq!(prefix, again);
    }

    #[test]
    fn values_respect_the_bound() {
        for bound in [1u32, 2, 3, 7, 100, 1000] {
            let mut stream = UniformStream::new(99, bound);
            for _ in 0..512 {
                assert!(stream.next() < bound);
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = UniformStream::new(1, 1000);
        let mut b = UniformStream::new(2, 1000);

        let a_values: Vec<u32> = (0..64).map(|_| a.next()).collect();
        let b_values: Vec<u32> = (0..64).map(|_| b.next()).collect();
        assert_ne!(a_values, b_values);
    }

    #[test]
    fn bound_of_one_pins_the_stream_to_zero() {
        let mut stream = UniformStream::new(7, 1);
        for _ in 0..32 {
            assert_eq!(stream.next(), 0);
        }
    }

    #[test]
    fn select_draws_the_requested_count() {
        let mut stream = UniformStream::new(5, 10);
        assert_eq!(select(4, &mut stream).len(), 4);
        assert_eq!(select(0, &mut stream).len(), 0);
    }

    #[test]
    fn seed_streams_are_deterministic() {
        let mut a = SeedStream::new(14);
        let mut b = SeedStream::new(14);
        for _ in 0..64 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn packet_indices_are_reproducible_and_in_range() {
        for seed in 0..64u32 {
            let indices = packet_indices(seed, 23);
            assert_eq!(indices, packet_indices(seed, 23));
            assert!(indices.len() <= 23);
            for index in indices {
                assert!(index < 23);
            }
        }
    }

    #[test]
    fn single_chunk_payloads_always_select_chunk_zero() {
        for seed in 0..32u32 {
            let indices = packet_indices(seed, 1);
            assert_eq!(indices.into_iter().collect::<Vec<u32>>(), vec![0]);
        }
    }
}
