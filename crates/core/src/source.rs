//! Piece sources - where upcoming pieces come from
//!
//! The engine only ever asks a [`PieceSource`] for "the next piece". Three
//! implementations are provided:
//!
//! - [`RandomSource`]: uniform choice among the seven kinds (the default)
//! - [`BagSource`]: the 7-bag randomizer on a small deterministic LCG
//! - [`SequenceSource`]: a fixed, repeating list for tests and scripted play
//!
//! Closures `FnMut() -> PieceKind` are sources too.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Supplier of upcoming pieces.
pub trait PieceSource {
    fn next_piece(&mut self) -> PieceKind;
}

impl<F> PieceSource for F
where
    F: FnMut() -> PieceKind,
{
    fn next_piece(&mut self) -> PieceKind {
        self()
    }
}

/// Uniformly random pieces.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource for RandomSource {
    fn next_piece(&mut self) -> PieceKind {
        PieceKind::ALL[self.rng.random_range(0..PieceKind::ALL.len())]
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        self.next_u32() % max
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator: every run of seven pieces is a permutation of all kinds.
#[derive(Debug, Clone)]
pub struct BagSource {
    bag: [PieceKind; 7],
    bag_index: usize,
    rng: SimpleRng,
}

impl BagSource {
    pub fn new(seed: u32) -> Self {
        let mut source = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        source.refill_bag();
        source
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Pieces left in the current bag
    pub fn remaining(&self) -> &[PieceKind] {
        &self.bag[self.bag_index..]
    }
}

impl PieceSource for BagSource {
    fn next_piece(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }
}

/// Repeats a fixed list of pieces forever.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    pieces: Vec<PieceKind>,
    next: usize,
}

impl SequenceSource {
    /// An empty list falls back to catalog order.
    pub fn new(pieces: impl IntoIterator<Item = PieceKind>) -> Self {
        let mut pieces: Vec<PieceKind> = pieces.into_iter().collect();
        if pieces.is_empty() {
            pieces.extend(PieceKind::ALL);
        }
        Self { pieces, next: 0 }
    }

    /// Parse a compact piece string such as `"ITOSZJL"`; unknown letters are skipped.
    pub fn parse(s: &str) -> Self {
        Self::new(s.chars().filter_map(|c| PieceKind::from_str(&c.to_string())))
    }
}

impl PieceSource for SequenceSource {
    fn next_piece(&mut self) -> PieceKind {
        let piece = self.pieces[self.next];
        self.next = (self.next + 1) % self.pieces.len();
        piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_bag_draws_all_seven() {
        let mut source = BagSource::new(1);
        assert_eq!(source.remaining().len(), 7);

        let mut drawn: Vec<PieceKind> = (0..7).map(|_| source.next_piece()).collect();
        drawn.sort_by_key(PieceKind::index);
        assert_eq!(drawn, PieceKind::ALL);
        assert!(source.remaining().is_empty());

        // Eighth draw starts a fresh bag.
        source.next_piece();
        assert_eq!(source.remaining().len(), 6);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let mut a = RandomSource::seeded(7);
        let mut b = RandomSource::seeded(7);
        let seq_a: Vec<_> = (0..50).map(|_| a.next_piece()).collect();
        let seq_b: Vec<_> = (0..50).map(|_| b.next_piece()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_random_covers_every_kind() {
        let mut source = RandomSource::seeded(42);
        let mut seen = [false; 7];
        for _ in 0..500 {
            seen[source.next_piece().index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_sequence_cycles() {
        let mut source = SequenceSource::parse("ioX");
        let drawn: Vec<_> = (0..5).map(|_| source.next_piece()).collect();
        assert_eq!(
            drawn,
            [PieceKind::I, PieceKind::O, PieceKind::I, PieceKind::O, PieceKind::I]
        );
    }

    #[test]
    fn test_closure_is_a_source() {
        let mut source = || PieceKind::Z;
        assert_eq!(source.next_piece(), PieceKind::Z);
    }
}
