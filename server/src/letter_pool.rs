//! The bag of drawable tiles owned by a single match.
//!
//! Tiles are stored as uppercase ASCII letters. Every match builds its own
//! pool, so the internal lock only guards against accidental concurrent use
//! inside one match (for example cleanup racing the turn loop).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// (letters, points per tile, tiles per letter)
const LETTER_GROUPS: [(&str, u32, usize); 7] = [
    ("AEIOULNRST", 1, 12),
    ("DG", 2, 9),
    ("BCMP", 3, 6),
    ("FHVWY", 4, 5),
    ("K", 5, 3),
    ("JX", 8, 2),
    ("QZ", 10, 1),
];

struct PoolInner {
    bag: Vec<char>,
    rng: StdRng,
}

pub struct LetterPool {
    inner: Mutex<PoolInner>,
}

impl LetterPool {
    /// Creates a pool with the standard tile distribution.
    pub fn new() -> Self {
        Self::from_parts(standard_bag(), StdRng::from_entropy())
    }

    /// Standard distribution with a reproducible draw order.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_parts(standard_bag(), StdRng::seed_from_u64(seed))
    }

    /// Creates a pool holding exactly the given tiles.
    pub fn from_letters<I>(letters: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let bag = letters.into_iter().map(|c| c.to_ascii_uppercase()).collect();
        Self::from_parts(bag, StdRng::from_entropy())
    }

    fn from_parts(bag: Vec<char>, rng: StdRng) -> Self {
        Self {
            inner: Mutex::new(PoolInner { bag, rng }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolInner> {
        // The bag is always left consistent between statements, so a
        // poisoned lock still holds usable data.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes up to `count` tiles chosen uniformly at random. Returns fewer
    /// (possibly none) when the bag runs short.
    pub fn draw(&self, count: usize) -> Vec<char> {
        let mut inner = self.lock();
        let PoolInner { bag, rng } = &mut *inner;
        let count = count.min(bag.len());
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let index = rng.gen_range(0..bag.len());
            drawn.push(bag.swap_remove(index));
        }
        drawn
    }

    /// Puts tiles back into the bag.
    pub fn return_letters<I>(&self, letters: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.lock().bag.extend(letters);
    }

    pub fn remaining(&self) -> usize {
        self.lock().bag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Point value of a single tile; zero for anything outside the table.
    pub fn point_value(letter: char) -> u32 {
        let letter = letter.to_ascii_uppercase();
        LETTER_GROUPS
            .iter()
            .find(|(letters, _, _)| letters.contains(letter))
            .map(|(_, points, _)| *points)
            .unwrap_or(0)
    }

    pub fn word_points(word: &str) -> u32 {
        word.chars().map(Self::point_value).sum()
    }

    /// Number of tiles in a freshly built standard pool.
    pub fn standard_size() -> usize {
        LETTER_GROUPS
            .iter()
            .map(|(letters, _, frequency)| letters.len() * frequency)
            .sum()
    }
}

impl Default for LetterPool {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_bag() -> Vec<char> {
    let mut bag = Vec::with_capacity(LetterPool::standard_size());
    for (letters, _, frequency) in LETTER_GROUPS {
        for letter in letters.chars() {
            bag.extend(std::iter::repeat(letter).take(frequency));
        }
    }
    bag
}
