//! # Seeded Random Source
//!
//! Reproducible pseudo-random streams derived from string seeds.
//!
//! The arithmetic here is part of the output contract: maps generated from the
//! same seed must be bit-identical across releases, so the FNV-1a seeding and
//! the 13/17/5 xorshift step use exact unsigned 32-bit wraparound.

use rand::RngCore;

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// State used when a seed hashes to zero, which xorshift cannot leave.
const ZERO_STATE_FALLBACK: u32 = 0x9E37_79B9;

/// Hashes a string with 32-bit FNV-1a over its UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use cairn::fnv1a_32;
///
/// assert_eq!(fnv1a_32(""), 0x811c_9dc5);
/// assert_eq!(fnv1a_32("a"), 0xe40c_292c);
/// ```
pub fn fnv1a_32(input: &str) -> u32 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic pseudo-random source seeded from a string.
///
/// A value type: cloning it forks the stream, and [`SeededRandom::derive`]
/// produces an independent child stream for a labelled sub-task.
///
/// # Examples
///
/// ```
/// use cairn::SeededRandom;
///
/// let mut a = SeededRandom::new("crypt");
/// let mut b = SeededRandom::new("crypt");
/// assert_eq!(a.next_float(), b.next_float());
///
/// let value = a.next_float();
/// assert!((0.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    seed: String,
    state: u32,
}

impl SeededRandom {
    /// Creates a stream whose state is the FNV-1a hash of `seed`.
    pub fn new(seed: &str) -> Self {
        Self::with_state(seed.to_string(), fnv1a_32(seed))
    }

    /// Creates the stream a generation pass draws from.
    ///
    /// The stream is keyed on `seed:pass:config_hash`, so re-running one pass
    /// never disturbs another and identical inputs replay identically.
    pub fn for_pass(seed: &str, pass: &str, config_hash: &str) -> Self {
        Self::new(seed).derive(&format!("{pass}:{config_hash}"))
    }

    fn with_state(seed: String, state: u32) -> Self {
        let state = if state == 0 { ZERO_STATE_FALLBACK } else { state };
        Self { seed, state }
    }

    /// The seed string this stream was built from.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Produces an independent stream seeded from `seed:label`.
    pub fn derive(&self, label: &str) -> Self {
        Self::new(&format!("{}:{}", self.seed, label))
    }

    /// Advances the xorshift state and returns it.
    pub fn next_state(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns `state / 0xFFFFFFFF` after advancing.
    pub fn next_float(&mut self) -> f64 {
        f64::from(self.next_state()) / f64::from(u32::MAX)
    }

    /// Bernoulli draw: true with probability `probability`.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_float() < probability
    }

    /// Uniform integer in `min..=max`.
    ///
    /// The float can reach exactly 1.0, so the result is clamped to `max`.
    pub fn int_in(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = f64::from(max - min + 1);
        let offset = (self.next_float() * span).floor() as i32;
        (min + offset).min(max)
    }

    /// Fisher-Yates shuffle driven by this stream.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = ((self.next_float() * (i + 1) as f64).floor() as usize).min(i);
            items.swap(i, j);
        }
    }

    /// Picks one element uniformly, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.int_in(0, items.len() as i32 - 1) as usize;
        items.get(index)
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.next_state()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_state());
        let low = u64::from(self.next_state());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_state().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
