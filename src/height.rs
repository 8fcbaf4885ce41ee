//! Node heights from a sequence of biased coin tosses.
//!
//! Each list owns its own generator, so seeding one list never disturbs
//! another. Tests that need an exact structure replay a fixed toss sequence
//! with [`ScriptedBits`].

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_core::OsRng;
use rand_core::RngCore;

use crate::error::Result;
use crate::options::DEFAULT_PROBABILITY;
use crate::options::check_probability;

/// A seedable source of biased bits.
pub trait BitSource: Send {
    /// The next toss; `true` means "one more level".
    fn next_bit(&mut self) -> bool;

    /// Restart the sequence from `seed`.
    fn reseed(&mut self, seed: u64);
}

/// A biased coin over a seeded PRNG.
pub struct CoinToss {
    rng: StdRng,
    probability: f64,
}

impl CoinToss {
    /// A coin seeded from OS entropy.
    pub fn new(probability: f64) -> Result<CoinToss> {
        return CoinToss::seeded(OsRng.next_u64(), probability);
    }

    /// Fails unless `probability` lies in `[0, 1]`.
    pub fn seeded(seed: u64, probability: f64) -> Result<CoinToss> {
        check_probability(probability)?;
        return Ok(CoinToss::unchecked(seed, probability));
    }

    fn unchecked(seed: u64, probability: f64) -> CoinToss {
        return CoinToss {
            rng: StdRng::seed_from_u64(seed),
            probability,
        };
    }
}

impl BitSource for CoinToss {
    fn next_bit(&mut self) -> bool {
        self.rng.gen_bool(self.probability)
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// Replays a fixed toss sequence, then tosses tails forever.
///
/// Reseeding rewinds to the start of the sequence; the seed value is ignored.
#[derive(Debug, Clone)]
pub struct ScriptedBits {
    bits: Vec<bool>,
    cursor: usize,
}

impl ScriptedBits {
    pub fn new(bits: Vec<bool>) -> ScriptedBits {
        return ScriptedBits { bits, cursor: 0 };
    }

    /// Build from 0/1 tosses, e.g. `&[0, 1, 0, 1, 1, 0]`.
    pub fn from_tosses(tosses: &[u8]) -> ScriptedBits {
        return ScriptedBits::new(tosses.iter().map(|&t| t != 0).collect());
    }
}

impl BitSource for ScriptedBits {
    fn next_bit(&mut self) -> bool {
        let bit = self.bits.get(self.cursor).copied().unwrap_or(false);
        self.cursor += 1;
        bit
    }

    fn reseed(&mut self, _seed: u64) {
        self.cursor = 0;
    }
}

/// Draws node heights in `[1, max_height]`.
pub struct HeightGenerator {
    source: Box<dyn BitSource>,
}

impl HeightGenerator {
    pub fn new(source: Box<dyn BitSource>) -> HeightGenerator {
        return HeightGenerator { source };
    }

    /// A fair coin seeded from OS entropy.
    pub fn fair() -> HeightGenerator {
        let coin = CoinToss::unchecked(OsRng.next_u64(), DEFAULT_PROBABILITY);
        return HeightGenerator::new(Box::new(coin));
    }

    pub fn seeded(seed: u64, probability: f64) -> Result<HeightGenerator> {
        let coin = CoinToss::seeded(seed, probability)?;
        return Ok(HeightGenerator::new(Box::new(coin)));
    }

    pub fn scripted(tosses: &[u8]) -> HeightGenerator {
        return HeightGenerator::new(Box::new(ScriptedBits::from_tosses(tosses)));
    }

    /// Count successful tosses until the first failure or until the cap is
    /// reached; the height is that count plus one.
    pub fn next_height(&mut self, max_height: usize) -> usize {
        let max_height = max_height.max(1);
        let mut height = 1;
        while height < max_height && self.source.next_bit() {
            height += 1;
        }
        height
    }

    pub fn reseed(&mut self, seed: u64) {
        self.source.reseed(seed);
    }
}
