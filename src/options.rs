//! Construction options for a skip list.

use crate::error::Error;
use crate::error::Result;
use crate::height::CoinToss;
use crate::height::HeightGenerator;

/// Default cap on node height. 32 levels keep searches logarithmic up to
/// about 2^32 elements with a fair coin.
pub const DEFAULT_MAX_HEIGHT: usize = 32;

/// Largest height cap accepted by [`Options::validate`].
pub const MAX_HEIGHT_LIMIT: usize = 64;

/// Default probability of a node growing one more level.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Options {
    /// No node, including the head, grows taller than this.
    pub max_height: usize,
    /// Chance of each coin toss adding a level.
    pub probability: f64,
    /// Seed for the height generator; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        return Options {
            max_height: DEFAULT_MAX_HEIGHT,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        };
    }
}

impl Options {
    pub fn with_max_height(mut self, max_height: usize) -> Options {
        self.max_height = max_height;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Options {
        self.probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Options {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_height == 0 || self.max_height > MAX_HEIGHT_LIMIT {
            return Err(Error::InvalidOption(format!(
                "max_height {} out of range 1 <= max_height <= {}",
                self.max_height, MAX_HEIGHT_LIMIT
            )));
        }
        return check_probability(self.probability);
    }

    /// The height generator these options describe.
    pub(crate) fn height_generator(&self) -> Result<HeightGenerator> {
        match self.seed {
            Some(seed) => HeightGenerator::seeded(seed, self.probability),
            None => Ok(HeightGenerator::new(Box::new(CoinToss::new(self.probability)?))),
        }
    }
}

/// NaN fails the range test too.
pub(crate) fn check_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(Error::InvalidOption(format!(
            "probability {} out of range 0 <= probability <= 1",
            probability
        )));
    }
    return Ok(());
}
