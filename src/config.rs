use crate::deck::MAIN_DECK_TOTAL;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Round wins needed to take the match unless configured otherwise.
pub const DEFAULT_ROUND_LIMIT: u32 = 3;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("round limit must be at least 1")]
    ZeroRoundLimit,
    #[error("forced value {0} is outside 0..=220")]
    ForcedValueOutOfRange(i32),
}

/// Parameters of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct MatchConfig {
    /// Round wins needed to take the match.
    pub round_limit: u32,
    /// Rig player 1's deck every round so this board value comes up first.
    pub force_p1_value: Option<i32>,
    /// Seed for decks and the opening player; random when unset.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { round_limit: DEFAULT_ROUND_LIMIT, force_p1_value: None, seed: None }
    }
}

impl MatchConfig {
    pub fn with_round_limit(mut self, round_limit: u32) -> Self {
        self.round_limit = round_limit;
        self
    }

    /// Zero means no rigging.
    pub fn with_forced_p1_value(mut self, value: i32) -> Self {
        self.force_p1_value = (value != 0).then_some(value);
        self
    }

    /// Set a deterministic RNG seed for reproducible matches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_limit == 0 {
            return Err(ConfigError::ZeroRoundLimit);
        }
        match self.force_p1_value {
            Some(v) if !(0..=MAIN_DECK_TOTAL).contains(&v) => {
                Err(ConfigError::ForcedValueOutOfRange(v))
            }
            _ => Ok(()),
        }
    }

    /// The per-match generator: seeded when configured, otherwise from the thread RNG.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
        }
    }
}
