use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MIN_ROUNDS: usize = 1;
pub const MAX_ROUNDS: usize = 5;
pub const DEFAULT_ROUNDS: usize = 3;

/// Number of simulated training rounds the user picked (1..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Rounds(usize);

impl Rounds {
    pub fn new(rounds: usize) -> Result<Rounds> {
        if (MIN_ROUNDS..=MAX_ROUNDS).contains(&rounds) {
            Ok(Rounds(rounds))
        } else {
            Err(Error::InvalidRounds { got: rounds, min: MIN_ROUNDS, max: MAX_ROUNDS })
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Nominal wall-clock duration of a simulated run, in milliseconds.
    ///
    /// - 1 round     — 10-20 s
    /// - 2-3 rounds  — 20-40 s
    /// - 4-5 rounds  — 40-50 s
    pub fn duration_range_ms(&self) -> Range<u64> {
        match self.0 {
            0..=1 => 10_000..20_000,
            2..=3 => 20_000..40_000,
            _ => 40_000..50_000,
        }
    }

    /// Every selectable value, smallest first.
    pub fn options() -> impl Iterator<Item = Rounds> {
        (MIN_ROUNDS..=MAX_ROUNDS).map(Rounds)
    }
}

impl Default for Rounds {
    fn default() -> Self {
        Rounds(DEFAULT_ROUNDS)
    }
}

impl TryFrom<usize> for Rounds {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Rounds::new(value)
    }
}

impl From<Rounds> for usize {
    fn from(rounds: Rounds) -> usize {
        rounds.0
    }
}

impl fmt::Display for Rounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 Round")
        } else {
            write!(f, "{} Rounds", self.0)
        }
    }
}
