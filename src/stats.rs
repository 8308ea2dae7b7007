use crate::engine::MatchOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StatsError {
    #[error("stats file i/o: {0}")]
    Io(#[from] io::Error),
    #[error("stats file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Running score per side-deck card: +1 each time it sat in a winner's starting
/// hand, -1 each time it sat in a loser's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub score: BTreeMap<String, i64>,
}

impl Stats {
    /// Load the stats file. A missing file is an empty score sheet.
    pub fn load(path: &Path) -> Result<Self, StatsError> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn store(&self, path: &Path) -> Result<(), StatsError> {
        let body = serde_json::to_vec(self)?;
        fs::write(path, body)?;
        Ok(())
    }

    /// Fold one finished match into the scores.
    ///
    /// ```
    /// use pazaak_rs::engine::{MatchOutcome, SeatRecord};
    /// use pazaak_rs::stats::Stats;
    ///
    /// let outcome = MatchOutcome {
    ///     winner: 1,
    ///     rounds: 3,
    ///     seats: vec![
    ///         SeatRecord { number: 1, initial_hand: vec!["+1".into(), "+1".into()], winner: true },
    ///         SeatRecord { number: 2, initial_hand: vec!["+1".into(), "-3".into()], winner: false },
    ///     ],
    ///     final_view: Default::default(),
    /// };
    /// let mut stats = Stats::default();
    /// stats.apply(&outcome);
    /// assert_eq!(stats.score["+1"], 1);
    /// assert_eq!(stats.score["-3"], -1);
    /// ```
    pub fn apply(&mut self, outcome: &MatchOutcome) {
        for seat in &outcome.seats {
            let delta = if seat.winner { 1 } else { -1 };
            for id in &seat.initial_hand {
                *self.score.entry(id.clone()).or_insert(0) += delta;
            }
        }
    }

    /// Load, merge, and store in one go.
    pub fn record(path: &Path, outcome: &MatchOutcome) -> Result<Self, StatsError> {
        let mut stats = Self::load(path)?;
        stats.apply(outcome);
        stats.store(path)?;
        log::info!("Stats written to {}", path.display());
        Ok(stats)
    }
}
