//! Command-line and environment configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use drill_core::{Direction, DrillSettings};

/// Terminal vocabulary drill.
#[derive(Debug, Clone, Parser)]
#[command(name = "drill", version, about)]
pub struct Config {
    /// JSON file holding an array of vocabulary entries.
    #[arg(long, env = "DRILL_VOCABULARY")]
    pub vocabulary: PathBuf,

    /// Target and hint language, e.g. `en-sr` or `sr-en`.
    #[arg(long, env = "DRILL_DIRECTION", default_value = "en-sr")]
    pub direction: String,

    /// Words per session.
    #[arg(long, env = "DRILL_SESSION_SIZE")]
    pub session_size: Option<usize>,

    /// Re-queue missed words later in the session.
    #[arg(long, env = "DRILL_REINSERT", default_value_t = true, action = ArgAction::Set)]
    pub reinsert: bool,

    /// Positions between a miss and its repeat.
    #[arg(long, env = "DRILL_REINSERT_GAP", default_value_t = 3)]
    pub reinsert_gap: usize,

    /// Stop re-queueing a word after this many repeats.
    #[arg(long, env = "DRILL_MAX_REINSERTIONS")]
    pub max_reinsertions: Option<u32>,

    /// Edits tolerated between an answer and the expected text.
    #[arg(long, env = "DRILL_FUZZY_DISTANCE", default_value_t = 2)]
    pub fuzzy_distance: usize,

    /// Seed for word selection, for reproducible sessions.
    #[arg(long, env = "DRILL_SEED")]
    pub seed: Option<u64>,

    /// Drill only these entry ids (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub review: Vec<String>,

    /// Ids missed in earlier sessions (comma separated); drawn more often.
    #[arg(long, env = "DRILL_WRONG_HISTORY", value_delimiter = ',')]
    pub wrong_history: Vec<String>,
}

impl Config {
    pub fn direction(&self) -> anyhow::Result<Direction> {
        self.direction
            .parse()
            .with_context(|| format!("invalid --direction {:?}", self.direction))
    }

    pub fn settings(&self) -> DrillSettings {
        DrillSettings {
            reinsert_enabled: self.reinsert,
            reinsert_gap: self.reinsert_gap,
            max_reinsertions: self.max_reinsertions,
            fuzzy_max_distance: self.fuzzy_distance,
        }
    }

    /// Review ids, or `None` for a normal weighted session.
    pub fn review_ids(&self) -> Option<&[String]> {
        if self.review.is_empty() {
            None
        } else {
            Some(self.review.as_slice())
        }
    }
}
