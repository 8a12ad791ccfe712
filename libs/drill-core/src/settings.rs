//! Settings supplied by the host application.

use crate::matching::DEFAULT_MAX_DISTANCE;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Re-insertion knobs, read once per missed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReinsertionSettings {
    pub enabled: bool,
    pub gap: usize,
    /// Cap on re-insertions of one word per session. `None` is unbounded.
    pub max_reinsertions: Option<u32>,
}

impl Default for ReinsertionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            gap: 3,
            max_reinsertions: None,
        }
    }
}

/// Global drill settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrillSettings {
    pub reinsert_enabled: bool,
    pub reinsert_gap: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reinsertions: Option<u32>,
    pub fuzzy_max_distance: usize,
}

impl Default for DrillSettings {
    fn default() -> Self {
        let reinsertion = ReinsertionSettings::default();
        Self {
            reinsert_enabled: reinsertion.enabled,
            reinsert_gap: reinsertion.gap,
            max_reinsertions: reinsertion.max_reinsertions,
            fuzzy_max_distance: DEFAULT_MAX_DISTANCE,
        }
    }
}

/// Source of settings for a running engine.
pub trait SettingsProvider {
    fn reinsertion(&self) -> ReinsertionSettings;

    /// Largest edit distance accepted for long answers.
    fn fuzzy_max_distance(&self) -> usize;
}

impl SettingsProvider for DrillSettings {
    fn reinsertion(&self) -> ReinsertionSettings {
        ReinsertionSettings {
            enabled: self.reinsert_enabled,
            gap: self.reinsert_gap,
            max_reinsertions: self.max_reinsertions,
        }
    }

    fn fuzzy_max_distance(&self) -> usize {
        self.fuzzy_max_distance
    }
}

/// Shared settings the host may edit while a session runs.
impl SettingsProvider for Rc<RefCell<DrillSettings>> {
    fn reinsertion(&self) -> ReinsertionSettings {
        self.borrow().reinsertion()
    }

    fn fuzzy_max_distance(&self) -> usize {
        self.borrow().fuzzy_max_distance
    }
}
