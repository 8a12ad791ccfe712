//! Progressive hint disclosure.
//!
//! Each word moves through at most two tiers: the sister-language
//! translation, then the fallback (Russian) translation. A word missing its
//! sister translation jumps straight to the fallback. Progress is keyed by
//! entry id, so a re-queued word does not get its hints back.

use crate::types::{Direction, Language, VocabularyEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Disclosure tier of a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTier {
    /// Translation in the direction's hint language.
    Sister,
    /// Translation in the fallback language.
    Fallback,
}

impl HintTier {
    /// Tier number as shown to the learner (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Self::Sister => 1,
            Self::Fallback => 2,
        }
    }
}

/// A revealed hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub tier: HintTier,
    pub language: Language,
    pub text: String,
}

/// Hint tier counters for one session.
#[derive(Debug, Clone, Default)]
pub struct HintEngine {
    shown: HashMap<String, u8>,
}

impl HintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiers shown so far for an entry (0, 1 or 2).
    pub fn hints_shown(&self, entry_id: &str) -> u8 {
        self.shown.get(entry_id).copied().unwrap_or(0)
    }

    /// Reveal the next hint for `entry`, or `None` once exhausted.
    pub fn next_hint(&mut self, entry: &VocabularyEntry, direction: &Direction) -> Option<Hint> {
        let sister = entry.translations.get(direction.hint_language());
        let fallback = entry.translations.get(direction.fallback_language());

        let (tier, language, text) = match self.hints_shown(&entry.id) {
            0 => match (sister, fallback) {
                (Some(text), _) => (HintTier::Sister, direction.hint_language(), Some(text)),
                (None, Some(text)) => (HintTier::Fallback, direction.fallback_language(), Some(text)),
                (None, None) => return None,
            },
            1 => (HintTier::Fallback, direction.fallback_language(), fallback),
            _ => return None,
        };

        self.shown.insert(entry.id.clone(), tier.number());
        text.map(|text| Hint {
            tier,
            language,
            text: text.to_string(),
        })
    }
}
