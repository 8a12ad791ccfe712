//! Core types for the vocabulary drill.

use crate::error::{DrillError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of a term or translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Sr,
    Ru,
}

impl Language {
    /// The language every direction falls back to for its last hint.
    pub const FALLBACK: Language = Language::Ru;

    /// Two-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Sr => "sr",
            Self::Ru => "ru",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = DrillError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "sr" => Ok(Self::Sr),
            "ru" => Ok(Self::Ru),
            other => Err(DrillError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Study direction: the language being learned and the sister language
/// shown as the first hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    target: Language,
    hint: Language,
}

impl Direction {
    pub fn new(target: Language, hint: Language) -> Result<Self> {
        if target == hint {
            return Err(DrillError::InvalidDirection(format!("{}-{}", target, hint)));
        }
        Ok(Self { target, hint })
    }

    pub fn target_language(&self) -> Language {
        self.target
    }

    pub fn hint_language(&self) -> Language {
        self.hint
    }

    pub fn fallback_language(&self) -> Language {
        Language::FALLBACK
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.target, self.hint)
    }
}

impl FromStr for Direction {
    type Err = DrillError;

    /// Parse a direction such as `en-sr`.
    fn from_str(s: &str) -> Result<Self> {
        let (target, hint) = s
            .split_once('-')
            .ok_or_else(|| DrillError::InvalidDirection(s.to_string()))?;
        Self::new(target.parse()?, hint.parse()?)
    }
}

/// Per-language translations. Absent languages are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translations {
    pub en: Option<String>,
    pub sr: Option<String>,
    pub ru: Option<String>,
}

impl Translations {
    /// Translation for a language, treating blank text as absent.
    pub fn get(&self, language: Language) -> Option<&str> {
        let value = match language {
            Language::En => self.en.as_deref(),
            Language::Sr => self.sr.as_deref(),
            Language::Ru => self.ru.as_deref(),
        };
        value.filter(|text| !text.trim().is_empty())
    }
}

/// A word handed to the engine by the vocabulary store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: String,
    pub term: String,
    pub source_language: Language,
    #[serde(default)]
    pub translations: Translations,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub word_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn default_difficulty() -> u8 {
    1
}

impl VocabularyEntry {
    /// Create an entry with only the fields the engine inspects.
    pub fn new(id: impl Into<String>, term: impl Into<String>, source_language: Language) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            source_language,
            translations: Translations::default(),
            difficulty: default_difficulty(),
            word_type: None,
            examples: Vec::new(),
            tags: Vec::new(),
            explanation: None,
        }
    }

    pub fn with_translation(mut self, language: Language, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match language {
            Language::En => self.translations.en = text,
            Language::Sr => self.translations.sr = text,
            Language::Ru => self.translations.ru = text,
        }
        self
    }

    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Difficulty forced into the 1..=5 range.
    pub fn clamped_difficulty(&self) -> u8 {
        self.difficulty.clamp(1, 5)
    }

    /// A non-empty term plus a hint or fallback translation.
    pub fn is_playable(&self, direction: &Direction) -> bool {
        !self.term.trim().is_empty()
            && (self.translations.get(direction.hint_language()).is_some()
                || self.translations.get(direction.fallback_language()).is_some())
    }
}

/// Everything shown after a word has been answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerBundle {
    pub id: String,
    pub term: String,
    pub word_type: Option<String>,
    pub translations: Translations,
    pub examples: Vec<String>,
    pub explanation: Option<String>,
}

impl From<&VocabularyEntry> for AnswerBundle {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            id: entry.id.clone(),
            term: entry.term.clone(),
            word_type: entry.word_type.clone(),
            translations: entry.translations.clone(),
            examples: entry.examples.clone(),
            explanation: entry.explanation.clone(),
        }
    }
}
