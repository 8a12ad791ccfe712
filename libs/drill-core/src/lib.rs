//! Learning session engine for the trilingual vocabulary drill.
//!
//! Provides:
//! - Answer matching (normalization, Levenshtein distance, Serbian Cyrillic transliteration)
//! - Weighted word selection without replacement
//! - Two-tier hint disclosure
//! - Re-insertion of missed words later in the session
//! - The session engine and its event notifier
//! - Shared types (VocabularyEntry, Direction, Language, etc.)

pub mod engine;
pub mod error;
pub mod events;
pub mod hints;
pub mod matching;
pub mod reinsertion;
pub mod selection;
pub mod session;
pub mod settings;
pub mod types;

pub use engine::{AnswerOutcome, Advance, EngineConfig, EngineState, SessionEngine};
pub use error::{DrillError, Result};
pub use events::{EventKind, ListenerId, Notifier, SessionEvent};
pub use hints::{Hint, HintEngine, HintTier};
pub use matching::{
    check_answer, fuzzy_match, levenshtein, normalize, transliterate_serbian_cyrillic_to_latin,
    AnswerMatch, FuzzyMatch,
};
pub use reinsertion::ReinsertionPolicy;
pub use selection::select;
pub use session::{Session, SessionSummary};
pub use settings::{DrillSettings, ReinsertionSettings, SettingsProvider};
pub use types::{AnswerBundle, Direction, Language, Translations, VocabularyEntry};
