//! Per-session state and the end-of-session summary.

use crate::hints::HintEngine;
use crate::types::VocabularyEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// State of one drill session. Owned by the engine.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) words: Vec<Rc<VocabularyEntry>>,
    pub(crate) current_index: usize,
    pub(crate) score: u64,
    pub(crate) streak: u32,
    pub(crate) best_streak: u32,
    pub(crate) hints: HintEngine,
    pub(crate) wrong_words: Vec<String>,
    pub(crate) reinsertions: HashMap<String, u32>,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) total_answered: u32,
    pub(crate) total_correct: u32,
}

impl Session {
    pub(crate) fn new(words: Vec<Rc<VocabularyEntry>>, started_at: DateTime<Utc>) -> Self {
        Self {
            words,
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak: 0,
            hints: HintEngine::new(),
            wrong_words: Vec::new(),
            reinsertions: HashMap::new(),
            started_at,
            total_answered: 0,
            total_correct: 0,
        }
    }

    /// Queue of words, including re-inserted repeats.
    pub fn words(&self) -> &[Rc<VocabularyEntry>] {
        &self.words
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Word under the cursor, `None` once past the end.
    pub fn current(&self) -> Option<&Rc<VocabularyEntry>> {
        self.words.get(self.current_index)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    pub fn hints_shown(&self, entry_id: &str) -> u8 {
        self.hints.hints_shown(entry_id)
    }

    /// Ids missed at least once, in first-miss order.
    pub fn wrong_words(&self) -> &[String] {
        &self.wrong_words
    }

    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub(crate) fn record_wrong(&mut self, entry_id: &str) {
        if !self.wrong_words.iter().any(|id| id == entry_id) {
            self.wrong_words.push(entry_id.to_string());
        }
    }

    /// Build the summary for a session ending at `ended_at`.
    pub fn summarize(&self, ended_at: DateTime<Utc>) -> SessionSummary {
        let accuracy = if self.total_answered == 0 {
            0
        } else {
            (f64::from(self.total_correct) / f64::from(self.total_answered) * 100.0).round() as u32
        };

        SessionSummary {
            score: self.score,
            total_words: self.words.len(),
            total_answered: self.total_answered,
            total_correct: self.total_correct,
            accuracy,
            best_streak: self.best_streak,
            wrong_words: self.wrong_words.clone(),
            elapsed_time_ms: (ended_at - self.started_at).num_milliseconds().max(0) as u64,
            started_at: self.started_at,
            ended_at,
        }
    }
}

/// Result of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub total_words: usize,
    pub total_answered: u32,
    pub total_correct: u32,
    /// Percentage of correct answers, rounded. 0 when nothing was answered.
    pub accuracy: u32,
    pub best_streak: u32,
    pub wrong_words: Vec<String>,
    pub elapsed_time_ms: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;
    use chrono::Duration;

    fn session(size: usize) -> Session {
        let words = (0..size)
            .map(|i| Rc::new(VocabularyEntry::new(format!("w{i}"), format!("word {i}"), Language::En)))
            .collect();
        Session::new(words, Utc::now())
    }

    #[test]
    fn wrong_words_are_deduplicated() {
        let mut session = session(3);
        session.record_wrong("w1");
        session.record_wrong("w0");
        session.record_wrong("w1");
        assert_eq!(session.wrong_words(), ["w1".to_string(), "w0".to_string()]);
    }

    #[test]
    fn summary_of_unanswered_session() {
        let session = session(4);
        let summary = session.summarize(session.started_at() + Duration::milliseconds(1500));
        assert_eq!(summary.total_words, 4);
        assert_eq!(summary.accuracy, 0);
        assert_eq!(summary.elapsed_time_ms, 1500);
    }

    #[test]
    fn summary_accuracy_is_rounded() {
        let mut session = session(3);
        session.total_answered = 3;
        session.total_correct = 2;
        let summary = session.summarize(session.started_at());
        assert_eq!(summary.accuracy, 67);
    }
}
