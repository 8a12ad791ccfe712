//! Session engine: word selection, hints, answer judgment, scoring and
//! advancement for one drill session at a time.

use crate::error::{DrillError, Result};
use crate::events::{EventKind, ListenerId, Notifier, SessionEvent};
use crate::hints::Hint;
use crate::matching;
use crate::reinsertion::ReinsertionPolicy;
use crate::selection;
use crate::session::{Session, SessionSummary};
use crate::settings::{DrillSettings, SettingsProvider};
use crate::types::{AnswerBundle, Direction, Language, VocabularyEntry};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

/// Words per session when the host does not say otherwise.
pub const DEFAULT_SESSION_SIZE: usize = 20;

/// Points for any correct answer before the streak multiplier.
pub const BASE_POINTS: u64 = 10;

/// Bonus for answering without revealing a hint.
pub const NO_HINT_BONUS: u64 = 5;

/// Streak value at which the multiplier stops growing.
pub const MAX_STREAK_MULTIPLIER: u32 = 5;

/// Construction parameters for [`SessionEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub entries: Vec<VocabularyEntry>,
    pub direction: Direction,
    pub session_size: Option<usize>,
}

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active,
}

/// Result of [`SessionEngine::check_answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub exact: bool,
    pub distance: usize,
    pub expected: String,
    pub hints_used_for_this_word: u8,
}

/// Result of [`SessionEngine::next_word`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Word(Rc<VocabularyEntry>),
    Finished(SessionSummary),
}

/// Drives drill sessions over a fixed vocabulary.
///
/// Not thread-safe: listeners and entries are reference counted with `Rc`.
pub struct SessionEngine {
    entries: Vec<Rc<VocabularyEntry>>,
    direction: Direction,
    session_size: usize,
    settings: Box<dyn SettingsProvider>,
    rng: Box<dyn RngCore>,
    wrong_history: HashSet<String>,
    session: Option<Session>,
    notifier: Notifier<SessionEngine>,
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("entries", &self.entries.len())
            .field("direction", &self.direction)
            .field("session_size", &self.session_size)
            .field("state", &self.state())
            .field("listeners", &self.notifier.listener_count())
            .finish()
    }
}

impl SessionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            entries: config.entries.into_iter().map(Rc::new).collect(),
            direction: config.direction,
            session_size: config.session_size.unwrap_or(DEFAULT_SESSION_SIZE),
            settings: Box::new(DrillSettings::default()),
            rng: Box::new(StdRng::from_entropy()),
            wrong_history: HashSet::new(),
            session: None,
            notifier: Notifier::new(),
        }
    }

    /// Replace the random source used for word selection.
    pub fn with_rng<R: RngCore + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_settings<S: SettingsProvider + 'static>(mut self, settings: S) -> Self {
        self.settings = Box::new(settings);
        self
    }

    /// Ids missed in earlier sessions; they are favoured by selection.
    pub fn with_wrong_history<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_wrong_history(ids);
        self
    }

    pub fn set_wrong_history<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wrong_history = ids.into_iter().map(Into::into).collect();
    }

    pub fn wrong_history(&self) -> &HashSet<String> {
        &self.wrong_history
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> EngineState {
        if self.session.is_some() {
            EngineState::Active
        } else {
            EngineState::Idle
        }
    }

    /// Read-only view of the active session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Subscribe to one kind of event.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&mut SessionEngine, &SessionEvent) + 'static,
    {
        self.notifier.on(kind, handler)
    }

    /// Subscribe to every event.
    pub fn on_any<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn(&mut SessionEngine, &SessionEvent) + 'static,
    {
        self.notifier.on_any(handler)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.notifier.off(id)
    }

    /// Start a new session and return its first word.
    ///
    /// With `filter_ids` the session is a review of exactly those words,
    /// shuffled, without weighted selection. Any session already running is
    /// discarded without a summary.
    pub fn start_session(&mut self, filter_ids: Option<&[String]>) -> Result<Rc<VocabularyEntry>> {
        let direction = self.direction;
        let mut pool: Vec<Rc<VocabularyEntry>> = self
            .entries
            .iter()
            .filter(|entry| entry.is_playable(&direction))
            .filter(|entry| filter_ids.map_or(true, |ids| ids.contains(&entry.id)))
            .cloned()
            .collect();

        if pool.is_empty() {
            tracing::warn!(%direction, filtered = filter_ids.is_some(), "no playable entries");
            return Err(DrillError::NoPlayableEntries {
                direction: direction.to_string(),
            });
        }

        let words = if filter_ids.is_some() {
            pool.shuffle(&mut *self.rng);
            pool
        } else {
            // A zero size still plays one word
            let count = self.session_size.max(1);
            selection::select(&pool, count, &self.wrong_history, &mut *self.rng)
        };
        let Some(first) = words.first().cloned() else {
            return Err(DrillError::NoPlayableEntries {
                direction: direction.to_string(),
            });
        };

        if let Some(previous) = self.session.take() {
            tracing::debug!(
                answered = previous.total_answered(),
                "discarding unfinished session"
            );
        }

        let total_words = words.len();
        self.session = Some(Session::new(words, Utc::now()));
        tracing::info!(%direction, total_words, review = filter_ids.is_some(), "session started");

        self.emit(SessionEvent::SessionStarted {
            total_words,
            direction,
        });
        self.emit(word_loaded(0, total_words, &first));
        Ok(first)
    }

    /// Word under the cursor. Never emits.
    pub fn get_current_word(&self) -> Option<&Rc<VocabularyEntry>> {
        self.session.as_ref().and_then(Session::current)
    }

    /// Reveal the next hint tier for the current word.
    pub fn get_hint(&mut self) -> Option<Hint> {
        let direction = self.direction;
        let session = self.session.as_mut()?;
        let entry = Rc::clone(session.current()?);
        let hint = session.hints.next_hint(&entry, &direction)?;

        tracing::debug!(word_id = %entry.id, tier = hint.tier.number(), "hint revealed");
        self.emit(SessionEvent::HintRevealed {
            tier: hint.tier,
            language: hint.language,
            text: hint.text.clone(),
            word_id: entry.id.clone(),
        });
        Some(hint)
    }

    /// Translations and examples of the current word, for display after answering.
    pub fn get_answers(&self) -> Option<AnswerBundle> {
        self.get_current_word().map(|entry| AnswerBundle::from(entry.as_ref()))
    }

    /// Judge `answer` for the current word and update score and streak.
    ///
    /// The expected text is the translation in `language` (default: the
    /// hint language), or the term itself when that translation is absent.
    pub fn check_answer(&mut self, answer: &str, language: Option<Language>) -> Option<AnswerOutcome> {
        let language = language.unwrap_or(self.direction.hint_language());
        let max_distance = self.settings.fuzzy_max_distance();
        let session = self.session.as_mut()?;
        let entry = Rc::clone(session.current()?);

        let (expected, expected_language) = match entry.translations.get(language) {
            Some(text) => (text, language),
            None => (entry.term.as_str(), entry.source_language),
        };
        let matched = matching::check_answer(answer, expected, expected_language, max_distance);
        let hints_used = session.hints_shown(&entry.id);
        session.total_answered += 1;

        let event = if matched.correct {
            session.total_correct += 1;
            session.streak += 1;
            session.best_streak = session.best_streak.max(session.streak);

            let base = BASE_POINTS + if hints_used == 0 { NO_HINT_BONUS } else { 0 };
            let points = base * u64::from(session.streak.min(MAX_STREAK_MULTIPLIER));
            session.score += points;

            tracing::debug!(word_id = %entry.id, points, streak = session.streak, "answer correct");
            SessionEvent::AnswerCorrect {
                word_id: entry.id.clone(),
                points,
                streak: session.streak,
                score: session.score,
            }
        } else {
            session.streak = 0;
            session.record_wrong(&entry.id);
            let policy = ReinsertionPolicy::new(self.settings.reinsertion());
            policy.apply(session, &entry);

            tracing::debug!(word_id = %entry.id, distance = matched.distance, "answer wrong");
            SessionEvent::AnswerWrong {
                word_id: entry.id.clone(),
                expected: expected.to_string(),
                given: answer.to_string(),
            }
        };

        let outcome = AnswerOutcome {
            correct: matched.correct,
            exact: matched.exact,
            distance: matched.distance,
            expected: expected.to_string(),
            hints_used_for_this_word: hints_used,
        };
        self.emit(event);
        Some(outcome)
    }

    /// Move to the next word, ending the session after the last one.
    pub fn next_word(&mut self) -> Option<Advance> {
        let session = self.session.as_mut()?;
        session.current_index += 1;

        match session.current().cloned() {
            Some(entry) => {
                let event = word_loaded(session.current_index, session.words.len(), &entry);
                self.emit(event);
                Some(Advance::Word(entry))
            }
            None => self.end_session().map(Advance::Finished),
        }
    }

    /// Finish the active session and return its summary.
    ///
    /// The engine is already idle when `session:ended` listeners run.
    pub fn end_session(&mut self) -> Option<SessionSummary> {
        let session = self.session.take()?;
        let summary = session.summarize(Utc::now());

        tracing::info!(
            score = summary.score,
            answered = summary.total_answered,
            accuracy = summary.accuracy,
            elapsed_ms = summary.elapsed_time_ms,
            "session ended"
        );
        self.emit(SessionEvent::SessionEnded(summary.clone()));
        Some(summary)
    }

    fn emit(&mut self, event: SessionEvent) {
        let dispatch = self.notifier.dispatch(event.kind());
        dispatch.deliver(self, &event);
    }
}

fn word_loaded(index: usize, total: usize, entry: &VocabularyEntry) -> SessionEvent {
    SessionEvent::WordLoaded {
        index,
        total,
        term: entry.term.clone(),
        word_type: entry.word_type.clone(),
        id: entry.id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;

    fn entry(i: usize) -> VocabularyEntry {
        VocabularyEntry::new(format!("w{i}"), format!("term{i}"), Language::En)
            .with_translation(Language::Sr, format!("prevod{i}"))
            .with_translation(Language::Ru, format!("перевод{i}"))
    }

    fn engine(size: usize) -> SessionEngine {
        SessionEngine::new(EngineConfig {
            entries: (0..size).map(entry).collect(),
            direction: "en-sr".parse().unwrap(),
            session_size: Some(size),
        })
        .with_rng(ChaCha8Rng::seed_from_u64(11))
    }

    fn expected_for_current(engine: &SessionEngine) -> String {
        let current = engine.get_current_word().unwrap();
        current.translations.sr.clone().unwrap()
    }

    #[test]
    fn idle_engine_degrades_to_none() {
        let mut engine = engine(3);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.get_current_word().is_none());
        assert!(engine.get_hint().is_none());
        assert!(engine.get_answers().is_none());
        assert!(engine.check_answer("x", None).is_none());
        assert!(engine.next_word().is_none());
        assert!(engine.end_session().is_none());
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut engine = SessionEngine::new(EngineConfig {
            entries: vec![VocabularyEntry::new("w0", "lonely", Language::En)],
            direction: "en-sr".parse().unwrap(),
            session_size: None,
        });
        assert_eq!(
            engine.start_session(None),
            Err(DrillError::NoPlayableEntries {
                direction: "en-sr".to_string()
            })
        );
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn unplayable_entries_are_excluded() {
        let mut entries: Vec<VocabularyEntry> = (0..3).map(entry).collect();
        entries.push(VocabularyEntry::new("bare", "bare", Language::En));
        let mut engine = SessionEngine::new(EngineConfig {
            entries,
            direction: "en-sr".parse().unwrap(),
            session_size: Some(10),
        });

        engine.start_session(None).unwrap();
        let session = engine.session().unwrap();
        assert_eq!(session.words().len(), 3);
        assert!(session.words().iter().all(|w| w.id != "bare"));
    }

    #[test]
    fn session_size_limits_selection() {
        let mut engine = SessionEngine::new(EngineConfig {
            entries: (0..30).map(entry).collect(),
            direction: "en-sr".parse().unwrap(),
            session_size: Some(8),
        });
        engine.start_session(None).unwrap();
        assert_eq!(engine.session().unwrap().words().len(), 8);
    }

    #[test]
    fn zero_session_size_plays_one_word() {
        let mut engine = SessionEngine::new(EngineConfig {
            entries: (0..3).map(entry).collect(),
            direction: "en-sr".parse().unwrap(),
            session_size: Some(0),
        })
        .with_rng(ChaCha8Rng::seed_from_u64(4));

        let first = engine.start_session(None).unwrap();
        let session = engine.session().unwrap();
        assert_eq!(session.words().len(), 1);
        assert!(Rc::ptr_eq(&session.words()[0], &first));
    }

    #[test]
    fn review_session_uses_filtered_ids_only() {
        let mut engine = engine(10);
        let ids = vec!["w2".to_string(), "w5".to_string(), "missing".to_string()];

        engine.start_session(Some(ids.as_slice())).unwrap();

        let mut picked: Vec<&str> = engine
            .session()
            .unwrap()
            .words()
            .iter()
            .map(|w| w.id.as_str())
            .collect();
        picked.sort();
        assert_eq!(picked, vec!["w2", "w5"]);
    }

    #[test]
    fn review_of_unknown_ids_fails() {
        let mut engine = engine(3);
        let ids = vec!["nope".to_string()];
        assert!(engine.start_session(Some(ids.as_slice())).is_err());
    }

    #[test]
    fn expected_falls_back_to_term() {
        let mut engine = engine(1);
        engine.start_session(None).unwrap();

        let outcome = engine.check_answer("term0", Some(Language::En)).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.expected, "term0");
    }

    #[test]
    fn russian_check_language() {
        let mut engine = engine(1);
        engine.start_session(None).unwrap();

        let outcome = engine.check_answer("перевод0", Some(Language::Ru)).unwrap();
        assert!(outcome.correct);
    }

    #[test]
    fn wrong_answer_resets_streak_and_records_word() {
        let mut engine = engine(4).with_settings(DrillSettings {
            reinsert_enabled: false,
            ..DrillSettings::default()
        });
        engine.start_session(None).unwrap();

        let expected = expected_for_current(&engine);
        assert!(engine.check_answer(&expected, None).unwrap().correct);
        engine.next_word();
        let id = engine.get_current_word().unwrap().id.clone();
        let outcome = engine.check_answer("completely wrong", None).unwrap();

        assert!(!outcome.correct);
        let session = engine.session().unwrap();
        assert_eq!(session.streak(), 0);
        assert_eq!(session.best_streak(), 1);
        assert_eq!(session.wrong_words(), [id]);
    }

    #[test]
    fn hint_forfeits_bonus() {
        let mut engine = engine(2);
        engine.start_session(None).unwrap();

        engine.get_hint().unwrap();
        let expected = expected_for_current(&engine);
        let outcome = engine.check_answer(&expected, None).unwrap();

        assert_eq!(outcome.hints_used_for_this_word, 1);
        assert_eq!(engine.session().unwrap().score(), BASE_POINTS);
    }

    #[test]
    fn streak_multiplier_caps_at_five() {
        let mut engine = engine(7);
        engine.start_session(None).unwrap();

        let points = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&points);
        engine.on(EventKind::AnswerCorrect, move |_, event| {
            if let SessionEvent::AnswerCorrect { points, .. } = event {
                sink.borrow_mut().push(*points);
            }
        });

        for _ in 0..7 {
            let expected = expected_for_current(&engine);
            engine.check_answer(&expected, None);
            engine.next_word();
        }

        assert_eq!(*points.borrow(), vec![15, 30, 45, 60, 75, 75, 75]);
    }

    #[test]
    fn next_word_past_end_returns_summary() {
        let mut engine = engine(1);
        engine.start_session(None).unwrap();

        match engine.next_word() {
            Some(Advance::Finished(summary)) => {
                assert_eq!(summary.total_words, 1);
                assert_eq!(summary.total_answered, 0);
            }
            other => panic!("expected summary, got {other:?}"),
        }
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn answers_bundle_for_current_word() {
        let mut engine = engine(1);
        engine.start_session(None).unwrap();

        let bundle = engine.get_answers().unwrap();
        assert_eq!(bundle.id, "w0");
        assert_eq!(bundle.translations.sr.as_deref(), Some("prevod0"));
    }

    #[test]
    fn restarting_discards_previous_session() {
        let mut engine = engine(3);
        engine.start_session(None).unwrap();
        engine.check_answer("wrong", None);

        engine.start_session(None).unwrap();
        let session = engine.session().unwrap();
        assert_eq!(session.total_answered(), 0);
        assert!(session.wrong_words().is_empty());
    }
}
