//! Session events and the synchronous notifier that delivers them.
//!
//! Listeners run in subscription order on the caller's stack. Each one gets
//! mutable access to a context (the engine) so it may call back into it,
//! e.g. ask for a hint from a `word:loaded` handler. Events raised by such a
//! call are delivered before the outer dispatch continues, to every
//! listener including the one that made the call. Handlers are `Fn`; keep
//! mutable state in a `RefCell` and release borrows before calling back in.
//! Listeners that call back into each other without end are a caller bug.

use crate::hints::HintTier;
use crate::session::SessionSummary;
use crate::types::{Direction, Language};
use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Name of a session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SessionStarted,
    WordLoaded,
    HintRevealed,
    AnswerCorrect,
    AnswerWrong,
    SessionEnded,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        Self::SessionStarted,
        Self::WordLoaded,
        Self::HintRevealed,
        Self::AnswerCorrect,
        Self::AnswerWrong,
        Self::SessionEnded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStarted => "session:started",
            Self::WordLoaded => "word:loaded",
            Self::HintRevealed => "hint:revealed",
            Self::AnswerCorrect => "answer:correct",
            Self::AnswerWrong => "answer:wrong",
            Self::SessionEnded => "session:ended",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payloads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum SessionEvent {
    #[serde(rename = "session:started")]
    SessionStarted { total_words: usize, direction: Direction },
    #[serde(rename = "word:loaded")]
    WordLoaded {
        index: usize,
        total: usize,
        term: String,
        word_type: Option<String>,
        id: String,
    },
    #[serde(rename = "hint:revealed")]
    HintRevealed {
        tier: HintTier,
        language: Language,
        text: String,
        word_id: String,
    },
    #[serde(rename = "answer:correct")]
    AnswerCorrect {
        word_id: String,
        points: u64,
        streak: u32,
        score: u64,
    },
    #[serde(rename = "answer:wrong")]
    AnswerWrong {
        word_id: String,
        expected: String,
        given: String,
    },
    #[serde(rename = "session:ended")]
    SessionEnded(SessionSummary),
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::SessionStarted { .. } => EventKind::SessionStarted,
            Self::WordLoaded { .. } => EventKind::WordLoaded,
            Self::HintRevealed { .. } => EventKind::HintRevealed,
            Self::AnswerCorrect { .. } => EventKind::AnswerCorrect,
            Self::AnswerWrong { .. } => EventKind::AnswerWrong,
            Self::SessionEnded(_) => EventKind::SessionEnded,
        }
    }
}

/// Handle returned by [`Notifier::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<C> = Rc<dyn Fn(&mut C, &SessionEvent)>;

struct Listener<C> {
    id: ListenerId,
    kind: Option<EventKind>,
    handler: Handler<C>,
}

/// Publish/subscribe channel for session events.
pub struct Notifier<C> {
    next_id: u64,
    listeners: Vec<Listener<C>>,
}

impl<C> Default for Notifier<C> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for Notifier<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<C> Notifier<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event.
    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&mut C, &SessionEvent) + 'static,
    {
        self.subscribe(Some(kind), Rc::new(handler))
    }

    /// Subscribe to every event.
    pub fn on_any<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn(&mut C, &SessionEvent) + 'static,
    {
        self.subscribe(None, Rc::new(handler))
    }

    fn subscribe(&mut self, kind: Option<EventKind>, handler: Handler<C>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, kind, handler });
        id
    }

    /// Unsubscribe. Returns false if the id was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot of the listeners interested in `kind`.
    ///
    /// Taking the snapshot first leaves the context free to be borrowed
    /// mutably while the handlers run.
    pub fn dispatch(&self, kind: EventKind) -> Dispatch<C> {
        let handlers = self
            .listeners
            .iter()
            .filter(|listener| listener.kind.map_or(true, |k| k == kind))
            .map(|listener| Rc::clone(&listener.handler))
            .collect();
        Dispatch { handlers }
    }
}

/// Listeners captured for one event.
pub struct Dispatch<C> {
    handlers: Vec<Handler<C>>,
}

impl<C> Dispatch<C> {
    pub fn deliver(self, ctx: &mut C, event: &SessionEvent) {
        for handler in self.handlers {
            (*handler)(ctx, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit<C>(notifier: &Notifier<C>, ctx: &mut C, event: &SessionEvent) {
        notifier.dispatch(event.kind()).deliver(ctx, event);
    }

    fn correct(word_id: &str) -> SessionEvent {
        SessionEvent::AnswerCorrect {
            word_id: word_id.to_string(),
            points: 15,
            streak: 1,
            score: 15,
        }
    }

    fn wrong(word_id: &str) -> SessionEvent {
        SessionEvent::AnswerWrong {
            word_id: word_id.to_string(),
            expected: "kuća".to_string(),
            given: "kuca".to_string(),
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let mut notifier: Notifier<Vec<String>> = Notifier::new();
        notifier.on(EventKind::AnswerCorrect, |log, _| log.push("first".to_string()));
        notifier.on_any(|log, event| log.push(format!("any {}", event.kind())));
        notifier.on(EventKind::AnswerCorrect, |log, _| log.push("third".to_string()));

        let mut log = Vec::new();
        emit(&notifier, &mut log, &correct("w1"));

        assert_eq!(log, vec!["first", "any answer:correct", "third"]);
    }

    #[test]
    fn filters_by_kind() {
        let mut notifier: Notifier<Vec<EventKind>> = Notifier::new();
        notifier.on(EventKind::AnswerWrong, |log, event| log.push(event.kind()));

        let mut log = Vec::new();
        emit(&notifier, &mut log, &correct("w1"));
        emit(&notifier, &mut log, &wrong("w1"));

        assert_eq!(log, vec![EventKind::AnswerWrong]);
    }

    #[test]
    fn off_removes_listener() {
        let mut notifier: Notifier<u32> = Notifier::new();
        let id = notifier.on(EventKind::AnswerCorrect, |count, _| *count += 1);

        let mut count = 0;
        emit(&notifier, &mut count, &correct("w1"));
        assert!(notifier.off(id));
        assert!(!notifier.off(id));
        emit(&notifier, &mut count, &correct("w1"));

        assert_eq!(count, 1);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn handler_sees_events_it_raises() {
        struct Ctx {
            notifier: Rc<Notifier<Ctx>>,
            log: Vec<EventKind>,
        }

        let mut notifier: Notifier<Ctx> = Notifier::new();
        notifier.on_any(|ctx, event| {
            ctx.log.push(event.kind());
            if event.kind() == EventKind::AnswerCorrect {
                let notifier = Rc::clone(&ctx.notifier);
                emit(&notifier, ctx, &wrong("w1"));
            }
        });
        let notifier = Rc::new(notifier);
        let mut ctx = Ctx {
            notifier: Rc::clone(&notifier),
            log: Vec::new(),
        };

        emit(&notifier, &mut ctx, &correct("w1"));

        assert_eq!(ctx.log, vec![EventKind::AnswerCorrect, EventKind::AnswerWrong]);
    }

    #[test]
    fn event_names() {
        let names: Vec<&str> = EventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "session:started",
                "word:loaded",
                "hint:revealed",
                "answer:correct",
                "answer:wrong",
                "session:ended"
            ]
        );
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(wrong("w7")).unwrap();
        assert_eq!(json["event"], "answer:wrong");
        assert_eq!(json["word_id"], "w7");
    }
}
