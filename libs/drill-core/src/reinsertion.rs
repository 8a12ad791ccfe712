//! Re-queueing of missed words later in the same session.

use crate::session::Session;
use crate::settings::ReinsertionSettings;
use crate::types::VocabularyEntry;
use std::rc::Rc;

/// Decides whether and where a missed word comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReinsertionPolicy {
    settings: ReinsertionSettings,
}

impl ReinsertionPolicy {
    pub fn new(settings: ReinsertionSettings) -> Self {
        Self { settings }
    }

    /// Queue position for a miss at `current_index` in a queue of `len`.
    ///
    /// A gap of 0 is treated as 1 so the copy never lands under the cursor.
    pub fn target_index(&self, current_index: usize, len: usize) -> usize {
        (current_index + self.settings.gap.max(1)).min(len)
    }

    /// Re-insert `entry` after a miss. Returns the insertion index, or
    /// `None` when disabled or the word has hit its cap.
    pub fn apply(&self, session: &mut Session, entry: &Rc<VocabularyEntry>) -> Option<usize> {
        if !self.settings.enabled {
            return None;
        }

        let count = session.reinsertions.entry(entry.id.clone()).or_insert(0);
        if let Some(max) = self.settings.max_reinsertions {
            if *count >= max {
                tracing::debug!(word_id = %entry.id, max, "re-insertion cap reached");
                return None;
            }
        }
        *count += 1;

        let index = self.target_index(session.current_index, session.words.len());
        session.words.insert(index, Rc::clone(entry));
        tracing::debug!(word_id = %entry.id, index, queue = session.words.len(), "word re-inserted");
        Some(index)
    }
}
