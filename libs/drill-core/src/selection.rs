//! Weighted sampling of session words without replacement.
//!
//! Harder words and words missed in earlier sessions are drawn more often.
//! Each draw is a roulette-wheel pick over the remaining pool, so a full
//! selection costs O(count * pool). Pools are a few thousand entries and
//! selection runs once per session.

use crate::types::VocabularyEntry;
use rand::Rng;
use std::borrow::Borrow;
use std::collections::HashSet;

/// Extra weight per difficulty step above 1.
pub const DIFFICULTY_STEP: f64 = 0.3;

/// Extra weight for a word missed in a previous session.
pub const WRONG_HISTORY_BONUS: f64 = 3.0;

/// Draw weight for an entry.
pub fn weight(entry: &VocabularyEntry, wrong_history: &HashSet<String>) -> f64 {
    let mut weight = 1.0 + f64::from(entry.clamped_difficulty() - 1) * DIFFICULTY_STEP;
    if wrong_history.contains(&entry.id) {
        weight += WRONG_HISTORY_BONUS;
    }
    weight
}

/// Pick up to `count` distinct entries from `pool`.
///
/// The result has `min(count, pool.len())` entries in draw order. Asking
/// for the whole pool returns it shuffled by the weighted draw.
pub fn select<E, R>(pool: &[E], count: usize, wrong_history: &HashSet<String>, rng: &mut R) -> Vec<E>
where
    E: Borrow<VocabularyEntry> + Clone,
    R: Rng + ?Sized,
{
    let mut remaining: Vec<(E, f64)> = pool
        .iter()
        .map(|entry| (entry.clone(), weight(entry.borrow(), wrong_history)))
        .collect();
    let target = count.min(remaining.len());
    let mut selected = Vec::with_capacity(target);

    while selected.len() < target {
        let total: f64 = remaining.iter().map(|(_, w)| w).sum();
        let mut roll = rng.gen::<f64>() * total;

        // Float rounding can leave `roll` past the last bucket; fall back to it.
        let mut picked = remaining.len() - 1;
        for (idx, (_, w)) in remaining.iter().enumerate() {
            if roll < *w {
                picked = idx;
                break;
            }
            roll -= w;
        }

        let (entry, _) = remaining.swap_remove(picked);
        selected.push(entry);
    }

    tracing::debug!(
        pool = pool.len(),
        requested = count,
        selected = selected.len(),
        "weighted selection complete"
    );
    selected
}
