//! Vocabulary file loading.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use drill_core::VocabularyEntry;

/// Read a JSON array of entries from disk.
pub fn load(path: &Path) -> anyhow::Result<Vec<VocabularyEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vocabulary file {}", path.display()))?;
    let entries = parse(&content)
        .with_context(|| format!("failed to parse vocabulary file {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = entries.len(), "vocabulary loaded");
    Ok(entries)
}

/// Parse entries, dropping repeated ids after the first.
pub fn parse(content: &str) -> anyhow::Result<Vec<VocabularyEntry>> {
    let entries: Vec<VocabularyEntry> = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(entries.len());
    for entry in entries {
        if !(1..=5).contains(&entry.difficulty) {
            tracing::warn!(id = %entry.id, difficulty = entry.difficulty, "difficulty outside 1-5");
        }
        if seen.insert(entry.id.clone()) {
            unique.push(entry);
        } else {
            tracing::warn!(id = %entry.id, "duplicate entry id skipped");
        }
    }
    Ok(unique)
}
