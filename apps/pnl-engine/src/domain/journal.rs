//! Journal tags attached to trades.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Group key used when a match carries no strategy or emotion.
pub const UNTAGGED: &str = "untagged";

/// A journal entry as stored by the journaling collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Trade the entry annotates.
    pub trade_id: String,
    /// Strategy label.
    #[serde(default)]
    pub strategy: Option<String>,
    /// Emotion label.
    #[serde(default)]
    pub emotion: Option<String>,
    /// Entry creation time.
    pub created_at: DateTime<Utc>,
}

/// Tags resolved for one trade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTag {
    /// Strategy label.
    pub strategy: Option<String>,
    /// Emotion label.
    pub emotion: Option<String>,
}

impl JournalTag {
    /// Grouping key for the strategy breakdown.
    #[must_use]
    pub fn strategy_key(&self) -> String {
        group_key(self.strategy.as_deref())
    }

    /// Grouping key for the emotion breakdown.
    #[must_use]
    pub fn emotion_key(&self) -> String {
        group_key(self.emotion.as_deref())
    }
}

fn group_key(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNTAGGED.to_string(),
    }
}

/// Resolve one tag per trade id; the most recently created entry wins.
///
/// Entries with equal timestamps resolve to the one appearing last.
#[must_use]
pub fn latest_tags(entries: &[JournalEntry]) -> HashMap<String, JournalTag> {
    let mut latest: HashMap<&str, &JournalEntry> = HashMap::new();
    for entry in entries {
        latest
            .entry(entry.trade_id.as_str())
            .and_modify(|current| {
                if entry.created_at >= current.created_at {
                    *current = entry;
                }
            })
            .or_insert(entry);
    }

    latest
        .into_iter()
        .map(|(trade_id, entry)| {
            (
                trade_id.to_string(),
                JournalTag {
                    strategy: entry.strategy.clone(),
                    emotion: entry.emotion.clone(),
                },
            )
        })
        .collect()
}
