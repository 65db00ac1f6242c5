//! Derives the displayed note list from the raw working set and the current
//! query state. Nothing in here touches the store or the request.

use super::models::{parse_stamp, Importance, Note, Status};
use serde::Deserialize;
use std::{cmp::Ordering, collections::HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Importance,
    Status,
    Time,
}

impl SortKey {
    pub const ALL: [SortKey; 3] =
        [SortKey::Importance, SortKey::Status, SortKey::Time];

    pub fn get_form_value(&self) -> &'static str {
        match self {
            Self::Importance => "importance",
            Self::Status => "status",
            Self::Time => "time",
        }
    }
    pub fn get_display_name(&self) -> &'static str {
        match self {
            Self::Importance => "Importance",
            Self::Status => "Status",
            Self::Time => "Created",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Transient state of the list controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    /// `None` disables the importance stage.
    pub importance: Option<Importance>,
    /// An empty set lets every status through.
    pub statuses: HashSet<Status>,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl QueryState {
    pub fn allows(&self, status: Status) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }
}

fn matches_search(note: &Note, needle: &str) -> bool {
    needle.is_empty() || note.text.to_lowercase().contains(needle)
}

fn compare(a: &Note, b: &Note, key: SortKey) -> Ordering {
    match key {
        SortKey::Importance => a.importance.rank().cmp(&b.importance.rank()),
        SortKey::Status => a.status.rank().cmp(&b.status.rank()),
        // unparseable stamps sort as the oldest
        SortKey::Time => parse_stamp(&a.time).cmp(&parse_stamp(&b.time)),
    }
}

/// Filter by search text, importance and status, then stable-sort by the
/// chosen key. Ties keep their relative input order in either direction.
pub fn derive(notes: &[Note], query: &QueryState) -> Vec<Note> {
    let needle = query.search.to_lowercase();
    let mut result: Vec<Note> = notes
        .iter()
        .filter(|n| matches_search(n, &needle))
        .filter(|n| query.importance.map_or(true, |i| n.importance == i))
        .filter(|n| query.allows(n.status))
        .cloned()
        .collect();

    let key = query.sort_key;
    match query.sort_direction {
        SortDirection::Asc => result.sort_by(|a, b| compare(a, b, key)),
        SortDirection::Desc => result.sort_by(|a, b| compare(b, a, key)),
    }

    result
}
