use std::collections::VecDeque;

const SNIPPET_LEN: usize = 100;

/// One completed review remembered for the session summary.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub source_label: String,
    pub language: String,
    /// Mode that produced the review ("simple", "agent", "metrics-only")
    pub mode: String,
    /// First 100 characters of the submitted code
    pub snippet: String,
    /// Text of the review's score section, if one was parsed
    pub score: Option<String>,
}

/// Bounded append-only log of reviews in this session. The oldest entry is
/// evicted once the cap is reached; the core components never touch it.
#[derive(Debug)]
pub struct ReviewHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl ReviewHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, mut entry: HistoryEntry) {
        if entry.snippet.chars().count() > SNIPPET_LEN {
            let truncated: String = entry.snippet.chars().take(SNIPPET_LEN).collect();
            entry.snippet = format!("{truncated}...");
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from most recent to oldest.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}
