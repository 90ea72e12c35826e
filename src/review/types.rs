/// Severity bucket used to group issue entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
        }
    }
}

/// A single issue bullet from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEntry {
    /// What is wrong, usually with a line reference (e.g., "Null check missing (Line 4)")
    pub description: String,
    /// Suggested fix, taken from the text after the first `|` if present
    pub fix: Option<String>,
}

/// One labeled region of a parsed review, in the order its header appeared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    /// Terminal one-line section: the text after `SCORE:`
    Score { text: String },
    /// Terminal one-line section: the text after `SUMMARY:`
    Summary { text: String },
    Strengths { items: Vec<String> },
    Issues { priority: Priority, items: Vec<IssueEntry> },
    Improvements { items: Vec<String> },
    Documentation { items: Vec<String> },
    /// Degraded single-section output when no recognized header is found
    Raw { text: String },
}

impl Section {
    /// Header line that opens this section kind in the model's pseudo-format.
    fn header(&self) -> &'static str {
        match self {
            Section::Score { .. } => "SCORE:",
            Section::Summary { .. } => "SUMMARY:",
            Section::Strengths { .. } => "STRENGTHS:",
            Section::Issues { priority: Priority::High, .. } => "HIGH_PRIORITY_ISSUES:",
            Section::Issues { priority: Priority::Medium, .. } => "MEDIUM_PRIORITY_ISSUES:",
            Section::Issues { priority: Priority::Low, .. } => "LOW_PRIORITY_ISSUES:",
            Section::Improvements { .. } => "IMPROVEMENTS:",
            Section::Documentation { .. } => "DOCUMENTATION:",
            Section::Raw { .. } => "",
        }
    }
}

/// Ordered result of parsing one model reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewResponse {
    pub sections: Vec<Section>,
}

impl ReviewResponse {
    /// Text after `SCORE:` in the first score section, if any.
    /// Used for the history summary line.
    pub fn score_text(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match s {
            Section::Score { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Render the sections back into the header/bullet pseudo-format.
    /// Re-parsing the result reproduces the same structured item lists.
    #[allow(dead_code)] // Exercised by the round-trip tests
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            match section {
                Section::Score { text } | Section::Summary { text } => {
                    out.push_str(section.header());
                    out.push(' ');
                    out.push_str(text);
                    out.push('\n');
                }
                Section::Strengths { items }
                | Section::Improvements { items }
                | Section::Documentation { items } => {
                    out.push_str(section.header());
                    out.push('\n');
                    for item in items {
                        out.push_str("- ");
                        out.push_str(item);
                        out.push('\n');
                    }
                }
                Section::Issues { items, .. } => {
                    out.push_str(section.header());
                    out.push('\n');
                    for entry in items {
                        out.push_str("- ");
                        out.push_str(&entry.description);
                        if let Some(fix) = &entry.fix {
                            out.push_str(" | ");
                            out.push_str(fix);
                        }
                        out.push('\n');
                    }
                }
                Section::Raw { text } => {
                    out.push_str(text);
                    out.push('\n');
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::Low.to_string(), "LOW");
        assert_eq!(Priority::Medium.to_string(), "MEDIUM");
        assert_eq!(Priority::High.to_string(), "HIGH");
    }

    #[test]
    fn test_score_text_lookup() {
        let response = ReviewResponse {
            sections: vec![
                Section::Summary { text: "Decent code.".to_string() },
                Section::Score { text: "7/10".to_string() },
            ],
        };
        assert_eq!(response.score_text(), Some("7/10"));
        assert_eq!(ReviewResponse::default().score_text(), None);
    }

    #[test]
    fn test_to_text_issue_with_fix() {
        let response = ReviewResponse {
            sections: vec![Section::Issues {
                priority: Priority::High,
                items: vec![IssueEntry {
                    description: "Null check missing (Line 4)".to_string(),
                    fix: Some("Fix: add guard".to_string()),
                }],
            }],
        };
        let text = response.to_text();
        assert!(text.starts_with("HIGH_PRIORITY_ISSUES:\n"));
        assert!(text.contains("- Null check missing (Line 4) | Fix: add guard\n"));
    }
}
