pub mod types;

pub use types::{IssueEntry, Priority, ReviewResponse, Section};

use tracing::debug;

/// Headers that open an accumulating bullet-list section. Literal,
/// case-sensitive prefix match only; dispatch is this table, not a
/// conditional cascade.
const LIST_HEADERS: &[(&str, ListKind)] = &[
    ("STRENGTHS:", ListKind::Strengths),
    ("HIGH_PRIORITY_ISSUES:", ListKind::Issues(Priority::High)),
    ("MEDIUM_PRIORITY_ISSUES:", ListKind::Issues(Priority::Medium)),
    ("LOW_PRIORITY_ISSUES:", ListKind::Issues(Priority::Low)),
    ("IMPROVEMENTS:", ListKind::Improvements),
    ("DOCUMENTATION:", ListKind::Documentation),
];

/// Headers whose presence anywhere in the input suppresses the Raw fallback.
const FALLBACK_MARKERS: &[&str] = &["SCORE:", "STRENGTHS:", "IMPROVEMENTS:"];

#[derive(Debug, Clone, Copy)]
enum ListKind {
    Strengths,
    Issues(Priority),
    Improvements,
    Documentation,
}

impl ListKind {
    fn empty_section(self) -> Section {
        match self {
            ListKind::Strengths => Section::Strengths { items: Vec::new() },
            ListKind::Issues(priority) => Section::Issues { priority, items: Vec::new() },
            ListKind::Improvements => Section::Improvements { items: Vec::new() },
            ListKind::Documentation => Section::Documentation { items: Vec::new() },
        }
    }
}

/// Parse one model reply in the pseudo-format into ordered typed sections.
///
/// Total function: unrecognized lines are dropped, bullets outside any
/// section are dropped, and an input with no recognized header collapses to
/// a single `Raw` section carrying the unmodified input.
pub fn parse_review(text: &str) -> ReviewResponse {
    let mut sections: Vec<Section> = Vec::new();
    // Index into `sections` of the open accumulating section, if any.
    // Score and Summary are terminal and reset this to None.
    let mut current: Option<usize> = None;
    let mut marker_seen = false;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if FALLBACK_MARKERS.iter().any(|m| line.starts_with(m)) {
            marker_seen = true;
        }

        if let Some(rest) = line.strip_prefix("SCORE:") {
            sections.push(Section::Score { text: rest.trim().to_string() });
            current = None;
        } else if let Some(rest) = line.strip_prefix("SUMMARY:") {
            sections.push(Section::Summary { text: rest.trim().to_string() });
            current = None;
        } else if let Some((_, kind)) =
            LIST_HEADERS.iter().find(|(header, _)| line.starts_with(header))
        {
            // Each header line opens a fresh accumulator, even a repeat.
            sections.push(kind.empty_section());
            current = Some(sections.len() - 1);
        } else if let (Some(content), Some(idx)) = (line.strip_prefix("- "), current) {
            push_bullet(&mut sections[idx], content.trim());
        }
        // Anything else is silently ignored.
    }

    if !marker_seen {
        debug!("no recognized review header, falling back to raw section");
        return ReviewResponse {
            sections: vec![Section::Raw { text: text.to_string() }],
        };
    }

    ReviewResponse { sections }
}

/// Attribute one bullet to the open section (last-header-wins, no nesting).
fn push_bullet(section: &mut Section, content: &str) {
    match section {
        Section::Strengths { items }
        | Section::Improvements { items }
        | Section::Documentation { items } => items.push(content.to_string()),
        Section::Issues { items, .. } => {
            let (description, fix) = match content.split_once('|') {
                Some((description, fix)) => {
                    (description.trim().to_string(), Some(fix.trim().to_string()))
                }
                None => (content.to_string(), None),
            };
            items.push(IssueEntry { description, fix });
        }
        // Score, Summary, and Raw never accumulate bullets.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let input = "SCORE: 8/10\nSTRENGTHS:\n- Good naming\nHIGH_PRIORITY_ISSUES:\n- Null check missing (Line 4) | Fix: add guard\n";
        let response = parse_review(input);
        assert_eq!(response.sections.len(), 3);
        assert_eq!(response.sections[0], Section::Score { text: "8/10".to_string() });
        assert_eq!(
            response.sections[1],
            Section::Strengths { items: vec!["Good naming".to_string()] }
        );
        assert_eq!(
            response.sections[2],
            Section::Issues {
                priority: Priority::High,
                items: vec![IssueEntry {
                    description: "Null check missing (Line 4)".to_string(),
                    fix: Some("Fix: add guard".to_string()),
                }],
            }
        );
    }

    #[test]
    fn test_issue_without_fix() {
        let input = "SCORE: 5/10\nMEDIUM_PRIORITY_ISSUES:\n- Unused variable x\n";
        let response = parse_review(input);
        assert_eq!(
            response.sections[1],
            Section::Issues {
                priority: Priority::Medium,
                items: vec![IssueEntry {
                    description: "Unused variable x".to_string(),
                    fix: None,
                }],
            }
        );
    }

    #[test]
    fn test_issue_splits_on_first_pipe_only() {
        let input = "SCORE: 5/10\nLOW_PRIORITY_ISSUES:\n- Magic number | Fix: name it | or inline it\n";
        let response = parse_review(input);
        let Section::Issues { items, .. } = &response.sections[1] else {
            panic!("expected issues section");
        };
        assert_eq!(items[0].description, "Magic number");
        assert_eq!(items[0].fix.as_deref(), Some("Fix: name it | or inline it"));
    }

    #[test]
    fn test_raw_fallback_on_unstructured_text() {
        let input = "The model decided to chat instead.\nNo headers here.";
        let response = parse_review(input);
        assert_eq!(
            response.sections,
            vec![Section::Raw { text: input.to_string() }]
        );
    }

    #[test]
    fn test_raw_fallback_ignores_unmarked_headers() {
        // DOCUMENTATION: alone does not count as a fallback marker.
        let input = "DOCUMENTATION:\n- Add a README\n";
        let response = parse_review(input);
        assert_eq!(
            response.sections,
            vec![Section::Raw { text: input.to_string() }]
        );
    }

    #[test]
    fn test_summary_is_terminal_section() {
        // A bullet after SUMMARY: has no open accumulator and is dropped.
        let input = "SCORE: 6/10\nSUMMARY: Fine overall.\n- stray bullet\nIMPROVEMENTS:\n- Split main\n";
        let response = parse_review(input);
        assert_eq!(response.sections.len(), 3);
        assert_eq!(
            response.sections[1],
            Section::Summary { text: "Fine overall.".to_string() }
        );
        assert_eq!(
            response.sections[2],
            Section::Improvements { items: vec!["Split main".to_string()] }
        );
    }

    #[test]
    fn test_repeated_header_opens_fresh_section() {
        let input = "STRENGTHS:\n- One\nSTRENGTHS:\n- Two\n";
        let response = parse_review(input);
        assert_eq!(
            response.sections,
            vec![
                Section::Strengths { items: vec!["One".to_string()] },
                Section::Strengths { items: vec!["Two".to_string()] },
            ]
        );
    }

    #[test]
    fn test_bullets_before_any_header_are_dropped() {
        let input = "- orphan bullet\nSTRENGTHS:\n- Kept\n";
        let response = parse_review(input);
        assert_eq!(
            response.sections,
            vec![Section::Strengths { items: vec!["Kept".to_string()] }]
        );
    }

    #[test]
    fn test_section_order_follows_input() {
        let input = "IMPROVEMENTS:\n- A\nSCORE: 9/10\nSTRENGTHS:\n- B\n";
        let response = parse_review(input);
        assert!(matches!(response.sections[0], Section::Improvements { .. }));
        assert!(matches!(response.sections[1], Section::Score { .. }));
        assert!(matches!(response.sections[2], Section::Strengths { .. }));
    }

    #[test]
    fn test_round_trip_preserves_item_lists() {
        let input = "SCORE: 8/10\nSUMMARY: Solid.\nSTRENGTHS:\n- Good naming\n- Small functions\nHIGH_PRIORITY_ISSUES:\n- Null check missing (Line 4) | Fix: add guard\nDOCUMENTATION:\n- Document the retry flag\n";
        let first = parse_review(input);
        let second = parse_review(&first.to_text());
        assert_eq!(first, second);
    }
}
