pub mod keywords;

use tracing::debug;

/// Indentation-based complexity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityLevel::Low => write!(f, "LOW"),
            ComplexityLevel::Medium => write!(f, "MEDIUM"),
            ComplexityLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Lexical complexity snapshot for one submission. Computed fresh per call,
/// immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityMetrics {
    pub total_lines: usize,
    pub complexity_score: f64,
    pub complexity_level: ComplexityLevel,
    pub loop_count: usize,
    pub conditional_count: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub max_nesting: usize,
}

/// Score source text with a shallow lexical heuristic.
///
/// Counts keyword tokens per language family and estimates nesting from
/// leading whitespace (4 spaces per level). No awareness of comments,
/// string literals, or multi-line constructs; keywords inside strings are
/// counted. That is an accepted limitation of the heuristic.
pub fn analyze_complexity(code: &str, language: &str) -> ComplexityMetrics {
    let set = keywords::for_language(language);

    let mut loop_count = 0usize;
    let mut conditional_count = 0usize;
    let mut function_count = 0usize;
    let mut class_count = 0usize;
    let mut max_nesting = 0usize;
    let mut total_lines = 0usize;

    for line in code.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        total_lines += 1;

        // Nesting estimate uses the original, untrimmed line.
        let leading = line.len() - line.trim_start().len();
        max_nesting = max_nesting.max(leading / 4);

        for token in trimmed.to_lowercase().split_whitespace() {
            // First matching group wins; a token increments one counter only.
            if set.loops.contains(&token) {
                loop_count += 1;
            } else if set.conditionals.contains(&token) {
                conditional_count += 1;
            } else if set.functions.contains(&token) {
                function_count += 1;
            } else if set.classes.contains(&token) {
                class_count += 1;
            }
        }
    }

    let raw_score = loop_count as f64 * 2.0
        + conditional_count as f64 * 1.5
        + max_nesting as f64 * 3.0
        + function_count as f64 * 0.5
        + class_count as f64;
    let complexity_score = (raw_score * 10.0).round() / 10.0;

    let complexity_level = if complexity_score < 10.0 {
        ComplexityLevel::Low
    } else if complexity_score < 25.0 {
        ComplexityLevel::Medium
    } else {
        ComplexityLevel::High
    };

    debug!(
        total_lines,
        score = complexity_score,
        level = %complexity_level,
        "computed complexity metrics"
    );

    ComplexityMetrics {
        total_lines,
        complexity_score,
        complexity_level,
        loop_count,
        conditional_count,
        function_count,
        class_count,
        max_nesting,
    }
}
