use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::metrics::{ComplexityLevel, ComplexityMetrics};
use crate::review::{Priority, ReviewResponse, Section};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// One submission's rendered output: the parsed review, the local metrics,
/// or both, plus enough context to label them.
#[derive(Debug)]
pub struct Report {
    /// What was reviewed (file path or "stdin")
    pub source_label: String,
    /// Language tag fed to the prompt and the keyword table
    pub language: String,
    /// Review mode that produced the reply ("simple" or "agent")
    pub mode: String,
    /// Parsed model reply; None in metrics-only runs
    pub review: Option<ReviewResponse>,
    /// Lexical metrics; None when metrics are disabled
    pub metrics: Option<ComplexityMetrics>,
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(source = %report.source_label, mode = %report.mode))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

/// Format and print the report to the terminal with colors.
fn print_terminal_report(report: &Report) {
    println!();
    println!(
        "═══ Review: {} ({}, {} mode) ═══",
        report.source_label, report.language, report.mode
    );
    println!();

    if let Some(review) = &report.review {
        for section in &review.sections {
            print_section(section);
        }
    }

    if let Some(metrics) = &report.metrics {
        print_metrics(metrics);
    }
}

fn print_section(section: &Section) {
    match section {
        Section::Score { text } => {
            println!("Score: {}", text.bold());
        }
        Section::Summary { text } => {
            println!("Summary: {}", text);
            println!();
        }
        Section::Strengths { items } => {
            println!("── Strengths ──");
            for item in items {
                println!("  {} {}", "✓".green(), item);
            }
            println!();
        }
        Section::Issues { priority, items } => {
            println!("── {} Priority Issues ──", priority_label(*priority));
            if items.is_empty() {
                println!("  None reported.");
            }
            for entry in items {
                println!("  {} {}", colorize_priority(*priority), entry.description);
                if let Some(fix) = &entry.fix {
                    println!("    ↳ {}", fix);
                }
            }
            println!();
        }
        Section::Improvements { items } => {
            println!("── Suggestions for Improvement ──");
            for item in items {
                println!("  • {}", item);
            }
            println!();
        }
        Section::Documentation { items } => {
            println!("── Documentation Recommendations ──");
            for item in items {
                println!("  • {}", item);
            }
            println!();
        }
        Section::Raw { text } => {
            println!("── Raw Review ──");
            println!("{}", text);
            println!();
        }
    }
}

fn print_metrics(metrics: &ComplexityMetrics) {
    println!("═══ Complexity Metrics ═══");
    println!(
        "Lines: {} | Score: {} | Level: {}",
        metrics.total_lines,
        metrics.complexity_score,
        colorize_level(metrics.complexity_level)
    );
    println!(
        "Loops: {} | Conditionals: {} | Functions: {} | Classes: {} | Max nesting: {}",
        metrics.loop_count,
        metrics.conditional_count,
        metrics.function_count,
        metrics.class_count,
        metrics.max_nesting
    );
    println!();
}

/// Write the report as a markdown file.
fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut md = String::new();
    md.push_str(&format!(
        "# Code Review: {}\n\n**Language:** {} | **Mode:** {}\n\n",
        report.source_label, report.language, report.mode
    ));

    if let Some(review) = &report.review {
        for section in &review.sections {
            markdown_section(&mut md, section);
        }
    }

    if let Some(metrics) = &report.metrics {
        md.push_str("## Complexity Metrics\n\n");
        md.push_str(&format!(
            "| Lines | Score | Level | Loops | Conditionals | Functions | Classes | Max nesting |\n\
             |---|---|---|---|---|---|---|---|\n\
             | {} | {} | {} | {} | {} | {} | {} | {} |\n\n",
            metrics.total_lines,
            metrics.complexity_score,
            metrics.complexity_level,
            metrics.loop_count,
            metrics.conditional_count,
            metrics.function_count,
            metrics.class_count,
            metrics.max_nesting
        ));
    }

    std::fs::write(path, md)?;
    Ok(())
}

fn markdown_section(md: &mut String, section: &Section) {
    match section {
        Section::Score { text } => {
            md.push_str(&format!("**Score:** {}\n\n", text));
        }
        Section::Summary { text } => {
            md.push_str(&format!("**Summary:** {}\n\n", text));
        }
        Section::Strengths { items } => {
            md.push_str("## Strengths\n\n");
            for item in items {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
        Section::Issues { priority, items } => {
            md.push_str(&format!("## {} Priority Issues\n\n", priority_label(*priority)));
            if items.is_empty() {
                md.push_str("None reported.\n");
            }
            for entry in items {
                match &entry.fix {
                    Some(fix) => md.push_str(&format!("- {} — *{}*\n", entry.description, fix)),
                    None => md.push_str(&format!("- {}\n", entry.description)),
                }
            }
            md.push('\n');
        }
        Section::Improvements { items } => {
            md.push_str("## Suggestions for Improvement\n\n");
            for item in items {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
        Section::Documentation { items } => {
            md.push_str("## Documentation Recommendations\n\n");
            for item in items {
                md.push_str(&format!("- {}\n", item));
            }
            md.push('\n');
        }
        Section::Raw { text } => {
            md.push_str("## Raw Review\n\n");
            md.push_str(text);
            md.push_str("\n\n");
        }
    }
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

/// Bullet marker colored by issue priority.
fn colorize_priority(priority: Priority) -> colored::ColoredString {
    match priority {
        Priority::High => "•".red().bold(),
        Priority::Medium => "•".yellow().bold(),
        Priority::Low => "•".cyan(),
    }
}

fn colorize_level(level: ComplexityLevel) -> colored::ColoredString {
    match level {
        ComplexityLevel::High => "HIGH".red().bold(),
        ComplexityLevel::Medium => "MEDIUM".yellow().bold(),
        ComplexityLevel::Low => "LOW".green().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::analyze_complexity;
    use crate::review::parse_review;

    fn sample_report() -> Report {
        let reply = "SCORE: 8/10\nSUMMARY: Solid.\nSTRENGTHS:\n- Good naming\nHIGH_PRIORITY_ISSUES:\n- Null check missing (Line 4) | Fix: add guard\n";
        Report {
            source_label: "demo.py".to_string(),
            language: "python".to_string(),
            mode: "simple".to_string(),
            review: Some(parse_review(reply)),
            metrics: Some(analyze_complexity("def f():\n    return 1\n", "python")),
        }
    }

    #[test]
    fn test_write_markdown_report() {
        let report = sample_report();
        let path = std::env::temp_dir().join("test_review_report.md");
        write_markdown_report(&report, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Code Review: demo.py"));
        assert!(content.contains("**Score:** 8/10"));
        assert!(content.contains("## Strengths"));
        assert!(content.contains("- Null check missing (Line 4) — *Fix: add guard*"));
        assert!(content.contains("## Complexity Metrics"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_markdown_raw_fallback() {
        let report = Report {
            source_label: "stdin".to_string(),
            language: "text".to_string(),
            mode: "simple".to_string(),
            review: Some(parse_review("free-form model chatter")),
            metrics: None,
        };
        let path = std::env::temp_dir().join("test_raw_report.md");
        write_markdown_report(&report, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Raw Review"));
        assert!(content.contains("free-form model chatter"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_terminal_report_does_not_panic() {
        print_terminal_report(&sample_report());
    }

    #[test]
    fn test_metrics_only_report() {
        let report = Report {
            source_label: "demo.py".to_string(),
            language: "python".to_string(),
            mode: "metrics-only".to_string(),
            review: None,
            metrics: Some(analyze_complexity("x = 1\n", "python")),
        };
        let path = std::env::temp_dir().join("test_metrics_report.md");
        output(&report, Some(&path)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("## Complexity Metrics"));
        assert!(!content.contains("**Score:**"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_output_to_terminal() {
        output(&sample_report(), None).unwrap();
    }
}
