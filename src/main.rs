mod config;
mod history;
mod llm;
mod metrics;
mod report;
mod review;

use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};
use tracing_subscriber::EnvFilter;

use history::{HistoryEntry, ReviewHistory};
use llm::{AgentReviewer, GeminiClient, Reviewer, SimpleReviewer};

/// Code Reviewer — CLI tool that sends source files to Gemini and renders
/// the model's free-text reply as a structured review, alongside a local
/// lexical complexity report.
#[derive(Parser, Debug)]
#[command(name = "code-reviewer", version, about)]
struct Cli {
    /// Source files to review ("-" reads from stdin)
    ///
    /// Not required when --mock is used.
    files: Vec<PathBuf>,

    /// Language tag for the prompt and keyword table
    /// (inferred from the file extension when omitted)
    #[arg(short, long)]
    language: Option<String>,

    /// Optional output file path for a markdown report (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use agent mode: several specialized prompts combined into one review
    #[arg(long)]
    agent: bool,

    /// Skip the model call and only compute complexity metrics
    #[arg(long)]
    metrics_only: bool,

    /// Skip the complexity metrics
    #[arg(long)]
    no_metrics: bool,

    /// Review a built-in sample reply for demo purposes (no API key needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    if cli.r#mock {
        info!("using embedded sample reply for demo");
        let report = build_mock_report();
        report::output(&report, cli.output.as_deref())?;
        return Ok(());
    }

    if cli.files.is_empty() {
        return Err(
            "at least one file is required unless --mock is used. Usage: code-reviewer <FILE>... or code-reviewer --mock"
                .into(),
        );
    }
    if cli.output.is_some() && cli.files.len() > 1 {
        return Err("--output requires a single input file".into());
    }

    let agent_mode = cli.agent || config.review.agent;
    let (simple, agent) = if cli.metrics_only {
        (None, None)
    } else {
        let client = GeminiClient::from_config(&config)?;
        let agent = agent_mode.then(|| AgentReviewer::new(client.clone()));
        (Some(SimpleReviewer::new(client)), agent)
    };

    let mut session = ReviewHistory::new(config.history_limit());
    let mut reviews_failed = 0usize;

    for file in &cli.files {
        let source_label = label_for(file);
        let _span = info_span!("review", source = %source_label).entered();

        let code = read_source(file)?;
        let language = cli
            .language
            .clone()
            .unwrap_or_else(|| infer_language(file).to_string());
        debug!(%language, bytes = code.len(), "collected submission");

        let metrics = if cli.no_metrics {
            None
        } else {
            Some(metrics::analyze_complexity(&code, &language))
        };

        let (review, mode) = if let Some(simple) = &simple {
            match run_review(simple, agent.as_ref(), &code, &language).await {
                Ok((text, mode)) => {
                    debug!(reply_bytes = text.len(), %mode, "parsing model reply");
                    (Some(review::parse_review(&text)), mode)
                }
                Err(err) => {
                    tracing::error!(%err, "review failed, skipping file");
                    reviews_failed += 1;
                    continue;
                }
            }
        } else {
            (None, "metrics-only".to_string())
        };

        session.push(HistoryEntry {
            source_label: source_label.clone(),
            language: language.clone(),
            mode: mode.clone(),
            snippet: code.clone(),
            score: review
                .as_ref()
                .and_then(|r| r.score_text())
                .map(str::to_string),
        });

        let report = report::Report {
            source_label,
            language,
            mode,
            review,
            metrics,
        };
        report::output(&report, cli.output.as_deref())?;
    }

    if session.len() > 1 {
        print_session_summary(&session);
    }

    if session.is_empty() && reviews_failed > 0 {
        return Err("all review requests failed".into());
    }

    info!(reviewed = session.len(), failed = reviews_failed, "done");
    Ok(())
}

/// Run the configured review strategy. Agent failure falls back to one
/// simple-mode attempt; simple-mode failure surfaces to the caller.
async fn run_review(
    simple: &SimpleReviewer,
    agent: Option<&AgentReviewer>,
    code: &str,
    language: &str,
) -> Result<(String, String), llm::LlmError> {
    if let Some(agent) = agent {
        match agent.review(code, language).await {
            Ok(text) => return Ok((text, agent.name().to_string())),
            Err(err) => {
                warn!(%err, "agent mode failed, falling back to simple mode");
            }
        }
    }
    let text = simple.review(code, language).await?;
    Ok((text, simple.name().to_string()))
}

fn read_source(file: &Path) -> Result<String, std::io::Error> {
    if file == Path::new("-") {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code)?;
        Ok(code)
    } else {
        std::fs::read_to_string(file)
    }
}

fn label_for(file: &Path) -> String {
    if file == Path::new("-") {
        "stdin".to_string()
    } else {
        file.display().to_string()
    }
}

/// Map a file extension to the language tag used by the prompt template and
/// the keyword table. Unknown extensions fall back to "text", which hits the
/// generic keyword set.
fn infer_language(file: &Path) -> &'static str {
    match file.extension().and_then(|e| e.to_str()) {
        Some("py") => "python",
        Some("js") | Some("jsx") => "javascript",
        Some("ts") | Some("tsx") => "typescript",
        Some("java") => "java",
        Some("rs") => "rust",
        Some("go") => "go",
        Some("c") | Some("h") => "c",
        Some("cpp") | Some("cc") | Some("hpp") => "cpp",
        Some("cs") => "csharp",
        Some("rb") => "ruby",
        Some("php") => "php",
        _ => "text",
    }
}

/// Build a Report from the embedded sample fixtures. This exercises the full
/// parse-and-render pipeline without an API key.
fn build_mock_report() -> report::Report {
    let code = include_str!("../tests/fixtures/sample_code.py");
    let reply = include_str!("../tests/fixtures/sample_review.txt");
    report::Report {
        source_label: "sample_code.py".to_string(),
        language: "python".to_string(),
        mode: "mock".to_string(),
        review: Some(review::parse_review(reply)),
        metrics: Some(metrics::analyze_complexity(code, "python")),
    }
}

fn print_session_summary(session: &ReviewHistory) {
    println!("═══ Session Summary (last {}) ═══", session.len());
    for entry in session.recent() {
        let score = entry.score.as_deref().unwrap_or("-");
        println!(
            "  {} [{}] {} — score {}",
            entry.mode, entry.language, entry.source_label, score
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_language_known_extensions() {
        assert_eq!(infer_language(Path::new("app.py")), "python");
        assert_eq!(infer_language(Path::new("lib/util.ts")), "typescript");
        assert_eq!(infer_language(Path::new("Main.java")), "java");
        assert_eq!(infer_language(Path::new("main.rs")), "rust");
    }

    #[test]
    fn test_infer_language_unknown_extension() {
        assert_eq!(infer_language(Path::new("notes.txt")), "text");
        assert_eq!(infer_language(Path::new("Makefile")), "text");
    }

    #[test]
    fn test_label_for_stdin() {
        assert_eq!(label_for(Path::new("-")), "stdin");
        assert_eq!(label_for(Path::new("src/app.py")), "src/app.py");
    }

    #[test]
    fn test_mock_report_parses_fixture_sections() {
        let report = build_mock_report();
        let review = report.review.expect("mock report carries a review");
        assert!(review.score_text().is_some());
        assert!(review.sections.len() > 3);
        let metrics = report.metrics.expect("mock report carries metrics");
        assert!(metrics.total_lines > 0);
    }
}
