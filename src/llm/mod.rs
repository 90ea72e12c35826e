use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Config;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Gemini API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Gemini API key not found; set GEMINI_API_KEY or [gemini].api_key in .code-reviewer.toml")]
    MissingApiKey,

    #[error("Gemini reply contained no text candidates")]
    EmptyReply,
}

/// A review strategy backed by the Gemini text endpoint.
/// Reviewers must be Send + Sync; the orchestrator may swap strategies
/// mid-run (agent mode falls back to simple mode on failure).
#[async_trait]
pub trait Reviewer: Send + Sync {
    /// Human-readable mode name (e.g., "simple", "agent")
    fn name(&self) -> &str;

    /// Produce the raw review text for one submission. The reply is fed
    /// unmodified into the response parser.
    async fn review(&self, code: &str, language: &str) -> Result<String, LlmError>;
}

/// Thin client for the Gemini generateContent REST endpoint.
/// One attempt per call: no retry, no backoff.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f64,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate's parts.
    fn into_text(self) -> Result<String, LlmError> {
        let candidate = self.candidates.into_iter().next().ok_or(LlmError::EmptyReply)?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        if text.is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(text)
    }
}

impl GeminiClient {
    /// Build a client from resolved configuration.
    /// Returns MissingApiKey when neither config file nor env provides one.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key = config.gemini_api_key().ok_or(LlmError::MissingApiKey)?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model(),
            temperature: config.temperature(),
        })
    }

    /// Send one prompt and return the model's raw text reply.
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_bytes = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: GenerationConfig { temperature: self.temperature },
        };

        debug!("sending prompt to Gemini");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        let text = response.into_text()?;
        debug!(reply_bytes = text.len(), "received model reply");
        Ok(text)
    }
}

/// Single-pass review: one prompt requesting the exact section-header
/// format the parser consumes.
pub struct SimpleReviewer {
    client: GeminiClient,
}

impl SimpleReviewer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reviewer for SimpleReviewer {
    fn name(&self) -> &str {
        "simple"
    }

    async fn review(&self, code: &str, language: &str) -> Result<String, LlmError> {
        self.client.generate(&review_prompt(language, code)).await
    }
}

/// Multi-pass review: three specialized prompts (quality, security,
/// performance) issued sequentially, replies concatenated into one text for
/// the same parser. No extra logic beyond the additional calls.
pub struct AgentReviewer {
    client: GeminiClient,
}

impl AgentReviewer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Reviewer for AgentReviewer {
    fn name(&self) -> &str {
        "agent"
    }

    async fn review(&self, code: &str, language: &str) -> Result<String, LlmError> {
        let mut combined = self.client.generate(&review_prompt(language, code)).await?;
        for prompt in [security_prompt(language, code), performance_prompt(language, code)] {
            let reply = self.client.generate(&prompt).await?;
            combined.push_str("\n\n");
            combined.push_str(&reply);
        }
        Ok(combined)
    }
}

/// Prompt requesting the exact format consumed by the response parser.
fn review_prompt(language: &str, code: &str) -> String {
    format!(
        r#"You are an expert code reviewer. Analyze this {language} code and provide feedback in this EXACT format:

SCORE: X/10

SUMMARY: Brief assessment of the code quality in one sentence.

STRENGTHS:
- What the code does well
- Good practices used

HIGH_PRIORITY_ISSUES:
- Critical issue description (Line number) | Fix: How to resolve it

MEDIUM_PRIORITY_ISSUES:
- Important issue description (Line number) | Fix: How to resolve it

LOW_PRIORITY_ISSUES:
- Minor issue description (Line number) | Fix: How to resolve it

IMPROVEMENTS:
- Suggestion for better code
- Performance or design improvements

DOCUMENTATION:
- Documentation improvements needed
- Comment suggestions

Code to analyze:
```{language}
{code}
```

Follow the format EXACTLY as shown above. Use simple bullet points with dashes."#
    )
}

fn security_prompt(language: &str, code: &str) -> String {
    format!(
        r#"Check this {language} code for security vulnerabilities.

Focus on:
- SQL injection risks
- XSS vulnerabilities
- Input validation issues
- Authentication/authorization problems

Report findings as bullets under HIGH_PRIORITY_ISSUES: or MEDIUM_PRIORITY_ISSUES: headers, each as: description (Line number) | Fix: suggestion.

```{language}
{code}
```"#
    )
}

fn performance_prompt(language: &str, code: &str) -> String {
    format!(
        r#"Suggest performance optimizations for this {language} code.

Focus on:
- Algorithm efficiency
- Memory usage
- Database query optimization
- Loop improvements

Report suggestions as bullets under an IMPROVEMENTS: header.

```{language}
{code}
```"#
    )
}
