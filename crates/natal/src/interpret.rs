//! Natural-language interpretation of a finished chart.
//!
//! Text generation is an outside service. This module owns the prompt and the
//! failure classification; the transport lives with whoever implements
//! `Interpreter`.

use std::fmt::Write as _;

use async_trait::async_trait;
use thiserror::Error;

use crate::chart::NatalChart;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretationError {
    #[error("No interpreter is configured")]
    NotConfigured,
    #[error("Interpreter timed out after {0}s")]
    Timeout(u64),
    #[error("Interpreter rate limit exceeded: {0}")]
    RateLimited(String),
    #[error("Interpreter refused the request: {0}")]
    Forbidden(String),
    #[error("Interpreter returned no text")]
    EmptyResponse,
    #[error("Interpreter failed: {0}")]
    Failed(String),
}

impl InterpretationError {
    /// Classify a failure report from a text-generation service by its wording.
    /// A reported timeout carries 0 seconds since the service's own limit is
    /// unknown.
    pub fn from_failure_text(detail: &str) -> Self {
        let lower = detail.to_lowercase();
        if lower.contains("403") || lower.contains("forbidden") {
            InterpretationError::Forbidden(detail.to_string())
        } else if lower.contains("quota exceeded")
            || lower.contains("rate limit")
            || lower.contains("429")
        {
            InterpretationError::RateLimited(detail.to_string())
        } else if lower.contains("timeout") || lower.contains("timed out") {
            InterpretationError::Timeout(0)
        } else {
            InterpretationError::Failed(detail.to_string())
        }
    }
}

/// Turns a chart into free text. Failure never invalidates the chart.
#[async_trait]
pub trait Interpreter: Send + Sync {
    fn name(&self) -> &str;

    async fn interpret(&self, chart: &NatalChart) -> Result<String, InterpretationError>;
}

/// Interpreter used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledInterpreter;

#[async_trait]
impl Interpreter for DisabledInterpreter {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn interpret(&self, _chart: &NatalChart) -> Result<String, InterpretationError> {
        Err(InterpretationError::NotConfigured)
    }
}

const PROMPT_HEADER: &str = "あなたは経験豊富な占星術師です。以下の天体位置とハウスカスプ情報に基づいて、\
その人の性格や傾向について、詳細かつ洞察に満ちたホロスコープの解釈を生成してください。";

const PROMPT_FOOTER: &str =
    "解釈は、各天体の位置が示す意味を簡潔にまとめ、全体的な性格傾向を説明してください。";

/// Prompt for a text-generation service: one line per chart point with its
/// sign and longitude, bodies also with house and retrograde mark.
pub fn build_prompt(chart: &NatalChart) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{PROMPT_HEADER}\n");
    let _ = writeln!(prompt, "**天体位置:**");
    for entry in chart.entries() {
        let point = entry.point();
        let _ = write!(
            prompt,
            "- {}: {} ({:.2}度)",
            point.label(),
            entry.sign.display_name(),
            entry.longitude()
        );
        if !point.is_angle() {
            let _ = write!(prompt, " 第{}ハウス", chart.house_of(point));
            if entry.position.is_retrograde() {
                let _ = write!(prompt, " 逆行");
            }
        }
        prompt.push('\n');
    }
    let _ = writeln!(prompt, "\nハウスシステム: {}", chart.house_system().name());
    prompt.push('\n');
    prompt.push_str(PROMPT_FOOTER);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_text_classification() {
        assert!(matches!(
            InterpretationError::from_failure_text("403 Client Error: Forbidden"),
            InterpretationError::Forbidden(_)
        ));
        assert!(matches!(
            InterpretationError::from_failure_text("Quota exceeded for model"),
            InterpretationError::RateLimited(_)
        ));
        assert!(matches!(
            InterpretationError::from_failure_text("connection reset"),
            InterpretationError::Failed(_)
        ));
    }

    #[test]
    fn test_timeout_wording_is_timeout() {
        assert_eq!(
            InterpretationError::from_failure_text("Read timed out. (read timeout=60)"),
            InterpretationError::Timeout(0)
        );
        assert_eq!(
            InterpretationError::from_failure_text("504 Gateway Timeout"),
            InterpretationError::Timeout(0)
        );
    }
}
