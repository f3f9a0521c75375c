// ATS analysis engine.
// Check modules -> flat CheckResult list -> scorer + recommender -> AnalysisReport.
// Everything below `handlers` and `history` is pure, synchronous and deterministic.

pub mod checks;
pub mod export;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod handlers;
pub mod history;
pub mod keywords;
pub mod recommendations;
pub mod scanner;
pub mod scorer;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use recommendations::{Recommendation, RecommendationSet, RecommendationsEngine, Recommender};
pub use scanner::{AnalysisReport, AtsScanner, ScanFailure};
pub use scorer::{AtsScorer, ScoreResult, Scorer};

/// Which check module produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Formatting,
    Structure,
    Content,
}

impl CheckCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckCategory::Formatting => "formatting",
            CheckCategory::Structure => "structure",
            CheckCategory::Content => "content",
        }
    }
}

/// How visibly or urgently a check rates its finding. `Error` is reserved for checks
/// that could not evaluate at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Pass,
    Low,
    Medium,
    High,
    Critical,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Pass => "pass",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Error => "error",
        }
    }
}

/// How much the underlying issue matters for ATS outcomes. Set per check, independent of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

impl Impact {
    pub fn weight(self) -> f64 {
        match self {
            Impact::Critical => 100.0,
            Impact::High => 75.0,
            Impact::Medium => 50.0,
            Impact::Low => 25.0,
        }
    }

    pub fn is_major(self) -> bool {
        matches!(self, Impact::Critical | Impact::High)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Impact::Low => "low",
            Impact::Medium => "medium",
            Impact::High => "high",
            Impact::Critical => "critical",
        }
    }
}

/// The atomic unit of analysis output: one per check per scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub check_name: String,
    pub category: CheckCategory,
    pub passed: bool,
    /// 0 – 100, higher is better. Partial credit allowed either way.
    pub score: u32,
    pub severity: Severity,
    pub message: String,
    pub recommendation: Option<String>,
    pub impact: Impact,
    pub details: Value,
}

impl CheckResult {
    /// Result for a check that could not evaluate.
    pub fn errored(name: &str, category: CheckCategory, impact: Impact, message: String) -> Self {
        Self {
            check_name: name.to_string(),
            category,
            passed: false,
            score: 0,
            severity: Severity::Error,
            message: format!("Check could not be evaluated: {message}"),
            recommendation: None,
            impact,
            details: Value::Null,
        }
    }
}

/// Caller-supplied scan inputs. Unknown or absent values fall back to defaults, never errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOptions {
    /// "pdf", "docx", ... Only `supportedFileFormat` looks at it.
    #[serde(default)]
    pub file_format: Option<String>,
    /// Overrides industry auto-detection. Unknown keys resolve to `general`.
    #[serde(default)]
    pub industry: Option<String>,
    /// Cosmetic. Used to name sides of a comparison.
    #[serde(default)]
    pub label: Option<String>,
}
