//! Check modules. Each is a fixed, ordered table of independent named checks.
//!
//! A check reads the document and options and returns a `CheckOutcome`; the runner adds the
//! name, category and impact. A check that fails to evaluate returns `Err(CheckFailure)` (or
//! panics), which the runner converts into a `severity: error` result so the rest of the scan
//! carries on.

pub mod content;
pub mod formatting;
pub mod structure;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::ats::{CheckCategory, CheckResult, Impact, ScanOptions, Severity};
use crate::models::resume::ResumeDocument;

pub use content::ContentChecks;
pub use formatting::FormattingChecks;
pub use structure::StructureChecks;

#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("check panicked: {0}")]
    Panicked(String),
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Runs one check, turning a panic into a `CheckFailure` so it cannot take down the scan.
fn evaluate(spec: &CheckSpec, doc: &ResumeDocument, options: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    panic::catch_unwind(AssertUnwindSafe(|| (spec.run)(doc, options)))
        .unwrap_or_else(|payload| Err(CheckFailure::Panicked(panic_message(payload))))
}

pub type CheckFn = fn(&ResumeDocument, &ScanOptions) -> Result<CheckOutcome, CheckFailure>;

/// One row of a module's check table.
pub struct CheckSpec {
    pub name: &'static str,
    pub impact: Impact,
    pub run: CheckFn,
}

/// What a check reports, before the runner stamps identity onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub score: u32,
    pub severity: Severity,
    pub message: String,
    pub recommendation: Option<String>,
    pub details: Value,
}

impl CheckOutcome {
    pub fn pass(score: u32, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            score: score.min(100),
            severity: Severity::Pass,
            message: message.into(),
            recommendation: None,
            details: Value::Null,
        }
    }

    pub fn fail(
        score: u32,
        severity: Severity,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            passed: false,
            score: score.min(100),
            severity,
            message: message.into(),
            recommendation: Some(recommendation.into()),
            details: Value::Null,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

/// A group of checks sharing a reporting category.
pub trait CheckModule: Send + Sync {
    fn category(&self) -> CheckCategory;

    fn checks(&self) -> &'static [CheckSpec];

    fn check_names(&self) -> Vec<&'static str> {
        self.checks().iter().map(|c| c.name).collect()
    }

    /// Runs every check in table order. Never fails: a broken check becomes an error result.
    fn run(&self, doc: &ResumeDocument, options: &ScanOptions) -> Vec<CheckResult> {
        let category = self.category();
        self.checks()
            .iter()
            .map(|spec| match evaluate(spec, doc, options) {
                Ok(outcome) => CheckResult {
                    check_name: spec.name.to_string(),
                    category,
                    passed: outcome.passed,
                    score: outcome.score,
                    severity: outcome.severity,
                    message: outcome.message,
                    recommendation: if outcome.passed {
                        None
                    } else {
                        outcome.recommendation
                    },
                    impact: spec.impact,
                    details: outcome.details,
                },
                Err(e) => {
                    warn!(check = spec.name, category = category.as_str(), "check failed: {e}");
                    CheckResult::errored(spec.name, category, spec.impact, e.to_string())
                }
            })
            .collect()
    }
}

/// Shared failure for content checks when the document has nothing to read.
pub(crate) fn no_content(what: &str) -> CheckOutcome {
    CheckOutcome::fail(
        0,
        Severity::High,
        format!("No {what} found to analyze"),
        "Add sections with written content (summary, experience bullets, skills) so the résumé can be evaluated.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeDocument;

    struct Broken;

    fn always_ok(_: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
        Ok(CheckOutcome::fail(40, Severity::Medium, "meh", "fix it"))
    }

    fn always_err(_: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
        Err(CheckFailure::Malformed("unexpected shape".to_string()))
    }

    fn always_panics(_: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
        panic!("index out of range");
    }

    static BROKEN_CHECKS: &[CheckSpec] = &[
        CheckSpec {
            name: "first",
            impact: Impact::Low,
            run: always_err,
        },
        CheckSpec {
            name: "second",
            impact: Impact::High,
            run: always_ok,
        },
        CheckSpec {
            name: "third",
            impact: Impact::Medium,
            run: always_panics,
        },
    ];

    impl CheckModule for Broken {
        fn category(&self) -> CheckCategory {
            CheckCategory::Structure
        }

        fn checks(&self) -> &'static [CheckSpec] {
            BROKEN_CHECKS
        }
    }

    #[test]
    fn test_failing_check_becomes_error_result() {
        let results = Broken.run(&ResumeDocument::default(), &ScanOptions::default());
        assert_eq!(results.len(), 3);

        let errored = &results[0];
        assert_eq!(errored.check_name, "first");
        assert_eq!(errored.severity, Severity::Error);
        assert!(!errored.passed);
        assert_eq!(errored.score, 0);
        assert!(errored.message.contains("unexpected shape"));

        let ok = &results[1];
        assert_eq!(ok.check_name, "second");
        assert_eq!(ok.impact, Impact::High);
        assert_eq!(ok.category, CheckCategory::Structure);
        assert_eq!(ok.recommendation.as_deref(), Some("fix it"));
    }

    #[test]
    fn test_panicking_check_becomes_error_result() {
        let results = Broken.run(&ResumeDocument::default(), &ScanOptions::default());
        let panicked = &results[2];
        assert_eq!(panicked.check_name, "third");
        assert_eq!(panicked.severity, Severity::Error);
        assert_eq!(panicked.score, 0);
        assert!(!panicked.passed);
        assert!(panicked.message.contains("index out of range"), "{}", panicked.message);
        // Checks before the panic still report normally.
        assert_eq!(results[1].severity, Severity::Medium);
    }

    #[test]
    fn test_outcome_score_is_clamped() {
        assert_eq!(CheckOutcome::pass(140, "ok").score, 100);
    }

    #[test]
    fn test_all_modules_have_ten_unique_checks() {
        let modules: Vec<Box<dyn CheckModule>> = vec![
            Box::new(FormattingChecks),
            Box::new(StructureChecks),
            Box::new(ContentChecks),
        ];
        let mut all = std::collections::HashSet::new();
        for module in &modules {
            assert_eq!(module.check_names().len(), 10);
            for name in module.check_names() {
                assert!(all.insert(name), "duplicate check name {name}");
            }
        }
        assert_eq!(all.len(), 30);
    }
}
