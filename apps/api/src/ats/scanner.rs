//! Scan orchestrator: runs every check module, then scores and recommends over the flat result list.
//!
//! A scan only fails outright when there is no document. Individual broken checks surface as
//! `severity: error` entries inside an otherwise complete report.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ats::checks::{CheckModule, ContentChecks, FormattingChecks, StructureChecks};
use crate::ats::export::{self, ExportFormat};
use crate::ats::keywords::Industry;
use crate::ats::recommendations::{RecommendationSet, Recommender, RecommendationsEngine};
use crate::ats::scorer::{AtsScorer, ScoreResult, Scorer};
use crate::ats::text::{document_text, round2, word_count};
use crate::ats::{CheckCategory, CheckResult, Impact, ScanOptions};
use crate::models::resume::ResumeDocument;

pub const REPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Checks a quick scan reports on. The full check set still runs.
pub const CRITICAL_CHECKS: [&str; 8] = [
    "noTables",
    "noMultiColumn",
    "noImages",
    "noTextBoxes",
    "supportedFileFormat",
    "contactInfo",
    "standardSectionHeadings",
    "experienceSection",
];

// ────────────────────────────────────────────────────────────────────────────
// Report shapes
// ────────────────────────────────────────────────────────────────────────────

/// Document-level scan failure. Serializes to `{error: true, message, timestamp, executionTime}`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub error: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Milliseconds spent before failing.
    pub execution_time: u64,
}

impl ScanFailure {
    pub fn new(message: impl Into<String>, started: Instant) -> Self {
        Self {
            error: true,
            message: message.into(),
            timestamp: Utc::now(),
            execution_time: started.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<CheckResult>,
}

/// Per check-module roll-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: CheckCategory,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub word_count: usize,
    pub section_count: usize,
    pub file_format: Option<String>,
    pub target_industry: Industry,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub score: ScoreResult,
    pub checks: CheckSummary,
    pub categories: Vec<CategorySummary>,
    pub recommendations: RecommendationSet,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickScanReport {
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub overall_score: f64,
    pub grade: String,
    pub passed: usize,
    pub total: usize,
    /// True when every critical check passed.
    pub ats_ready: bool,
    pub critical_checks: Vec<CheckResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSide {
    pub label: String,
    pub overall_score: f64,
    pub grade: String,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDifference {
    /// A minus B.
    pub score: f64,
    pub passed: i64,
    /// Label of the higher-scoring side. A wins ties.
    pub better: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDifference {
    pub check_name: String,
    pub a_passed: bool,
    pub b_passed: bool,
    pub a_score: u32,
    pub b_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub resume_a: ComparisonSide,
    pub resume_b: ComparisonSide,
    pub difference: ComparisonDifference,
    /// Checks whose outcome differs between the two documents.
    pub check_differences: Vec<CheckDifference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStep {
    pub check_name: String,
    pub recommendation: String,
    pub impact: Impact,
    pub estimated_gain: f64,
    pub projected_score: f64,
}

/// Greedy estimate of which fixes close the gap to a target score. Heuristic, not a guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathToScore {
    pub current_score: f64,
    pub target_score: f64,
    pub gap: f64,
    pub achievable: bool,
    pub projected_score: f64,
    pub estimated_minutes: u32,
    pub steps: Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInfo {
    pub name: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub category: CheckCategory,
    pub checks: Vec<CheckInfo>,
}

fn estimated_gain(impact: Impact) -> f64 {
    match impact {
        Impact::Critical => 5.0,
        Impact::High => 4.0,
        Impact::Medium => 3.0,
        Impact::Low => 2.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scanner
// ────────────────────────────────────────────────────────────────────────────

pub struct AtsScanner {
    modules: Vec<Box<dyn CheckModule>>,
    scorer: Arc<dyn Scorer>,
    recommender: Arc<dyn Recommender>,
}

impl Default for AtsScanner {
    fn default() -> Self {
        Self::new(
            vec![
                Box::new(FormattingChecks),
                Box::new(StructureChecks),
                Box::new(ContentChecks),
            ],
            Arc::new(AtsScorer),
            Arc::new(RecommendationsEngine),
        )
    }
}

impl AtsScanner {
    pub fn new(
        modules: Vec<Box<dyn CheckModule>>,
        scorer: Arc<dyn Scorer>,
        recommender: Arc<dyn Recommender>,
    ) -> Self {
        Self {
            modules,
            scorer,
            recommender,
        }
    }

    pub fn catalogue(&self) -> Vec<CatalogueEntry> {
        self.modules
            .iter()
            .map(|module| CatalogueEntry {
                category: module.category(),
                checks: module
                    .checks()
                    .iter()
                    .map(|spec| CheckInfo {
                        name: spec.name.to_string(),
                        impact: spec.impact,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Every check of every module, in module then table order.
    pub fn run_checks(&self, doc: &ResumeDocument, options: &ScanOptions) -> Vec<CheckResult> {
        self.modules
            .iter()
            .flat_map(|module| module.run(doc, options))
            .collect()
    }

    pub fn scan(
        &self,
        resume: Option<&ResumeDocument>,
        options: &ScanOptions,
    ) -> Result<AnalysisReport, ScanFailure> {
        let started = Instant::now();
        let doc = resume.ok_or_else(|| ScanFailure::new("No resume document provided", started))?;

        let results = self.run_checks(doc, options);
        debug!(checks = results.len(), sections = doc.sections.len(), "checks complete");

        let score = self.scorer.calculate_score(&results, options);
        let recommendations = self.recommender.generate(&results, &score, options);

        let text = document_text(doc);
        let metadata = ReportMetadata {
            word_count: word_count(&text),
            section_count: doc.sections.len(),
            file_format: options.file_format.clone(),
            target_industry: Industry::resolve(options.industry.as_deref(), &text.to_lowercase()),
            label: options.label.clone(),
        };

        let categories = self
            .modules
            .iter()
            .map(|module| summarize(module.category(), &results))
            .collect();
        let passed = results.iter().filter(|r| r.passed).count();
        let duration_ms = started.elapsed().as_millis() as u64;

        info!(
            score = score.overall_score,
            grade = %score.grade,
            passed,
            total = results.len(),
            duration_ms,
            "scan complete"
        );

        Ok(AnalysisReport {
            version: REPORT_VERSION.to_string(),
            timestamp: Utc::now(),
            duration_ms,
            score,
            checks: CheckSummary {
                total: results.len(),
                passed,
                failed: results.len() - passed,
                results,
            },
            categories,
            recommendations,
            metadata,
        })
    }

    pub fn quick_scan(
        &self,
        resume: Option<&ResumeDocument>,
        options: &ScanOptions,
    ) -> Result<QuickScanReport, ScanFailure> {
        let report = self.scan(resume, options)?;
        let critical_checks: Vec<CheckResult> = report
            .checks
            .results
            .into_iter()
            .filter(|r| CRITICAL_CHECKS.contains(&r.check_name.as_str()))
            .collect();
        let passed = critical_checks.iter().filter(|r| r.passed).count();
        Ok(QuickScanReport {
            timestamp: report.timestamp,
            duration_ms: report.duration_ms,
            overall_score: report.score.overall_score,
            grade: report.score.grade,
            passed,
            total: critical_checks.len(),
            ats_ready: passed == critical_checks.len(),
            critical_checks,
        })
    }

    /// Scans both documents concurrently and diffs the results.
    pub fn compare_resumes(
        &self,
        resume_a: Option<&ResumeDocument>,
        options_a: &ScanOptions,
        resume_b: Option<&ResumeDocument>,
        options_b: &ScanOptions,
    ) -> Result<Comparison, ScanFailure> {
        let (a, b) = std::thread::scope(|s| {
            let second = s.spawn(|| self.scan(resume_b, options_b));
            let first = self.scan(resume_a, options_a);
            let second = second
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (first, second)
        });
        let (a, b) = (a?, b?);

        let side = |report: &AnalysisReport, fallback: &str| ComparisonSide {
            label: report.metadata.label.clone().unwrap_or_else(|| fallback.to_string()),
            overall_score: report.score.overall_score,
            grade: report.score.grade.clone(),
            passed: report.checks.passed,
            failed: report.checks.failed,
        };
        let resume_a = side(&a, "Resume A");
        let resume_b = side(&b, "Resume B");

        let check_differences = a
            .checks
            .results
            .iter()
            .zip(&b.checks.results)
            .filter(|(x, y)| x.passed != y.passed || x.score != y.score)
            .map(|(x, y)| CheckDifference {
                check_name: x.check_name.clone(),
                a_passed: x.passed,
                b_passed: y.passed,
                a_score: x.score,
                b_score: y.score,
            })
            .collect();

        let better = if resume_b.overall_score > resume_a.overall_score {
            resume_b.label.clone()
        } else {
            resume_a.label.clone()
        };

        Ok(Comparison {
            difference: ComparisonDifference {
                score: round2(resume_a.overall_score - resume_b.overall_score),
                passed: resume_a.passed as i64 - resume_b.passed as i64,
                better,
            },
            resume_a,
            resume_b,
            check_differences,
        })
    }

    /// Consumes recommendations in priority order until the projected score reaches `target`.
    pub fn path_to_score(&self, report: &AnalysisReport, target: f64) -> PathToScore {
        let current = report.score.overall_score;
        let target = target.clamp(0.0, 100.0);
        let mut projected = current;
        let mut steps = Vec::new();

        for rec in &report.recommendations.all {
            if projected >= target {
                break;
            }
            let gain = estimated_gain(rec.impact);
            projected = (projected + gain).min(100.0);
            steps.push(PathStep {
                check_name: rec.check_name.clone(),
                recommendation: rec.recommendation.clone(),
                impact: rec.impact,
                estimated_gain: gain,
                projected_score: round2(projected),
            });
        }

        let estimated_minutes = steps
            .iter()
            .filter_map(|step| {
                report
                    .recommendations
                    .all
                    .iter()
                    .find(|r| r.check_name == step.check_name)
                    .map(|r| r.estimated_minutes)
            })
            .sum();

        PathToScore {
            current_score: current,
            target_score: target,
            gap: round2((target - current).max(0.0)),
            achievable: projected >= target,
            projected_score: round2(projected),
            estimated_minutes,
            steps,
        }
    }

    pub fn export_results(&self, report: &AnalysisReport, format: ExportFormat) -> anyhow::Result<String> {
        export::render(report, format)
    }
}

fn summarize(category: CheckCategory, results: &[CheckResult]) -> CategorySummary {
    let members: Vec<&CheckResult> = results.iter().filter(|r| r.category == category).collect();
    let passed = members.iter().filter(|r| r.passed).count();
    let average = if members.is_empty() {
        0.0
    } else {
        members.iter().map(|r| r.score as f64).sum::<f64>() / members.len() as f64
    };
    CategorySummary {
        category,
        total: members.len(),
        passed,
        failed: members.len() - passed,
        average_score: round2(average),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::checks::{CheckFailure, CheckOutcome, CheckSpec};
    use crate::ats::fixtures::sample_resume;
    use crate::ats::Severity;

    fn scanner() -> AtsScanner {
        AtsScanner::default()
    }

    #[test]
    fn test_missing_document_is_scan_failure() {
        let err = scanner().scan(None, &ScanOptions::default()).unwrap_err();
        assert!(err.error);
        assert!(err.message.contains("No resume"));
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body["error"], true);
        assert!(body.get("executionTime").is_some());
    }

    #[test]
    fn test_every_scan_has_thirty_checks() {
        let empty = ResumeDocument::default();
        let sample = sample_resume();
        for doc in [&empty, &sample] {
            let report = scanner().scan(Some(doc), &ScanOptions::default()).unwrap();
            assert_eq!(report.checks.total, 30);
            assert_eq!(report.checks.results.len(), 30);
            assert_eq!(report.checks.passed + report.checks.failed, 30);
            assert_eq!(report.categories.len(), 3);
            assert!(report.categories.iter().all(|c| c.total == 10));
        }
    }

    #[test]
    fn test_empty_document_scores_low_but_bounded() {
        let report = scanner()
            .scan(Some(&ResumeDocument::default()), &ScanOptions::default())
            .unwrap();
        assert!((0.0..=100.0).contains(&report.score.overall_score));
        assert!(report.score.overall_score < 70.0);
        for result in report
            .checks
            .results
            .iter()
            .filter(|r| r.category != CheckCategory::Formatting)
        {
            assert!(!result.passed, "{} passed on an empty document", result.check_name);
            assert!(result.score <= 50, "{} scored {}", result.check_name, result.score);
        }
        assert_eq!(report.metadata.word_count, 0);
        assert_eq!(report.metadata.target_industry, Industry::General);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let doc = sample_resume();
        let options = ScanOptions {
            file_format: Some("pdf".into()),
            ..Default::default()
        };
        let first = scanner().scan(Some(&doc), &options).unwrap();
        let second = scanner().scan(Some(&doc), &options).unwrap();
        assert_eq!(first.checks, second.checks);
        assert_eq!(first.score, second.score);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn test_sample_resume_scores_well() {
        let report = scanner().scan(Some(&sample_resume()), &ScanOptions::default()).unwrap();
        assert!(report.score.overall_score >= 70.0, "scored {}", report.score.overall_score);
        assert_eq!(report.metadata.target_industry, Industry::Software);
        let passed = |name: &str| {
            report
                .checks
                .results
                .iter()
                .find(|r| r.check_name == name)
                .map(|r| r.passed)
        };
        assert_eq!(passed("contactInfo"), Some(true));
        assert_eq!(passed("chronologicalOrder"), Some(true));
        assert_eq!(passed("quantifiedAchievements"), Some(true));
        assert_eq!(passed("noTables"), Some(true));
    }

    #[test]
    fn test_quick_scan_reports_critical_subset() {
        let quick = scanner()
            .quick_scan(Some(&sample_resume()), &ScanOptions::default())
            .unwrap();
        assert_eq!(quick.total, CRITICAL_CHECKS.len());
        assert!(quick
            .critical_checks
            .iter()
            .all(|r| CRITICAL_CHECKS.contains(&r.check_name.as_str())));
    }

    #[test]
    fn test_compare_with_itself() {
        let doc = sample_resume();
        let opts = ScanOptions::default();
        let cmp = scanner()
            .compare_resumes(Some(&doc), &opts, Some(&doc), &opts)
            .unwrap();
        assert_eq!(cmp.difference.score, 0.0);
        assert_eq!(cmp.difference.passed, 0);
        assert_eq!(cmp.difference.better, "Resume A");
        assert!(cmp.check_differences.is_empty());
    }

    #[test]
    fn test_compare_prefers_stronger_resume() {
        let strong = sample_resume();
        let weak = ResumeDocument::default();
        let opts_b = ScanOptions {
            label: Some("Draft".into()),
            ..Default::default()
        };
        let cmp = scanner()
            .compare_resumes(Some(&weak), &ScanOptions::default(), Some(&strong), &opts_b)
            .unwrap();
        assert_eq!(cmp.difference.better, "Draft");
        assert!(cmp.difference.score < 0.0);
        assert!(!cmp.check_differences.is_empty());
    }

    #[test]
    fn test_compare_missing_side_fails() {
        let doc = sample_resume();
        let opts = ScanOptions::default();
        assert!(scanner().compare_resumes(Some(&doc), &opts, None, &opts).is_err());
    }

    #[test]
    fn test_path_to_score_closes_gap() {
        let report = scanner()
            .scan(Some(&ResumeDocument::default()), &ScanOptions::default())
            .unwrap();
        let target = (report.score.overall_score + 10.0).min(100.0);
        let path = scanner().path_to_score(&report, target);
        assert!(path.achievable);
        assert!(path.projected_score >= target);
        assert!(!path.steps.is_empty());
        // Steps follow recommendation priority order.
        let expected: Vec<&str> = report
            .recommendations
            .all
            .iter()
            .take(path.steps.len())
            .map(|r| r.check_name.as_str())
            .collect();
        let actual: Vec<&str> = path.steps.iter().map(|s| s.check_name.as_str()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_path_when_already_at_target() {
        let report = scanner().scan(Some(&sample_resume()), &ScanOptions::default()).unwrap();
        let path = scanner().path_to_score(&report, 10.0);
        assert!(path.achievable);
        assert!(path.steps.is_empty());
        assert_eq!(path.gap, 0.0);
    }

    struct Exploding;

    fn explode(_: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
        Err(CheckFailure::Malformed("bad shape".into()))
    }

    static EXPLODING: &[CheckSpec] = &[CheckSpec {
        name: "explodes",
        impact: Impact::High,
        run: explode,
    }];

    impl CheckModule for Exploding {
        fn category(&self) -> CheckCategory {
            CheckCategory::Content
        }

        fn checks(&self) -> &'static [CheckSpec] {
            EXPLODING
        }
    }

    #[test]
    fn test_broken_check_does_not_abort_scan() {
        let scanner = AtsScanner::new(
            vec![Box::new(StructureChecks), Box::new(Exploding)],
            Arc::new(AtsScorer),
            Arc::new(RecommendationsEngine),
        );
        let report = scanner.scan(Some(&sample_resume()), &ScanOptions::default()).unwrap();
        assert_eq!(report.checks.total, 11);
        let broken = report.checks.results.last().unwrap();
        assert_eq!(broken.severity, Severity::Error);
        assert!(!report.recommendations.all.iter().any(|r| r.check_name == "explodes"));
    }
}
