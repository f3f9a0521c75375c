//! Weighted scoring: check results → five category scores → overall score, grade, percentile.
//!
//! Weights are fixed (25/25/20/15/15) and always sum to 100, so the overall score stays in
//! [0, 100] whenever every category score does. A category with no mapped checks scores 100:
//! untested areas never drag the total down.

use serde::{Deserialize, Serialize};

use crate::ats::text::round2;
use crate::ats::{CheckResult, ScanOptions, Severity};

// ────────────────────────────────────────────────────────────────────────────
// Categories
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoringCategory {
    AtsCompatibility,
    KeywordMatch,
    ContentQuality,
    Formatting,
    Completeness,
}

impl ScoringCategory {
    pub const ALL: [ScoringCategory; 5] = [
        ScoringCategory::AtsCompatibility,
        ScoringCategory::KeywordMatch,
        ScoringCategory::ContentQuality,
        ScoringCategory::Formatting,
        ScoringCategory::Completeness,
    ];

    pub fn weight(self) -> u32 {
        match self {
            ScoringCategory::AtsCompatibility => 25,
            ScoringCategory::KeywordMatch => 25,
            ScoringCategory::ContentQuality => 20,
            ScoringCategory::Formatting => 15,
            ScoringCategory::Completeness => 15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringCategory::AtsCompatibility => "ATS Compatibility",
            ScoringCategory::KeywordMatch => "Keyword Match",
            ScoringCategory::ContentQuality => "Content Quality",
            ScoringCategory::Formatting => "Formatting",
            ScoringCategory::Completeness => "Completeness",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoringCategory::AtsCompatibility => "atsCompatibility",
            ScoringCategory::KeywordMatch => "keywordMatch",
            ScoringCategory::ContentQuality => "contentQuality",
            ScoringCategory::Formatting => "formatting",
            ScoringCategory::Completeness => "completeness",
        }
    }

    /// Fixed check → category table. Unmapped names land in `AtsCompatibility`.
    pub fn for_check(check_name: &str) -> Self {
        match check_name {
            "noTables" | "noMultiColumn" | "noImages" | "noTextBoxes" | "noHeaderFooterContent"
            | "supportedFileFormat" | "contactInfo" | "standardSectionHeadings" => {
                ScoringCategory::AtsCompatibility
            }
            "keywordDensity" | "industryKeywords" | "dedicatedSkillsSection" => {
                ScoringCategory::KeywordMatch
            }
            "quantifiedAchievements" | "actionVerbs" | "noPersonalPronouns" | "bulletLength"
            | "noBuzzwords" | "verbVariety" | "achievementsOverDuties" | "readability" => {
                ScoringCategory::ContentQuality
            }
            "standardFonts" | "readableFontSize" | "noSpecialCharacters" | "consistentDateFormat"
            | "chronologicalOrder" | "sectionOrdering" => ScoringCategory::Formatting,
            "experienceSection" | "educationSection" | "professionalSummary"
            | "experienceDetails" | "appropriateLength" => ScoringCategory::Completeness,
            _ => ScoringCategory::AtsCompatibility,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub category: ScoringCategory,
    pub label: String,
    pub score: f64,          // 0 – 100, mean of member check scores
    pub weight: u32,
    pub weighted_score: f64, // score × weight / 100
    pub checks: usize,
    pub passed: usize,
}

/// Result counts per severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub pass: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
    pub error: usize,
}

impl SeverityBreakdown {
    pub fn tally(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut counts, r| {
            match r.severity {
                Severity::Pass => counts.pass += 1,
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
                Severity::Error => counts.error += 1,
            }
            counts
        })
    }

    pub fn total(&self) -> usize {
        self.pass + self.low + self.medium + self.high + self.critical + self.error
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub overall_score: f64,
    pub grade: String,
    pub percentile: u32,
    pub categories: Vec<CategoryScore>,
    /// Categories scoring ≥ 90, best first.
    pub strengths: Vec<ScoringCategory>,
    /// Categories scoring < 70, worst first.
    pub weaknesses: Vec<ScoringCategory>,
    pub severity_breakdown: SeverityBreakdown,
}

impl ScoreResult {
    pub fn category(&self, category: ScoringCategory) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grade and percentile tables
// ────────────────────────────────────────────────────────────────────────────

/// Inclusive integer ranges, best first. Contiguous over 0..=100.
const GRADES: &[(u32, u32, &str)] = &[
    (97, 100, "A+"),
    (93, 96, "A"),
    (90, 92, "A-"),
    (87, 89, "B+"),
    (83, 86, "B"),
    (80, 82, "B-"),
    (77, 79, "C+"),
    (73, 76, "C"),
    (70, 72, "C-"),
    (60, 69, "D"),
    (0, 59, "F"),
];

const PERCENTILES: &[(f64, u32)] = &[
    (95.0, 99),
    (90.0, 95),
    (85.0, 90),
    (80.0, 80),
    (75.0, 70),
    (70.0, 60),
    (60.0, 45),
    (50.0, 30),
];

pub fn grade_for(score: f64) -> &'static str {
    let rounded = score.round().clamp(0.0, 100.0) as u32;
    GRADES
        .iter()
        .find(|(min, max, _)| (*min..=*max).contains(&rounded))
        .map(|(_, _, grade)| *grade)
        .unwrap_or("F")
}

pub fn percentile_for(score: f64) -> u32 {
    PERCENTILES
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, p)| *p)
        .unwrap_or(15)
}

// ────────────────────────────────────────────────────────────────────────────
// Scorer trait + default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Turns a flat list of check results into a score. Carried by the scanner as `Arc<dyn Scorer>`.
pub trait Scorer: Send + Sync {
    fn calculate_score(&self, results: &[CheckResult], options: &ScanOptions) -> ScoreResult;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AtsScorer;

impl Scorer for AtsScorer {
    fn calculate_score(&self, results: &[CheckResult], _options: &ScanOptions) -> ScoreResult {
        let categories: Vec<CategoryScore> = ScoringCategory::ALL
            .iter()
            .map(|&category| {
                let members: Vec<&CheckResult> = results
                    .iter()
                    .filter(|r| ScoringCategory::for_check(&r.check_name) == category)
                    .collect();
                let score = if members.is_empty() {
                    100.0
                } else {
                    members.iter().map(|r| r.score as f64).sum::<f64>() / members.len() as f64
                };
                CategoryScore {
                    category,
                    label: category.label().to_string(),
                    score: round2(score),
                    weight: category.weight(),
                    weighted_score: round2(score * category.weight() as f64 / 100.0),
                    checks: members.len(),
                    passed: members.iter().filter(|r| r.passed).count(),
                }
            })
            .collect();

        // Sum of the reported weighted scores, so the parts always add up to the whole.
        let overall = round2(
            categories
                .iter()
                .map(|c| c.weighted_score)
                .sum::<f64>()
                .clamp(0.0, 100.0),
        );

        let mut strengths: Vec<&CategoryScore> = categories.iter().filter(|c| c.score >= 90.0).collect();
        strengths.sort_by(|a, b| b.score.total_cmp(&a.score));
        let mut weaknesses: Vec<&CategoryScore> = categories.iter().filter(|c| c.score < 70.0).collect();
        weaknesses.sort_by(|a, b| a.score.total_cmp(&b.score));

        ScoreResult {
            overall_score: overall,
            grade: grade_for(overall).to_string(),
            percentile: percentile_for(overall),
            strengths: strengths.iter().map(|c| c.category).collect(),
            weaknesses: weaknesses.iter().map(|c| c.category).collect(),
            categories,
            severity_breakdown: SeverityBreakdown::tally(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::{CheckCategory, Impact, Severity};
    use serde_json::Value;

    fn result(name: &str, score: u32) -> CheckResult {
        CheckResult {
            check_name: name.to_string(),
            category: CheckCategory::Content,
            passed: score >= 70,
            score,
            severity: if score >= 70 { Severity::Pass } else { Severity::Medium },
            message: String::new(),
            recommendation: None,
            impact: Impact::Medium,
            details: Value::Null,
        }
    }

    fn score(results: &[CheckResult]) -> ScoreResult {
        AtsScorer.calculate_score(results, &ScanOptions::default())
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: u32 = ScoringCategory::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_grade_table_is_contiguous() {
        let mut expected_max = 100;
        for (min, max, _) in GRADES {
            assert_eq!(*max, expected_max);
            assert!(min <= max);
            expected_max = min.wrapping_sub(1);
        }
        assert_eq!(GRADES.last().map(|g| g.0), Some(0));
    }

    #[test]
    fn test_grade_monotonic() {
        let rank = |g: &str| GRADES.iter().position(|(_, _, name)| *name == g).unwrap();
        let mut previous = rank(grade_for(0.0));
        for step in 1..=1000 {
            let current = rank(grade_for(step as f64 / 10.0));
            assert!(current <= previous, "grade got worse at {}", step as f64 / 10.0);
            previous = current;
        }
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(grade_for(100.0), "A+");
        assert_eq!(grade_for(96.6), "A+");
        assert_eq!(grade_for(92.4), "A-");
        assert_eq!(grade_for(59.4), "F");
        assert_eq!(grade_for(60.0), "D");
    }

    #[test]
    fn test_percentile_steps() {
        assert_eq!(percentile_for(100.0), 99);
        assert_eq!(percentile_for(82.0), 80);
        assert_eq!(percentile_for(49.99), 15);
    }

    #[test]
    fn test_no_results_is_perfect() {
        let s = score(&[]);
        assert_eq!(s.overall_score, 100.0);
        assert_eq!(s.grade, "A+");
        assert_eq!(s.strengths.len(), 5);
        assert!(s.weaknesses.is_empty());
    }

    #[test]
    fn test_all_failing_is_zero() {
        let results: Vec<CheckResult> = ["noTables", "keywordDensity", "actionVerbs", "standardFonts", "experienceSection"]
            .iter()
            .map(|n| result(n, 0))
            .collect();
        let s = score(&results);
        assert_eq!(s.overall_score, 0.0);
        assert_eq!(s.grade, "F");
        assert_eq!(s.percentile, 15);
        assert_eq!(s.weaknesses.len(), 5);
    }

    #[test]
    fn test_overall_is_sum_of_weighted() {
        let results = vec![
            result("noTables", 100),
            result("contactInfo", 65),
            result("keywordDensity", 50),
            result("actionVerbs", 83),
            result("sectionOrdering", 75),
            result("educationSection", 40),
        ];
        let s = score(&results);
        let sum: f64 = s.categories.iter().map(|c| c.weighted_score).sum();
        assert!((s.overall_score - sum).abs() < 1e-9, "{} vs {sum}", s.overall_score);
        assert!((0.0..=100.0).contains(&s.overall_score));
        assert_eq!(s.category(ScoringCategory::AtsCompatibility).map(|c| c.score), Some(82.5));
    }

    #[test]
    fn test_weighted_parts_add_up_after_rounding() {
        // Thirds and sevenths force every category mean to round.
        let results = vec![
            result("noTables", 100),
            result("noImages", 100),
            result("contactInfo", 0),
            result("keywordDensity", 1),
            result("industryKeywords", 0),
            result("dedicatedSkillsSection", 0),
            result("actionVerbs", 10),
            result("noBuzzwords", 0),
            result("readability", 0),
            result("verbVariety", 0),
            result("bulletLength", 0),
            result("noPersonalPronouns", 0),
            result("achievementsOverDuties", 0),
            result("standardFonts", 50),
            result("readableFontSize", 0),
            result("sectionOrdering", 0),
            result("educationSection", 20),
            result("professionalSummary", 0),
            result("experienceDetails", 0),
        ];
        let s = score(&results);
        let sum: f64 = s.categories.iter().map(|c| c.weighted_score).sum();
        assert!((s.overall_score - sum).abs() < 1e-9, "{} vs {sum}", s.overall_score);
    }

    #[test]
    fn test_severity_breakdown_counts_every_result() {
        let mut results = vec![
            result("noTables", 100),
            result("contactInfo", 40),
            result("keywordDensity", 50),
        ];
        results.push(CheckResult::errored("actionVerbs", CheckCategory::Content, Impact::Medium, "boom".into()));
        let mut critical = result("experienceSection", 0);
        critical.severity = Severity::Critical;
        results.push(critical);

        let s = score(&results);
        let b = s.severity_breakdown;
        assert_eq!(b.total(), results.len());
        assert_eq!(b.pass, 1);
        assert_eq!(b.medium, 2);
        assert_eq!(b.error, 1);
        assert_eq!(b.critical, 1);
        assert_eq!(b.low + b.high, 0);

        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["severityBreakdown"]["critical"], 1);
    }

    #[test]
    fn test_unmapped_check_defaults_to_ats_compatibility() {
        assert_eq!(ScoringCategory::for_check("somethingNew"), ScoringCategory::AtsCompatibility);
        let s = score(&[result("somethingNew", 0)]);
        assert_eq!(s.category(ScoringCategory::AtsCompatibility).map(|c| c.checks), Some(1));
        assert_eq!(s.overall_score, 75.0);
    }

    #[test]
    fn test_strengths_and_weaknesses_order() {
        let results = vec![
            result("keywordDensity", 95),
            result("noTables", 92),
            result("actionVerbs", 30),
            result("standardFonts", 60),
            result("experienceSection", 80),
        ];
        let s = score(&results);
        assert_eq!(s.strengths, vec![ScoringCategory::KeywordMatch, ScoringCategory::AtsCompatibility]);
        assert_eq!(s.weaknesses, vec![ScoringCategory::ContentQuality, ScoringCategory::Formatting]);
    }
}
