//! Recommendation engine: failed checks → prioritized, bucketed, time-estimated advice.
//!
//! Priority is impact weight over effort weight (× 100), sorted descending with a stable sort
//! so ties keep check-table order. Output is a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::ats::keywords::Industry;
use crate::ats::scorer::{ScoreResult, ScoringCategory};
use crate::ats::text::round2;
use crate::ats::{CheckCategory, CheckResult, Impact, ScanOptions};

const QUICK_WIN_LIMIT: usize = 5;
const MAJOR_LIMIT: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Effort
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    Medium,
    High,
    Extensive,
}

impl Effort {
    pub fn weight(self) -> f64 {
        match self {
            Effort::Low => 25.0,
            Effort::Medium => 50.0,
            Effort::High => 75.0,
            Effort::Extensive => 100.0,
        }
    }

    /// Rough time to act on one recommendation.
    pub fn minutes(self) -> u32 {
        match self {
            Effort::Low => 15,
            Effort::Medium => 45,
            Effort::High => 90,
            Effort::Extensive => 180,
        }
    }

    pub fn is_light(self) -> bool {
        matches!(self, Effort::Low | Effort::Medium)
    }

    /// Fixed per-check table. Unlisted checks are `Medium`.
    pub fn for_check(check_name: &str) -> Self {
        match check_name {
            "noImages" | "standardFonts" | "readableFontSize" | "noHeaderFooterContent"
            | "supportedFileFormat" | "noSpecialCharacters" | "consistentDateFormat"
            | "contactInfo" | "standardSectionHeadings" | "dedicatedSkillsSection"
            | "educationSection" | "chronologicalOrder" | "sectionOrdering"
            | "noPersonalPronouns" | "noBuzzwords" | "verbVariety" => Effort::Low,
            "quantifiedAchievements" | "achievementsOverDuties" | "appropriateLength" => Effort::High,
            "experienceSection" => Effort::Extensive,
            _ => Effort::Medium,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Display grouping. Distinct from both the check category and the scoring category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayBucket {
    AtsCompatibility,
    Content,
    Formatting,
    Keywords,
    Structure,
}

impl DisplayBucket {
    pub fn for_check(category: CheckCategory, check_name: &str, impact: Impact) -> Self {
        match category {
            CheckCategory::Formatting if impact.is_major() => DisplayBucket::AtsCompatibility,
            CheckCategory::Formatting => DisplayBucket::Formatting,
            CheckCategory::Structure => DisplayBucket::Structure,
            CheckCategory::Content => {
                let lowered = check_name.to_lowercase();
                if lowered.contains("keyword") || lowered.contains("skills") {
                    DisplayBucket::Keywords
                } else {
                    DisplayBucket::Content
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub check_name: String,
    pub category: CheckCategory,
    pub bucket: DisplayBucket,
    pub issue: String,
    pub recommendation: String,
    pub impact: Impact,
    pub effort: Effort,
    pub priority_score: f64,
    pub estimated_minutes: u32,
    pub examples: Vec<String>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketedRecommendations {
    pub ats_compatibility: Vec<Recommendation>,
    pub content: Vec<Recommendation>,
    pub formatting: Vec<Recommendation>,
    pub keywords: Vec<Recommendation>,
    pub structure: Vec<Recommendation>,
}

impl BucketedRecommendations {
    fn push(&mut self, rec: Recommendation) {
        match rec.bucket {
            DisplayBucket::AtsCompatibility => self.ats_compatibility.push(rec),
            DisplayBucket::Content => self.content.push(rec),
            DisplayBucket::Formatting => self.formatting.push(rec),
            DisplayBucket::Keywords => self.keywords.push(rec),
            DisplayBucket::Structure => self.structure.push(rec),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    /// Every recommendation, highest priority first.
    pub all: Vec<Recommendation>,
    pub quick_wins: Vec<Recommendation>,
    pub major_improvements: Vec<Recommendation>,
    pub by_category: BucketedRecommendations,
    pub total_estimated_minutes: u32,
    pub industry: Industry,
    pub industry_tips: Vec<String>,
    pub focus_areas: Vec<ScoringCategory>,
}

// ────────────────────────────────────────────────────────────────────────────
// Guidance table
// ────────────────────────────────────────────────────────────────────────────

struct Guidance {
    examples: &'static [&'static str],
    steps: &'static [&'static str],
}

const GENERIC_GUIDANCE: Guidance = Guidance {
    examples: &[],
    steps: &[
        "Review the flagged area against the message above.",
        "Make the change, then re-run the scan to confirm.",
    ],
};

fn guidance(check_name: &str) -> Guidance {
    match check_name {
        "noTables" | "noMultiColumn" | "noTextBoxes" => Guidance {
            examples: &["Experience\nSenior Engineer, Acme Corp (2020 – Present)\n• Led ..."],
            steps: &[
                "Move every table cell, column or text box into the main single-column body.",
                "Use plain headings and bullet lists for structure instead of layout elements.",
                "Export again and paste the text into a plain editor to confirm the reading order.",
            ],
        },
        "contactInfo" => Guidance {
            examples: &["Jane Doe\njane.doe@email.com | (555) 123-4567 | linkedin.com/in/janedoe"],
            steps: &[
                "Put your name on the first line as plain text.",
                "Add email and phone on the next line, outside any header or footer.",
            ],
        },
        "quantifiedAchievements" => Guidance {
            examples: &[
                "Reduced page load time by 40% across 12 customer-facing apps",
                "Managed a $1.2M annual budget for 3 regional campaigns",
            ],
            steps: &[
                "List each bullet's outcome: what changed because of your work?",
                "Attach a number: percentage, currency, count, time or scale.",
                "Estimate honestly where exact figures are unavailable (\"~20%\").",
            ],
        },
        "actionVerbs" | "verbVariety" => Guidance {
            examples: &["Led", "Built", "Reduced", "Launched", "Negotiated", "Streamlined"],
            steps: &[
                "Rewrite each bullet to open with a past-tense verb.",
                "Avoid repeating the same opener more than three times.",
            ],
        },
        "achievementsOverDuties" => Guidance {
            examples: &["Before: Responsible for onboarding\nAfter: Cut onboarding time from 3 weeks to 5 days"],
            steps: &[
                "Find bullets starting with 'Responsible for' or 'Tasked with'.",
                "Replace the duty with the result it produced.",
            ],
        },
        "keywordDensity" | "industryKeywords" => Guidance {
            examples: &["Skills: Python, SQL, AWS, Docker, CI/CD, REST APIs"],
            steps: &[
                "Collect the hard skills and tools named in the job posting.",
                "Use the exact terms in your skills section and in relevant bullets.",
                "Do not list skills you cannot discuss in an interview.",
            ],
        },
        "dedicatedSkillsSection" => Guidance {
            examples: &["Skills\nLanguages: Rust, Go, Python\nTools: Docker, Kubernetes, Terraform"],
            steps: &[
                "Add a section titled 'Skills'.",
                "Group skills by type and separate them with commas.",
            ],
        },
        "standardSectionHeadings" => Guidance {
            examples: &["Experience", "Education", "Skills", "Summary", "Certifications"],
            steps: &["Rename creative headings to the standard names ATS parsers look for."],
        },
        "professionalSummary" => Guidance {
            examples: &["Backend engineer with 6 years building payment systems in Go and Rust; cut settlement latency 60% at Acme."],
            steps: &[
                "State your role and years of experience.",
                "Add two or three specialties and one headline achievement.",
            ],
        },
        "experienceDetails" | "experienceSection" => Guidance {
            examples: &["Senior Engineer | Acme Corp | Jan 2020 – Present"],
            steps: &[
                "Give every role a title, employer and start/end dates.",
                "Add three to five achievement bullets per recent role.",
            ],
        },
        _ => GENERIC_GUIDANCE,
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Carried by the scanner as `Arc<dyn Recommender>`.
pub trait Recommender: Send + Sync {
    fn generate(
        &self,
        results: &[CheckResult],
        score: &ScoreResult,
        options: &ScanOptions,
    ) -> RecommendationSet;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RecommendationsEngine;

pub fn priority_score(impact: Impact, effort: Effort) -> f64 {
    round2(impact.weight() / effort.weight() * 100.0)
}

impl Recommender for RecommendationsEngine {
    fn generate(
        &self,
        results: &[CheckResult],
        score: &ScoreResult,
        options: &ScanOptions,
    ) -> RecommendationSet {
        let mut all: Vec<Recommendation> = results
            .iter()
            .filter(|r| !r.passed)
            .filter_map(|r| {
                let advice = r.recommendation.as_ref()?;
                let effort = Effort::for_check(&r.check_name);
                let guide = guidance(&r.check_name);
                Some(Recommendation {
                    check_name: r.check_name.clone(),
                    category: r.category,
                    bucket: DisplayBucket::for_check(r.category, &r.check_name, r.impact),
                    issue: r.message.clone(),
                    recommendation: advice.clone(),
                    impact: r.impact,
                    effort,
                    priority_score: priority_score(r.impact, effort),
                    estimated_minutes: effort.minutes(),
                    examples: owned(guide.examples),
                    steps: owned(guide.steps),
                })
            })
            .collect();
        all.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));

        let quick_wins: Vec<Recommendation> = all
            .iter()
            .filter(|r| r.impact.is_major() && r.effort.is_light())
            .take(QUICK_WIN_LIMIT)
            .cloned()
            .collect();
        let major_improvements: Vec<Recommendation> = all
            .iter()
            .filter(|r| r.impact.is_major())
            .take(MAJOR_LIMIT)
            .cloned()
            .collect();

        let mut by_category = BucketedRecommendations::default();
        for rec in &all {
            by_category.push(rec.clone());
        }

        let industry = options
            .industry
            .as_deref()
            .map(Industry::parse)
            .unwrap_or(Industry::General);

        RecommendationSet {
            total_estimated_minutes: all.iter().map(|r| r.estimated_minutes).sum(),
            quick_wins,
            major_improvements,
            by_category,
            industry,
            industry_tips: owned(industry.tips()),
            focus_areas: score.weaknesses.clone(),
            all,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ats::scorer::{AtsScorer, Scorer};
    use crate::ats::Severity;
    use serde_json::Value;

    fn failed(name: &str, category: CheckCategory, impact: Impact) -> CheckResult {
        CheckResult {
            check_name: name.to_string(),
            category,
            passed: false,
            score: 30,
            severity: Severity::Medium,
            message: format!("{name} failed"),
            recommendation: Some(format!("fix {name}")),
            impact,
            details: Value::Null,
        }
    }

    fn generate(results: &[CheckResult], options: &ScanOptions) -> RecommendationSet {
        let score = AtsScorer.calculate_score(results, options);
        RecommendationsEngine.generate(results, &score, options)
    }

    #[test]
    fn test_priority_formula() {
        assert_eq!(priority_score(Impact::Critical, Effort::Low), 400.0);
        assert_eq!(priority_score(Impact::High, Effort::Medium), 150.0);
        assert_eq!(priority_score(Impact::Low, Effort::Extensive), 25.0);
        assert_eq!(priority_score(Impact::Medium, Effort::High), 66.67);
    }

    #[test]
    fn test_passed_and_errored_checks_excluded() {
        let mut passed = failed("noTables", CheckCategory::Formatting, Impact::Critical);
        passed.passed = true;
        let errored = CheckResult::errored("noImages", CheckCategory::Formatting, Impact::Medium, "boom".into());
        let set = generate(&[passed, errored], &ScanOptions::default());
        assert!(set.all.is_empty());
        assert_eq!(set.total_estimated_minutes, 0);
    }

    #[test]
    fn test_sorted_by_priority_with_stable_ties() {
        let results = vec![
            failed("readability", CheckCategory::Content, Impact::Low), // 25/50 → 50
            failed("contactInfo", CheckCategory::Structure, Impact::Critical), // 100/25 → 400
            failed("noImages", CheckCategory::Formatting, Impact::Medium), // 50/25 → 200
            failed("noBuzzwords", CheckCategory::Content, Impact::Low), // 25/25 → 100
            failed("verbVariety", CheckCategory::Content, Impact::Low), // 25/25 → 100
        ];
        let set = generate(&results, &ScanOptions::default());
        let order: Vec<&str> = set.all.iter().map(|r| r.check_name.as_str()).collect();
        assert_eq!(order, vec!["contactInfo", "noImages", "noBuzzwords", "verbVariety", "readability"]);
    }

    #[test]
    fn test_quick_wins_subset_and_constraints() {
        let results = vec![
            failed("experienceSection", CheckCategory::Structure, Impact::Critical),
            failed("contactInfo", CheckCategory::Structure, Impact::Critical),
            failed("quantifiedAchievements", CheckCategory::Content, Impact::High),
            failed("noTables", CheckCategory::Formatting, Impact::Critical),
            failed("keywordDensity", CheckCategory::Content, Impact::High),
            failed("standardSectionHeadings", CheckCategory::Structure, Impact::High),
            failed("dedicatedSkillsSection", CheckCategory::Structure, Impact::High),
            failed("supportedFileFormat", CheckCategory::Formatting, Impact::Critical),
            failed("noBuzzwords", CheckCategory::Content, Impact::Low),
        ];
        let set = generate(&results, &ScanOptions::default());
        assert_eq!(set.quick_wins.len(), 5);
        for rec in &set.quick_wins {
            assert!(set.all.contains(rec));
            assert!(rec.impact.is_major());
            assert!(rec.effort.is_light());
        }
        assert!(set.major_improvements.len() <= 8);
        assert_eq!(set.major_improvements.len(), 8);
        assert!(set.major_improvements.iter().all(|r| r.impact.is_major()));
        assert!(!set.quick_wins.iter().any(|r| r.check_name == "experienceSection"));
    }

    #[test]
    fn test_display_buckets() {
        assert_eq!(
            DisplayBucket::for_check(CheckCategory::Formatting, "noTables", Impact::Critical),
            DisplayBucket::AtsCompatibility
        );
        assert_eq!(
            DisplayBucket::for_check(CheckCategory::Formatting, "standardFonts", Impact::Low),
            DisplayBucket::Formatting
        );
        assert_eq!(
            DisplayBucket::for_check(CheckCategory::Content, "industryKeywords", Impact::Critical),
            DisplayBucket::Keywords
        );
        assert_eq!(
            DisplayBucket::for_check(CheckCategory::Content, "readability", Impact::Low),
            DisplayBucket::Content
        );
        assert_eq!(
            DisplayBucket::for_check(CheckCategory::Structure, "dedicatedSkillsSection", Impact::High),
            DisplayBucket::Structure
        );
    }

    #[test]
    fn test_total_time_and_tips() {
        let results = vec![
            failed("noImages", CheckCategory::Formatting, Impact::Medium),          // 15
            failed("actionVerbs", CheckCategory::Content, Impact::Medium),          // 45
            failed("experienceSection", CheckCategory::Structure, Impact::Critical), // 180
        ];
        let set = generate(&results, &ScanOptions::default());
        assert_eq!(set.total_estimated_minutes, 240);
        assert_eq!(set.industry, Industry::General);
        assert_eq!(set.industry_tips, owned(Industry::General.tips()));

        let opts = ScanOptions {
            industry: Some("finance".into()),
            ..Default::default()
        };
        assert_eq!(generate(&results, &opts).industry, Industry::Finance);
    }

    #[test]
    fn test_guidance_attached() {
        let set = generate(
            &[failed("quantifiedAchievements", CheckCategory::Content, Impact::High)],
            &ScanOptions::default(),
        );
        assert!(!set.all[0].examples.is_empty());
        assert_eq!(set.by_category.content.len(), 1);
        assert!(set.focus_areas.contains(&ScoringCategory::ContentQuality));
    }
}
