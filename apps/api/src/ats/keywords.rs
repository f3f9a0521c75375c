//! Static lookup tables shared by the checks and the recommender. Read-only.

use serde::{Deserialize, Serialize};

use crate::ats::text::count_term;

/// Words ignored when measuring keyword density.
pub const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "among", "been", "before", "being", "below",
    "between", "both", "could", "does", "doing", "down", "during", "each", "from", "further",
    "have", "having", "here", "into", "just", "more", "most", "other", "over", "same", "should",
    "some", "such", "than", "that", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "under", "until", "very", "were", "what", "when", "where", "which",
    "while", "whom", "will", "with", "within", "would", "your", "yours", "including", "using",
    "across", "based", "well", "work", "worked", "year", "years",
];

pub const ACTION_VERBS: &[&str] = &[
    "achieved", "administered", "analyzed", "architected", "automated", "built", "championed",
    "coached", "collaborated", "conceived", "consolidated", "coordinated", "created", "cut",
    "decreased", "defined", "delivered", "deployed", "designed", "developed", "directed",
    "drove", "eliminated", "enabled", "engineered", "established", "executed", "expanded",
    "facilitated", "forecasted", "founded", "generated", "grew", "guided", "headed",
    "identified", "implemented", "improved", "increased", "initiated", "innovated",
    "integrated", "introduced", "launched", "led", "maintained", "managed", "mentored",
    "migrated", "modernized", "negotiated", "optimized", "orchestrated", "organized",
    "oversaw", "pioneered", "planned", "produced", "programmed", "published", "ran",
    "redesigned", "reduced", "refactored", "resolved", "restructured", "revamped", "saved",
    "scaled", "secured", "shipped", "simplified", "spearheaded", "standardized", "streamlined",
    "strengthened", "supervised", "trained", "transformed", "won", "wrote",
];

pub const PERSONAL_PRONOUNS: &[&str] = &["i", "me", "my", "mine", "myself"];

pub const BUZZWORDS: &[&str] = &[
    "team player",
    "hard worker",
    "hard-working",
    "go-getter",
    "self-starter",
    "synergy",
    "results-driven",
    "detail-oriented",
    "think outside the box",
    "go-to person",
    "proven track record",
    "dynamic",
    "motivated",
    "passionate",
    "best of breed",
    "thought leader",
    "rockstar",
    "ninja",
];

/// Phrases that describe a duty instead of an outcome.
pub const DUTY_PHRASES: &[&str] = &[
    "responsible for",
    "duties included",
    "duties include",
    "tasked with",
    "in charge of",
    "worked on",
    "helped with",
    "assisted with",
    "involved in",
];

/// Fonts every mainstream ATS renders and parses reliably.
pub const STANDARD_FONTS: &[&str] = &[
    "arial",
    "calibri",
    "cambria",
    "garamond",
    "georgia",
    "helvetica",
    "times new roman",
    "verdana",
    "tahoma",
    "trebuchet ms",
    "book antiqua",
    "palatino",
    "palatino linotype",
    "lato",
    "roboto",
    "open sans",
];

pub const TABLE_MARKERS: &[&str] = &[
    "<table",
    "<tr>",
    "<td",
    "display: table",
    "display:table",
    "|---",
    "---|",
];

pub const COLUMN_MARKERS: &[&str] = &[
    "column-count",
    "columns:",
    "two-column",
    "two column",
    "2-column",
    "multi-column",
    "multicolumn",
    "grid-template-columns",
    "float: left",
    "float:left",
    "float: right",
    "float:right",
];

pub const IMAGE_MARKERS: &[&str] = &["<img", "data:image", "<svg", "\"photo\"", "\"image\""];

pub const TEXT_BOX_MARKERS: &[&str] = &[
    "position: absolute",
    "position:absolute",
    "position: fixed",
    "position:fixed",
    "textbox",
    "text-box",
    "text box",
    "<v:textbox",
    "<w:txbxcontent",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Software,
    Marketing,
    Finance,
    Healthcare,
    Sales,
    Data,
    General,
}

impl Industry {
    pub const DETECTABLE: [Industry; 6] = [
        Industry::Software,
        Industry::Marketing,
        Industry::Finance,
        Industry::Healthcare,
        Industry::Sales,
        Industry::Data,
    ];

    /// Unknown keys fall back to `General`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "software" | "tech" | "technology" | "engineering" | "it" => Industry::Software,
            "marketing" => Industry::Marketing,
            "finance" | "accounting" | "banking" => Industry::Finance,
            "healthcare" | "health" | "medical" => Industry::Healthcare,
            "sales" => Industry::Sales,
            "data" | "data science" | "analytics" => Industry::Data,
            _ => Industry::General,
        }
    }

    /// Explicit override first, otherwise detection from the document text.
    pub fn resolve(override_key: Option<&str>, lowered_text: &str) -> Self {
        match override_key {
            Some(key) if !key.trim().is_empty() => Industry::parse(key),
            _ => detect_industry(lowered_text),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Software => "software",
            Industry::Marketing => "marketing",
            Industry::Finance => "finance",
            Industry::Healthcare => "healthcare",
            Industry::Sales => "sales",
            Industry::Data => "data",
            Industry::General => "general",
        }
    }

    /// Small seed list used only for auto-detection.
    pub fn seeds(self) -> &'static [&'static str] {
        match self {
            Industry::Software => &["software", "developer", "engineer", "code", "api", "programming"],
            Industry::Marketing => &["marketing", "brand", "campaign", "seo", "content", "social media"],
            Industry::Finance => &["finance", "financial", "accounting", "audit", "investment", "budget"],
            Industry::Healthcare => &["patient", "clinical", "healthcare", "medical", "nurse", "hospital"],
            Industry::Sales => &["sales", "quota", "pipeline", "client", "revenue", "account"],
            Industry::Data => &["data", "analytics", "machine learning", "statistics", "sql", "model"],
            Industry::General => &[],
        }
    }

    /// Coverage list the `industryKeywords` check measures against.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Industry::Software => &[
                "agile", "api", "aws", "ci/cd", "cloud", "docker", "git", "java", "javascript",
                "kubernetes", "microservices", "python", "react", "rest", "rust", "scalability",
                "sql", "testing", "typescript", "architecture",
            ],
            Industry::Marketing => &[
                "analytics", "brand", "campaign", "content", "conversion", "crm", "engagement",
                "email marketing", "google ads", "growth", "lead generation", "market research",
                "roi", "seo", "sem", "social media", "strategy", "copywriting", "kpi", "a/b testing",
            ],
            Industry::Finance => &[
                "accounting", "audit", "budgeting", "compliance", "excel", "financial analysis",
                "financial modeling", "forecasting", "gaap", "investment", "p&l", "reconciliation",
                "reporting", "risk", "valuation", "variance", "cash flow", "tax", "erp", "sox",
            ],
            Industry::Healthcare => &[
                "patient care", "clinical", "ehr", "emr", "hipaa", "compliance", "diagnosis",
                "treatment", "medical records", "cpr", "triage", "care plan", "quality improvement",
                "infection control", "medication", "patient safety", "healthcare", "nursing",
                "documentation", "regulatory",
            ],
            Industry::Sales => &[
                "account management", "b2b", "b2c", "business development", "closing", "cold calling",
                "crm", "customer relationships", "forecasting", "lead generation", "negotiation",
                "pipeline", "prospecting", "quota", "revenue", "salesforce", "territory", "upselling",
                "client retention", "presentations",
            ],
            Industry::Data => &[
                "analytics", "big data", "dashboard", "data visualization", "etl", "excel",
                "machine learning", "pandas", "power bi", "python", "r", "regression", "spark", "sql",
                "statistics", "tableau", "data modeling", "a/b testing", "forecasting", "data pipeline",
            ],
            Industry::General => &[
                "communication", "leadership", "management", "project management", "problem solving",
                "collaboration", "strategy", "planning", "analysis", "customer service", "budget",
                "training", "reporting", "process improvement", "stakeholder",
            ],
        }
    }

    /// Static advice shown alongside recommendations. Not derived from check results.
    pub fn tips(self) -> &'static [&'static str] {
        match self {
            Industry::Software => &[
                "List languages, frameworks and cloud platforms in a dedicated skills section.",
                "Link to a GitHub profile or portfolio in the header.",
                "Quantify scale: requests per second, users served, latency reduced.",
            ],
            Industry::Marketing => &[
                "Lead with campaign results: conversion, engagement, ROI.",
                "Name the tools you used (Google Ads, HubSpot, GA4).",
                "Show channel breadth: paid, organic, email, social.",
            ],
            Industry::Finance => &[
                "Mention regulatory frameworks (GAAP, IFRS, SOX) by name.",
                "Quantify budgets, portfolios and savings in currency.",
                "List certifications such as CPA or CFA prominently.",
            ],
            Industry::Healthcare => &[
                "Put licenses and certifications near the top with license numbers and states.",
                "Name the EHR/EMR systems you have used.",
                "Quantify patient load and quality outcomes.",
            ],
            Industry::Sales => &[
                "State quota attainment as a percentage for every role.",
                "Include deal sizes, territory and pipeline figures.",
                "Name the CRM you worked in (Salesforce, HubSpot).",
            ],
            Industry::Data => &[
                "List the modeling and visualization stack explicitly (SQL, Python, Tableau).",
                "Tie each analysis to a business decision or dollar impact.",
                "Mention data volumes you have worked with.",
            ],
            Industry::General => &[
                "Mirror the exact wording of the job posting where it is truthful.",
                "Keep to one or two pages with standard section headings.",
                "Open each bullet with an action verb and close with a result.",
            ],
        }
    }
}

/// Counts seed occurrences per industry; the highest count wins, `General` when nothing matches.
/// Ties keep the earlier industry in `DETECTABLE` order.
pub fn detect_industry(lowered_text: &str) -> Industry {
    let mut best = Industry::General;
    let mut best_count = 0usize;
    for industry in Industry::DETECTABLE {
        let count: usize = industry
            .seeds()
            .iter()
            .map(|seed| count_term(lowered_text, seed))
            .sum();
        if count > best_count {
            best = industry;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unknown_is_general() {
        assert_eq!(Industry::parse("underwater basket weaving"), Industry::General);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Industry::parse("Tech"), Industry::Software);
        assert_eq!(Industry::parse(" analytics "), Industry::Data);
    }

    #[test]
    fn test_detect_software() {
        let text = "software engineer building api services and code review tooling";
        assert_eq!(detect_industry(text), Industry::Software);
    }

    #[test]
    fn test_detect_nothing_is_general() {
        assert_eq!(detect_industry("gardening and woodwork"), Industry::General);
    }

    #[test]
    fn test_override_wins_over_detection() {
        let text = "software engineer api code";
        assert_eq!(Industry::resolve(Some("sales"), text), Industry::Sales);
        assert_eq!(Industry::resolve(Some("  "), text), Industry::Software);
        assert_eq!(Industry::resolve(None, text), Industry::Software);
    }

    #[test]
    fn test_every_industry_has_keywords_and_tips() {
        for industry in Industry::DETECTABLE.iter().chain([Industry::General].iter()) {
            assert!(!industry.keywords().is_empty());
            assert!(!industry.tips().is_empty());
        }
    }
}
