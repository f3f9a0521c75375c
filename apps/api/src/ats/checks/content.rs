//! Content checks: wording, keywords and how achievements are phrased.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::ats::checks::{no_content, CheckFailure, CheckModule, CheckOutcome, CheckSpec};
use crate::ats::keywords::{
    Industry, ACTION_VERBS, BUZZWORDS, DUTY_PHRASES, PERSONAL_PRONOUNS, STOPWORDS,
};
use crate::ats::text::{
    count_term, decay_score, document_text, extract_bullets, first_word, percent, round2,
    tokenize, word_count,
};
use crate::ats::{CheckCategory, Impact, ScanOptions, Severity};
use crate::models::resume::ResumeDocument;

/// Any one of these marks a bullet as quantified.
static QUANTIFIERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+(\.\d+)?\s*%",
        r"[$€£]\s*\d",
        r"(?i)\b\d+(\.\d+)?\s*[kmb]\b",
        r"(?i)\b\d+x\b",
        r"\b\d+\+",
        r"(?i)\b(hundreds?|thousands?|millions?|billions?|dozens?)\b",
        r"\b\d+\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?\n]+").unwrap());

const DENSITY_BAND: (f64, f64) = (2.0, 8.0);
const BULLET_WORDS: std::ops::RangeInclusive<usize> = 8..=30;
const VERB_REPEAT_LIMIT: usize = 3;

pub struct ContentChecks;

static CONTENT_CHECKS: &[CheckSpec] = &[
    CheckSpec {
        name: "keywordDensity",
        impact: Impact::High,
        run: keyword_density,
    },
    CheckSpec {
        name: "quantifiedAchievements",
        impact: Impact::High,
        run: quantified_achievements,
    },
    CheckSpec {
        name: "actionVerbs",
        impact: Impact::Medium,
        run: action_verbs,
    },
    CheckSpec {
        name: "industryKeywords",
        impact: Impact::Critical,
        run: industry_keywords,
    },
    CheckSpec {
        name: "noPersonalPronouns",
        impact: Impact::Low,
        run: no_personal_pronouns,
    },
    CheckSpec {
        name: "bulletLength",
        impact: Impact::Medium,
        run: bullet_length,
    },
    CheckSpec {
        name: "noBuzzwords",
        impact: Impact::Low,
        run: no_buzzwords,
    },
    CheckSpec {
        name: "verbVariety",
        impact: Impact::Low,
        run: verb_variety,
    },
    CheckSpec {
        name: "achievementsOverDuties",
        impact: Impact::Medium,
        run: achievements_over_duties,
    },
    CheckSpec {
        name: "readability",
        impact: Impact::Low,
        run: readability,
    },
];

impl CheckModule for ContentChecks {
    fn category(&self) -> CheckCategory {
        CheckCategory::Content
    }

    fn checks(&self) -> &'static [CheckSpec] {
        CONTENT_CHECKS
    }
}

/// Document text, or `None` when there is nothing to read.
fn readable_text(doc: &ResumeDocument) -> Option<String> {
    let text = document_text(doc);
    (word_count(&text) > 0).then_some(text)
}

fn bullets_or_none(doc: &ResumeDocument) -> Option<Vec<String>> {
    let bullets = extract_bullets(doc);
    (!bullets.is_empty()).then_some(bullets)
}

fn keyword_density(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(text) = readable_text(doc) else {
        return Ok(no_content("text"));
    };
    let tokens = tokenize(&text);
    if tokens.is_empty() {
        return Ok(no_content("text"));
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for token in tokens.iter().filter(|t| t.chars().count() > 3) {
        *frequency.entry(token.as_str()).or_default() += 1;
    }
    let mut keywords: Vec<&str> = frequency
        .iter()
        .filter(|(word, count)| **count >= 2 && !STOPWORDS.contains(*word))
        .map(|(word, _)| *word)
        .collect();
    keywords.sort_unstable();

    let density = keywords.len() as f64 / tokens.len() as f64 * 100.0;
    let (low, high) = DENSITY_BAND;
    let details = json!({
        "density": round2(density),
        "keywordCount": keywords.len(),
        "totalWords": tokens.len(),
        "topKeywords": keywords.iter().take(10).collect::<Vec<_>>(),
    });

    if (low..=high).contains(&density) {
        return Ok(CheckOutcome::pass(100, format!("Keyword density is {:.1}%", density))
            .with_details(details));
    }
    if density < low {
        return Ok(CheckOutcome::fail(
            decay_score(low - density, 25.0, 50.0),
            Severity::Medium,
            format!("Keyword density is low ({:.1}%)", density),
            "Repeat the core skills and job-title terms from the posting naturally across summary, experience and skills.",
        )
        .with_details(details));
    }
    Ok(CheckOutcome::fail(
        decay_score(density - high, 10.0, 50.0),
        Severity::Medium,
        format!("Keyword density is high ({:.1}%), which can read as keyword stuffing", density),
        "Replace repeated keywords with concrete achievements; keep each term to a few natural mentions.",
    )
    .with_details(details))
}

fn is_quantified(bullet: &str) -> bool {
    QUANTIFIERS.iter().any(|re| re.is_match(bullet))
}

fn quantified_achievements(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(bullets) = bullets_or_none(doc) else {
        return Ok(no_content("bullet points"));
    };
    let quantified = bullets.iter().filter(|b| is_quantified(b)).count();
    let rate = percent(quantified, bullets.len());
    let score = (rate * 2.0).min(100.0).round() as u32;
    let details = json!({
        "bullets": bullets.len(),
        "quantified": quantified,
        "rate": round2(rate),
    });

    if rate >= 40.0 {
        return Ok(CheckOutcome::pass(score, format!("{quantified} of {} bullets include measurable results", bullets.len()))
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::High,
        format!("Only {quantified} of {} bullets include numbers", bullets.len()),
        "Add metrics to your bullets: percentages, revenue, time saved, team size or volume handled.",
    )
    .with_details(details))
}

fn starts_with_action_verb(bullet: &str) -> bool {
    first_word(bullet).is_some_and(|w| {
        ACTION_VERBS.contains(&w.as_str()) || (w.ends_with("ed") && w.chars().count() > 3)
    })
}

fn action_verbs(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(bullets) = bullets_or_none(doc) else {
        return Ok(no_content("bullet points"));
    };
    let weak: Vec<&String> = bullets.iter().filter(|b| !starts_with_action_verb(b)).collect();
    let share = percent(bullets.len() - weak.len(), bullets.len());
    let details = json!({
        "bullets": bullets.len(),
        "withActionVerb": bullets.len() - weak.len(),
        "examples": weak.iter().take(3).collect::<Vec<_>>(),
    });

    if share >= 80.0 {
        return Ok(CheckOutcome::pass(share.round() as u32, "Bullets open with strong action verbs")
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        share.round() as u32,
        Severity::Medium,
        format!("{} of {} bullets do not start with an action verb", weak.len(), bullets.len()),
        "Start every bullet with a past-tense action verb such as 'Led', 'Built', 'Reduced' or 'Launched'.",
    )
    .with_details(details))
}

fn industry_keywords(doc: &ResumeDocument, options: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(text) = readable_text(doc) else {
        return Ok(no_content("text"));
    };
    let lowered = text.to_lowercase();
    let industry = Industry::resolve(options.industry.as_deref(), &lowered);
    let keywords = industry.keywords();
    let (matched, missing): (Vec<&str>, Vec<&str>) = keywords
        .iter()
        .copied()
        .partition(|k| count_term(&lowered, k) > 0);

    let coverage = percent(matched.len(), keywords.len());
    let score = (coverage * 2.5).min(100.0).round() as u32;
    let details = json!({
        "industry": industry.as_str(),
        "coverage": round2(coverage),
        "matched": matched,
        "missing": missing.iter().take(10).collect::<Vec<_>>(),
    });

    if coverage >= 40.0 {
        return Ok(CheckOutcome::pass(score, format!("Covers {} of {} {} keywords", matched.len(), keywords.len(), industry.as_str()))
            .with_details(details));
    }
    let suggestions = missing.iter().take(5).copied().collect::<Vec<_>>().join(", ");
    Ok(CheckOutcome::fail(
        score,
        if coverage < 20.0 { Severity::Critical } else { Severity::High },
        format!("Covers only {} of {} {} keywords", matched.len(), keywords.len(), industry.as_str()),
        format!("Work in relevant {} terms you genuinely have experience with, e.g. {suggestions}.", industry.as_str()),
    )
    .with_details(details))
}

fn no_personal_pronouns(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(text) = readable_text(doc) else {
        return Ok(no_content("text"));
    };
    let count = tokenize(&text)
        .iter()
        .filter(|t| PERSONAL_PRONOUNS.contains(&t.as_str()))
        .count();
    let score = decay_score(count as f64, 10.0, 40.0);
    let details = json!({ "count": count });

    if count <= 2 {
        return Ok(CheckOutcome::pass(score, "Little or no first-person language").with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Low,
        format!("Found {count} first-person pronouns"),
        "Drop 'I', 'me' and 'my': write 'Led a team of 5' instead of 'I led my team of 5'.",
    )
    .with_details(details))
}

fn bullet_length(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(bullets) = bullets_or_none(doc) else {
        return Ok(no_content("bullet points"));
    };
    let (mut short, mut long) = (0usize, 0usize);
    for bullet in &bullets {
        let words = word_count(bullet);
        if words < *BULLET_WORDS.start() {
            short += 1;
        } else if words > *BULLET_WORDS.end() {
            long += 1;
        }
    }
    let good = bullets.len() - short - long;
    let share = percent(good, bullets.len());
    let details = json!({ "bullets": bullets.len(), "tooShort": short, "tooLong": long });

    if share >= 70.0 {
        return Ok(CheckOutcome::pass(share.round() as u32, "Bullet lengths are easy to scan").with_details(details));
    }
    Ok(CheckOutcome::fail(
        share.round() as u32,
        Severity::Medium,
        format!("{} of {} bullets are too short or too long", short + long, bullets.len()),
        "Keep each bullet to one or two lines (roughly 8 to 30 words): action, context, result.",
    )
    .with_details(details))
}

fn no_buzzwords(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(text) = readable_text(doc) else {
        return Ok(no_content("text"));
    };
    let lowered = text.to_lowercase();
    let found: BTreeMap<&str, usize> = BUZZWORDS
        .iter()
        .map(|b| (*b, count_term(&lowered, b)))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = found.values().sum();
    let score = decay_score(count as f64, 15.0, 40.0);
    let details = json!({ "count": count, "found": found });

    if count <= 2 {
        return Ok(CheckOutcome::pass(score, "Few or no clichés").with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Low,
        format!("Found {count} buzzwords or clichés"),
        "Replace clichés like 'team player' or 'results-driven' with evidence: what you did and what changed.",
    )
    .with_details(details))
}

fn verb_variety(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(bullets) = bullets_or_none(doc) else {
        return Ok(no_content("bullet points"));
    };
    let mut openings: BTreeMap<String, usize> = BTreeMap::new();
    for word in bullets.iter().filter_map(|b| first_word(b)) {
        *openings.entry(word).or_default() += 1;
    }
    let overused: BTreeMap<&str, usize> = openings
        .iter()
        .filter(|(_, n)| **n > VERB_REPEAT_LIMIT)
        .map(|(w, n)| (w.as_str(), *n))
        .collect();
    let overuse: usize = overused.values().map(|n| n - VERB_REPEAT_LIMIT).sum();
    let score = decay_score(overuse as f64, 10.0, 40.0);
    let details = json!({ "distinctOpenings": openings.len(), "overused": overused });

    if overuse == 0 {
        return Ok(CheckOutcome::pass(score, "Bullets open with varied verbs").with_details(details));
    }
    let words = overused.keys().copied().collect::<Vec<_>>().join(", ");
    Ok(CheckOutcome::fail(
        score,
        Severity::Low,
        format!("Opening verbs repeated too often: {words}"),
        "Vary your opening verbs; swap repeats for synonyms such as 'Directed', 'Drove' or 'Delivered'.",
    )
    .with_details(details))
}

fn achievements_over_duties(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(bullets) = bullets_or_none(doc) else {
        return Ok(no_content("bullet points"));
    };
    let duties = bullets
        .iter()
        .filter(|b| {
            let lowered = b.to_lowercase();
            DUTY_PHRASES.iter().any(|p| lowered.contains(p))
        })
        .count();
    let share = percent(duties, bullets.len());
    let score = (100.0 - share).max(30.0).round() as u32;
    let details = json!({ "bullets": bullets.len(), "dutyPhrased": duties });

    if share <= 20.0 {
        return Ok(CheckOutcome::pass(score, "Bullets focus on achievements").with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Medium,
        format!("{duties} of {} bullets describe duties rather than results", bullets.len()),
        "Rewrite 'Responsible for X' as what you achieved: 'Cut X processing time by 30%'.",
    )
    .with_details(details))
}

fn readability(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(text) = readable_text(doc) else {
        return Ok(no_content("text"));
    };
    let lengths: Vec<usize> = SENTENCE_SPLIT
        .split(&text)
        .map(word_count)
        .filter(|n| *n > 0)
        .collect();
    // readable_text guarantees at least one word, so at least one sentence.
    let average = lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64;
    let longest = lengths.iter().copied().max().unwrap_or(0);
    let score = if average <= 20.0 {
        100
    } else {
        decay_score(average - 20.0, 4.0, 40.0)
    };
    let details = json!({
        "sentences": lengths.len(),
        "averageWords": round2(average),
        "longest": longest,
    });

    if average <= 25.0 {
        return Ok(CheckOutcome::pass(score, format!("Average sentence length is {:.1} words", average))
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Low,
        format!("Sentences are long (average {:.1} words)", average),
        "Break long sentences up; aim for under 20 words per sentence or bullet.",
    )
    .with_details(details))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> ResumeDocument {
        serde_json::from_value(value).unwrap()
    }

    fn with_bullets(bullets: &[&str]) -> ResumeDocument {
        doc(json!({"sections": [
            {"type": "experience", "content": {"items": [
                {"position": "Engineer", "company": "Acme", "bullets": bullets}
            ]}}
        ]}))
    }

    fn run(check: crate::ats::checks::CheckFn, d: &ResumeDocument) -> CheckOutcome {
        check(d, &ScanOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_document_scores_zero() {
        let d = ResumeDocument::default();
        for spec in CONTENT_CHECKS {
            let r = (spec.run)(&d, &ScanOptions::default()).unwrap();
            assert!(!r.passed, "{} passed on empty document", spec.name);
            assert_eq!(r.score, 0, "{}", spec.name);
            assert_eq!(r.severity, Severity::High);
        }
    }

    #[test]
    fn test_quantified_half_of_bullets() {
        let d = with_bullets(&["Increased sales by 25%", "Helped the team"]);
        let r = run(quantified_achievements, &d);
        assert_eq!(r.details["quantified"], 1);
        assert_eq!(r.score, 100);
        assert!(r.passed);
    }

    #[test]
    fn test_quantifier_patterns() {
        assert!(is_quantified("Saved $2M annually"));
        assert!(is_quantified("Grew to 10k users"));
        assert!(is_quantified("Delivered 3x throughput"));
        assert!(is_quantified("Served thousands of customers"));
        assert!(is_quantified("Managed 50+ vendors"));
        assert!(!is_quantified("Helped the team"));
    }

    #[test]
    fn test_action_verbs_heuristic() {
        assert!(starts_with_action_verb("Led the migration"));
        assert!(starts_with_action_verb("Overhauled onboarding"));
        assert!(!starts_with_action_verb("Red team exercises"));
        assert!(!starts_with_action_verb("Responsible for payroll"));

        let d = with_bullets(&["Led the migration", "Built a pipeline", "Was on call"]);
        let r = run(action_verbs, &d);
        assert!(!r.passed);
        assert_eq!(r.score, 67);
    }

    #[test]
    fn test_industry_override() {
        let d = doc(json!({"sections": [
            {"type": "skills", "content": {"text": "Salesforce, prospecting, quota, pipeline, negotiation, b2b, crm, closing"}}
        ]}));
        let opts = ScanOptions {
            industry: Some("sales".to_string()),
            ..Default::default()
        };
        let r = industry_keywords(&d, &opts).unwrap();
        assert_eq!(r.details["industry"], "sales");
        assert!(r.passed);
        assert_eq!(r.score, 100);
    }

    #[test]
    fn test_industry_keywords_low_coverage() {
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": "Gardener who enjoys woodwork and planning"}}
        ]}));
        let r = run(industry_keywords, &d);
        assert_eq!(r.details["industry"], "general");
        assert!(!r.passed);
        assert!(r.recommendation.is_some());
    }

    #[test]
    fn test_pronouns() {
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": "I built my first app. I love my job and I ship."}}
        ]}));
        let r = run(no_personal_pronouns, &d);
        assert_eq!(r.details["count"], 5);
        assert_eq!(r.score, 50);
        assert!(!r.passed);
    }

    #[test]
    fn test_buzzwords() {
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": "Results-driven team player, a motivated self-starter."}}
        ]}));
        let r = run(no_buzzwords, &d);
        assert_eq!(r.details["count"], 4);
        assert_eq!(r.score, 40);
    }

    #[test]
    fn test_verb_variety_overuse() {
        let d = with_bullets(&["Led A", "Led B", "Led C", "Led D", "Led E", "Built F"]);
        let r = run(verb_variety, &d);
        assert!(!r.passed);
        assert_eq!(r.score, 80);
    }

    #[test]
    fn test_duties_share() {
        let d = with_bullets(&[
            "Responsible for payroll",
            "Cut costs by 10%",
            "Tasked with onboarding",
            "Launched a new product",
        ]);
        let r = run(achievements_over_duties, &d);
        assert!(!r.passed);
        assert_eq!(r.score, 50);
    }

    #[test]
    fn test_bullet_length() {
        let d = with_bullets(&[
            "Led a migration of twelve services to Kubernetes cutting deploy time in half",
            "Fixed bugs",
        ]);
        let r = run(bullet_length, &d);
        assert_eq!(r.details["tooShort"], 1);
        assert_eq!(r.score, 50);
        assert!(!r.passed);
    }

    #[test]
    fn test_readability_short_sentences() {
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": "Backend engineer. Ships reliable services. Mentors juniors."}}
        ]}));
        let r = run(readability, &d);
        assert!(r.passed);
        assert_eq!(r.score, 100);
    }

    #[test]
    fn test_keyword_density_no_repeats_is_low() {
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": "alpha bravo charlie delta"}}
        ]}));
        let r = run(keyword_density, &d);
        assert!(!r.passed);
        assert_eq!(r.score, 50);
    }

    #[test]
    fn test_keyword_density_in_band() {
        // 50 tokens, two repeated keywords: density 4%.
        let mut words = vec!["rust", "rust", "kubernetes", "kubernetes"];
        let filler: Vec<String> = (0..46).map(|i| format!("w{i}")).collect();
        words.extend(filler.iter().map(String::as_str));
        let d = doc(json!({"sections": [
            {"type": "summary", "content": {"text": words.join(" ")}}
        ]}));
        let r = run(keyword_density, &d);
        assert!(r.passed, "{}", r.message);
        assert_eq!(r.details["density"], 4.0);
    }
}
