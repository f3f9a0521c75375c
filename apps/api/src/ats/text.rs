//! Text extraction helpers over `ResumeDocument`. Explicit fallback chains over the content variants.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::models::resume::{Item, ResumeDocument, Section, SectionContent, SectionType};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// All human-readable text of a section, one fragment per line.
pub fn section_text(section: &Section) -> String {
    let mut parts = Vec::new();
    if let Some(title) = &section.title {
        parts.push(title.clone());
    }
    match &section.content {
        None => {}
        Some(SectionContent::Text(t)) => parts.push(t.text.clone()),
        Some(SectionContent::Items(list)) => {
            for item in &list.items {
                parts.extend(item_text(item));
            }
        }
        Some(SectionContent::Fields(fields)) => {
            for value in fields.values() {
                collect_value_text(value, &mut parts);
            }
        }
    }
    parts.join("\n")
}

/// Every text fragment an item carries.
pub fn item_text(item: &Item) -> Vec<String> {
    match item {
        Item::Text(s) => vec![s.clone()],
        Item::Entry(entry) => {
            let mut parts: Vec<String> = [
                &entry.title,
                &entry.position,
                &entry.role,
                &entry.name,
                &entry.company,
                &entry.location,
                &entry.start_date,
                &entry.date,
                &entry.end_date,
                &entry.description,
                &entry.text,
                &entry.honors,
            ]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
            parts.extend(entry.bullets.iter().cloned());
            if let Some(gpa) = &entry.gpa {
                collect_value_text(gpa, &mut parts);
            }
            for value in entry.extra.values() {
                collect_value_text(value, &mut parts);
            }
            parts
        }
    }
}

fn collect_value_text(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Array(values) => values.iter().for_each(|v| collect_value_text(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_value_text(v, out)),
        Value::Bool(_) | Value::Null => {}
    }
}

pub fn document_text(doc: &ResumeDocument) -> String {
    doc.sections
        .iter()
        .map(section_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lowercased JSON serialization of the whole document, used for layout-marker detection.
pub fn flat_serialization(doc: &ResumeDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string(doc).map(|s| s.to_lowercase())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased tokens. Keeps `+` and `#` so "c++" and "c#" survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bullet-like strings from every section's items: `bullets`, else `description`, else `text`.
/// Plain-string items are list entries (skills, languages) and are not treated as bullets.
pub fn extract_bullets(doc: &ResumeDocument) -> Vec<String> {
    let mut bullets = Vec::new();
    for section in &doc.sections {
        for item in section.items() {
            let Item::Entry(entry) = item else {
                continue;
            };
            if !entry.bullets.is_empty() {
                bullets.extend(entry.bullets.iter().map(|b| clean_bullet(b)));
            } else if let Some(description) = entry.description.as_deref().or(entry.text.as_deref())
            {
                bullets.extend(description.lines().map(clean_bullet));
            }
        }
    }
    bullets.retain(|b| !b.is_empty());
    bullets
}

fn clean_bullet(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric() && c != '$' && c != '€' && c != '£')
        .trim()
        .to_string()
}

/// First word of a bullet, lowercased, letters only.
pub fn first_word(bullet: &str) -> Option<String> {
    let word: String = bullet
        .split_whitespace()
        .next()?
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect::<String>()
        .to_lowercase();
    (!word.is_empty()).then_some(word)
}

/// Sections whose reconciled type matches.
pub fn sections_of<'a>(
    doc: &'a ResumeDocument,
    kind: SectionType,
) -> impl Iterator<Item = &'a Section> + 'a {
    doc.sections
        .iter()
        .filter(move |s| s.effective_type() == kind)
}

pub fn first_year(text: &str) -> Option<u32> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Occurrences of `term` in already-lowercased text, bounded by non-alphanumerics on both sides.
pub fn count_term(lowered_text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    lowered_text
        .match_indices(term)
        .filter(|(start, _)| {
            let before = lowered_text[..*start].chars().next_back();
            let after = lowered_text[start + term.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count()
}

/// Linear decay from 100 once a value leaves its band, clamped at `floor`.
pub fn decay_score(distance: f64, per_unit: f64, floor: f64) -> u32 {
    (100.0 - distance.max(0.0) * per_unit).max(floor).round() as u32
}

pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ResumeDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_bullets_fallback_chain() {
        let d = doc(json!({"sections": [
            {"type": "experience", "content": {"items": [
                {"company": "A", "bullets": ["• Built things", "Shipped 3 apps"], "description": "ignored"},
                {"company": "B", "description": "- Led migration\n- Cut costs by 10%"},
                {"company": "C", "text": "Wrote docs"},
                "plain string item"
            ]}},
            {"type": "skills", "content": {"items": ["Rust", "Go"]}}
        ]}));
        assert_eq!(
            extract_bullets(&d),
            vec![
                "Built things",
                "Shipped 3 apps",
                "Led migration",
                "Cut costs by 10%",
                "Wrote docs"
            ]
        );
    }

    #[test]
    fn test_clean_bullet_keeps_currency() {
        assert_eq!(clean_bullet("• $2M saved"), "$2M saved");
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("Led, the team"), Some("led".to_string()));
        assert_eq!(first_word("  "), None);
        assert_eq!(first_word("2020 was great"), None);
    }

    #[test]
    fn test_tokenize_keeps_cpp() {
        assert_eq!(tokenize("C++ and C#, Rust!"), vec!["c++", "and", "c#", "rust"]);
    }

    #[test]
    fn test_count_term_word_boundaries() {
        let text = "r and python; rust is not r-lang? sparkr";
        assert_eq!(count_term(text, "r"), 2);
        assert_eq!(count_term(text, "python"), 1);
        assert_eq!(count_term("capital", "api"), 0);
    }

    #[test]
    fn test_section_text_fields() {
        let d = doc(json!({"sections": [
            {"type": "header", "content": {"name": "Jane Doe", "links": ["github.com/jane"]}}
        ]}));
        let text = document_text(&d);
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("github.com/jane"));
    }

    #[test]
    fn test_first_year() {
        assert_eq!(first_year("Jan 2019 - Present"), Some(2019));
        assert_eq!(first_year("Present"), None);
        assert_eq!(first_year("12019"), None);
    }

    #[test]
    fn test_decay_score_floor() {
        assert_eq!(decay_score(0.0, 10.0, 50.0), 100);
        assert_eq!(decay_score(2.0, 10.0, 50.0), 80);
        assert_eq!(decay_score(20.0, 10.0, 50.0), 50);
    }
}
