//! Structure checks: whether an ATS can find and segment the expected sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::ats::checks::{CheckFailure, CheckModule, CheckOutcome, CheckSpec};
use crate::ats::text::{
    decay_score, document_text, first_year, item_text, percent, section_text, sections_of, word_count,
};
use crate::ats::{CheckCategory, Impact, ScanOptions, Severity};
use crate::models::resume::{Item, ResumeDocument, Section, SectionContent, SectionType};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Candidate phone runs: digits with flexible separators. Digit count is validated separately.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s().-]{8,}\d").unwrap());

const NAME_FIELDS: &[&str] = &["name", "fullName", "full_name"];
const EMAIL_FIELDS: &[&str] = &["email", "emailAddress", "email_address"];
const PHONE_FIELDS: &[&str] = &["phone", "phoneNumber", "phone_number", "mobile", "tel"];

const MIN_SKILLS: usize = 5;

pub struct StructureChecks;

static STRUCTURE_CHECKS: &[CheckSpec] = &[
    CheckSpec {
        name: "contactInfo",
        impact: Impact::Critical,
        run: contact_info,
    },
    CheckSpec {
        name: "standardSectionHeadings",
        impact: Impact::High,
        run: standard_section_headings,
    },
    CheckSpec {
        name: "dedicatedSkillsSection",
        impact: Impact::High,
        run: dedicated_skills_section,
    },
    CheckSpec {
        name: "experienceSection",
        impact: Impact::Critical,
        run: experience_section,
    },
    CheckSpec {
        name: "educationSection",
        impact: Impact::Medium,
        run: education_section,
    },
    CheckSpec {
        name: "chronologicalOrder",
        impact: Impact::Medium,
        run: chronological_order,
    },
    CheckSpec {
        name: "sectionOrdering",
        impact: Impact::Low,
        run: section_ordering,
    },
    CheckSpec {
        name: "professionalSummary",
        impact: Impact::Medium,
        run: professional_summary,
    },
    CheckSpec {
        name: "experienceDetails",
        impact: Impact::High,
        run: experience_details,
    },
    CheckSpec {
        name: "appropriateLength",
        impact: Impact::Medium,
        run: appropriate_length,
    },
];

impl CheckModule for StructureChecks {
    fn category(&self) -> CheckCategory {
        CheckCategory::Structure
    }

    fn checks(&self) -> &'static [CheckSpec] {
        STRUCTURE_CHECKS
    }
}

fn no_sections() -> CheckOutcome {
    CheckOutcome::fail(
        0,
        Severity::High,
        "Document has no sections",
        "Add standard sections: contact header, summary, experience, education and skills.",
    )
}

fn valid_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    (10..=15).contains(&digits)
}

fn field_str<'a>(section: &'a Section, keys: &[&str]) -> Option<&'a str> {
    let Some(SectionContent::Fields(fields)) = &section.content else {
        return None;
    };
    keys.iter()
        .find_map(|k| fields.get(*k).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_contact_line(line: &str) -> bool {
    EMAIL_RE.is_match(line) || PHONE_RE.find_iter(line).any(|m| valid_phone(m.as_str()))
}

/// Name from a name field, or the first non-contact line of a plain-text or list header body.
/// The section title and other field values never count as a name.
fn header_name(section: &Section) -> Option<String> {
    if let Some(name) = field_str(section, NAME_FIELDS) {
        return Some(name.to_string());
    }
    let body = match &section.content {
        Some(SectionContent::Text(t)) => t.text.clone(),
        Some(SectionContent::Items(list)) => list.items.iter().flat_map(item_text).collect::<Vec<_>>().join("\n"),
        _ => return None,
    };
    body.lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !is_contact_line(l))
        .map(str::to_string)
}

fn contact_info(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    if doc.sections.is_empty() {
        return Ok(no_sections());
    }

    let header = sections_of(doc, SectionType::Header).next();
    let (name, search_text) = match header {
        Some(section) => (header_name(section), section_text(section)),
        None => (None, document_text(doc)),
    };

    let email = header
        .and_then(|s| field_str(s, EMAIL_FIELDS))
        .filter(|e| EMAIL_RE.is_match(e))
        .map(str::to_string)
        .or_else(|| EMAIL_RE.find(&search_text).map(|m| m.as_str().to_string()));
    let phone = header
        .and_then(|s| field_str(s, PHONE_FIELDS))
        .filter(|p| valid_phone(p))
        .map(str::to_string)
        .or_else(|| {
            PHONE_RE
                .find_iter(&search_text)
                .map(|m| m.as_str().trim())
                .find(|p| valid_phone(p))
                .map(str::to_string)
        });

    let has_name = name.as_deref().is_some_and(|n| n.chars().count() > 2);
    let has_email = email.is_some();
    let has_phone = phone.is_some();
    let score: u32 = [(has_name, 30), (has_email, 35), (has_phone, 35)]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| weight)
        .sum();
    let details = json!({
        "hasHeaderSection": header.is_some(),
        "hasName": has_name,
        "hasEmail": has_email,
        "hasPhone": has_phone,
    });

    if has_name && has_email && has_phone {
        return Ok(CheckOutcome::pass(100, "Name, email and phone are all parseable").with_details(details));
    }

    let mut missing = Vec::new();
    if !has_name {
        missing.push("name");
    }
    if !has_email {
        missing.push("email");
    }
    if !has_phone {
        missing.push("phone number");
    }
    let severity = if !has_email && !has_phone { Severity::Critical } else { Severity::High };
    Ok(CheckOutcome::fail(
        score,
        severity,
        format!("Contact information incomplete: missing {}", missing.join(", ")),
        "Put your full name, email and phone number as plain text at the top of the résumé body.",
    )
    .with_details(details))
}

fn standard_section_headings(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    if doc.sections.is_empty() {
        return Ok(no_sections());
    }

    let unrecognized: Vec<String> = doc
        .sections
        .iter()
        .filter(|s| {
            let title_known = s
                .title
                .as_deref()
                .map(|t| SectionType::from_label(t).is_known())
                .unwrap_or_else(|| s.effective_type().is_known());
            !title_known
        })
        .map(|s| s.title.clone().unwrap_or_else(|| s.kind.as_str().to_string()))
        .collect();

    let total = doc.sections.len();
    let share = percent(total - unrecognized.len(), total);
    let details = json!({ "total": total, "unrecognized": unrecognized });

    if share >= 80.0 {
        return Ok(CheckOutcome::pass(share.round() as u32, "Section headings use standard names")
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        share.round() as u32,
        Severity::High,
        format!("{} section heading(s) are not standard", unrecognized.len()),
        "Rename creative headings to standard ones such as 'Experience', 'Education', 'Skills'.",
    )
    .with_details(details))
}

/// Individual skills in a section: list items, comma/pipe separated, "Category: a, b" groups.
fn count_skills(section: &Section) -> usize {
    let split = |s: &str| -> usize {
        let body = s.split_once(':').map(|(_, rest)| rest).unwrap_or(s);
        body.split([',', '|', ';', '\n', '•'])
            .filter(|t| !t.trim().is_empty())
            .count()
    };
    match &section.content {
        None => 0,
        Some(SectionContent::Text(t)) => split(&t.text),
        Some(SectionContent::Items(list)) => list
            .items
            .iter()
            .map(|item| match item {
                Item::Text(s) => split(s),
                Item::Entry(entry) => {
                    let listed = entry
                        .description
                        .as_deref()
                        .or(entry.text.as_deref())
                        .map(split)
                        .unwrap_or(0)
                        + entry.bullets.len();
                    listed.max(usize::from(entry.name.is_some() || entry.title.is_some()))
                }
            })
            .sum(),
        Some(SectionContent::Fields(fields)) => fields
            .values()
            .map(|v| match v {
                serde_json::Value::Array(values) => values.len(),
                serde_json::Value::String(s) => split(s),
                _ => 0,
            })
            .sum(),
    }
}

fn dedicated_skills_section(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(section) = sections_of(doc, SectionType::Skills).next() else {
        return Ok(CheckOutcome::fail(
            0,
            Severity::High,
            "No dedicated skills section found",
            "Add a 'Skills' section listing your core tools and competencies as plain, comma-separated text.",
        ));
    };

    let skill_count = count_skills(section);
    let score = (skill_count * 20).min(100) as u32;
    let details = json!({ "skillCount": skill_count });
    if skill_count >= MIN_SKILLS {
        return Ok(CheckOutcome::pass(score, format!("Skills section lists {skill_count} skills"))
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Medium,
        format!("Skills section lists only {skill_count} skill(s)"),
        format!("List at least {MIN_SKILLS} relevant skills, mirroring terms from the job posting."),
    )
    .with_details(details))
}

fn experience_section(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let sections: Vec<&Section> = sections_of(doc, SectionType::Experience).collect();
    if sections.is_empty() {
        return Ok(CheckOutcome::fail(
            0,
            Severity::Critical,
            "No work experience section found",
            "Add an 'Experience' section with your roles, employers, dates and achievements.",
        ));
    }

    let entries: usize = sections
        .iter()
        .map(|s| match &s.content {
            Some(SectionContent::Items(list)) => list.items.len(),
            Some(_) if s.has_content() => 1,
            _ => 0,
        })
        .sum();
    let details = json!({ "entries": entries });
    match entries {
        0 => Ok(CheckOutcome::fail(
            20,
            Severity::High,
            "Experience section is empty",
            "Fill the experience section with at least one role including title, company and dates.",
        )
        .with_details(details)),
        1 => Ok(CheckOutcome::pass(80, "Experience section has one entry").with_details(details)),
        n => Ok(CheckOutcome::pass(100, format!("Experience section has {n} entries")).with_details(details)),
    }
}

fn education_section(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    if doc.sections.is_empty() {
        return Ok(no_sections());
    }
    match sections_of(doc, SectionType::Education).find(|s| s.has_content()) {
        Some(_) => Ok(CheckOutcome::pass(100, "Education section present")),
        None => Ok(CheckOutcome::fail(
            40,
            Severity::Medium,
            "No education section found",
            "Add an 'Education' section with degree, institution and graduation year.",
        )),
    }
}

fn chronological_order(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let sections: Vec<&Section> = sections_of(doc, SectionType::Experience).collect();
    if sections.is_empty() {
        return Ok(CheckOutcome::fail(
            0,
            Severity::High,
            "No experience section to evaluate ordering",
            "Add an experience section listed in reverse-chronological order (most recent first).",
        ));
    }

    let mut violations = Vec::new();
    for section in sections {
        let years: Vec<u32> = section
            .items()
            .iter()
            .filter_map(|item| match item {
                Item::Entry(entry) => entry.dates().find_map(first_year),
                Item::Text(s) => first_year(s),
            })
            .collect();
        for pair in years.windows(2) {
            if pair[0] < pair[1] {
                violations.push(json!({ "earlier": pair[0], "later": pair[1] }));
            }
        }
    }

    if violations.is_empty() {
        return Ok(CheckOutcome::pass(100, "Experience is in reverse-chronological order"));
    }
    let count = violations.len();
    Ok(CheckOutcome::fail(
        decay_score(count as f64, 25.0, 25.0),
        Severity::Medium,
        format!("{count} experience entr(y/ies) out of reverse-chronological order"),
        "List roles from most recent to oldest; ATS and recruiters expect reverse-chronological order.",
    )
    .with_details(json!({ "violations": violations })))
}

fn section_ordering(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    if doc.sections.is_empty() {
        return Ok(no_sections());
    }

    let order: Vec<SectionType> = doc.sections.iter().map(Section::effective_type).collect();
    let position = |kind: SectionType| order.iter().position(|t| *t == kind);

    let mut score: i32 = 100;
    let mut issues = Vec::new();
    if order.first() != Some(&SectionType::Header) {
        score -= 10;
        issues.push("contact information is not the first section");
    }
    if let (Some(summary), Some(experience)) = (position(SectionType::Summary), position(SectionType::Experience)) {
        if summary > experience {
            score -= 10;
            issues.push("summary comes after experience");
        }
    }
    if let (Some(experience), Some(education)) = (position(SectionType::Experience), position(SectionType::Education)) {
        if experience > education {
            score -= 5;
            issues.push("experience comes after education");
        }
    }

    let score = score.max(0) as u32;
    let details = json!({
        "order": order.iter().map(SectionType::as_str).collect::<Vec<_>>(),
        "issues": issues,
    });
    if score >= 95 {
        return Ok(CheckOutcome::pass(score, "Sections follow the conventional order").with_details(details));
    }
    Ok(CheckOutcome::fail(
        score,
        Severity::Low,
        format!("Unconventional section order: {}", issues.join("; ")),
        "Order sections as: contact header, summary, experience, education, skills.",
    )
    .with_details(details))
}

fn professional_summary(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    if doc.sections.is_empty() {
        return Ok(no_sections());
    }
    let words: usize = sections_of(doc, SectionType::Summary)
        .map(|s| {
            let text = section_text(s);
            let title_words = s.title.as_deref().map(word_count).unwrap_or(0);
            word_count(&text).saturating_sub(title_words)
        })
        .sum();
    let details = json!({ "wordCount": words });

    if words == 0 {
        return Ok(CheckOutcome::fail(
            40,
            Severity::Medium,
            "No professional summary found",
            "Add a 2–4 sentence summary at the top stating your role, years of experience and key strengths.",
        )
        .with_details(details));
    }
    if words < 15 {
        return Ok(CheckOutcome::fail(
            60,
            Severity::Low,
            format!("Professional summary is very short ({words} words)"),
            "Expand the summary to 30–120 words with your specialty and top achievements.",
        )
        .with_details(details));
    }
    let score = if (30..=120).contains(&words) { 100 } else { 75 };
    Ok(CheckOutcome::pass(score, format!("Professional summary present ({words} words)")).with_details(details))
}

fn experience_details(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let entries: Vec<&Item> = sections_of(doc, SectionType::Experience)
        .flat_map(|s| s.items().iter())
        .collect();
    if entries.is_empty() {
        return Ok(CheckOutcome::fail(
            0,
            Severity::High,
            "No experience entries to evaluate",
            "Add experience entries with job title, company and dates for each role.",
        ));
    }

    let complete = entries
        .iter()
        .filter(|item| match item {
            Item::Entry(entry) => {
                entry.role_label().is_some()
                    && entry.company.as_deref().is_some_and(|c| !c.trim().is_empty())
                    && entry.dates().next().is_some()
            }
            Item::Text(_) => false,
        })
        .count();
    let share = percent(complete, entries.len());
    let details = json!({ "entries": entries.len(), "complete": complete });

    if share >= 80.0 {
        return Ok(CheckOutcome::pass(share.round() as u32, "Experience entries list title, company and dates")
            .with_details(details));
    }
    Ok(CheckOutcome::fail(
        share.round() as u32,
        Severity::High,
        format!("{} of {} experience entries are missing title, company or dates", entries.len() - complete, entries.len()),
        "Give every role a job title, employer name and start/end dates on their own fields or lines.",
    )
    .with_details(details))
}

fn appropriate_length(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let words = word_count(&document_text(doc));
    let details = json!({ "wordCount": words });

    if (400..=1000).contains(&words) {
        return Ok(CheckOutcome::pass(100, format!("Length is appropriate ({words} words)")).with_details(details));
    }
    if words < 400 {
        return Ok(CheckOutcome::fail(
            decay_score((400 - words) as f64, 0.25, 20.0),
            if words < 200 { Severity::High } else { Severity::Medium },
            format!("Résumé is too short ({words} words)"),
            "Aim for 400–1000 words: add achievements, skills and context for each role.",
        )
        .with_details(details));
    }
    Ok(CheckOutcome::fail(
        decay_score((words - 1000) as f64, 0.1, 40.0),
        Severity::Low,
        format!("Résumé is too long ({words} words)"),
        "Trim to at most two pages: cut older roles and bullets without measurable results.",
    )
    .with_details(details))
}
