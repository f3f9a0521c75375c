//! Formatting checks: layout constructs and styling that ATS parsers mangle or drop.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::ats::checks::{CheckFailure, CheckModule, CheckOutcome, CheckSpec};
use crate::ats::keywords::{
    COLUMN_MARKERS, IMAGE_MARKERS, STANDARD_FONTS, TABLE_MARKERS, TEXT_BOX_MARKERS,
};
use crate::ats::text::{decay_score, document_text, flat_serialization, sections_of};
use crate::ats::{CheckCategory, Impact, ScanOptions, Severity};
use crate::models::resume::{Item, ResumeDocument, SectionType};

static IMAGE_EXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(png|jpe?g|gif|svg|bmp|webp|tiff?)\b").unwrap());

static DATE_STYLES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("Month YYYY", Regex::new(r"^[A-Za-z]{3,9}\.? \d{4}$").unwrap()),
        ("MM/YYYY", Regex::new(r"^\d{1,2}/\d{4}$").unwrap()),
        ("MM-YYYY", Regex::new(r"^\d{1,2}-\d{4}$").unwrap()),
        ("YYYY-MM", Regex::new(r"^\d{4}-\d{1,2}$").unwrap()),
        ("MM/DD/YYYY", Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap()),
        ("YYYY-MM-DD", Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap()),
        ("YYYY", Regex::new(r"^\d{4}$").unwrap()),
    ]
});

/// Ongoing-role markers carry no format of their own.
const OPEN_ENDED_DATES: &[&str] = &["present", "current", "now", "ongoing", "today"];

/// Bullet glyphs every parser maps cleanly.
const STANDARD_GLYPHS: &[char] = &['•', '·', '-', '–', '—', '*', '|', '/', '&', '@', '%', '$', '€', '£'];

const SUPPORTED_FORMATS: &[(&str, u32)] = &[("pdf", 100), ("docx", 100), ("doc", 90), ("txt", 80)];

pub struct FormattingChecks;

static FORMATTING_CHECKS: &[CheckSpec] = &[
    CheckSpec {
        name: "noTables",
        impact: Impact::Critical,
        run: no_tables,
    },
    CheckSpec {
        name: "noMultiColumn",
        impact: Impact::High,
        run: no_multi_column,
    },
    CheckSpec {
        name: "noImages",
        impact: Impact::Medium,
        run: no_images,
    },
    CheckSpec {
        name: "noTextBoxes",
        impact: Impact::High,
        run: no_text_boxes,
    },
    CheckSpec {
        name: "standardFonts",
        impact: Impact::Low,
        run: standard_fonts,
    },
    CheckSpec {
        name: "readableFontSize",
        impact: Impact::Low,
        run: readable_font_size,
    },
    CheckSpec {
        name: "noHeaderFooterContent",
        impact: Impact::High,
        run: no_header_footer_content,
    },
    CheckSpec {
        name: "supportedFileFormat",
        impact: Impact::Critical,
        run: supported_file_format,
    },
    CheckSpec {
        name: "noSpecialCharacters",
        impact: Impact::Medium,
        run: no_special_characters,
    },
    CheckSpec {
        name: "consistentDateFormat",
        impact: Impact::Low,
        run: consistent_date_format,
    },
];

impl CheckModule for FormattingChecks {
    fn category(&self) -> CheckCategory {
        CheckCategory::Formatting
    }

    fn checks(&self) -> &'static [CheckSpec] {
        FORMATTING_CHECKS
    }
}

fn find_markers(haystack: &str, markers: &[&'static str]) -> Vec<&'static str> {
    markers
        .iter()
        .copied()
        .filter(|m| haystack.contains(m))
        .collect()
}

fn no_tables(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let flat = flat_serialization(doc)?;
    let mut found = find_markers(&flat, TABLE_MARKERS);
    let layout_is_table = doc
        .customization
        .as_ref()
        .and_then(|c| c.layout.as_deref())
        .is_some_and(|l| l.to_lowercase().contains("table"));
    if layout_is_table {
        found.push("layout: table");
    }

    if found.is_empty() {
        return Ok(CheckOutcome::pass(100, "No tables detected"));
    }
    Ok(CheckOutcome::fail(
        0,
        Severity::Critical,
        "Tables detected. Most ATS parsers read table cells out of order or skip them entirely",
        "Replace tables with plain single-column text: one heading per section, one line per entry.",
    )
    .with_details(json!({ "markers": found })))
}

fn no_multi_column(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let flat = flat_serialization(doc)?;
    let mut found = find_markers(&flat, COLUMN_MARKERS);
    if let Some(custom) = &doc.customization {
        if custom.columns.is_some_and(|c| c > 1) {
            found.push("columns > 1");
        }
    }

    if found.is_empty() {
        return Ok(CheckOutcome::pass(100, "Single-column layout"));
    }
    Ok(CheckOutcome::fail(
        20,
        Severity::High,
        "Multi-column layout detected. ATS parsers read across columns and interleave unrelated lines",
        "Switch to a single-column layout; move sidebar content (skills, contact) into regular sections.",
    )
    .with_details(json!({ "markers": found })))
}

fn no_images(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let flat = flat_serialization(doc)?;
    let found: BTreeSet<String> = find_markers(&flat, IMAGE_MARKERS)
        .into_iter()
        .map(str::to_string)
        .chain(IMAGE_EXT_RE.find_iter(&flat).map(|m| m.as_str().to_string()))
        .collect();

    if found.is_empty() {
        return Ok(CheckOutcome::pass(100, "No images or graphics detected"));
    }
    Ok(CheckOutcome::fail(
        50,
        Severity::Medium,
        "Images or graphics detected. Any text inside them is invisible to an ATS",
        "Remove photos, logos and skill charts; state the same information as text.",
    )
    .with_details(json!({ "markers": found })))
}

fn no_text_boxes(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let flat = flat_serialization(doc)?;
    let found = find_markers(&flat, TEXT_BOX_MARKERS);

    if found.is_empty() {
        return Ok(CheckOutcome::pass(100, "No text boxes or absolutely positioned content"));
    }
    Ok(CheckOutcome::fail(
        30,
        Severity::High,
        "Text boxes or absolutely positioned elements detected. Their content is often skipped",
        "Move text out of text boxes and floating frames into the normal document flow.",
    )
    .with_details(json!({ "markers": found })))
}

fn standard_fonts(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(font) = doc.customization.as_ref().and_then(|c| c.font_family.as_deref()) else {
        return Ok(CheckOutcome::pass(100, "Default font in use"));
    };
    // CSS-style stacks such as "Inter, Arial, sans-serif": the first family is what renders.
    let primary = font
        .split(',')
        .next()
        .unwrap_or(font)
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'')
        .to_lowercase();

    if STANDARD_FONTS.contains(&primary.as_str()) {
        return Ok(CheckOutcome::pass(100, format!("Standard font: {font}"))
            .with_details(json!({ "font": primary })));
    }
    Ok(CheckOutcome::fail(
        60,
        Severity::Medium,
        format!("Non-standard font '{font}' may not render or parse consistently"),
        "Use a widely available font such as Arial, Calibri, Georgia or Times New Roman.",
    )
    .with_details(json!({ "font": primary })))
}

fn readable_font_size(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(size) = doc.customization.as_ref().and_then(|c| c.font_size) else {
        return Ok(CheckOutcome::pass(100, "Default font size in use"));
    };
    if !size.is_finite() || size <= 0.0 {
        return Err(CheckFailure::Malformed(format!("font size {size} is not a positive number")));
    }

    if (10.0..=12.0).contains(&size) {
        return Ok(CheckOutcome::pass(100, format!("Font size {size}pt is readable"))
            .with_details(json!({ "fontSize": size })));
    }
    let distance = if size < 10.0 { 10.0 - size } else { size - 12.0 };
    let severity = if distance > 2.0 { Severity::Medium } else { Severity::Low };
    Ok(CheckOutcome::fail(
        decay_score(distance, 15.0, 40.0),
        severity,
        format!("Font size {size}pt is outside the 10–12pt body range"),
        "Set body text to 10–12pt; use at most 14–16pt for your name.",
    )
    .with_details(json!({ "fontSize": size })))
}

fn no_header_footer_content(
    doc: &ResumeDocument,
    _: &ScanOptions,
) -> Result<CheckOutcome, CheckFailure> {
    let footer_sections = sections_of(doc, SectionType::Footer)
        .filter(|s| s.has_content())
        .count();
    let styled_regions: Vec<&str> = doc
        .customization
        .as_ref()
        .map(|c| {
            ["headerContent", "footerContent"]
                .into_iter()
                .filter(|key| c.extra.get(*key).is_some_and(|v| !v.is_null()))
                .collect()
        })
        .unwrap_or_default();

    if footer_sections == 0 && styled_regions.is_empty() {
        return Ok(CheckOutcome::pass(100, "No content placed in page headers or footers"));
    }
    Ok(CheckOutcome::fail(
        60,
        Severity::Medium,
        "Content placed in page header/footer regions, which many ATS parsers ignore",
        "Move contact details and other footer/header text into the main body at the top of page one.",
    )
    .with_details(json!({
        "footerSections": footer_sections,
        "regions": styled_regions,
    })))
}

fn supported_file_format(_: &ResumeDocument, options: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let Some(raw) = options.file_format.as_deref().filter(|f| !f.trim().is_empty()) else {
        return Ok(CheckOutcome::pass(
            100,
            "No file format specified; assuming an ATS-friendly format",
        ));
    };
    let format = raw.trim().trim_start_matches('.').to_lowercase();

    match SUPPORTED_FORMATS.iter().find(|(f, _)| *f == format) {
        Some((_, score)) => Ok(CheckOutcome::pass(
            *score,
            format!("{} is widely supported by ATS software", format.to_uppercase()),
        )
        .with_details(json!({ "format": format }))),
        None => Ok(CheckOutcome::fail(
            50,
            Severity::High,
            format!("{} files are not reliably parsed by ATS software", format.to_uppercase()),
            "Submit the résumé as a PDF or DOCX file.",
        )
        .with_details(json!({ "format": format }))),
    }
}

fn is_decorative(c: char) -> bool {
    if c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation() {
        return false;
    }
    if STANDARD_GLYPHS.contains(&c) {
        return false;
    }
    matches!(c as u32,
        0x2190..=0x21FF   // arrows
        | 0x2500..=0x25FF // box drawing, shapes
        | 0x2600..=0x27BF // misc symbols, dingbats
        | 0x2B00..=0x2BFF // misc symbols and arrows
        | 0xE000..=0xF8FF // private use (icon fonts)
        | 0x1F000..=0x1FAFF) // emoji
}

fn no_special_characters(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let text = document_text(doc);
    let found: Vec<char> = text.chars().filter(|c| is_decorative(*c)).collect();
    let distinct: BTreeSet<char> = found.iter().copied().collect();
    let count = found.len();

    if count <= 3 {
        return Ok(CheckOutcome::pass(
            decay_score(count as f64, 10.0, 40.0),
            "No problematic special characters",
        )
        .with_details(json!({ "count": count })));
    }
    Ok(CheckOutcome::fail(
        decay_score(count as f64, 10.0, 40.0),
        Severity::Medium,
        format!("{count} decorative symbols or emoji found; ATS parsers often turn them into garbage"),
        "Replace icons, emoji and fancy bullets with plain text and standard round bullets (•).",
    )
    .with_details(json!({
        "count": count,
        "characters": distinct.into_iter().map(String::from).collect::<Vec<_>>(),
    })))
}

fn date_style(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    if OPEN_ENDED_DATES.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    DATE_STYLES
        .iter()
        .find(|(_, re)| re.is_match(trimmed))
        .map(|(name, _)| *name)
        .or(Some("other"))
}

fn consistent_date_format(doc: &ResumeDocument, _: &ScanOptions) -> Result<CheckOutcome, CheckFailure> {
    let mut styles = BTreeSet::new();
    for section in &doc.sections {
        for item in section.items() {
            if let Item::Entry(entry) = item {
                for date in entry.dates() {
                    // Ranges such as "Jan 2020 – Mar 2022" are judged per side.
                    for side in date.split(['–', '—']).flat_map(|s| s.split(" - ")) {
                        if let Some(style) = date_style(side) {
                            styles.insert(style);
                        }
                    }
                }
            }
        }
    }

    let distinct = styles.len();
    if distinct <= 1 {
        return Ok(CheckOutcome::pass(100, "Dates use a consistent format")
            .with_details(json!({ "formats": styles })));
    }
    Ok(CheckOutcome::fail(
        decay_score((distinct - 1) as f64, 20.0, 40.0),
        Severity::Low,
        format!("{distinct} different date formats in use"),
        "Pick one date format (e.g. 'Jan 2021' or '01/2021') and use it for every entry.",
    )
    .with_details(json!({ "formats": styles })))
}
