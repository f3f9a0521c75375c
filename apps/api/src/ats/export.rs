//! Report serialization: json, csv, html and a plain-text summary. No analysis happens here.

use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::ats::scanner::AnalysisReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Html,
    #[serde(alias = "text", alias = "txt")]
    Summary,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Html => "text/html; charset=utf-8",
            ExportFormat::Summary => "text/plain; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "html" => Ok(ExportFormat::Html),
            "summary" | "text" | "txt" => Ok(ExportFormat::Summary),
            other => bail!("unsupported export format: {other}"),
        }
    }
}

pub fn render(report: &AnalysisReport, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => render_json(report),
        ExportFormat::Csv => render_csv(report),
        ExportFormat::Html => Ok(render_html(report)),
        ExportFormat::Summary => Ok(render_summary(report)),
    }
}

pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// One row per check. The csv writer quotes fields as needed and doubles embedded quotes.
pub fn render_csv(report: &AnalysisReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["name", "category", "passed", "score", "severity", "message"])?;
    for result in &report.checks.results {
        let score = result.score.to_string();
        writer.write_record([
            result.check_name.as_str(),
            result.category.as_str(),
            if result.passed { "pass" } else { "fail" },
            score.as_str(),
            result.severity.as_str(),
            result.message.as_str(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_html(report: &AnalysisReport) -> String {
    let score = &report.score;
    let mut rows = String::new();
    for r in &report.checks.results {
        // Writing to a String cannot fail.
        let _ = writeln!(
            rows,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            if r.passed { "pass" } else { "fail" },
            escape_html(&r.check_name),
            r.category.as_str(),
            r.score,
            r.severity.as_str(),
            escape_html(&r.message),
        );
    }

    let mut categories = String::new();
    for c in &score.categories {
        let _ = writeln!(
            categories,
            "<li>{}: {:.1} (weight {}%)</li>",
            escape_html(&c.label),
            c.score,
            c.weight
        );
    }

    let mut wins = String::new();
    for rec in &report.recommendations.quick_wins {
        let _ = writeln!(wins, "<li>{}</li>", escape_html(&rec.recommendation));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>ATS Analysis Report</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 2rem; color: #222; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}
tr.pass td:first-child {{ color: #1a7f37; }}
tr.fail td:first-child {{ color: #cf222e; }}
</style>
</head>
<body>
<h1>ATS Analysis Report</h1>
<p class="score">Score: <strong>{overall:.1}</strong> ({grade}), better than {percentile}% of résumés</p>
<p>{passed} of {total} checks passed. Generated {timestamp}.</p>
<h2>Categories</h2>
<ul>
{categories}</ul>
<h2>Quick wins</h2>
<ul>
{wins}</ul>
<h2>Checks</h2>
<table>
<tr><th>Check</th><th>Category</th><th>Score</th><th>Severity</th><th>Message</th></tr>
{rows}</table>
</body>
</html>
"#,
        overall = score.overall_score,
        grade = escape_html(&score.grade),
        percentile = score.percentile,
        passed = report.checks.passed,
        total = report.checks.total,
        timestamp = report.timestamp.to_rfc3339(),
    )
}

pub fn render_summary(report: &AnalysisReport) -> String {
    let score = &report.score;
    let mut out = String::new();
    let _ = writeln!(out, "ATS SCAN SUMMARY");
    let _ = writeln!(out, "Score: {:.1}/100 ({})", score.overall_score, score.grade);
    let _ = writeln!(out, "Percentile: {}", score.percentile);
    let _ = writeln!(out, "Checks passed: {}/{}", report.checks.passed, report.checks.total);
    let _ = writeln!(out, "Industry: {}", report.metadata.target_industry.as_str());
    let _ = writeln!(out);
    let _ = writeln!(out, "Categories:");
    for c in &score.categories {
        let _ = writeln!(out, "  {:<18} {:>6.1}", c.label, c.score);
    }

    let failed: Vec<_> = report.checks.results.iter().filter(|r| !r.passed).collect();
    if !failed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed checks:");
        for r in failed {
            let _ = writeln!(out, "  - {} [{}]: {}", r.check_name, r.severity.as_str(), r.message);
        }
    }

    if !report.recommendations.quick_wins.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Quick wins:");
        for (i, rec) in report.recommendations.quick_wins.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, rec.recommendation);
        }
    }
    let _ = writeln!(
        out,
        "\nEstimated time to address all recommendations: {} min",
        report.recommendations.total_estimated_minutes
    );
    out
}
