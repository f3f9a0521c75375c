use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::ats::export::ExportFormat;
use crate::ats::history::ScanSummaryRecord;
use crate::ats::scanner::{AnalysisReport, CatalogueEntry, Comparison, PathToScore, QuickScanReport};
use crate::ats::ScanOptions;
use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub options: ScanOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub resume_a: Option<ResumeDocument>,
    #[serde(default)]
    pub resume_b: Option<ResumeDocument>,
    #[serde(default)]
    pub options_a: ScanOptions,
    #[serde(default)]
    pub options_b: ScanOptions,
}

#[derive(Deserialize)]
pub struct PathRequest {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub options: ScanOptions,
    pub target: f64,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub resume: Option<ResumeDocument>,
    #[serde(default)]
    pub options: ScanOptions,
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// Runs a CPU-bound scanner call off the async runtime.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&crate::ats::AtsScanner) -> Result<T, AppError> + Send + 'static,
{
    let scanner = state.scanner.clone();
    tokio::task::spawn_blocking(move || f(&scanner))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

async fn scan_and_record(state: &AppState, req: ScanRequest) -> Result<AnalysisReport, AppError> {
    let report = blocking(state, move |scanner| {
        Ok(scanner.scan(req.resume.as_ref(), &req.options)?)
    })
    .await?;
    // History is best-effort; a storage outage must not fail the scan.
    if let Err(e) = state.history.record(ScanSummaryRecord::from(&report)).await {
        warn!("failed to record scan history: {e}");
    }
    Ok(report)
}

/// GET /api/v1/ats/checks
pub async fn handle_checks(State(state): State<AppState>) -> Json<Vec<CatalogueEntry>> {
    Json(state.scanner.catalogue())
}

/// POST /api/v1/ats/scan
pub async fn handle_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<AnalysisReport>, AppError> {
    Ok(Json(scan_and_record(&state, req).await?))
}

/// POST /api/v1/ats/quick-scan
pub async fn handle_quick_scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<Json<QuickScanReport>, AppError> {
    let report = blocking(&state, move |scanner| {
        Ok(scanner.quick_scan(req.resume.as_ref(), &req.options)?)
    })
    .await?;
    Ok(Json(report))
}

/// POST /api/v1/ats/compare
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<Comparison>, AppError> {
    let comparison = blocking(&state, move |scanner| {
        Ok(scanner.compare_resumes(
            req.resume_a.as_ref(),
            &req.options_a,
            req.resume_b.as_ref(),
            &req.options_b,
        )?)
    })
    .await?;
    Ok(Json(comparison))
}

/// POST /api/v1/ats/path
pub async fn handle_path_to_score(
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> Result<Json<PathToScore>, AppError> {
    if !req.target.is_finite() || !(0.0..=100.0).contains(&req.target) {
        return Err(AppError::Validation(format!(
            "target must be between 0 and 100, got {}",
            req.target
        )));
    }
    let path = blocking(&state, move |scanner| {
        let report = scanner.scan(req.resume.as_ref(), &req.options)?;
        Ok(scanner.path_to_score(&report, req.target))
    })
    .await?;
    Ok(Json(path))
}

/// POST /api/v1/ats/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format = req.format;
    let body = blocking(&state, move |scanner| {
        let report = scanner.scan(req.resume.as_ref(), &req.options)?;
        Ok(scanner.export_results(&report, format)?)
    })
    .await?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// GET /api/v1/ats/history
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<ScanSummaryRecord>>, AppError> {
    let cap = state.config.history_limit;
    let limit = params.limit.unwrap_or(cap).min(cap);
    Ok(Json(state.history.recent(limit).await?))
}
