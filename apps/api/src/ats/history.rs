//! Scan history: a capped, newest-first list of compact scan summaries.
//!
//! `AppState` holds an `Arc<dyn HistorySink>`. Redis backs it when `REDIS_URL` is set,
//! otherwise an in-process deque does.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ats::scanner::AnalysisReport;
use crate::errors::AppError;

pub const HISTORY_KEY: &str = "ats:scan_history";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummaryRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub score: f64,
    pub grade: String,
    pub passed: usize,
    pub total: usize,
}

impl From<&AnalysisReport> for ScanSummaryRecord {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: report.timestamp,
            score: report.score.overall_score,
            grade: report.score.grade.clone(),
            passed: report.checks.passed,
            total: report.checks.total,
        }
    }
}

#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Appends a record, evicting the oldest beyond the cap.
    async fn record(&self, summary: ScanSummaryRecord) -> Result<(), AppError>;

    /// Up to `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<ScanSummaryRecord>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-process
// ────────────────────────────────────────────────────────────────────────────

pub struct MemoryHistory {
    cap: usize,
    records: Mutex<VecDeque<ScanSummaryRecord>>,
}

impl MemoryHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait]
impl HistorySink for MemoryHistory {
    async fn record(&self, summary: ScanSummaryRecord) -> Result<(), AppError> {
        let mut records = self.records.lock().await;
        records.push_front(summary);
        records.truncate(self.cap);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ScanSummaryRecord>, AppError> {
        let records = self.records.lock().await;
        Ok(records.iter().take(limit).cloned().collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis
// ────────────────────────────────────────────────────────────────────────────

/// LPUSH + LTRIM keeps the list capped; LRANGE reads newest first.
pub struct RedisHistory {
    client: redis::Client,
    key: String,
    cap: usize,
}

impl RedisHistory {
    pub fn new(client: redis::Client, cap: usize) -> Self {
        Self {
            client,
            key: HISTORY_KEY.to_string(),
            cap: cap.max(1),
        }
    }
}

#[async_trait]
impl HistorySink for RedisHistory {
    async fn record(&self, summary: ScanSummaryRecord) -> Result<(), AppError> {
        let payload = serde_json::to_string(&summary).map_err(|e| AppError::Internal(e.into()))?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.lpush::<_, _, ()>(&self.key, payload).await?;
        conn.ltrim::<_, ()>(&self.key, 0, self.cap as isize - 1).await?;
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ScanSummaryRecord>, AppError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Vec<String> = conn.lrange(&self.key, 0, limit as isize - 1).await?;
        // Skip entries that no longer parse rather than failing the whole listing.
        Ok(raw
            .iter()
            .filter_map(|entry| match serde_json::from_str::<ScanSummaryRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("skipping unreadable history entry: {e}");
                    None
                }
            })
            .collect())
    }
}
