//! Report history persistence
//!
//! Handles saving, loading, and rotation of run reports.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::RunReport;
use crate::{Result, StressError, APP_NAME, MAX_REPORT_HISTORY, REPORTS_FILE};

/// Report history storage manager
#[derive(Debug)]
pub struct ReportStorage {
    reports_path: PathBuf,
}

/// Reports file structure for JSON persistence
#[derive(Debug, Serialize, Deserialize)]
struct ReportsFile {
    version: u32,
    reports: Vec<RunReport>,
}

impl ReportStorage {
    /// Create a storage manager at the standard location
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(Self::reports_file_path()?))
    }

    /// Create a storage manager backed by an explicit file
    pub fn with_path(reports_path: impl Into<PathBuf>) -> Self {
        Self {
            reports_path: reports_path.into(),
        }
    }

    /// Get the standard reports file path
    /// Uses $DATA_HOME/stressmeter/reports.json
    pub fn reports_file_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| {
            StressError::PersistenceError("Unable to determine data directory".to_string())
        })?;

        Ok(data_dir.join(APP_NAME).join(REPORTS_FILE))
    }

    /// Load all reports, oldest first
    pub fn load_reports(&self) -> Result<Vec<RunReport>> {
        if !self.reports_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.reports_path).map_err(|e| {
            StressError::PersistenceError(format!(
                "Failed to read reports file {}: {}",
                self.reports_path.display(),
                e
            ))
        })?;

        let reports_file: ReportsFile = serde_json::from_str(&content).map_err(|e| {
            StressError::PersistenceError(format!(
                "Failed to parse reports file {}: {}",
                self.reports_path.display(),
                e
            ))
        })?;

        Ok(reports_file.reports)
    }

    /// Append a report, keeping only the newest MAX_REPORT_HISTORY entries
    pub fn append_report(&self, report: RunReport) -> Result<()> {
        let mut reports = self.load_reports()?;
        reports.push(report);

        if reports.len() > MAX_REPORT_HISTORY {
            let skip_count = reports.len() - MAX_REPORT_HISTORY;
            reports.drain(..skip_count);
        }

        self.save_reports(reports)
    }

    fn save_reports(&self, reports: Vec<RunReport>) -> Result<()> {
        if let Some(parent) = self.reports_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StressError::PersistenceError(format!(
                    "Failed to create reports directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let reports_file = ReportsFile {
            version: 1,
            reports,
        };
        let content = serde_json::to_string_pretty(&reports_file)?;

        fs::write(&self.reports_path, content).map_err(|e| {
            StressError::PersistenceError(format!(
                "Failed to write reports file {}: {}",
                self.reports_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the number of stored reports
    pub fn count_reports(&self) -> Result<usize> {
        Ok(self.load_reports()?.len())
    }

    /// Get the most recent N reports, oldest first
    pub fn recent_reports(&self, count: usize) -> Result<Vec<RunReport>> {
        let mut reports = self.load_reports()?;
        if reports.len() > count {
            reports.drain(..reports.len() - count);
        }
        Ok(reports)
    }

    pub fn path(&self) -> &Path {
        &self.reports_path
    }
}
