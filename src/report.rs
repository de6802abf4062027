use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one file during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Classes were prefixed (and written back unless dry-running)
    Changed { classes_prefixed: usize },
    /// Nothing to prefix
    Unchanged,
    /// Not processed, e.g. too large
    Skipped { reason: String },
    /// Read or write failed; the run continued
    Failed { error: String },
}

/// Per-file entry in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Metadata for a prefixing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Tool version
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: DateTime<Utc>,

    /// Resolved root directory
    pub root: PathBuf,

    /// Prefix applied during the run
    pub prefix: String,

    /// Whether files were left untouched on disk
    pub dry_run: bool,

    /// Number of classes in the catalog
    pub catalog_size: usize,
}

/// Aggregate numbers for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub files_scanned: usize,
    pub files_changed: usize,
    pub files_unchanged: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub classes_prefixed: usize,

    /// Processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Complete report of a prefixing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixReport {
    pub metadata: ReportMetadata,
    pub files: Vec<FileReport>,
    pub statistics: ReportStatistics,
}

impl PrefixReport {
    /// Outcome recorded for `path`, if it was visited
    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|file| file.path == path)
            .map(|file| &file.outcome)
    }

    /// Files whose processing failed
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|file| matches!(file.outcome, FileOutcome::Failed { .. }))
    }

    /// Convert report to pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builder pattern for creating reports
pub struct ReportBuilder {
    metadata: ReportMetadata,
    files: Vec<FileReport>,
    start_time: std::time::Instant,
}

impl ReportBuilder {
    pub fn new(root: PathBuf, prefix: String) -> Self {
        Self {
            metadata: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                generated_at: Utc::now(),
                root,
                prefix,
                dry_run: false,
                catalog_size: 0,
            },
            files: Vec::new(),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.metadata.dry_run = dry_run;
        self
    }

    pub fn with_catalog_size(mut self, size: usize) -> Self {
        self.metadata.catalog_size = size;
        self
    }

    pub fn with_files(mut self, files: impl IntoIterator<Item = FileReport>) -> Self {
        self.files.extend(files);
        self
    }

    /// Build the final report with statistics
    pub fn build(self) -> PrefixReport {
        let mut statistics = ReportStatistics {
            files_scanned: self.files.len(),
            processing_time_ms: Some(self.start_time.elapsed().as_millis() as u64),
            ..ReportStatistics::default()
        };

        for file in &self.files {
            match &file.outcome {
                FileOutcome::Changed { classes_prefixed } => {
                    statistics.files_changed += 1;
                    statistics.classes_prefixed += classes_prefixed;
                }
                FileOutcome::Unchanged => statistics.files_unchanged += 1,
                FileOutcome::Skipped { .. } => statistics.files_skipped += 1,
                FileOutcome::Failed { .. } => statistics.files_failed += 1,
            }
        }

        PrefixReport {
            metadata: self.metadata,
            files: self.files,
            statistics,
        }
    }
}
