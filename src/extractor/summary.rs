use crate::extractor::RecordOutcome;
use crate::scanner::SourceFile;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Tallies of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub output_path: PathBuf,
    pub extraction_time: DateTime<Local>,
    pub include_paths: Vec<String>,
    pub records_written: usize,
    pub content_records: usize,
    pub list_only_records: usize,
    pub bytes_written: u64,
    pub missing_include_paths: Vec<String>,
    pub errors: Vec<String>,
    pub extraction_duration: Duration,
    #[serde(skip)]
    start_time: Instant,
}

impl ExtractionSummary {
    pub fn new(output_path: PathBuf, include_paths: Vec<String>) -> Self {
        Self {
            output_path,
            extraction_time: Local::now(),
            include_paths,
            records_written: 0,
            content_records: 0,
            list_only_records: 0,
            bytes_written: 0,
            missing_include_paths: Vec::new(),
            errors: Vec::new(),
            extraction_duration: Duration::ZERO,
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, file: &SourceFile, outcome: &RecordOutcome) {
        self.records_written += 1;
        match outcome {
            RecordOutcome::Content { bytes } => {
                self.content_records += 1;
                self.bytes_written += bytes;
            }
            RecordOutcome::ListOnly => self.list_only_records += 1,
            RecordOutcome::ReadError { reason } => {
                self.add_error(format!("Failed to read {}: {}", file.relative_path, reason));
            }
        }
    }

    pub fn add_missing_include(&mut self, path: String) {
        self.missing_include_paths.push(path);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(mut self) -> Self {
        self.extraction_duration = self.elapsed();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> SourceFile {
        SourceFile::new(PathBuf::from(name), name.to_string(), 10, false)
    }

    #[test]
    fn test_outcome_tallies() {
        let mut summary = ExtractionSummary::new(PathBuf::from("out.md"), vec![]);

        summary.record(&file("a.rs"), &RecordOutcome::Content { bytes: 10 });
        summary.record(&file("b.png"), &RecordOutcome::ListOnly);
        summary.record(
            &file("c.rs"),
            &RecordOutcome::ReadError {
                reason: "Permission denied".to_string(),
            },
        );
        summary.add_missing_include("gone".to_string());

        assert_eq!(summary.records_written, 3);
        assert_eq!(summary.content_records, 1);
        assert_eq!(summary.list_only_records, 1);
        assert_eq!(summary.bytes_written, 10);
        assert_eq!(summary.errors, vec!["Failed to read c.rs: Permission denied"]);
        assert_eq!(summary.missing_include_paths, vec!["gone"]);
    }

    #[test]
    fn test_summary_serializes_to_json() {
        let summary = ExtractionSummary::new(PathBuf::from("out.md"), vec!["src".to_string()])
            .finish();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["output_path"], "out.md");
        assert_eq!(json["include_paths"][0], "src");
        assert!(json.get("start_time").is_none());
    }
}
