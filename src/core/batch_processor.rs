// src/core/batch_processor.rs
use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use super::discovery::SourceFile;
use super::llm::{ClassSummarizer, ClassSummary};
use super::store::ClassStore;

/// Result of summarizing and ingesting one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileOutcome {
    Processed {
        path: PathBuf,
        class_name: String,
        method_count: usize,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

/// Per-file outcomes of one batch, in input order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.outcomes.iter()
            .filter(|outcome| matches!(outcome, FileOutcome::Processed { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &str)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Failed { path, error } => Some((path, error.as_str())),
            FileOutcome::Processed { .. } => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// Runs the summarize/ingest cycle over files one at a time.
///
/// Only one summarization request is outstanding at any moment. A failing
/// file is logged and skipped; the store is untouched for that file.
pub struct BatchProcessor {
    request_delay: Duration,
}

impl BatchProcessor {
    pub fn new(request_delay: Duration) -> Self {
        Self { request_delay }
    }

    pub async fn process(
        &self,
        files: &[SourceFile],
        summarizer: &dyn ClassSummarizer,
        store: &mut ClassStore,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        info!(
            "Starting processing of {} files with {} ({})",
            files.len(),
            summarizer.provider_name(),
            summarizer.model_name()
        );

        for (i, file) in files.iter().enumerate() {
            info!("[{}/{}] Processing {}...", i + 1, files.len(), file.name);

            match self.summarize_file(file, summarizer).await {
                Ok(summary) => {
                    let class_name = summary.name.clone();
                    let method_count = summary.methods.len();
                    store.ingest(summary);

                    info!("✓ Processed {} - {} methods", file.name, method_count);
                    report.outcomes.push(FileOutcome::Processed {
                        path: file.path.clone(),
                        class_name,
                        method_count,
                    });

                    if i + 1 < files.len() && !self.request_delay.is_zero() {
                        tokio::time::sleep(self.request_delay).await;
                    }
                }
                Err(e) => {
                    warn!("✗ Error processing {}: {}", file.name, e);
                    report.outcomes.push(FileOutcome::Failed {
                        path: file.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Processing complete: {} of {} files summarized, {} classes stored",
            report.processed_count(),
            files.len(),
            store.len()
        );

        report
    }

    async fn summarize_file(
        &self,
        file: &SourceFile,
        summarizer: &dyn ClassSummarizer,
    ) -> Result<ClassSummary> {
        let content = tokio::fs::read_to_string(&file.path).await?;
        summarizer.summarize(&content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::core::model::{CallRef, MethodRecord};
    use crate::error::ClasslensError;

    /// Treats the file content as the class name; "FAIL" simulates a bad response
    struct EchoSummarizer;

    #[async_trait]
    impl ClassSummarizer for EchoSummarizer {
        async fn summarize(&self, source_text: &str) -> Result<ClassSummary> {
            let name = source_text.trim();
            if name == "FAIL" {
                return Err(ClasslensError::MalformedSummary("invalid summary JSON".to_string()));
            }

            Ok(ClassSummary {
                name: name.to_string(),
                methods: vec![MethodRecord::new(
                    "run",
                    vec![],
                    "void",
                    vec![CallRef::new("Logger.info")],
                    vec![],
                )],
            })
        }

        fn provider_name(&self) -> &str {
            "Echo"
        }

        fn model_name(&self) -> &str {
            "echo-1"
        }
    }

    fn write_files(dir: &std::path::Path, contents: &[&str]) -> Vec<SourceFile> {
        contents.iter().enumerate()
            .map(|(i, content)| {
                let path = dir.join(format!("File{}.cls", i + 1));
                std::fs::write(&path, content).unwrap();
                SourceFile::new(path)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_failed_file_is_skipped_and_batch_continues() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), &["AccountService", "FAIL", "OrderService"]);

        let mut store = ClassStore::new();
        let report = BatchProcessor::new(Duration::ZERO)
            .process(&files, &EchoSummarizer, &mut store)
            .await;

        let names: Vec<_> = store.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["AccountService", "OrderService"]);
        assert_eq!(report.processed_count(), 2);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &files[1].path);
        assert!(failures[0].1.contains("invalid summary JSON"));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path(), &["AccountService"]);
        files.push(SourceFile::new(dir.path().join("Missing.cls")));

        let mut store = ClassStore::new();
        let report = BatchProcessor::new(Duration::ZERO)
            .process(&files, &EchoSummarizer, &mut store)
            .await;

        assert_eq!(store.len(), 1);
        assert_eq!(report.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_outcomes_record_method_counts() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path(), &["Billing"]);

        let mut store = ClassStore::new();
        let report = BatchProcessor::new(Duration::from_millis(1))
            .process(&files, &EchoSummarizer, &mut store)
            .await;

        assert_eq!(report.outcomes, vec![FileOutcome::Processed {
            path: files[0].path.clone(),
            class_name: "Billing".to_string(),
            method_count: 1,
        }]);
    }
}
