// src/core/discovery.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::DiscoveryConfig;
use crate::error::{ClasslensError, Result};

/// A source file selected for summarization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// File name used in logs and batch reports
    pub name: String,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Collects class source files from files and directories
pub struct SourceDiscovery {
    config: DiscoveryConfig,
}

impl SourceDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Resolve inputs to a de-duplicated list of source files in first-seen order
    pub fn discover<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Vec<SourceFile>> {
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for input in inputs {
            let input = input.as_ref();
            if !input.exists() {
                return Err(ClasslensError::FileSystem(
                    format!("Input not found: {}", input.display())
                ));
            }

            for path in self.collect(input)? {
                // `src/A.cls`, `./src/A.cls` and `src/../src/A.cls` are one file
                let key = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
                if seen.insert(key) {
                    files.push(SourceFile::new(path));
                } else {
                    debug!("Skipping duplicate {}", path.display());
                }
            }
        }

        Ok(files)
    }

    fn collect(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_file() {
            if self.should_summarize(input)? {
                return Ok(vec![input.to_path_buf()]);
            }
            warn!("Skipping {}: not a recognized class source file", input.display());
            return Ok(Vec::new());
        }

        // Use ignore crate to respect .gitignore
        let walker = WalkBuilder::new(input)
            .hidden(false)
            .git_ignore(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ClasslensError::FileSystem(e.to_string()))?;
            let path = entry.path();

            if path.is_file() && self.should_summarize(path)? {
                paths.push(path.to_path_buf());
            }
        }

        Ok(paths)
    }

    /// Check the extension and size limit for a candidate file
    fn should_summarize(&self, path: &Path) -> Result<bool> {
        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            return Ok(false);
        };

        let accepted = self.config.file_extensions.iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension));
        if !accepted {
            return Ok(false);
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.config.max_file_size {
            warn!(
                "Skipping {}: {} bytes exceeds the {} byte limit",
                path.display(),
                size,
                self.config.max_file_size
            );
            return Ok(false);
        }

        Ok(true)
    }
}
