// src/core/export.rs
use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use tracing::info;

use crate::config::OutputConfig;
use crate::error::Result;
use super::model::CodebaseDocument;

/// Date-stamped export name, e.g. `apex_class_summaries_2024-05-01.json`
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.json", prefix, date.format("%Y-%m-%d"))
}

/// Serialize a document to any path
pub fn save_document<P: AsRef<Path>>(document: &CodebaseDocument, path: P, pretty: bool) -> Result<()> {
    let content = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_document<P: AsRef<Path>>(path: P) -> Result<CodebaseDocument> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write the document into `dir` under today's date-stamped name
pub fn export_document(document: &CodebaseDocument, dir: &Path, output: &OutputConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let today = chrono::Local::now().date_naive();
    let path = dir.join(export_file_name(&output.export_prefix, today));

    save_document(document, &path, output.pretty)?;
    info!("Exported {} classes to {}", document.classes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ClassRecord, MethodRecord};

    fn sample() -> CodebaseDocument {
        let mut class = ClassRecord::new("AccountService");
        class.methods.push(MethodRecord::new(
            "load",
            vec!["Id accountId".to_string()],
            "Account",
            vec!["AccountSelector.byId".into()],
            vec!["accountId must not be null".to_string()],
        ));
        CodebaseDocument { classes: vec![class] }
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            export_file_name("apex_class_summaries", date),
            "apex_class_summaries_2024-03-07.json"
        );
    }

    #[test]
    fn test_document_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json, serde_json::json!({
            "classes": [{
                "name": "AccountService",
                "methods": [{
                    "name": "load",
                    "parameters": ["Id accountId"],
                    "return_type": "Account",
                    "calls": ["AccountSelector.byId"],
                    "expects": ["accountId must not be null"]
                }]
            }]
        }));
    }

    #[test]
    fn test_export_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_document(&sample(), dir.path(), &OutputConfig::default()).unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("apex_class_summaries_"));
        assert_eq!(load_document(&path).unwrap(), sample());
    }

    #[test]
    fn test_load_tolerates_missing_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"classes": [{"name": "A", "methods": [{"name": "run"}]}, {"name": "B"}]}"#).unwrap();

        let document = load_document(&path).unwrap();
        assert_eq!(document.classes[0].methods[0].return_type, "void");
        assert!(document.classes[1].methods.is_empty());
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_document(&path).is_err());
    }
}
