use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::model::{ClassRecord, MethodRecord, null_as_default};
use crate::error::{ClasslensError, Result};

/// Structured summary of one source class, as produced by a summarizer.
///
/// Optional fields follow the persisted document defaults: missing `methods`,
/// `calls` or `expects` become empty lists and a missing `return_type`
/// becomes `"void"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodRecord>,
}

impl ClassSummary {
    /// Reject summaries the store cannot hold: blank class or method names
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClasslensError::MalformedSummary(
                "class name is empty".to_string()
            ));
        }

        if let Some(position) = self.methods.iter().position(|m| m.name.trim().is_empty()) {
            return Err(ClasslensError::MalformedSummary(
                format!("method #{} of {} has an empty name", position + 1, self.name)
            ));
        }

        Ok(())
    }

    pub fn into_record(self) -> ClassRecord {
        ClassRecord {
            name: self.name,
            methods: self.methods,
        }
    }
}

/// Trait for LLM providers that can summarize a source class
#[async_trait]
pub trait ClassSummarizer: Send + Sync {
    /// Summarize one class; fails on transport errors or malformed output
    async fn summarize(&self, source_text: &str) -> Result<ClassSummary>;

    /// Get the provider name (e.g., "Google Gemini")
    fn provider_name(&self) -> &str;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// Turns raw model output into a validated [`ClassSummary`]
pub struct SummaryParser {
    code_fence: Regex,
}

impl SummaryParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            code_fence: Regex::new(r"```(?:json)?\n?")?,
        })
    }

    pub fn parse(&self, response_text: &str) -> Result<ClassSummary> {
        let json_text = self.code_fence.replace_all(response_text.trim(), "");

        let summary: ClassSummary = serde_json::from_str(json_text.trim())
            .map_err(|e| ClasslensError::MalformedSummary(format!("invalid summary JSON: {}", e)))?;

        summary.validate()?;
        Ok(summary)
    }
}

/// Build the summarization prompt for one class
pub fn build_summary_prompt(source_language: &str, source_text: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Summarize this {} class as a compact JSON object. Keep only the essential method information.\n\n",
        source_language
    ));

    prompt.push_str("Respond with exactly this shape:\n");
    prompt.push_str(r#"{
  "name": "ClassName",
  "methods": [
    {
      "name": "methodName",
      "parameters": ["Type paramName", "Type paramName2"],
      "return_type": "ReturnType",
      "calls": ["OtherClass.methodName"],
      "expects": ["Validation or business rule"]
    }
  ]
}"#);
    prompt.push_str("\n\nRules:\n");
    prompt.push_str("- Include public and global methods; include private ones only when they carry core logic\n");
    prompt.push_str("- Write each parameter as type then name, e.g. \"String accountId\", \"List<Account> accounts\"\n");
    prompt.push_str("- List calls into other classes as \"ClassName.methodName\"\n");
    prompt.push_str("- List validation rules, null checks and business rules under expects\n");
    prompt.push_str("- Keep return types short: \"void\", \"String\", \"List<Account>\"\n");
    prompt.push_str("- Skip plain getters and setters\n\n");

    prompt.push_str(&format!(
        "Source:\n```{}\n{}\n```\n\n",
        source_language.to_lowercase(),
        source_text
    ));
    prompt.push_str("Return only the JSON object with no surrounding explanation.");

    prompt
}
