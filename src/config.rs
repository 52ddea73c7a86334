use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ClasslensError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Summarization provider (gemini, openai)
    pub provider: String,

    /// Model name (e.g., "gemini-2.0-flash", "gpt-4o-mini")
    pub model: String,

    /// API key; falls back to the provider's environment variable
    pub api_key: Option<String>,

    /// Base URL override for proxies or compatible endpoints
    pub base_url: Option<String>,

    /// Maximum tokens for summary responses
    pub max_tokens: Option<u32>,

    /// Temperature for summary responses (0.0 to 1.0)
    pub temperature: Option<f32>,

    /// Language label used in the summarization prompt
    pub source_language: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Source file discovery
    pub discovery: DiscoveryConfig,

    /// LLM summarization settings
    pub llm: LlmConfig,

    /// Batch processing and analytics settings
    pub processing: ProcessingConfig,

    /// Export settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Inputs used by `process` when none are given on the command line
    pub source_dirs: Vec<PathBuf>,

    /// Directory exported documents are written to
    pub export_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Accepted file extensions, without the leading dot
    pub file_extensions: Vec<String>,

    /// Maximum file size to summarize (in bytes)
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Pause between summarization requests (in milliseconds)
    pub request_delay_ms: u64,

    /// Number of entries in the complexity and connectivity rankings
    pub top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix of the date-stamped export filename
    pub export_prefix: String,

    /// Pretty-print exported JSON
    pub pretty: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: Some(2048),
            temperature: Some(0.1),
            source_language: "Apex".to_string(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Unnamed Project".to_string(),
            source_dirs: vec![PathBuf::from("src")],
            export_dir: PathBuf::from("."),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            file_extensions: vec!["cls".to_string(), "apex".to_string()],
            max_file_size: 1024 * 1024, // 1MB
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 500,
            top_n: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_prefix: "apex_class_summaries".to_string(),
            pretty: true,
        }
    }
}

impl LlmConfig {
    /// Environment variable consulted when no API key is configured
    pub fn api_key_env_var(&self) -> &'static str {
        match self.provider.as_str() {
            "openai" => "OPENAI_API_KEY",
            _ => "GEMINI_API_KEY",
        }
    }

    /// Resolve the API key: explicit config first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(self.api_key_env_var()).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ClasslensError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClasslensError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = [
                    "Classlens.toml",
                    "classlens.toml",
                    ".classlens.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
