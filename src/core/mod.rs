// src/core/mod.rs
mod engine;
mod model;
mod store;
mod dependency;
mod analytics;
mod query;
mod llm;
mod discovery;
mod batch_processor;
mod export;
mod report;

pub use store::ClassStore;
pub use dependency::DependencyGraph;
pub use analytics::CodebaseAnalyzer;
pub use query::{ClassFilter, ClassQuery};
pub use llm::create_summarizer;
pub use discovery::SourceDiscovery;
pub use batch_processor::{BatchProcessor, BatchReport, FileOutcome};
pub use export::{export_document, load_document};
pub use report::ReportGenerator;

// Export the main engine
pub use engine::Engine;
