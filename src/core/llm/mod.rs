//! LLM integration for summarizing source classes
//!
//! A summarizer turns raw class source text into a [`ClassSummary`]: method
//! signatures, outgoing `Class.method` calls and inferred business rules.
//! Providers are selected from configuration through [`create_summarizer`].

mod summarizer;
mod providers;

pub use summarizer::{ClassSummarizer, ClassSummary};
pub use providers::create_summarizer;
