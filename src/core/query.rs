// src/core/query.rs
use std::fmt;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::ClassRecord;

/// Naming-convention category filter; a heuristic, not semantic classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassFilter {
    #[default]
    All,
    Controllers,
    Services,
    Utilities,
    Tests,
}

impl ClassFilter {
    pub fn matches(&self, class_name: &str) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Controllers => class_name.contains("Controller"),
            ClassFilter::Services => class_name.contains("Service"),
            ClassFilter::Utilities => class_name.contains("Util"),
            ClassFilter::Tests => class_name.starts_with("Test_"),
        }
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ClassFilter::All => "all",
            ClassFilter::Controllers => "controllers",
            ClassFilter::Services => "services",
            ClassFilter::Utilities => "utilities",
            ClassFilter::Tests => "tests",
        };
        f.write_str(label)
    }
}

/// Search term plus category filter; search narrows first, then the filter
#[derive(Debug, Clone, Default)]
pub struct ClassQuery {
    search_term: Option<String>,
    filter: ClassFilter,
}

impl ClassQuery {
    pub fn new(search_term: Option<&str>, filter: ClassFilter) -> Self {
        Self {
            search_term: search_term
                .filter(|term| !term.is_empty())
                .map(str::to_lowercase),
            filter,
        }
    }

    pub fn apply<'a>(&self, classes: &'a [ClassRecord]) -> Vec<&'a ClassRecord> {
        classes.iter()
            .filter(|class| self.matches_search(class))
            .filter(|class| self.filter.matches(&class.name))
            .collect()
    }

    /// Case-insensitive substring match on the class name or any method name
    fn matches_search(&self, class: &ClassRecord) -> bool {
        let Some(term) = &self.search_term else {
            return true;
        };

        class.name.to_lowercase().contains(term.as_str())
            || class.methods.iter().any(|method| method.name.to_lowercase().contains(term.as_str()))
    }
}
