// src/core/analytics.rs
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use super::model::ClassRecord;

/// Default size of the complexity and connectivity rankings
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassComplexity {
    pub name: String,
    pub method_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassConnection {
    pub name: String,
    /// Outgoing cross-class call references, counted with multiplicity
    pub connections: usize,
}

/// Codebase-wide aggregates computed from one store snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodebaseAnalysis {
    pub total_classes: usize,
    pub total_methods: usize,
    pub total_calls: usize,
    pub complex_classes: Vec<ClassComplexity>,
    /// Every class with at least one cross-class call, in store order
    pub class_connections: Vec<ClassConnection>,
    pub most_connected: Vec<ClassConnection>,
    pub classes_with_rules: Vec<String>,
}

/// Computes [`CodebaseAnalysis`] without mutating the class list
#[derive(Debug, Clone)]
pub struct CodebaseAnalyzer {
    top_n: usize,
}

impl CodebaseAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn analyze(&self, classes: &[ClassRecord]) -> CodebaseAnalysis {
        let total_methods = classes.iter().map(ClassRecord::method_count).sum();
        let total_calls = classes.iter().map(|class| class.calls().count()).sum();

        // Vec::sort_by_key is stable, so equal counts keep store order
        let mut complex_classes: Vec<ClassComplexity> = classes.iter()
            .map(|class| ClassComplexity {
                name: class.name.clone(),
                method_count: class.method_count(),
            })
            .collect();
        complex_classes.sort_by_key(|entry| std::cmp::Reverse(entry.method_count));
        complex_classes.truncate(self.top_n);

        let class_connections = Self::count_connections(classes);

        let mut most_connected = class_connections.clone();
        most_connected.sort_by_key(|entry| std::cmp::Reverse(entry.connections));
        most_connected.truncate(self.top_n);

        let classes_with_rules = classes.iter()
            .filter(|class| class.has_rules())
            .map(|class| class.name.clone())
            .collect();

        CodebaseAnalysis {
            total_classes: classes.len(),
            total_methods,
            total_calls,
            complex_classes,
            class_connections,
            most_connected,
            classes_with_rules,
        }
    }

    /// Per-class edge counts keyed by name; records sharing a name accumulate
    /// into the entry of the first one.
    fn count_connections(classes: &[ClassRecord]) -> Vec<ClassConnection> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut connections: Vec<ClassConnection> = Vec::new();

        for class in classes {
            let count = class.calls()
                .filter(|call| call.external_target(&class.name).is_some())
                .count();
            if count == 0 {
                continue;
            }

            match positions.get(class.name.as_str()) {
                Some(&position) => connections[position].connections += count,
                None => {
                    positions.insert(&class.name, connections.len());
                    connections.push(ClassConnection {
                        name: class.name.clone(),
                        connections: count,
                    });
                }
            }
        }

        connections
    }
}

impl Default for CodebaseAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}
