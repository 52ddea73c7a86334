// src/core/dependency.rs
use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use super::model::ClassRecord;

/// Outgoing and incoming class-level dependencies of one class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDependencies {
    pub outgoing: Vec<String>,
    pub incoming: Vec<String>,
}

/// Class-level reference graph derived from method call lists.
///
/// Built once per store snapshot; rebuild after any store mutation. Edge lists
/// are distinct and kept in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Distinct stored class names, in store order
    classes: Vec<String>,
    known: HashSet<String>,
    /// Forward adjacency (caller -> referenced classes, resolvable or not)
    adjacency_list: HashMap<String, Vec<String>>,
    /// Reverse adjacency (stored class -> stored classes that reference it)
    reverse_adjacency: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn build(classes: &[ClassRecord]) -> Self {
        let mut graph = Self::default();

        for class in classes {
            if graph.known.insert(class.name.clone()) {
                graph.classes.push(class.name.clone());
            }
        }

        for class in classes {
            for target in class.calls().filter_map(|call| call.external_target(&class.name)) {
                push_distinct(
                    graph.adjacency_list.entry(class.name.clone()).or_default(),
                    target,
                );

                if graph.known.contains(target) {
                    push_distinct(
                        graph.reverse_adjacency.entry(target.to_string()).or_default(),
                        &class.name,
                    );
                }
            }
        }

        graph
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.known.contains(class_name)
    }

    /// Distinct classes referenced by `class_name`, excluding itself
    pub fn outgoing(&self, class_name: &str) -> &[String] {
        self.adjacency_list.get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Distinct stored classes that reference `class_name`
    pub fn incoming(&self, class_name: &str) -> &[String] {
        self.reverse_adjacency.get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Both directions for a stored class; unknown classes yield empty lists
    pub fn dependencies(&self, class_name: &str) -> ClassDependencies {
        if !self.contains(class_name) {
            return ClassDependencies::default();
        }

        ClassDependencies {
            outgoing: self.outgoing(class_name).to_vec(),
            incoming: self.incoming(class_name).to_vec(),
        }
    }

    /// Referenced class names with no stored record, in first-seen order
    pub fn unresolved_targets(&self) -> Vec<String> {
        let mut unresolved = Vec::new();
        for class in &self.classes {
            for target in self.outgoing(class) {
                if !self.contains(target) {
                    push_distinct(&mut unresolved, target);
                }
            }
        }
        unresolved
    }

    /// Detect class-level cycles using DFS over resolvable edges
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut visited = HashSet::new();

        for class in &self.classes {
            if !visited.contains(class.as_str()) {
                self.dfs_cycle_detection(class, &mut visited, &mut cycles);
            }
        }

        cycles
    }

    /// Iterative DFS from `root`; reference chains can be arbitrarily long
    fn dfs_cycle_detection<'a>(
        &'a self,
        root: &'a str,
        visited: &mut HashSet<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        let mut rec_stack = HashSet::new();
        // Current path: (class, index of the next outgoing edge to follow)
        let mut stack: Vec<(&'a str, usize)> = vec![(root, 0)];
        visited.insert(root);
        rec_stack.insert(root);

        while let Some(frame) = stack.last_mut() {
            let (node, index) = *frame;
            frame.1 += 1;

            let Some(callee) = self.outgoing(node).get(index) else {
                rec_stack.remove(node);
                stack.pop();
                continue;
            };
            let callee = callee.as_str();
            if !self.contains(callee) {
                continue;
            }

            if visited.insert(callee) {
                rec_stack.insert(callee);
                stack.push((callee, 0));
            } else if rec_stack.contains(callee) {
                if let Some(cycle_start) = stack.iter().position(|(n, _)| *n == callee) {
                    cycles.push(stack[cycle_start..].iter().map(|(n, _)| n.to_string()).collect());
                }
            }
        }
    }

    pub fn statistics(&self) -> GraphStats {
        GraphStats {
            total_classes: self.classes.len(),
            total_edges: self.adjacency_list.values().map(Vec::len).sum(),
            unresolved_targets: self.unresolved_targets().len(),
            cycles: self.detect_cycles().len(),
            max_in_degree: self.classes.iter().map(|c| self.incoming(c).len()).max().unwrap_or(0),
            max_out_degree: self.classes.iter().map(|c| self.outgoing(c).len()).max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_classes: usize,
    pub total_edges: usize,
    pub unresolved_targets: usize,
    pub cycles: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

fn push_distinct(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
