// src/core/report.rs
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Result;
use super::analytics::CodebaseAnalysis;
use super::dependency::{DependencyGraph, GraphStats};
use super::store::ClassStore;

const OVERVIEW_TEMPLATE: &str = r#"---
project: {{ project }}
generated: {{ generated_at }}
---

# {{ project }} codebase overview

| Metric | Value |
|--------|-------|
| Classes | {{ analysis.total_classes }} |
| Methods | {{ analysis.total_methods }} |
| Call references | {{ analysis.total_calls }} |
| Class dependencies | {{ graph.total_edges }} |
| Classes with business rules | {{ analysis.classes_with_rules | length }} |

## Most complex classes
{% if analysis.complex_classes %}{% for entry in analysis.complex_classes %}
{{ loop.index }}. **{{ entry.name }}** ({{ entry.method_count }} methods)
{%- endfor %}{% else %}
_No classes._
{%- endif %}

## Most connected classes
{% if analysis.most_connected %}{% for entry in analysis.most_connected %}
{{ loop.index }}. **{{ entry.name }}** ({{ entry.connections }} outgoing calls)
{%- endfor %}{% else %}
_No cross-class calls._
{%- endif %}

## Classes with business rules
{% if analysis.classes_with_rules %}{% for name in analysis.classes_with_rules %}
- {{ name }}
{%- endfor %}{% else %}
_None extracted._
{%- endif %}
{% if unresolved %}
## Unresolved references
{% for name in unresolved %}
- {{ name }}
{%- endfor %}
{% endif %}
{%- if cycles %}
## Dependency cycles
{% for cycle in cycles %}
- {{ cycle | join(sep=" → ") }} → {{ cycle | first }}
{%- endfor %}
{% endif %}
"#;

#[derive(Serialize)]
struct ReportContext<'a> {
    project: &'a str,
    generated_at: String,
    analysis: &'a CodebaseAnalysis,
    graph: GraphStats,
    unresolved: Vec<String>,
    cycles: Vec<Vec<String>>,
}

/// Renders a Markdown overview of a class store
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("overview.md", OVERVIEW_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, project: &str, store: &ClassStore, analysis: &CodebaseAnalysis) -> Result<String> {
        let graph = DependencyGraph::build(store.classes());
        let report = ReportContext {
            project,
            generated_at: chrono::Utc::now().to_rfc3339(),
            analysis,
            graph: graph.statistics(),
            unresolved: graph.unresolved_targets(),
            cycles: graph.detect_cycles(),
        };

        let context = Context::from_serialize(&report)?;
        Ok(self.tera.render("overview.md", &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analytics::CodebaseAnalyzer;
    use crate::core::model::MethodRecord;

    #[test]
    fn test_render_overview() {
        let mut store = ClassStore::new();
        store.add_class("AccountController");
        store.add_method("AccountController", MethodRecord::new(
            "show",
            vec![],
            "PageReference",
            vec!["AccountService.load".into(), "Audit.log".into()],
            vec![],
        ));
        store.add_class("AccountService");
        store.add_method("AccountService", MethodRecord::new(
            "load",
            vec![],
            "Account",
            vec!["AccountController.refresh".into()],
            vec!["Id is required".to_string()],
        ));

        let analysis = CodebaseAnalyzer::default().analyze(store.classes());
        let markdown = ReportGenerator::new().unwrap()
            .render("Billing", &store, &analysis)
            .unwrap();

        assert!(markdown.contains("# Billing codebase overview"));
        assert!(markdown.contains("| Classes | 2 |"));
        assert!(markdown.contains("1. **AccountController** (2 outgoing calls)"));
        assert!(markdown.contains("- AccountService"));
        assert!(markdown.contains("## Unresolved references"));
        assert!(markdown.contains("- Audit"));
        assert!(markdown.contains("AccountController → AccountService → AccountController"));
    }

    #[test]
    fn test_render_empty_store() {
        let store = ClassStore::new();
        let analysis = CodebaseAnalyzer::default().analyze(store.classes());
        let markdown = ReportGenerator::new().unwrap()
            .render("Empty", &store, &analysis)
            .unwrap();

        assert!(markdown.contains("_No classes._"));
        assert!(!markdown.contains("## Dependency cycles"));
    }
}
