// src/core/engine.rs
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::Result;
use tracing::{info, warn, debug};

use crate::config::Config;
use crate::error::ClasslensError;
use super::{
    SourceDiscovery, BatchProcessor, BatchReport, FileOutcome, CodebaseAnalyzer, ReportGenerator,
    ClassStore, ClassFilter, ClassQuery, DependencyGraph, create_summarizer,
    export_document, load_document
};

/// Main orchestration engine: owns the class store and wires the collaborators
pub struct Engine {
    config: Config,
    discovery: SourceDiscovery,
    batch_processor: BatchProcessor,
    analyzer: CodebaseAnalyzer,
    report_generator: ReportGenerator,
    store: ClassStore,
}

impl Engine {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        debug!("Loaded configuration: {:?}", config);

        let discovery = SourceDiscovery::new(&config.discovery);
        let batch_processor = BatchProcessor::new(
            Duration::from_millis(config.processing.request_delay_ms)
        );
        let analyzer = CodebaseAnalyzer::new(config.processing.top_n);
        let report_generator = ReportGenerator::new()?;

        Ok(Self {
            config,
            discovery,
            batch_processor,
            analyzer,
            report_generator,
            store: ClassStore::new(),
        })
    }

    pub fn store(&self) -> &ClassStore {
        &self.store
    }

    /// Write a default configuration file into `path` (or the current directory)
    pub fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target_dir = match path {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let config_path = target_dir.join("classlens.toml");

        if config_path.exists() {
            return Err(ClasslensError::Config(
                format!("{} already exists", config_path.display())
            ).into());
        }

        std::fs::create_dir_all(&target_dir)?;
        Config::default().save(&config_path)?;
        info!("Wrote default configuration to {}", config_path.display());
        Ok(())
    }

    /// Summarize every discovered source file and export the resulting document.
    ///
    /// Input problems (no files, no credential) abort before the store is touched.
    pub async fn process(
        &mut self,
        inputs: Vec<PathBuf>,
        output: Option<PathBuf>,
        api_key: Option<String>,
    ) -> Result<BatchReport> {
        let inputs = if inputs.is_empty() {
            self.config.project.source_dirs.clone()
        } else {
            inputs
        };

        let files = self.discovery.discover(&inputs)?;
        if files.is_empty() {
            return Err(ClasslensError::Input(
                "No source files selected for processing".to_string()
            ).into());
        }

        let summarizer = create_summarizer(&self.config.llm, api_key.as_deref())?;

        self.store.clear();
        let report = self.batch_processor
            .process(&files, summarizer.as_ref(), &mut self.store)
            .await;

        for outcome in &report.outcomes {
            match outcome {
                FileOutcome::Processed { path, class_name, method_count } => {
                    println!("  ✓ {} -> {} ({} methods)", path.display(), class_name, method_count);
                }
                FileOutcome::Failed { path, error } => {
                    println!("  ✗ {}: {}", path.display(), error);
                }
            }
        }

        let export_dir = output.unwrap_or_else(|| self.config.project.export_dir.clone());
        let path = export_document(&self.store.to_document(), &export_dir, &self.config.output)?;
        println!(
            "Generated summaries for {} classes ({} of {} files failed) -> {}",
            self.store.len(),
            report.failed_count(),
            files.len(),
            path.display()
        );

        Ok(report)
    }

    /// Replace the store with a previously exported document
    pub fn load(&mut self, document: &Path) -> Result<()> {
        let document = load_document(document)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", document.display(), e))?;
        self.store.load_document(document);
        if self.store.is_empty() {
            warn!("Document contains no classes");
        } else {
            info!("Loaded {} classes", self.store.len());
        }
        Ok(())
    }

    pub fn stats(&self, json: bool) -> Result<()> {
        let analysis = self.analyzer.analyze(self.store.classes());
        let graph = DependencyGraph::build(self.store.classes());
        let graph_stats = graph.statistics();

        if json {
            let value = serde_json::json!({
                "analysis": analysis,
                "graph": graph_stats,
                "unresolved": graph.unresolved_targets(),
                "cycles": graph.detect_cycles(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("Classes:            {}", analysis.total_classes);
        println!("Methods:            {}", analysis.total_methods);
        println!("Call references:    {}", analysis.total_calls);
        println!("Class dependencies: {}", graph_stats.total_edges);
        println!("Unresolved targets: {}", graph_stats.unresolved_targets);
        println!("Dependency cycles:  {}", graph_stats.cycles);

        println!("\nMost complex classes:");
        for entry in &analysis.complex_classes {
            println!("  {:<40} {} methods", entry.name, entry.method_count);
        }

        println!("\nMost connected classes:");
        for entry in &analysis.most_connected {
            println!("  {:<40} {} calls", entry.name, entry.connections);
        }

        println!("\nClasses with business rules: {}", analysis.classes_with_rules.len());
        for name in &analysis.classes_with_rules {
            println!("  {}", name);
        }

        Ok(())
    }

    pub fn search(&self, term: Option<&str>, filter: ClassFilter) -> Result<()> {
        let query = ClassQuery::new(term, filter);
        let found = query.apply(self.store.classes());

        println!("{} classes found", found.len());
        for class in found {
            println!("  {} ({} methods)", class.name, class.method_count());
        }
        Ok(())
    }

    pub fn deps(&self, class_name: &str) -> Result<()> {
        let graph = DependencyGraph::build(self.store.classes());
        if !graph.contains(class_name) {
            warn!("Class {} is not in the document", class_name);
        }
        let deps = graph.dependencies(class_name);

        println!("{}", class_name);
        println!("  Outgoing ({}):", deps.outgoing.len());
        for target in &deps.outgoing {
            let marker = if graph.contains(target) { "" } else { " (unresolved)" };
            println!("    → {}{}", target, marker);
        }
        println!("  Incoming ({}):", deps.incoming.len());
        for caller in &deps.incoming {
            println!("    ← {}", caller);
        }
        Ok(())
    }

    pub fn show(&self, class_name: &str) -> Result<()> {
        let Some(class) = self.store.get(class_name) else {
            println!("Class {} not found", class_name);
            return Ok(());
        };

        println!("{} ({} methods)", class.name, class.method_count());
        for method in &class.methods {
            println!("\n  {}({}) -> {}", method.name, method.parameters.join(", "), method.return_type);
            for call in &method.calls {
                let marker = if call.target_class().is_none() { " (malformed)" } else { "" };
                println!("    calls   {}{}", call.raw(), marker);
            }
            for rule in &method.expects {
                println!("    expects {}", rule);
            }
        }
        Ok(())
    }

    pub fn report(&self, output: Option<PathBuf>) -> Result<()> {
        let analysis = self.analyzer.analyze(self.store.classes());
        let markdown = self.report_generator.render(
            &self.config.project.name,
            &self.store,
            &analysis,
        )?;

        match output {
            Some(path) => {
                std::fs::write(&path, markdown)?;
                info!("Wrote report to {}", path.display());
            }
            None => print!("{}", markdown),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.llm.api_key = None;
        config.llm.provider = "unconfigured".to_string();
        config
    }

    #[tokio::test]
    async fn test_process_without_files_aborts_before_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = Engine::with_config(offline_config()).unwrap();
        engine.store.add_class("Existing");

        let result = engine.process(vec![dir.path().to_path_buf()], None, Some("key".to_string())).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No source files"));
        assert!(engine.store().get("Existing").is_some());
    }

    #[tokio::test]
    async fn test_process_with_bad_provider_aborts_before_mutation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.cls"), "public class A {}").unwrap();
        let mut engine = Engine::with_config(offline_config()).unwrap();
        engine.store.add_class("Existing");

        let result = engine.process(vec![dir.path().to_path_buf()], None, Some("key".to_string())).await;

        assert!(result.is_err());
        assert_eq!(engine.store().len(), 1);
    }

    #[test]
    fn test_init_writes_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Engine::with_config(Config::default()).unwrap();

        engine.init(Some(dir.path().to_path_buf())).unwrap();
        assert!(Config::load(dir.path().join("classlens.toml")).is_ok());
        assert!(engine.init(Some(dir.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_load_replaces_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"classes": [{"name": "A"}, {"name": "B"}]}"#).unwrap();

        let mut engine = Engine::with_config(Config::default()).unwrap();
        engine.store.add_class("Stale");
        engine.load(&path).unwrap();

        let names: Vec<_> = engine.store().classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_load_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, r#"{"classes": []}"#).unwrap();

        let mut engine = Engine::with_config(Config::default()).unwrap();
        engine.store.add_class("Stale");
        engine.load(&path).unwrap();

        assert!(engine.store().is_empty());
    }
}
