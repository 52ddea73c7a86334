use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::{ClassFilter, Engine};

#[derive(Parser)]
#[command(name = "classlens")]
#[command(about = "Searchable class model and dependency analytics for AI-summarized codebases")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Summarize class sources and export the codebase document
    Process {
        /// Source files or directories (defaults to project.source_dirs)
        inputs: Vec<PathBuf>,

        /// Directory the dated export is written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// API key for the summarization provider
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show codebase totals and rankings
    Stats {
        /// Exported codebase document
        document: PathBuf,

        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Search classes by class or method name
    Search {
        /// Exported codebase document
        document: PathBuf,

        /// Case-insensitive substring to match
        #[arg(short, long)]
        term: Option<String>,

        /// Naming-convention category
        #[arg(short, long, value_enum, default_value_t = ClassFilter::All)]
        filter: ClassFilter,
    },

    /// List outgoing and incoming dependencies of a class
    Deps {
        /// Exported codebase document
        document: PathBuf,

        /// Class name (case-sensitive)
        class: String,
    },

    /// Show the methods, calls and rules of a class
    Show {
        /// Exported codebase document
        document: PathBuf,

        /// Class name (case-sensitive)
        class: String,
    },

    /// Render a Markdown overview report
    Report {
        /// Exported codebase document
        document: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn execute(self, mut engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path } => {
                engine.init(path)
            }
            Commands::Process { inputs, output, api_key } => {
                engine.process(inputs, output, api_key).await.map(|_| ())
            }
            Commands::Stats { document, json } => {
                engine.load(&document)?;
                engine.stats(json)
            }
            Commands::Search { document, term, filter } => {
                engine.load(&document)?;
                engine.search(term.as_deref(), filter)
            }
            Commands::Deps { document, class } => {
                engine.load(&document)?;
                engine.deps(&class)
            }
            Commands::Show { document, class } => {
                engine.load(&document)?;
                engine.show(&class)
            }
            Commands::Report { document, output } => {
                engine.load(&document)?;
                engine.report(output)
            }
        }
    }
}
