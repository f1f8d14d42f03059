//! Command line entry point for the curator
//!
//! Optionally analyses one document into the case, then runs a single
//! optimization and prints the report as JSON.

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use curator::{
    services::{JsonItemStore, OpenAiOracle},
    CuratorConfig, DocumentGenerator, Optimizer, OptimizerSettings, TextDocument,
};
use shared::{logging, service_debug, service_info, CaseName, ServiceId};

/// Consolidates the dashboard items of a case
#[derive(Parser)]
#[command(name = "curator")]
#[command(about = "Generates and consolidates dashboard items with LLM function calling")]
pub struct Args {
    /// Case to work on
    #[arg(long)]
    pub case: String,

    /// Storage root (overrides CURATOR_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Iteration cap for the control loop (overrides CURATOR_MAX_ITERATIONS)
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Model name (overrides CURATOR_MODEL)
    #[arg(long)]
    pub model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Text document to analyse into the case before optimizing
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Research question to steer document analysis (repeatable)
    #[arg(long = "research-question")]
    pub research_questions: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ServiceId::init_curator();
    logging::init_tracing(Some(&args.log_level));

    let mut config = CuratorConfig::from_env()?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(model) = args.model {
        config.model = model;
    }

    logging::log_startup(ServiceId::current(), &format!("curator for case '{}'", args.case));
    service_debug!(
        ServiceId::current(),
        "Model: {}, data dir: {}, max iterations: {}",
        config.model,
        config.data_dir.display(),
        config.max_iterations
    );

    let case = CaseName::new(args.case);
    let store = Arc::new(JsonItemStore::new(config.data_dir.clone()));
    let oracle = Arc::new(OpenAiOracle::from_config(&config)?);

    if let Some(path) = args.document {
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read document {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let generator = DocumentGenerator::new(store.clone(), oracle.clone(), config.generation);
        let document = TextDocument {
            filename,
            content,
            research_questions: args.research_questions,
        };
        let items = generator.generate(&case, &document).await?;
        service_info!(ServiceId::current(), "📄 Added {} items from {}", items.len(), document.filename);
    }

    let optimizer = Optimizer::new(
        store,
        oracle,
        OptimizerSettings {
            max_iterations: config.max_iterations,
            sampling: config.optimization,
        },
    );
    let report = match optimizer.optimize(&case).await {
        Ok(report) => report,
        Err(e) => {
            println!("{}", json!({"success": false, "error": e.to_string()}));
            logging::log_error(ServiceId::current(), "Optimization", &e);
            return Err(e.into());
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    logging::log_success(ServiceId::current(), &report.message);
    Ok(())
}
