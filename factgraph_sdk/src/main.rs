//! # factgraph CLI

use clap::Parser;
use factgraph_core::config::EngineConfig;
use factgraph_core::logging::{self, codes, FacadeLogger, LogLevel, LoggingService, StructuredLogger};
use factgraph_core::types::ComponentId;
use factgraph_core::{log_error, log_info, log_success};
use factgraph_sdk::{create_registry, default_targets, evaluate, RunReport};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "factgraph", version, about = "Collect host facts and evaluate rules over them")]
struct Cli {
    /// Filesystem root to collect from
    #[arg(long)]
    root: Option<PathBuf>,

    /// Component to evaluate; repeat for several. Defaults to every rule.
    #[arg(short, long = "component", value_name = "ID")]
    components: Vec<String>,

    /// List registered components and exit
    #[arg(long)]
    list: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit log events as JSON on stderr
    #[arg(long)]
    json_logs: bool,

    /// Minimum log level (error, warning, info, debug)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.collection.root = root.clone();
    }
    if let Some(level) = cli.log_level {
        config.logging.min_level = level;
    }
    config.logging.structured |= cli.json_logs;
    config.validate()?;

    if let Err(e) = init_logging(&config) {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &e);
        return Err(e.into());
    }
    log_info!(
        "factgraph starting",
        "root" => config.collection.root.display()
    );

    let registry = create_registry(&config.collection).map_err(|e| {
        log_error!(
            codes::graph::REGISTRATION_FAILED,
            "Failed to create component registry",
            "error" => e
        );
        e
    })?;

    if cli.list {
        for id in registry.list_components() {
            let metadata = registry.metadata(id)?;
            println!("{:<40} {:<10} {}", id, metadata.kind.as_str(), metadata.description);
        }
        return Ok(());
    }

    let targets: Vec<ComponentId> = if cli.components.is_empty() {
        default_targets(&registry)
    } else {
        cli.components.iter().map(ComponentId::new).collect()
    };

    let broker = evaluate(&registry, &targets, &config.execution).map_err(|e| {
        log_error!(
            codes::graph::UNKNOWN_COMPONENT,
            "Failed to build dependency graph",
            "error" => e
        );
        e
    })?;

    let report = RunReport::from_broker(&broker, &targets);
    println!("{}", report.to_json()?);

    log_success!(
        codes::success::COLLECTION_COMPLETE,
        "Collection complete",
        "results" => report.results.len(),
        "failed" => report.summary.failed
    );
    Ok(())
}

/// Structured output goes straight to stderr; plain output is routed
/// through `env_logger` so `RUST_LOG` filtering still applies.
fn init_logging(config: &EngineConfig) -> Result<(), String> {
    let min_level = config.logging.min_level;

    if config.logging.structured {
        let service = LoggingService::new(Arc::new(StructuredLogger::new(min_level)), min_level);
        return logging::init_global_logging_with_service(Arc::new(service));
    }

    let filter = match min_level {
        LogLevel::Error => "error",
        LogLevel::Warning => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init()
        .map_err(|e| e.to_string())?;

    let service = LoggingService::new(Arc::new(FacadeLogger), min_level);
    logging::init_global_logging_with_service(Arc::new(service))
}
