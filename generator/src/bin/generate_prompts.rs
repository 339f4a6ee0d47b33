//! Entry point for the collection generator binary

use std::path::PathBuf;

use clap::Parser;

use generator::{
    generate_collection, CollectionSummary, CollectionWriter, GenerationConfig, GeneratorResult, TraitRegistry,
    WeightTable,
};
use shared::{logging, process_debug, process_info, OutputLayout, ProcessId};

/// Generates the Chibi Agent collection: unique trait sets, prompts and metadata
#[derive(Parser)]
#[command(name = "generate-prompts")]
#[command(about = "Generates unique rarity-weighted trait combinations and their image prompts")]
pub struct Args {
    /// Number of items in the collection
    #[arg(long, default_value_t = GenerationConfig::DEFAULT_COUNT)]
    pub count: usize,

    /// Seed for the random source; the same seed reproduces the same collection
    #[arg(long, default_value_t = GenerationConfig::DEFAULT_SEED)]
    pub seed: u64,

    /// Total sampling attempts allowed across the whole run
    #[arg(long, default_value_t = GenerationConfig::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u64,

    /// Rarity weight table as `extras:count` pairs
    #[arg(long, default_value = "0:400,1:760,2:600,3:200,4:40")]
    pub weights: WeightTable,

    /// JSON file overriding trait pools by kind
    #[arg(long)]
    pub traits: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = OutputLayout::DEFAULT_ROOT)]
    pub output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> GeneratorResult<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize process ID singleton for the generator
    ProcessId::init_generator();

    // Initialize tracing with the requested log level
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "collection generator");

    // Load trait pools, built-in unless a catalog file overrides them
    let registry = match &args.traits {
        Some(path) => {
            process_info!(ProcessId::current(), "📂 Loading trait pools from {}", path.display());
            TraitRegistry::from_json_file(path).await?
        }
        None => TraitRegistry::chibi_agents(),
    };
    registry.validate()?;

    let config = GenerationConfig::new(args.count, args.weights)
        .with_seed(args.seed)
        .with_max_attempts(args.max_attempts);
    process_debug!(
        ProcessId::current(),
        "Count: {}, Seed: {}, Max attempts: {}, Weights: {}",
        config.count,
        config.seed,
        config.max_attempts,
        config.weights
    );

    // Sample the collection
    let collection = match generate_collection(&registry, &config) {
        Ok(collection) => collection,
        Err(e) => {
            logging::log_error(ProcessId::current(), "Generation", &e);
            return Err(e);
        }
    };

    // Write collection, prompts and metadata
    let writer = CollectionWriter::new(OutputLayout::new(&args.output));
    writer.write(&collection.records).await?;

    // Report the realized distribution
    let summary = CollectionSummary::from_collection(&collection);
    summary.log(&collection.records);

    logging::log_success(
        ProcessId::current(),
        &format!("Generated {} unique agents in {}", summary.total, args.output.display()),
    );
    Ok(())
}
