//! Entry point for the image generation binary

use std::path::PathBuf;

use clap::Parser;

use orchestrator::{
    pacing_delay, ApiKeySource, CollectionIndex, OrchestratorResult, RealApiKeySource, RealPacer, RunOrchestrator,
    RunPlan,
};
use producer::{FalQueueClient, JobPipeline, PipelineConfig, RealArtifactStore};
use shared::{logging, process_debug, OutputLayout, ProcessId};

/// Generates collection images through the fal.ai queue
#[derive(Parser)]
#[command(name = "generate-images")]
#[command(about = "Generates one image per collection item via the fal.ai queue API")]
pub struct Args {
    /// First token ID
    #[arg(long, default_value_t = 1)]
    pub start: u32,

    /// Last token ID
    #[arg(long, default_value_t = 2000)]
    pub end: u32,

    /// Comma-separated token IDs to regenerate, e.g. 3,17,42
    #[arg(long)]
    pub redo: Option<String>,

    /// Delay between requests in seconds
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,

    /// fal.ai model ID
    #[arg(long, default_value = PipelineConfig::DEFAULT_MODEL_ID)]
    pub model: String,

    /// Queue base URL
    #[arg(long, default_value = PipelineConfig::DEFAULT_QUEUE_BASE)]
    pub queue_url: String,

    /// Output directory holding `full_collection.json` and `images/`
    #[arg(long, default_value = OutputLayout::DEFAULT_ROOT)]
    pub output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> OrchestratorResult<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize process ID singleton for the image runner
    ProcessId::init_orchestrator();

    // Initialize tracing with the requested log level
    logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "image generation run");

    if let Err(e) = run(args).await {
        logging::log_error(ProcessId::current(), "Image run", &e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> OrchestratorResult<()> {
    // Validate arguments before touching credentials or files
    let delay = pacing_delay(args.delay)?;
    let plan = RunPlan::from_args(args.start, args.end, args.redo.as_deref())?;

    // Credential check happens before any network call
    let api_key = RealApiKeySource::new().get_api_key().await?;

    // Load the collection written by generate-prompts
    let layout = OutputLayout::new(&args.output);
    let collection = CollectionIndex::load(&layout.collection_path()).await?;
    process_debug!(ProcessId::current(), "Loaded {} collection entries", collection.len());

    // Initialize services
    let config = PipelineConfig::default()
        .with_queue_base(args.queue_url)
        .with_model_id(args.model);
    let client = FalQueueClient::new(api_key, &config);
    let store = RealArtifactStore::new(layout);
    store.ensure_dir().await?;

    // Create orchestrator with dependency injection
    let orchestrator = RunOrchestrator::new(JobPipeline::new(client, store, config), collection, RealPacer, delay);

    // Per-item failures end up in the report, never in the exit code
    let report = orchestrator.run(&plan).await;
    report.log();
    Ok(())
}
