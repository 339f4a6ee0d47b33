//! Replaces the placeholder content identifier in every metadata document

use std::path::PathBuf;

use clap::Parser;

use generator::{patch_placeholder, GeneratorResult, CID_PLACEHOLDER};
use shared::{logging, process_info, process_warn, OutputLayout, ProcessId};

#[derive(Parser)]
#[command(name = "update-metadata-cid")]
#[command(about = "Points metadata image links at the pinned image folder")]
pub struct Args {
    /// Content identifier of the pinned image folder
    pub cid: String,

    /// Output directory holding `metadata/`
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

    // Initialize process ID singleton and tracing
    ProcessId::init_patcher();
    logging::init_tracing(Some(&args.log_level));

    // Patch every metadata document in place
    let layout = OutputLayout::new(&args.output);
    let report = match patch_placeholder(&layout.metadata_dir(), &args.cid).await {
        Ok(report) => report,
        Err(e) => {
            logging::log_error(ProcessId::current(), "Metadata patch", &e);
            return Err(e);
        }
    };

    process_info!(
        ProcessId::current(),
        "Scanned {} metadata files, updated {}",
        report.scanned,
        report.updated
    );
    if report.updated == 0 {
        process_warn!(
            ProcessId::current(),
            "No file contained {}; metadata may already point at a CID",
            CID_PLACEHOLDER
        );
    } else {
        logging::log_success(
            ProcessId::current(),
            &format!("Updated {} metadata files to ipfs://{}/", report.updated, args.cid.trim()),
        );
    }
    Ok(())
}
