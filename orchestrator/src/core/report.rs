//! Final run report

use shared::{logging, process_info, process_warn, ItemId, ProcessId};

/// Totals of one image run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Items whose image already existed
    pub skipped: usize,
    pub failed_ids: Vec<ItemId>,
    /// Requested ids absent from the collection
    pub not_found: Vec<ItemId>,
}

impl RunReport {
    /// Re-invocation covering every failed item, if any failed
    pub fn redo_command(&self) -> Option<String> {
        if self.failed_ids.is_empty() {
            return None;
        }
        let ids: Vec<String> = self.failed_ids.iter().map(|id| id.get().to_string()).collect();
        Some(format!("generate-images --redo {}", ids.join(",")))
    }

    pub fn log(&self) {
        let pid = ProcessId::current();
        process_info!(pid, "{}", "=".repeat(50));
        process_info!(pid, "GENERATION COMPLETE");
        process_info!(pid, "Successful: {}", self.succeeded);
        process_info!(pid, "Failed:     {}", self.failed);
        process_info!(pid, "Skipped:    {}", self.skipped);
        if !self.not_found.is_empty() {
            process_warn!(pid, "Not in collection: {}", self.not_found.len());
        }

        if let Some(command) = self.redo_command() {
            process_warn!(pid, "Failed IDs (re-run with: {}):", command);
            for id in &self.failed_ids {
                process_warn!(pid, "  {}", id);
            }
        } else {
            logging::log_success(pid, "All requested images are in place");
        }
    }
}
