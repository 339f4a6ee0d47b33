//! Run orchestrator
//!
//! Resolves a [`RunPlan`] against the collection, skips items whose image is
//! already in place, then feeds the rest through the job pipeline one at a
//! time with a fixed pause between items.

use std::time::Duration;

use producer::{ArtifactStore, ItemOutcome, JobPipeline, JobService};
use shared::{logging, process_debug, process_info, process_warn, ItemId, ProcessId};

use crate::core::{CollectionIndex, RunPlan, RunReport};
use crate::error::OrchestratorError;
use crate::traits::Pacer;

/// Sequential image run over a loaded collection
pub struct RunOrchestrator<S: JobService, A: ArtifactStore, P: Pacer> {
    pipeline: JobPipeline<S, A>,
    collection: CollectionIndex,
    pacer: P,
    delay: Duration,
}

impl<S: JobService, A: ArtifactStore, P: Pacer> RunOrchestrator<S, A, P> {
    pub fn new(pipeline: JobPipeline<S, A>, collection: CollectionIndex, pacer: P, delay: Duration) -> Self {
        Self {
            pipeline,
            collection,
            pacer,
            delay,
        }
    }

    /// Execute `plan`; per-item failures end up in the report, never as errors
    pub async fn run(&self, plan: &RunPlan) -> RunReport {
        let pid = ProcessId::current();
        let mut report = RunReport::default();

        if plan.force {
            process_info!(pid, "REDO mode: regenerating {} specific images", plan.ids.len());
        } else if let (Some(first), Some(last)) = (plan.ids.first(), plan.ids.last()) {
            process_info!(
                pid,
                "Generating images {} to {} ({} total)",
                first,
                last,
                plan.ids.len()
            );
        }

        let pending = self.resolve(plan, &mut report).await;

        process_info!(pid, "Already completed: {}", report.skipped);
        process_info!(pid, "To generate: {}", pending.len());
        process_info!(pid, "Model: {}", self.pipeline.config().model_id);
        process_info!(pid, "Delay between requests: {:?}", self.delay);

        if pending.is_empty() {
            logging::log_success(pid, "Nothing to generate, all images already exist");
            return report;
        }

        let total = pending.len();
        for (index, item_id) in pending.iter().enumerate() {
            let Some(entry) = self.collection.get(*item_id) else {
                continue;
            };
            logging::log_progress(
                pid,
                &format!("[{}/{}]", index + 1, total),
                &format!("{} ({})", item_id, entry.rarity.as_deref().unwrap_or("?")),
            );

            match self.pipeline.process(*item_id, &entry.prompt, plan.force).await {
                ItemOutcome::Completed { attempts } => {
                    report.succeeded += 1;
                    process_info!(pid, "{} OK after {} attempt(s)", item_id, attempts);
                }
                ItemOutcome::AlreadyComplete => {
                    report.skipped += 1;
                    process_debug!(pid, "{} appeared on disk meanwhile", item_id);
                }
                ItemOutcome::Failed { attempts, last_error } => {
                    report.failed += 1;
                    report.failed_ids.push(*item_id);
                    process_warn!(pid, "{} FAILED after {} attempt(s): {}", item_id, attempts, last_error);
                }
            }

            if index + 1 < total {
                self.pacer.pause(self.delay).await;
            }
        }

        report
    }

    /// Ids to send through the pipeline, after dropping unknown ids and
    /// counting existing artifacts as skipped
    async fn resolve(&self, plan: &RunPlan, report: &mut RunReport) -> Vec<ItemId> {
        let mut pending = Vec::with_capacity(plan.ids.len());
        for item_id in &plan.ids {
            if self.collection.get(*item_id).is_none() {
                process_warn!(
                    ProcessId::current(),
                    "{}",
                    OrchestratorError::ItemNotFound { item_id: *item_id }
                );
                report.not_found.push(*item_id);
                continue;
            }
            if !plan.force && self.pipeline.store().is_complete(*item_id).await {
                report.skipped += 1;
                continue;
            }
            pending.push(*item_id);
        }
        pending
    }
}
