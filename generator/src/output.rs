//! Collection output: descriptor, prompt list, metadata documents and the
//! generation summary

use std::collections::BTreeMap;

use shared::{process_info, CollectionRecord, OutputLayout, ProcessId, RarityTier, TraitKind};
use tokio::fs;

use crate::combination::GeneratedCollection;
use crate::error::GeneratorResult;
use crate::metadata::build_metadata;

/// Writes a generated collection under an [`OutputLayout`]
pub struct CollectionWriter {
    layout: OutputLayout,
}

impl CollectionWriter {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Write `full_collection.json`, `prompts_only.txt` and one metadata
    /// document per item; also creates the empty images directory
    pub async fn write(&self, records: &[CollectionRecord]) -> GeneratorResult<()> {
        fs::create_dir_all(self.layout.metadata_dir()).await?;
        fs::create_dir_all(self.layout.images_dir()).await?;

        let collection = serde_json::to_string_pretty(records)?;
        fs::write(self.layout.collection_path(), collection).await?;

        let mut prompts = String::new();
        for record in records {
            prompts.push_str(&record.prompt);
            prompts.push('\n');
        }
        fs::write(self.layout.prompts_path(), prompts).await?;

        for record in records {
            let metadata = serde_json::to_string_pretty(&build_metadata(record))?;
            fs::write(self.layout.metadata_path(record.token_id), metadata).await?;
        }

        process_info!(
            ProcessId::current(),
            "💾 Wrote {} records to {}",
            records.len(),
            self.layout.root().display()
        );
        Ok(())
    }
}

/// Distribution figures reported after generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub total: usize,
    pub unique: usize,
    pub attempts: u64,
    pub rarity_counts: BTreeMap<RarityTier, usize>,
    pub extras_counts: BTreeMap<u8, usize>,
    /// Items carrying each optional trait
    pub optional_counts: BTreeMap<TraitKind, usize>,
}

impl CollectionSummary {
    pub fn from_collection(collection: &GeneratedCollection) -> Self {
        let mut rarity_counts = BTreeMap::new();
        let mut extras_counts = BTreeMap::new();
        let mut optional_counts: BTreeMap<TraitKind, usize> = TraitKind::OPTIONAL.iter().map(|k| (*k, 0)).collect();

        for record in &collection.records {
            *rarity_counts.entry(record.rarity).or_insert(0) += 1;
            *extras_counts.entry(record.num_extras).or_insert(0) += 1;
            for kind in TraitKind::OPTIONAL {
                if record.traits.is_present(kind) {
                    *optional_counts.entry(kind).or_insert(0) += 1;
                }
            }
        }

        Self {
            total: collection.records.len(),
            unique: collection.unique,
            attempts: collection.attempts,
            rarity_counts,
            extras_counts,
            optional_counts,
        }
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// Emit the summary plus the first few prompts through tracing
    pub fn log(&self, records: &[CollectionRecord]) {
        let pid = ProcessId::current();
        process_info!(pid, "{}", "=".repeat(60));
        process_info!(pid, "CHIBI AGENT COLLECTION: GENERATION COMPLETE");
        process_info!(pid, "Total agents generated: {}", self.total);
        process_info!(pid, "Unique combinations verified: {}", self.unique);
        process_info!(pid, "Generation attempts: {}", self.attempts);

        process_info!(pid, "RARITY DISTRIBUTION:");
        for tier in RarityTier::ALL {
            let count = self.rarity_counts.get(&tier).copied().unwrap_or(0);
            process_info!(pid, "  {:12}: {:5}  ({:5.1}%)", tier.as_str(), count, self.percent(count));
        }

        process_info!(pid, "EXTRAS BREAKDOWN:");
        for (extras, count) in &self.extras_counts {
            process_info!(pid, "  {} extras: {:5}  ({:5.1}%)", extras, count, self.percent(*count));
        }

        process_info!(pid, "FIRST 5 PROMPTS:");
        for record in records.iter().take(5) {
            process_info!(
                pid,
                "[{}] Rarity: {} ({} extras): {}",
                record.token_id,
                record.rarity,
                record.num_extras,
                record.prompt
            );
        }

        process_info!(pid, "TRAIT FREQUENCY HIGHLIGHTS:");
        for (kind, count) in &self.optional_counts {
            process_info!(
                pid,
                "  {:12}: {:5} agents have one ({:5.1}%)",
                kind.id(),
                count,
                self.percent(*count)
            );
        }
    }
}
