//! Rarity scheduler
//!
//! Expands a weight table into one extras-count per item and shuffles it so
//! that item ids carry no correlation with rarity.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WeightTable;
use crate::error::{GeneratorError, GeneratorResult};

/// Per-item extras-counts, index `i` belongs to item `i + 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaritySchedule {
    entries: Vec<u8>,
}

impl RaritySchedule {
    /// Expand `table` to exactly `total` entries and shuffle them with `rng`
    ///
    /// The multiset of entries equals the table exactly. The same RNG state
    /// and table always produce the same sequence.
    pub fn build<R: Rng + ?Sized>(
        table: &WeightTable,
        total: usize,
        optional_kinds: usize,
        rng: &mut R,
    ) -> GeneratorResult<Self> {
        if table.is_empty() {
            return Err(GeneratorError::config("rarity weight table is empty"));
        }
        if table.total() != total as u64 {
            return Err(GeneratorError::config(format!(
                "rarity weights sum to {} but {} items were requested",
                table.total(),
                total
            )));
        }
        if let Some(max) = table.max_extras() {
            if usize::from(max) > optional_kinds {
                return Err(GeneratorError::config(format!(
                    "extras-count {max} exceeds the {optional_kinds} optional trait categories"
                )));
            }
        }

        let mut entries = Vec::with_capacity(total);
        for (extras, count) in table.iter() {
            entries.extend(std::iter::repeat(extras).take(count as usize));
        }
        entries.shuffle(rng);

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[u8] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Realized item count per extras-count
    pub fn counts(&self) -> BTreeMap<u8, u32> {
        let mut counts = BTreeMap::new();
        for extras in &self.entries {
            *counts.entry(*extras).or_insert(0) += 1;
        }
        counts
    }
}
