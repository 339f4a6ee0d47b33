//! Generation configuration: item count, seed, attempt budget and the
//! rarity weight table

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::GeneratorError;

/// Target item count per extras-count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightTable {
    counts: BTreeMap<u8, u32>,
}

impl WeightTable {
    pub fn new(counts: BTreeMap<u8, u32>) -> Self {
        Self { counts }
    }

    /// Common 400, Uncommon 760, Rare 600, Legendary 200 + 40
    pub fn chibi_default() -> Self {
        Self::from_pairs(&[(0, 400), (1, 760), (2, 600), (3, 200), (4, 40)])
    }

    pub fn from_pairs(pairs: &[(u8, u32)]) -> Self {
        Self {
            counts: pairs.iter().copied().collect(),
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn max_extras(&self) -> Option<u8> {
        self.counts.keys().next_back().copied()
    }

    /// Entries in ascending extras order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    pub fn get(&self, extras: u8) -> u32 {
        self.counts.get(&extras).copied().unwrap_or(0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::chibi_default()
    }
}

impl fmt::Display for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}:{v}")).collect();
        f.write_str(&parts.join(","))
    }
}

/// Parses `"0:400,1:760,2:600"`
impl FromStr for WeightTable {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut counts = BTreeMap::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (extras, count) = entry
                .split_once(':')
                .ok_or_else(|| GeneratorError::config(format!("weight entry '{entry}' is not of the form extras:count")))?;
            let extras: u8 = extras
                .trim()
                .parse()
                .map_err(|_| GeneratorError::config(format!("invalid extras-count in '{entry}'")))?;
            let count: u32 = count
                .trim()
                .parse()
                .map_err(|_| GeneratorError::config(format!("invalid item count in '{entry}'")))?;
            if counts.insert(extras, count).is_some() {
                return Err(GeneratorError::config(format!("extras-count {extras} listed twice")));
            }
        }
        Ok(Self { counts })
    }
}

/// Parameters of one generation run
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub count: usize,
    pub seed: u64,
    /// Resample budget shared by all items
    pub max_attempts: u64,
    pub weights: WeightTable,
}

impl GenerationConfig {
    pub const DEFAULT_COUNT: usize = 2000;
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_MAX_ATTEMPTS: u64 = 50_000;

    pub fn new(count: usize, weights: WeightTable) -> Self {
        Self {
            count,
            weights,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            count: Self::DEFAULT_COUNT,
            seed: Self::DEFAULT_SEED,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            weights: WeightTable::chibi_default(),
        }
    }
}
