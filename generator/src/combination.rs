//! Unique combination generator
//!
//! Samples full trait tuples for each item and rejects any tuple already
//! assigned in the same run. The seen-set and the RNG live in an explicit
//! [`GenerationRun`] so independent runs never share state.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use shared::{process_debug, CollectionRecord, ItemId, ProcessId, RarityTier, TraitAssignment};

use crate::config::GenerationConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::pools::TraitRegistry;
use crate::prompt::render_prompt;
use crate::rarity::RaritySchedule;

/// Every assignment accepted so far in one run
#[derive(Debug, Default)]
pub struct SeenCombinationSet {
    seen: HashSet<TraitAssignment>,
}

impl SeenCombinationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `assignment`; false when it was already present
    pub fn insert(&mut self, assignment: &TraitAssignment) -> bool {
        if self.seen.contains(assignment) {
            return false;
        }
        self.seen.insert(assignment.clone())
    }

    pub fn contains(&self, assignment: &TraitAssignment) -> bool {
        self.seen.contains(assignment)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Mutable state of a single generation run
pub struct GenerationRun {
    rng: StdRng,
    seen: SeenCombinationSet,
    attempts: u64,
    max_attempts: u64,
}

impl GenerationRun {
    pub fn new(seed: u64, max_attempts: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seen: SeenCombinationSet::new(),
            attempts: 0,
            max_attempts,
        }
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Samples drawn so far, accepted or not
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn seen(&self) -> &SeenCombinationSet {
        &self.seen
    }
}

/// Draws trait tuples from a registry
pub struct CombinationGenerator<'a> {
    registry: &'a TraitRegistry,
}

impl<'a> CombinationGenerator<'a> {
    pub fn new(registry: &'a TraitRegistry) -> Self {
        Self { registry }
    }

    /// Produce an assignment with exactly `extras` optional traits that no
    /// earlier item of `run` received
    ///
    /// Fails with `GenerationExhausted` once the run-wide attempt budget is
    /// spent.
    pub fn assign(&self, run: &mut GenerationRun, item_id: ItemId, extras: u8) -> GeneratorResult<TraitAssignment> {
        let optional = self.registry.optional_count();
        if usize::from(extras) > optional {
            return Err(GeneratorError::config(format!(
                "item {item_id} asks for {extras} extras but only {optional} optional categories exist"
            )));
        }

        while run.attempts < run.max_attempts {
            run.attempts += 1;
            let candidate = self.sample(&mut run.rng, usize::from(extras));
            if run.seen.insert(&candidate) {
                return Ok(candidate);
            }
            process_debug!(ProcessId::current(), "Duplicate combination for {}, resampling", item_id);
        }

        Err(GeneratorError::GenerationExhausted {
            item_id,
            attempts: run.attempts,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, extras: usize) -> TraitAssignment {
        let mut traits = TraitAssignment::new();

        for category in self.registry.mandatory() {
            let pick = rng.gen_range(0..category.values.len());
            traits.set(category.kind, Some(category.values[pick].clone()));
        }

        let optional: Vec<_> = self.registry.optional().collect();
        let chosen: HashSet<usize> = index::sample(rng, optional.len(), extras).into_iter().collect();
        for (position, category) in optional.iter().enumerate() {
            let value = if chosen.contains(&position) {
                let pick = rng.gen_range(0..category.values.len());
                Some(category.values[pick].clone())
            } else {
                None
            };
            traits.set(category.kind, value);
        }

        traits
    }
}

/// Output of [`generate_collection`]
#[derive(Debug, Clone)]
pub struct GeneratedCollection {
    pub records: Vec<CollectionRecord>,
    pub attempts: u64,
    pub unique: usize,
}

/// Build the schedule, assign unique traits to ids `1..=count` and render
/// prompts
pub fn generate_collection(registry: &TraitRegistry, config: &GenerationConfig) -> GeneratorResult<GeneratedCollection> {
    for (extras, requested) in config.weights.iter() {
        let available = registry.combination_space(usize::from(extras));
        if u128::from(requested) > available {
            return Err(GeneratorError::CombinationSpaceTooSmall {
                extras,
                requested,
                available,
            });
        }
    }

    let mut run = GenerationRun::new(config.seed, config.max_attempts);
    let schedule = RaritySchedule::build(&config.weights, config.count, registry.optional_count(), run.rng_mut())?;
    let generator = CombinationGenerator::new(registry);

    let mut records = Vec::with_capacity(schedule.len());
    for (index, extras) in schedule.entries().iter().enumerate() {
        let token_id = ItemId::new(index as u32 + 1);
        let traits = generator.assign(&mut run, token_id, *extras)?;
        let prompt = render_prompt(&traits);
        records.push(CollectionRecord {
            token_id,
            traits,
            rarity: RarityTier::from_extras(*extras),
            num_extras: *extras,
            prompt,
        });
    }

    Ok(GeneratedCollection {
        unique: run.seen().len(),
        attempts: run.attempts(),
        records,
    })
}
