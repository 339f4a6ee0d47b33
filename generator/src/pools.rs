//! Trait pool registry
//!
//! Static catalogs of candidate values per trait kind. The registry is built
//! once at startup, either from the built-in Chibi Agent pools or from a JSON
//! catalog that overrides some of them, and is read-only afterwards.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use shared::TraitKind;

use crate::error::{GeneratorError, GeneratorResult};

const SUIT_STYLES: &[&str] = &[
    "black suit black tie",
    "black suit black turtleneck",
    "black suit open collar black shirt",
    "black suit white shirt loose tie",
    "black suit white shirt skinny black tie",
    "black double-breasted suit",
    "black three-piece suit with vest visible",
    "black suit mandarin collar",
    "black suit buttoned all the way up",
    "black suit rolled sleeves",
    "rumpled black suit no tie",
    "sharp black suit black shirt",
    "crisp black suit white shirt black tie",
    "black suit with pocket square",
];

const SUNGLASSES: &[&str] = &[
    "black aviator sunglasses",
    "black wayfarer sunglasses",
    "round black sunglasses",
    "rectangular black sunglasses",
    "wraparound black sunglasses",
    "black clubmaster sunglasses",
    "cat-eye black sunglasses",
    "oval black sunglasses",
    "angular black sunglasses",
    "thin rectangular black sunglasses",
];

const HAIR_STYLES: &[&str] = &[
    "short spiky hair",
    "long straight hair",
    "messy curly hair",
    "slicked back hair",
    "short buzzcut",
    "long wavy hair with bangs",
    "short textured hair with undercut",
    "medium tousled hair",
    "neat short hair with side part",
    "short choppy hair",
    "tight braids pulled back",
    "short flat-top military haircut",
    "messy medium hair with bangs",
    "long hair in a bun",
    "mohawk",
    "shoulder length straight hair",
];

const HAIR_COLORS: &[&str] = &[
    "black",
    "dark brown",
    "light brown",
    "blonde",
    "dark blonde",
    "platinum blonde",
    "red",
    "dark red",
    "auburn",
    "silver-white",
    "dusty blue",
    "pink",
    "gray",
    "jet black",
    "strawberry blonde",
    "purple",
    "green-tinted black",
];

const SKIN_TONES: &[&str] = &[
    "pale skin",
    "light skin",
    "fair pink skin",
    "light tan skin",
    "olive skin",
    "warm medium skin",
    "tan skin",
    "warm golden-brown skin",
    "brown skin",
    "dark brown skin",
    "deep dark skin",
    "pale porcelain skin",
];

const BACKGROUNDS: &[&str] = &[
    "grainy surveillance footage of parking garage",
    "underground bunker with red emergency lights",
    "cork board with red string conspiracy wall",
    "foggy black helicopter tarmac",
    "empty interrogation room single lightbulb",
    "redacted documents scattered desk",
    "shadowy hallway with flickering fluorescent lights",
    "desert highway Area 51 searchlights",
    "secret underground lab with green glowing tubes",
    "rainy night embassy rooftop with satellite dishes",
    "long dark corridor with single red exit sign",
    "foggy bridge at midnight with distant headlights",
    "empty parking structure with flickering lights",
    "dark server room with rows of blinking blue lights",
    "restricted military hangar with draped tarps",
    "desert night sky with distant unmarked warehouse",
    "dimly lit war room with glowing monitors",
    "satellite dish array in desert at night",
    "blacked out SUV motorcade on rainy street",
    "abandoned warehouse with scattered classified files",
    "rooftop at night with distant radio tower blinking red",
    "deep underground tunnel with pipes and dim yellow lights",
    "static-filled TV screens in dark control room",
    "airport tarmac with unmarked black helicopter",
    "night sky with blurry UFO and searchlights",
    "Pentagon hallway with fluorescent lighting",
    "blurry redacted documents and filing cabinets",
];

const EXPRESSIONS: &[&str] = &[
    "tiny neutral mouth",
    "tiny flat mouth",
    "small expressionless mouth",
    "small flat mouth",
    "tiny straight mouth",
];

const ACCESSORIES: &[&str] = &[
    "coiled clear earpiece",
    "radio earpiece with coiled cord",
    "single earpiece",
    "american flag lapel pin",
    "silver lapel pin",
    "badge lanyard tucked into jacket",
    "pen clipped to breast pocket",
    "classified folder peeking from jacket",
    "cigarette behind ear",
    "silver tie clip",
    "chain connecting ear cuff to collar",
    "dog tags tucked under shirt",
    "wristwatch peeking from sleeve",
];

const TATTOOS: &[&str] = &[
    "neck tattoo peeking above collar",
    "hand tattoos visible",
    "sleeve tattoo peeking from cuff",
    "teardrop face tattoo",
    "spider web tattoo on neck",
    "barcode tattoo on neck",
    "cross tattoo under eye",
    "snake tattoo crawling up neck",
    "rose tattoo behind ear",
    "skull tattoo behind ear",
    "flame tattoo on neck",
    "knuckle tattoos",
    "star tattoo behind ear",
    "dagger tattoo on hand",
    "forearm tattoos visible",
];

const PIERCINGS: &[&str] = &[
    "gold nose stud",
    "silver nose ring",
    "septum ring",
    "bull nose ring",
    "eyebrow piercing",
    "lip ring",
    "double nose ring",
    "industrial ear piercing",
    "double hoop earring",
    "ear cuff",
    "chain nose ring to ear cuff",
    "tongue piercing",
];

const FRECKLES: &[&str] = &[
    "freckles on nose",
    "scattered freckles across cheeks",
    "light freckles",
    "subtle freckles",
];

/// Whether a category appears on every item or only on rarer ones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Mandatory,
    Optional,
}

/// One trait kind and its ordered candidate pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitCategory {
    pub kind: TraitKind,
    pub presence: Presence,
    pub values: Vec<String>,
}

impl TraitCategory {
    fn new(kind: TraitKind, values: Vec<String>) -> Self {
        let presence = if kind.is_optional() { Presence::Optional } else { Presence::Mandatory };
        Self { kind, presence, values }
    }

    pub fn is_optional(&self) -> bool {
        self.presence == Presence::Optional
    }
}

/// All trait categories, in [`TraitKind`] order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitRegistry {
    categories: Vec<TraitCategory>,
}

impl TraitRegistry {
    /// Built-in Chibi Agent catalog
    pub fn chibi_agents() -> Self {
        let categories = TraitKind::ALL
            .iter()
            .map(|kind| TraitCategory::new(*kind, builtin_pool(*kind).iter().map(|v| v.to_string()).collect()))
            .collect();
        Self { categories }
    }

    /// Build a registry from explicit pools; every kind must be supplied
    pub fn from_pools(mut pools: BTreeMap<TraitKind, Vec<String>>) -> GeneratorResult<Self> {
        let mut categories = Vec::with_capacity(TraitKind::ALL.len());
        for kind in TraitKind::ALL {
            let values = pools
                .remove(&kind)
                .ok_or_else(|| GeneratorError::config(format!("no pool supplied for trait '{kind}'")))?;
            categories.push(TraitCategory::new(kind, values));
        }
        let registry = Self { categories };
        registry.validate()?;
        Ok(registry)
    }

    /// Built-in catalog with pools replaced by those in a JSON object keyed by
    /// trait id, e.g. `{"hair_color": ["black", "pink"]}`
    pub fn from_json_str(json: &str) -> GeneratorResult<Self> {
        let overrides: BTreeMap<TraitKind, Vec<String>> = serde_json::from_str(json)?;
        let mut registry = Self::chibi_agents();
        for (kind, values) in overrides {
            if let Some(category) = registry.categories.iter_mut().find(|c| c.kind == kind) {
                category.values = values;
            }
        }
        registry.validate()?;
        Ok(registry)
    }

    pub async fn from_json_file(path: &Path) -> GeneratorResult<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }

    /// Reject empty pools and duplicate values within a pool
    pub fn validate(&self) -> GeneratorResult<()> {
        for category in &self.categories {
            if category.values.is_empty() {
                return Err(GeneratorError::config(format!("trait pool '{}' is empty", category.kind)));
            }
            let mut seen = HashSet::new();
            for value in &category.values {
                if value.trim().is_empty() {
                    return Err(GeneratorError::config(format!("trait pool '{}' contains a blank value", category.kind)));
                }
                if !seen.insert(value.as_str()) {
                    return Err(GeneratorError::config(format!(
                        "trait pool '{}' lists '{}' twice",
                        category.kind, value
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[TraitCategory] {
        &self.categories
    }

    pub fn mandatory(&self) -> impl Iterator<Item = &TraitCategory> {
        self.categories.iter().filter(|c| !c.is_optional())
    }

    pub fn optional(&self) -> impl Iterator<Item = &TraitCategory> {
        self.categories.iter().filter(|c| c.is_optional())
    }

    pub fn optional_count(&self) -> usize {
        self.optional().count()
    }

    pub fn pool(&self, kind: TraitKind) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.values.as_slice())
            .unwrap_or(&[])
    }

    /// Number of distinct assignments carrying exactly `extras` optional traits
    ///
    /// Product of mandatory pool sizes times the sum, over every `extras`-sized
    /// subset of optional kinds, of the product of their pool sizes.
    pub fn combination_space(&self, extras: usize) -> u128 {
        let optional_sizes: Vec<u128> = self.optional().map(|c| c.values.len() as u128).collect();
        if extras > optional_sizes.len() {
            return 0;
        }

        let mandatory = self
            .mandatory()
            .fold(1u128, |acc, c| acc.saturating_mul(c.values.len() as u128));

        let mut subsets = 0u128;
        for mask in 0u32..(1u32 << optional_sizes.len()) {
            if mask.count_ones() as usize != extras {
                continue;
            }
            let product = optional_sizes
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .fold(1u128, |acc, (_, size)| acc.saturating_mul(*size));
            subsets = subsets.saturating_add(product);
        }

        mandatory.saturating_mul(subsets)
    }
}

impl Default for TraitRegistry {
    fn default() -> Self {
        Self::chibi_agents()
    }
}

fn builtin_pool(kind: TraitKind) -> &'static [&'static str] {
    match kind {
        TraitKind::SuitStyle => SUIT_STYLES,
        TraitKind::Sunglasses => SUNGLASSES,
        TraitKind::HairStyle => HAIR_STYLES,
        TraitKind::HairColor => HAIR_COLORS,
        TraitKind::SkinTone => SKIN_TONES,
        TraitKind::Background => BACKGROUNDS,
        TraitKind::Expression => EXPRESSIONS,
        TraitKind::Accessory => ACCESSORIES,
        TraitKind::Tattoo => TATTOOS,
        TraitKind::Piercing => PIERCINGS,
        TraitKind::Freckles => FRECKLES,
    }
}
