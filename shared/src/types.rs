//! Core types used throughout the collection tooling

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Reported when library code logs before any binary initialised the singleton
static EMBEDDED: ProcessId = ProcessId::Embedded;

/// Process identifier for the binary currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// `generate-prompts`
    Generator,
    /// `generate-images`
    Orchestrator,
    /// `update-metadata-cid`
    Patcher,
    /// Library use without a binary (tests, embedding)
    Embedded,
}

impl ProcessId {
    pub fn init_generator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Generator)
    }

    pub fn init_orchestrator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Orchestrator)
    }

    pub fn init_patcher() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Patcher)
    }

    /// Get the global process ID, or `Embedded` when no binary set it
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&EMBEDDED)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Generator => write!(f, "generator"),
            ProcessId::Orchestrator => write!(f, "orchestrator"),
            ProcessId::Patcher => write!(f, "patcher"),
            ProcessId::Embedded => write!(f, "embedded"),
        }
    }
}

/// Sequential collection item id in `[1, N]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Four-digit zero-padded form used in file names and display
    pub fn padded(self) -> String {
        format!("{:04}", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:04}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        trimmed
            .parse::<u32>()
            .map(ItemId)
            .map_err(|_| SharedError::InvalidItemId { input: s.to_string() })
    }
}

/// Trait categories of a Chibi Agent, in canonical order
///
/// The derive order of `Ord` is the serialization order of a
/// [`TraitAssignment`], so variants must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    SuitStyle,
    Sunglasses,
    HairStyle,
    HairColor,
    SkinTone,
    Background,
    Expression,
    Accessory,
    Tattoo,
    Piercing,
    Freckles,
}

impl TraitKind {
    pub const ALL: [TraitKind; 11] = [
        TraitKind::SuitStyle,
        TraitKind::Sunglasses,
        TraitKind::HairStyle,
        TraitKind::HairColor,
        TraitKind::SkinTone,
        TraitKind::Background,
        TraitKind::Expression,
        TraitKind::Accessory,
        TraitKind::Tattoo,
        TraitKind::Piercing,
        TraitKind::Freckles,
    ];

    /// Kinds present on every item
    pub const MANDATORY: [TraitKind; 7] = [
        TraitKind::SuitStyle,
        TraitKind::Sunglasses,
        TraitKind::HairStyle,
        TraitKind::HairColor,
        TraitKind::SkinTone,
        TraitKind::Background,
        TraitKind::Expression,
    ];

    /// Rarity-bearing kinds
    pub const OPTIONAL: [TraitKind; 4] = [
        TraitKind::Accessory,
        TraitKind::Tattoo,
        TraitKind::Piercing,
        TraitKind::Freckles,
    ];

    pub fn is_optional(self) -> bool {
        Self::OPTIONAL.contains(&self)
    }

    pub fn id(self) -> &'static str {
        match self {
            TraitKind::SuitStyle => "suit_style",
            TraitKind::Sunglasses => "sunglasses",
            TraitKind::HairStyle => "hair_style",
            TraitKind::HairColor => "hair_color",
            TraitKind::SkinTone => "skin_tone",
            TraitKind::Background => "background",
            TraitKind::Expression => "expression",
            TraitKind::Accessory => "accessory",
            TraitKind::Tattoo => "tattoo",
            TraitKind::Piercing => "piercing",
            TraitKind::Freckles => "freckles",
        }
    }

    /// Human-readable name used as a metadata `trait_type`
    pub fn display_name(self) -> &'static str {
        match self {
            TraitKind::SuitStyle => "Suit Style",
            TraitKind::Sunglasses => "Sunglasses",
            TraitKind::HairStyle => "Hair Style",
            TraitKind::HairColor => "Hair Color",
            TraitKind::SkinTone => "Skin Tone",
            TraitKind::Background => "Background",
            TraitKind::Expression => "Expression",
            TraitKind::Accessory => "Accessory",
            TraitKind::Tattoo => "Tattoo",
            TraitKind::Piercing => "Piercing",
            TraitKind::Freckles => "Freckles",
        }
    }
}

impl fmt::Display for TraitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TraitKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TraitKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s.trim())
            .ok_or_else(|| SharedError::UnknownTraitKind { input: s.to_string() })
    }
}

/// Selected value per trait kind; `None` marks an absent optional trait
///
/// The whole map, absences included, is the canonical uniqueness key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitAssignment {
    traits: BTreeMap<TraitKind, Option<String>>,
}

impl TraitAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: TraitKind, value: Option<String>) {
        self.traits.insert(kind, value);
    }

    pub fn with(mut self, kind: TraitKind, value: impl Into<String>) -> Self {
        self.set(kind, Some(value.into()));
        self
    }

    pub fn get(&self, kind: TraitKind) -> Option<&str> {
        self.traits.get(&kind).and_then(|v| v.as_deref())
    }

    pub fn is_present(&self, kind: TraitKind) -> bool {
        self.get(kind).is_some()
    }

    /// Number of optional kinds carrying a value
    pub fn extras_count(&self) -> usize {
        TraitKind::OPTIONAL.iter().filter(|k| self.is_present(**k)).count()
    }

    /// True when every mandatory kind has a value
    pub fn is_complete(&self) -> bool {
        TraitKind::MANDATORY.iter().all(|k| self.is_present(*k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TraitKind, Option<&str>)> {
        self.traits.iter().map(|(k, v)| (*k, v.as_deref()))
    }
}

/// Coarse rarity tier derived from the extras-count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl RarityTier {
    pub const ALL: [RarityTier; 4] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Legendary,
    ];

    pub fn from_extras(extras: u8) -> Self {
        match extras {
            0 => RarityTier::Common,
            1 => RarityTier::Uncommon,
            2 => RarityTier::Rare,
            _ => RarityTier::Legendary,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of `full_collection.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub token_id: ItemId,
    pub traits: TraitAssignment,
    pub rarity: RarityTier,
    pub num_extras: u8,
    pub prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_formatting() {
        let id = ItemId::new(7);
        assert_eq!(id.padded(), "0007");
        assert_eq!(id.to_string(), "#0007");
        assert_eq!("#0042".parse::<ItemId>().unwrap(), ItemId::new(42));
        assert_eq!(" 17 ".parse::<ItemId>().unwrap(), ItemId::new(17));
        assert!("abc".parse::<ItemId>().is_err());
    }

    #[test]
    fn test_rarity_from_extras() {
        assert_eq!(RarityTier::from_extras(0), RarityTier::Common);
        assert_eq!(RarityTier::from_extras(1), RarityTier::Uncommon);
        assert_eq!(RarityTier::from_extras(2), RarityTier::Rare);
        assert_eq!(RarityTier::from_extras(3), RarityTier::Legendary);
        assert_eq!(RarityTier::from_extras(4), RarityTier::Legendary);
    }

    #[test]
    fn test_trait_kind_partition() {
        for kind in TraitKind::ALL {
            assert_ne!(TraitKind::MANDATORY.contains(&kind), kind.is_optional());
            assert_eq!(kind.id().parse::<TraitKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_assignment_serializes_in_kind_order_with_nulls() {
        let mut assignment = TraitAssignment::new()
            .with(TraitKind::Expression, "tiny flat mouth")
            .with(TraitKind::SuitStyle, "black suit black tie");
        assignment.set(TraitKind::Tattoo, None);

        let json = serde_json::to_string(&assignment).unwrap();
        assert_eq!(
            json,
            r#"{"suit_style":"black suit black tie","expression":"tiny flat mouth","tattoo":null}"#
        );

        let back: TraitAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assignment);
        assert_eq!(back.extras_count(), 0);
    }

    #[test]
    fn test_absent_and_present_optional_differ() {
        let mut a = TraitAssignment::new().with(TraitKind::HairColor, "pink");
        let mut b = a.clone();
        a.set(TraitKind::Freckles, None);
        b.set(TraitKind::Freckles, Some("light freckles".to_string()));
        assert_ne!(a, b);
        assert_eq!(b.extras_count(), 1);
    }
}
