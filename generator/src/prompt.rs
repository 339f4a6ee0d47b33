//! Prompt renderer: trait assignment to image-generation prompt

use shared::{TraitAssignment, TraitKind};

const PREAMBLE: &str = "Chibi agent, oversized head, large glossy black eyes with white highlights";
const POSE: &str = "chest-up portrait";
const STYLE_TAG: &str = "kawaii digital art, NFT collectible card style";
const SEPARATOR: &str = ", ";

/// Render the fixed-order, comma-separated prompt for an assignment
///
/// Order: preamble, hair, skin, freckles?, expression, suit, sunglasses,
/// accessory?, tattoo?, piercing?, pose, background, style tag. Absent
/// traits are elided entirely.
pub fn render_prompt(traits: &TraitAssignment) -> String {
    let mut parts: Vec<String> = vec![PREAMBLE.to_string()];

    let hair: Vec<&str> = [TraitKind::HairColor, TraitKind::HairStyle]
        .iter()
        .filter_map(|kind| traits.get(*kind))
        .collect();
    if !hair.is_empty() {
        parts.push(hair.join(" "));
    }

    for kind in [
        TraitKind::SkinTone,
        TraitKind::Freckles,
        TraitKind::Expression,
        TraitKind::SuitStyle,
        TraitKind::Sunglasses,
        TraitKind::Accessory,
        TraitKind::Tattoo,
        TraitKind::Piercing,
    ] {
        push_present(&mut parts, traits.get(kind));
    }

    parts.push(POSE.to_string());
    if let Some(background) = traits.get(TraitKind::Background).filter(|b| !b.trim().is_empty()) {
        parts.push(format!("{background} background"));
    }
    parts.push(STYLE_TAG.to_string());

    parts.join(SEPARATOR)
}

fn push_present(parts: &mut Vec<String>, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        parts.push(value.to_string());
    }
}
