//! Pure classification rules, independent of any DOM traversal.
//!
//! Everything here operates on plain strings and numbers so the heuristics
//! can be unit-tested without building a document tree.

use blocksmith_config::{Breakpoints, CharacterCeilings};

/// Card variant derived from block-level class tokens.
///
/// The first `variant-*` token wins; anything unrecognised is carried
/// verbatim and treated like the default for heading coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    H4Default,
    H3Highlighted,
    H5Short,
    H5Long,
    Other(String),
}

impl Variant {
    /// Picks the variant out of block class tokens (without the reserved
    /// ones). Missing `variant-*` token yields [`Variant::H4Default`].
    pub fn from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Self {
        tokens
            .into_iter()
            .find_map(|token| token.strip_prefix("variant-"))
            .map(Self::from_name)
            .unwrap_or(Variant::H4Default)
    }

    fn from_name(name: &str) -> Self {
        match name {
            "h4-default" => Variant::H4Default,
            "h3-highlighted" => Variant::H3Highlighted,
            "h5-short" => Variant::H5Short,
            "h5-long" => Variant::H5Long,
            other => Variant::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Variant::H4Default => "h4-default",
            Variant::H3Highlighted => "h3-highlighted",
            Variant::H5Short => "h5-short",
            Variant::H5Long => "h5-long",
            Variant::Other(name) => name,
        }
    }

    /// Heading tag every card title is coerced to for this variant.
    pub fn target_tag(&self) -> &'static str {
        match self {
            Variant::H4Default | Variant::Other(_) => "h4",
            Variant::H3Highlighted => "h3",
            Variant::H5Short | Variant::H5Long => "h5",
        }
    }

    /// Advisory character ceiling for the card text, if this variant has one.
    pub fn ceiling(&self, ceilings: &CharacterCeilings) -> Option<usize> {
        match self {
            Variant::H4Default => Some(ceilings.h4),
            Variant::H5Short => Some(ceilings.h5_short),
            Variant::H5Long => Some(ceilings.h5_long),
            Variant::H3Highlighted | Variant::Other(_) => None,
        }
    }
}

/// Block class tokens that carry authoring options, with the structural
/// tokens (`block`, the block name, the container class) filtered out.
pub fn option_tokens<'a>(classes: &'a [String], prefix: &str) -> Vec<&'a str> {
    let container = format!("{prefix}-container");
    classes
        .iter()
        .map(String::as_str)
        .filter(|&c| c != "block" && c != prefix && c != container)
        .collect()
}

/// Grid size token: first `col-*` class verbatim, defaulting to `col-4`.
pub fn size_from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens
        .into_iter()
        .find(|token| token.starts_with("col-"))
        .unwrap_or("col-4")
        .to_string()
}

/// Eyebrow heuristic for the first paragraph of a hero content cell.
///
/// A paragraph qualifies when it carries no link, is under 50 characters,
/// and either shouts (all-uppercase) or name-drops a merchandising keyword.
pub fn is_eyebrow(text: &str, has_link: bool) -> bool {
    if has_link {
        return false;
    }
    let text = text.trim();
    if text.is_empty() || text.chars().count() >= 50 {
        return false;
    }
    if text == text.to_uppercase() {
        return true;
    }
    let lower = text.to_lowercase();
    ["new", "featured", "exclusive"]
        .iter()
        .any(|keyword| lower.contains(keyword))
}

/// Responsive bucket written to `data-screen-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSize {
    Small,
    Medium,
    Large,
}

impl ScreenSize {
    pub fn for_width(width: u32, breakpoints: &Breakpoints) -> Self {
        if width < breakpoints.mobile {
            ScreenSize::Small
        } else if width < breakpoints.tablet {
            ScreenSize::Medium
        } else {
            ScreenSize::Large
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenSize::Small => "small",
            ScreenSize::Medium => "medium",
            ScreenSize::Large => "large",
        }
    }
}
