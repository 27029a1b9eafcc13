//! Item art references
//!
//! Generators never touch image files; they ask an [`ArtSampler`] for a
//! path or URL and store whatever comes back.

use super::item::ItemCategory;

/// What an item looks like, for picking art
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRequest<'a> {
    pub category: ItemCategory,
    pub guild: Option<&'a str>,
    /// Gun type, relic type or grenade type
    pub kind: Option<&'a str>,
}

/// Supplies art references for generated items
pub trait ArtSampler {
    fn sample(&mut self, request: &ArtRequest<'_>) -> Option<String>;
}

/// Never supplies art
#[derive(Debug, Clone, Copy, Default)]
pub struct NoArt;

impl ArtSampler for NoArt {
    fn sample(&mut self, _request: &ArtRequest<'_>) -> Option<String> {
        None
    }
}

/// Explicit art wins over the sampler
pub(crate) fn pick_art(
    explicit: Option<&str>,
    sampler: &mut dyn ArtSampler,
    request: ArtRequest<'_>,
) -> Option<String> {
    match crate::loot::explicit(explicit) {
        Some(path) => Some(path.to_string()),
        None => sampler.sample(&request),
    }
}
