//! Hash-keyed lookup over a loaded palette.

use std::collections::{BTreeSet, HashMap};

use super::library::{Palette, UniqueGradientStructure};

/// Fast lookups the runtime engine needs on every render.
#[derive(Debug, Clone, Default)]
pub struct PaletteIndex {
    gradients: HashMap<String, UniqueGradientStructure>,
    solids: BTreeSet<String>,
}

impl PaletteIndex {
    pub fn new(palette: &Palette) -> Self {
        Self {
            gradients: palette
                .unique_gradients
                .iter()
                .map(|g| (g.hash.clone(), g.clone()))
                .collect(),
            solids: palette.unique_solid_colors.iter().cloned().collect(),
        }
    }

    pub fn gradient(&self, hash: &str) -> Option<&UniqueGradientStructure> {
        self.gradients.get(hash)
    }

    pub fn contains_gradient(&self, hash: &str) -> bool {
        self.gradients.contains_key(hash)
    }

    pub fn contains_solid(&self, color: &str) -> bool {
        self.solids.contains(color)
    }

    /// Number of stops in the gradient, if known.
    pub fn stop_count(&self, hash: &str) -> Option<usize> {
        self.gradients.get(hash).map(|g| g.gradient.stops.len())
    }

    /// Index of the first stop of `hash` whose colour is exactly `color`.
    pub fn stop_index_of(&self, hash: &str, color: &str) -> Option<usize> {
        self.gradients
            .get(hash)?
            .gradient
            .stops
            .iter()
            .position(|s| s.color == color)
    }
}
