//! Collapse structurally different gradients that share the same colours.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::palette::UniqueGradientStructure;

/// One editable stop of a collapsed gradient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollapsedStop {
    pub color: String,
    pub offset: f64,
}

/// All palette gradients with the same colour multiset, edited as one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedGradient {
    pub color_signature: String,
    /// Member hashes in palette order.
    pub original_hashes: Vec<String>,
    /// Stops of the first member seen.
    pub stops: Vec<CollapsedStop>,
}

/// Stop colours sorted lexically and joined with `|`.
pub fn color_signature(gradient: &UniqueGradientStructure) -> String {
    let mut colors: Vec<&str> = gradient.gradient.stop_colors().collect();
    colors.sort_unstable();
    colors.join("|")
}

/// Group gradients by colour signature, sorted by signature.
pub fn group_gradients(gradients: &[UniqueGradientStructure]) -> Vec<CollapsedGradient> {
    let mut groups: BTreeMap<String, CollapsedGradient> = BTreeMap::new();

    for gradient in gradients {
        let signature = color_signature(gradient);
        let group = groups
            .entry(signature.clone())
            .or_insert_with(|| CollapsedGradient {
                color_signature: signature,
                original_hashes: Vec::new(),
                stops: gradient
                    .gradient
                    .stops
                    .iter()
                    .map(|s| CollapsedStop {
                        color: s.color.clone(),
                        offset: s.offset,
                    })
                    .collect(),
            });
        if !group.original_hashes.contains(&gradient.hash) {
            group.original_hashes.push(gradient.hash.clone());
        }
    }

    groups.into_values().collect()
}
