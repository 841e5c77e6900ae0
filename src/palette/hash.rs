//! Structural gradient hashing.
//!
//! Two gradients hash equal exactly when their kind, offset-ordered stops,
//! kind-specific geometry, units, transform, spread method and href agree.
//! The element id never takes part.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::svg::{GradientInfo, GradientKind};

/// Number of hex characters kept from the digest.
pub const HASH_LENGTH: usize = 16;

const LINEAR_DEFAULTS: &[(&str, f64)] = &[("x1", 0.0), ("y1", 0.0), ("x2", 1.0), ("y2", 0.0)];
const RADIAL_DEFAULTS: &[(&str, f64)] = &[("cx", 0.5), ("cy", 0.5), ("r", 0.5)];

/// Stable short identifier for a gradient's structure.
pub fn gradient_hash(gradient: &GradientInfo) -> String {
    let canonical = canonical_json(gradient);
    let digest = blake3::hash(canonical.as_bytes()).to_hex();
    digest.as_str()[..HASH_LENGTH].to_string()
}

/// The canonical JSON text that gets hashed. Keys are sorted at every level.
pub fn canonical_json(gradient: &GradientInfo) -> String {
    let mut sorted = gradient.stops.clone();
    sorted.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    let stops: Vec<BTreeMap<&str, Value>> = sorted
        .iter()
        .map(|stop| {
            BTreeMap::from([
                ("color", Value::from(stop.color.to_ascii_lowercase())),
                ("offset", Value::from(stop.offset)),
                ("opacity", Value::from(stop.opacity)),
            ])
        })
        .collect();

    let mut root: BTreeMap<&str, Value> = BTreeMap::new();
    root.insert("type", Value::from(gradient.kind.as_str()));
    root.insert("stops", serde_json::to_value(stops).unwrap_or(Value::Null));
    root.insert("coords", coords(gradient));

    let optional = [
        ("gradientUnits", &gradient.gradient_units),
        ("gradientTransform", &gradient.gradient_transform),
        ("spreadMethod", &gradient.spread_method),
        ("href", &gradient.href),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            root.insert(key, Value::from(value.trim()));
        }
    }

    // A BTreeMap of JSON values always serializes.
    serde_json::to_string(&root).unwrap_or_default()
}

fn coords(gradient: &GradientInfo) -> Value {
    let defaults = match gradient.kind {
        GradientKind::Linear => LINEAR_DEFAULTS,
        GradientKind::Radial => RADIAL_DEFAULTS,
    };

    let mut coords: BTreeMap<&str, Value> = defaults
        .iter()
        .map(|(name, value)| (*name, Value::from(*value)))
        .collect();

    for name in gradient.kind.geometry_attributes() {
        if let Some(raw) = gradient.geometry(name) {
            coords.insert(name, coordinate(raw));
        }
    }

    serde_json::to_value(coords).unwrap_or(Value::Null)
}

/// Numbers compare by value (`0` == `0.0`); anything else verbatim.
fn coordinate(raw: &str) -> Value {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::from(n),
        _ => Value::from(raw),
    }
}
