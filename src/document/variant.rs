//! Variant parsing and per-set variant selection.

use super::walker::{IconSet, SetKind};

/// The size variant exported for every icon set.
pub const PREFERRED_SIZE: &str = "small";

/// One exportable variant of an icon set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub color: Option<String>,
    pub size: Option<String>,
    pub node_id: String,
    pub node_name: String,
}

impl Variant {
    /// Build a variant from a component node's `Key=Value, Key2=Value2` name.
    ///
    /// Only `color`/`colour` and `size` keys are recognized (case-insensitive);
    /// a name without any `=` yields a variant with neither axis.
    pub fn from_node(node_id: impl Into<String>, node_name: impl Into<String>) -> Self {
        let node_name = node_name.into();
        let (color, size) = parse_variant_name(&node_name);
        Self {
            color,
            size,
            node_id: node_id.into(),
            node_name,
        }
    }
}

/// Parse `Color=Primary, Size=Small` into `(color, size)`.
pub fn parse_variant_name(name: &str) -> (Option<String>, Option<String>) {
    let mut color = None;
    let mut size = None;

    for pair in name.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => color = Some(value.to_string()),
            "size" => size = Some(value.to_string()),
            _ => {}
        }
    }

    (color, size)
}

/// Why a set produced no export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The set has no variant children at all.
    NoVariants,
    /// The set has a size axis but no `small` value on it.
    NoPreferredSize { sizes: Vec<String> },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoVariants => write!(f, "component set has no variants"),
            SkipReason::NoPreferredSize { sizes } => write!(
                f,
                "no '{}' size variant (available: {})",
                PREFERRED_SIZE,
                sizes.join(", ")
            ),
        }
    }
}

/// Pick the single variant to export for an icon set.
///
/// Component sets prefer the `small` size. When the set has no size axis at
/// all the first variant is used; when it has sizes but none is `small` the
/// set is skipped. Bare components always export their only variant.
pub fn select_variant(set: &IconSet) -> Result<&Variant, SkipReason> {
    let first = set.variants.first().ok_or(SkipReason::NoVariants)?;

    if set.kind == SetKind::Component {
        return Ok(first);
    }

    if let Some(small) = set.variants.iter().find(|v| {
        v.size
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(PREFERRED_SIZE))
    }) {
        return Ok(small);
    }

    if set.variants.iter().all(|v| v.size.is_none()) {
        return Ok(first);
    }

    let mut sizes: Vec<String> = set.variants.iter().filter_map(|v| v.size.clone()).collect();
    sizes.dedup();
    Err(SkipReason::NoPreferredSize { sizes })
}
