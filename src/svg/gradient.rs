//! Gradient definitions as found in an icon's markup.

use serde::{Deserialize, Serialize};

/// Linear or radial gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    Linear,
    Radial,
}

impl GradientKind {
    /// Map an element local name to a kind.
    pub fn from_element(name: &[u8]) -> Option<Self> {
        match name {
            b"linearGradient" => Some(GradientKind::Linear),
            b"radialGradient" => Some(GradientKind::Radial),
            _ => None,
        }
    }

    /// Geometry attributes meaningful for this kind, in canonical order.
    pub fn geometry_attributes(self) -> &'static [&'static str] {
        match self {
            GradientKind::Linear => &["x1", "y1", "x2", "y2"],
            GradientKind::Radial => &["cx", "cy", "r", "fx", "fy", "fr"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GradientKind::Linear => "linear",
            GradientKind::Radial => "radial",
        }
    }
}

/// A colour stop. `offset` is normalized to `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: String,
    pub opacity: f64,
}

/// Everything that defines a gradient's look, without its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientInfo {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    /// Stops ordered by offset.
    pub stops: Vec<GradientStop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_transform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl GradientInfo {
    /// An empty gradient of the given kind.
    pub fn new(kind: GradientKind) -> Self {
        Self {
            kind,
            stops: Vec::new(),
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            cx: None,
            cy: None,
            r: None,
            fx: None,
            fy: None,
            fr: None,
            gradient_units: None,
            gradient_transform: None,
            spread_method: None,
            href: None,
        }
    }

    /// Builder-style stop append; keeps stops sorted.
    pub fn with_stop(mut self, offset: f64, color: &str, opacity: f64) -> Self {
        self.stops.push(GradientStop {
            offset,
            color: color.to_string(),
            opacity,
        });
        self.sort_stops();
        self
    }

    /// Set a geometry attribute. Attributes foreign to the kind are ignored.
    pub fn set_geometry(&mut self, name: &str, value: impl Into<String>) {
        if !self.kind.geometry_attributes().contains(&name) {
            return;
        }
        let value = Some(value.into());
        match name {
            "x1" => self.x1 = value,
            "y1" => self.y1 = value,
            "x2" => self.x2 = value,
            "y2" => self.y2 = value,
            "cx" => self.cx = value,
            "cy" => self.cy = value,
            "r" => self.r = value,
            "fx" => self.fx = value,
            "fy" => self.fy = value,
            "fr" => self.fr = value,
            _ => {}
        }
    }

    /// Look up a geometry attribute by name.
    pub fn geometry(&self, name: &str) -> Option<&str> {
        match name {
            "x1" => self.x1.as_deref(),
            "y1" => self.y1.as_deref(),
            "x2" => self.x2.as_deref(),
            "y2" => self.y2.as_deref(),
            "cx" => self.cx.as_deref(),
            "cy" => self.cy.as_deref(),
            "r" => self.r.as_deref(),
            "fx" => self.fx.as_deref(),
            "fy" => self.fy.as_deref(),
            "fr" => self.fr.as_deref(),
            _ => None,
        }
    }

    /// Stable sort by offset; equal offsets keep document order.
    pub fn sort_stops(&mut self) {
        self.stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    }

    /// Stop colours in offset order.
    pub fn stop_colors(&self) -> impl Iterator<Item = &str> {
        self.stops.iter().map(|s| s.color.as_str())
    }
}

/// A gradient as it appeared in one icon, id kept beside the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedGradient {
    pub id: String,
    pub info: GradientInfo,
}
