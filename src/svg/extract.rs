//! Colour extraction from normalized SVG markup.
//!
//! Collects every solid paint used by the icon and every gradient
//! definition. Solid paints come from `fill`, `stroke`, `stop-color` and
//! `color`, either as attributes or inside an inline `style`.

use std::collections::BTreeSet;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Result, SwatchError};

use super::gradient::{ExtractedGradient, GradientInfo, GradientKind, GradientStop};

/// Properties whose values are solid paints.
const PAINT_PROPERTIES: &[&str] = &["fill", "stroke", "stop-color", "color"];

/// Colour usage of a single icon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorExtraction {
    /// Lowercased solid paints, sorted and unique.
    pub solid_colors: BTreeSet<String>,
    /// Gradients in document order.
    pub gradients: Vec<ExtractedGradient>,
    /// Why gradients were dropped, one line each.
    pub dropped: Vec<String>,
}

/// Extract solid colours and gradients from SVG markup.
pub fn extract_colors(svg: &str) -> Result<ColorExtraction> {
    let mut reader = Reader::from_str(svg);
    let mut extraction = ColorExtraction::default();
    let mut open: Option<PendingGradient> = None;

    loop {
        let event = reader.read_event().map_err(|e| SwatchError::Parse {
            message: format!(
                "Malformed SVG at byte {}: {}",
                reader.buffer_position(),
                e
            ),
            help: None,
        })?;

        match event {
            Event::Start(e) => {
                let attrs = attributes(&e);
                collect_paints(&attrs, &mut extraction.solid_colors);
                if let Some(kind) = GradientKind::from_element(e.local_name().as_ref()) {
                    open = Some(PendingGradient::new(kind, &attrs));
                } else if e.local_name().as_ref() == b"stop" {
                    if let Some(pending) = open.as_mut() {
                        pending.push_stop(&attrs);
                    }
                }
            }
            Event::Empty(e) => {
                let attrs = attributes(&e);
                collect_paints(&attrs, &mut extraction.solid_colors);
                if let Some(kind) = GradientKind::from_element(e.local_name().as_ref()) {
                    PendingGradient::new(kind, &attrs).finish(&mut extraction);
                } else if e.local_name().as_ref() == b"stop" {
                    if let Some(pending) = open.as_mut() {
                        pending.push_stop(&attrs);
                    }
                }
            }
            Event::End(e) => {
                if GradientKind::from_element(e.local_name().as_ref()).is_some() {
                    if let Some(pending) = open.take() {
                        pending.finish(&mut extraction);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(extraction)
}

struct PendingGradient {
    id: Option<String>,
    info: GradientInfo,
}

impl PendingGradient {
    fn new(kind: GradientKind, attrs: &[(String, String)]) -> Self {
        let mut info = GradientInfo::new(kind);
        let mut id = None;

        for (key, value) in attrs {
            match key.as_str() {
                "id" => id = Some(value.clone()).filter(|v| !v.is_empty()),
                "gradientUnits" => info.gradient_units = Some(value.clone()),
                "gradientTransform" => info.gradient_transform = Some(value.clone()),
                "spreadMethod" => info.spread_method = Some(value.clone()),
                "href" | "xlink:href" => info.href = Some(value.clone()),
                other => info.set_geometry(other, value.clone()),
            }
        }

        Self { id, info }
    }

    fn push_stop(&mut self, attrs: &[(String, String)]) {
        let style = attr(attrs, "style").map(parse_style).unwrap_or_default();
        let lookup = |name: &str| {
            attr(attrs, name)
                .map(str::to_string)
                .or_else(|| style_value(&style, name).map(str::to_string))
        };

        let offset = attr(attrs, "offset").map(parse_offset).unwrap_or(0.0);
        let color = lookup("stop-color")
            .map(|c| c.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "#000000".to_string());
        let opacity = lookup("stop-opacity")
            .and_then(|o| o.trim().parse::<f64>().ok())
            .map(|o| o.clamp(0.0, 1.0))
            .unwrap_or(1.0);

        self.info.stops.push(GradientStop {
            offset,
            color,
            opacity,
        });
    }

    fn finish(mut self, extraction: &mut ColorExtraction) {
        let Some(id) = self.id else {
            debug!("dropping gradient without id");
            extraction
                .dropped
                .push(format!("{} gradient without id", self.info.kind.as_str()));
            return;
        };
        if self.info.stops.is_empty() {
            debug!(%id, "dropping gradient without stops");
            extraction.dropped.push(format!("gradient '{}' has no stops", id));
            return;
        }

        self.info.sort_stops();
        extraction.gradients.push(ExtractedGradient { id, info: self.info });
    }
}

/// Decode an element's attributes into owned `(name, value)` pairs.
fn attributes(e: &BytesStart) -> Vec<(String, String)> {
    e.attributes()
        .with_checks(false)
        .flatten()
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&a.value).into_owned();
            let value = quick_xml::escape::unescape(&raw)
                .map(|v| v.into_owned())
                .unwrap_or(raw);
            (key, value)
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Split `prop: value; prop2: value2` into lowercased property names.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(prop, value)| (prop.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}

fn style_value<'a>(style: &'a [(String, String)], name: &str) -> Option<&'a str> {
    style
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn collect_paints(attrs: &[(String, String)], colors: &mut BTreeSet<String>) {
    for (key, value) in attrs {
        if PAINT_PROPERTIES.contains(&key.as_str()) {
            insert_paint(value, colors);
        } else if key == "style" {
            for (prop, value) in parse_style(value) {
                if PAINT_PROPERTIES.contains(&prop.as_str()) {
                    insert_paint(&value, colors);
                }
            }
        }
    }
}

fn insert_paint(value: &str, colors: &mut BTreeSet<String>) {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || value == "none" || value == "transparent" || value.starts_with("url(") {
        return;
    }
    colors.insert(value);
}

/// `"50%"` → 0.5, `"0.25"` → 0.25; clamped to `0.0..=1.0`.
fn parse_offset(raw: &str) -> f64 {
    let raw = raw.trim();
    let parsed = match raw.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map(|p| p / 100.0),
        None => raw.parse::<f64>(),
    };
    parsed.map(|o| o.clamp(0.0, 1.0)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ICON: &str = r##"<svg viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="a-paint0" x1="0" y1="0" x2="24" y2="24" cx="9" gradientUnits="userSpaceOnUse">
      <stop offset="100%" stop-color="#0000FF"/>
      <stop offset="0" style="stop-color: #FF0000; stop-opacity: 0.5"/>
    </linearGradient>
    <radialGradient id="a-paint1" cx="12" cy="12" r="6">
      <stop offset="0.3" stop-color="#fff"></stop>
    </radialGradient>
    <linearGradient id="a-empty"/>
  </defs>
  <path fill="url(#a-paint0)" d="M0 0h24v24H0z"/>
  <path fill="#1A1A2E" stroke="none" d="M1 1h2v2H1z"/>
  <circle style="fill: transparent; stroke: #E5E5E5" cx="12" cy="12" r="4"/>
  <g color="currentColor"><rect fill="#1a1a2e" width="1" height="1"/></g>
</svg>"##;

    #[test]
    fn test_solid_colors_collected_and_lowercased() {
        let extraction = extract_colors(ICON).unwrap();
        let solids: Vec<&str> = extraction.solid_colors.iter().map(|s| s.as_str()).collect();

        assert_eq!(
            solids,
            vec!["#0000ff", "#1a1a2e", "#e5e5e5", "#ff0000", "#fff", "currentcolor"]
        );
    }

    #[test]
    fn test_style_paints_are_collected() {
        let svg = r##"<svg><path style="fill:#ABCDEF;stroke: url(#x); opacity: 0.4"/></svg>"##;
        let extraction = extract_colors(svg).unwrap();

        assert_eq!(extraction.solid_colors.len(), 1);
        assert!(extraction.solid_colors.contains("#abcdef"));
    }

    #[test]
    fn test_linear_gradient_fields() {
        let extraction = extract_colors(ICON).unwrap();
        let linear = &extraction.gradients[0];

        assert_eq!(linear.id, "a-paint0");
        assert_eq!(linear.info.kind, GradientKind::Linear);
        assert_eq!(linear.info.x2.as_deref(), Some("24"));
        assert_eq!(linear.info.cx, None);
        assert_eq!(linear.info.gradient_units.as_deref(), Some("userSpaceOnUse"));
        assert_eq!(
            linear.info.stops,
            vec![
                GradientStop { offset: 0.0, color: "#ff0000".to_string(), opacity: 0.5 },
                GradientStop { offset: 1.0, color: "#0000ff".to_string(), opacity: 1.0 },
            ]
        );
    }

    #[test]
    fn test_radial_gradient_and_drops() {
        let extraction = extract_colors(ICON).unwrap();

        assert_eq!(extraction.gradients.len(), 2);
        let radial = &extraction.gradients[1].info;
        assert_eq!(radial.kind, GradientKind::Radial);
        assert_eq!(radial.r.as_deref(), Some("6"));
        assert_eq!(radial.stops[0].offset, 0.3);

        assert_eq!(extraction.dropped, vec!["gradient 'a-empty' has no stops".to_string()]);
    }

    #[test]
    fn test_gradient_without_id_dropped() {
        let svg = r##"<svg><linearGradient><stop offset="0" stop-color="#000"/></linearGradient></svg>"##;
        let extraction = extract_colors(svg).unwrap();

        assert!(extraction.gradients.is_empty());
        assert_eq!(extraction.dropped.len(), 1);
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("50%"), 0.5);
        assert_eq!(parse_offset(" 0.25 "), 0.25);
        assert_eq!(parse_offset("150%"), 1.0);
        assert_eq!(parse_offset("-1"), 0.0);
        assert_eq!(parse_offset("abc"), 0.0);
    }

    #[test]
    fn test_malformed_svg_is_an_error() {
        assert!(extract_colors("<svg><g></svg>").is_err());
    }
}
