//! SVG optimization step.
//!
//! The optimizer is opaque to the rest of the pipeline: it takes markup and
//! returns markup with a `viewBox` on the root. Failures are reported to the
//! caller, which falls back to the unoptimized input.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::config::OptimizerKind;
use crate::error::{Result, SwatchError};

/// Something that rewrites SVG markup into a smaller equivalent.
pub trait SvgOptimizer: Send + Sync {
    fn optimize(&self, svg: &str) -> Result<String>;
}

/// Drops editor noise and leaves geometry and paint servers as written.
///
/// Removes comments, doctypes, processing instructions, whitespace-only
/// text, `<metadata>` and anything in the Inkscape/Sodipodi namespaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinifyOptimizer;

impl SvgOptimizer for MinifyOptimizer {
    fn optimize(&self, svg: &str) -> Result<String> {
        let mut reader = Reader::from_str(svg);
        let mut writer = Writer::new(Vec::new());
        // Depth inside an element being dropped
        let mut skipping = 0usize;

        loop {
            let event = reader.read_event().map_err(|e| parse_error(e.to_string()))?;
            let event = match event {
                Event::Eof => break,
                Event::Start(e) => {
                    if skipping > 0 || is_editor_element(e.name().as_ref()) {
                        skipping += 1;
                        continue;
                    }
                    Event::Start(without_editor_attributes(&e))
                }
                Event::End(e) => {
                    if skipping > 0 {
                        skipping -= 1;
                        continue;
                    }
                    Event::End(e)
                }
                Event::Empty(e) => {
                    if skipping > 0 || is_editor_element(e.name().as_ref()) {
                        continue;
                    }
                    Event::Empty(without_editor_attributes(&e))
                }
                Event::Text(t) if t.iter().all(u8::is_ascii_whitespace) => continue,
                Event::Comment(_) | Event::DocType(_) | Event::PI(_) | Event::Decl(_) => continue,
                _ if skipping > 0 => continue,
                other => other,
            };
            writer.write_event(event).map_err(|e| parse_error(e.to_string()))?;
        }

        String::from_utf8(writer.into_inner()).map_err(|e| parse_error(e.to_string()))
    }
}

fn is_editor_name(name: &[u8]) -> bool {
    name.starts_with(b"inkscape:")
        || name.starts_with(b"sodipodi:")
        || name == b"xmlns:inkscape"
        || name == b"xmlns:sodipodi"
}

fn is_editor_element(name: &[u8]) -> bool {
    name == b"metadata" || is_editor_name(name)
}

fn without_editor_attributes(e: &BytesStart) -> BytesStart<'static> {
    let mut element = BytesStart::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes().with_checks(false).flatten() {
        if !is_editor_name(attr.key.as_ref()) {
            element.push_attribute(attr);
        }
    }
    element
}

/// Round-trips markup through usvg's parser and writer.
///
/// usvg resolves paint servers into user space, so identical gradients on
/// differently sized shapes no longer hash the same. Opt-in only.
#[derive(Debug, Default, Clone, Copy)]
pub struct UsvgOptimizer;

impl SvgOptimizer for UsvgOptimizer {
    fn optimize(&self, svg: &str) -> Result<String> {
        let options = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg, &options).map_err(|e| SwatchError::Parse {
            message: format!("usvg could not parse SVG: {}", e),
            help: None,
        })?;

        let write_options = usvg::WriteOptions {
            indent: usvg::Indent::None,
            ..Default::default()
        };
        let written = tree.to_string(&write_options);

        // usvg bakes the source viewBox into a root transform, so the
        // output coordinate space is the tree size.
        let size = tree.size();
        let view_box = format!("0 0 {} {}", size.width(), size.height());
        set_root_view_box(&written, &view_box).map_err(parse_error)
    }
}

/// Replace (or add) the `viewBox` of the root `<svg>` element.
fn set_root_view_box(svg: &str, view_box: &str) -> std::result::Result<String, String> {
    let mut reader = Reader::from_str(svg);
    let mut writer = Writer::new(Vec::new());
    let mut root_seen = false;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        let event = match event {
            Event::Eof => break,
            Event::Start(e) if !root_seen => {
                root_seen = true;
                Event::Start(with_view_box(&e, view_box))
            }
            Event::Empty(e) if !root_seen => {
                root_seen = true;
                Event::Empty(with_view_box(&e, view_box))
            }
            other => other,
        };
        writer.write_event(event).map_err(|e| e.to_string())?;
    }

    if !root_seen {
        return Err("no root element".to_string());
    }

    String::from_utf8(writer.into_inner()).map_err(|e| e.to_string())
}

fn with_view_box(e: &BytesStart, view_box: &str) -> BytesStart<'static> {
    let mut root = BytesStart::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes().with_checks(false).flatten() {
        if attr.key.as_ref() != b"viewBox" {
            root.push_attribute(attr);
        }
    }
    root.push_attribute(("viewBox", view_box));
    root
}

fn parse_error(message: String) -> SwatchError {
    SwatchError::Parse {
        message: format!("could not optimize SVG: {}", message),
        help: None,
    }
}

/// Leaves markup untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl SvgOptimizer for Passthrough {
    fn optimize(&self, svg: &str) -> Result<String> {
        Ok(svg.to_string())
    }
}

/// Build the optimizer selected in configuration.
pub fn optimizer_for(kind: OptimizerKind) -> Box<dyn SvgOptimizer> {
    match kind {
        OptimizerKind::Minify => Box::new(MinifyOptimizer),
        OptimizerKind::Usvg => Box::new(UsvgOptimizer),
        OptimizerKind::None => Box::new(Passthrough),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::extract_colors;

    const EDITED: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<!-- Generator: Sketch -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:sodipodi="http://sodipodi.sourceforge.net" width="16" height="16" viewBox="0 0 16 16" sodipodi:docname="up.svg">
  <metadata><rdf:RDF/></metadata>
  <sodipodi:namedview pagecolor="#ffffff"/>
  <path d="M8 2 L14 10 H2 Z" fill="url(#g)" inkscape:label="arrow"/>
  <defs>
    <linearGradient id="g" x1="0" y1="0" x2="1" y2="0">
      <stop stop-color="#ff0000"/>
      <stop offset="1" stop-color="#0000ff"/>
    </linearGradient>
  </defs>
</svg>"##;

    #[test]
    fn test_passthrough_is_identity() {
        let svg = r#"<svg viewBox="0 0 1 1"/>"#;
        assert_eq!(Passthrough.optimize(svg).unwrap(), svg);
    }

    #[test]
    fn test_minify_drops_editor_noise() {
        let optimized = MinifyOptimizer.optimize(EDITED).unwrap();

        assert_eq!(
            optimized,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path d="M8 2 L14 10 H2 Z" fill="url(#g)"/><defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="0"><stop stop-color="#ff0000"/><stop offset="1" stop-color="#0000ff"/></linearGradient></defs></svg>"##
        );
    }

    #[test]
    fn test_minify_keeps_gradient_structure() {
        let before = extract_colors(EDITED).unwrap();
        let after = extract_colors(&MinifyOptimizer.optimize(EDITED).unwrap()).unwrap();

        assert_eq!(before.gradients, after.gradients);
    }

    #[test]
    fn test_minify_rejects_unbalanced_markup() {
        assert!(MinifyOptimizer.optimize("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_usvg_writes_view_box() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48" viewBox="0 0 24 24"><rect width="24" height="24" fill="#ff0000"/></svg>"##;
        let optimized = UsvgOptimizer.optimize(svg).unwrap();

        assert!(optimized.contains(r#"viewBox="0 0 48 48""#));
        assert_eq!(optimized.matches("viewBox=").count(), 1);
    }

    #[test]
    fn test_usvg_rejects_garbage() {
        assert!(UsvgOptimizer.optimize("not an svg").is_err());
    }

    #[test]
    fn test_default_optimizer_is_minify() {
        let optimized = optimizer_for(OptimizerKind::default()).optimize(EDITED).unwrap();
        assert!(!optimized.contains("metadata"));
        assert!(optimized.contains(r#"viewBox="0 0 16 16""#));
    }
}
